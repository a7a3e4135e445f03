//! Charts module - chart layouts and rendering

mod layout;
mod renderer;
mod swarm;

pub use layout::{keep_fixed_tick, keep_proportional_tick, GridShape};
pub use renderer::{ChartError, ChartRenderer, Metric, PALETTE};
pub use swarm::swarm_positions;
