//! Swarm Layout Module
//! Spreads coincident points around a categorical x position so overlapping
//! observations stay visible.

use std::collections::HashMap;

/// Calculate swarm x positions for points sharing a categorical slot.
///
/// Points with duplicate y values (up to rounding) are spread symmetrically
/// across `width` around `center`; unique values stay on the center line.
pub fn swarm_positions(y_values: &[f64], center: f64, width: f64) -> Vec<f64> {
    let n = y_values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut positions = vec![center; n];

    // Round values and find duplicates
    let precision = 1e6;
    let mut value_indices: HashMap<i64, Vec<usize>> = HashMap::new();

    for (i, &y) in y_values.iter().enumerate() {
        let key = (y * precision).round() as i64;
        value_indices.entry(key).or_default().push(i);
    }

    // Spread duplicates symmetrically
    for indices in value_indices.values() {
        if indices.len() > 1 {
            let count = indices.len();
            let step = width / (count.max(2) - 1) as f64;
            let start = center - width / 2.0;

            for (i, &idx) in indices.iter().enumerate() {
                positions[idx] = start + i as f64 * step;
            }
        }
    }

    positions
}
