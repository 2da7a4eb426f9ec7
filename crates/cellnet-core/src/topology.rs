use serde::{Deserialize, Serialize};

/// 2D coordinate in simulation units.
pub type Position = [f64; 2];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseStation {
    pub index: usize,
    pub position: Position,
    /// Mbps shared among all users associated with this station.
    pub capacity: f64,
}

/// Station centres for an `n` x `n` offset hexagonal lattice.
///
/// Column `i`, row `j` lands at `(spacing * (i + 0.5 * (j % 2)), spacing * sqrt(3)/2 * j)`.
/// Indices run column-major (`i * n + j`), which is also the tie-break order used by
/// association.
pub fn hex_grid_centers(n: usize, spacing: f64) -> Vec<Position> {
    let row_height = spacing * 3f64.sqrt() / 2.0;
    let mut centers = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let x = spacing * (i as f64 + 0.5 * (j % 2) as f64);
            let y = row_height * j as f64;
            centers.push([x, y]);
        }
    }
    centers
}

pub fn generate_stations(n: usize, spacing: f64, capacity: f64) -> Vec<BaseStation> {
    hex_grid_centers(n, spacing)
        .into_iter()
        .enumerate()
        .map(|(index, position)| BaseStation {
            index,
            position,
            capacity,
        })
        .collect()
}
