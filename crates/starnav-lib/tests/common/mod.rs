#![allow(dead_code)]

use starnav_lib::{NavGraph, Position, StarRecord};

pub fn star(id: &str, x: f64, y: f64, z: f64) -> StarRecord {
    StarRecord::new(id, id.to_uppercase(), Position::new(x, y, z))
}

/// A(0,0,0), B(3,0,0), C(3,4,0), D(10,0,0).
pub fn triangle_catalog() -> Vec<StarRecord> {
    vec![
        star("a", 0.0, 0.0, 0.0),
        star("b", 3.0, 0.0, 0.0),
        star("c", 3.0, 4.0, 0.0),
        star("d", 10.0, 0.0, 0.0),
    ]
}

pub fn triangle_graph() -> NavGraph {
    NavGraph::connected(&triangle_catalog(), 5.0).expect("graph builds")
}

/// `width` x `width` grid in the z=0 plane with unit spacing.
pub fn grid_catalog(width: usize) -> Vec<StarRecord> {
    let mut stars = Vec::with_capacity(width * width);
    for row in 0..width {
        for col in 0..width {
            stars.push(star(
                &format!("g{row}-{col}"),
                col as f64,
                row as f64,
                0.0,
            ));
        }
    }
    stars
}

/// Deterministic pseudo-random catalog inside a cube of side `extent`.
pub fn scattered_catalog(count: usize, extent: f64) -> Vec<StarRecord> {
    let mut seed: u64 = 0x5eed_cafe;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        (seed % 1_000_000) as f64 / 1_000_000.0 * extent
    };
    (0..count)
        .map(|i| {
            let (x, y, z) = (next(), next(), next());
            star(&format!("s{i:04}"), x, y, z)
        })
        .collect()
}
