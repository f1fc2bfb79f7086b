//! Initial node positions.
//!
//! Uniform random `(x, y)` per node inside `[-extent, extent)`. These only
//! seed the renderer's own force simulation; no layout is computed here.

use rand::Rng;

/// Half-width of the default seeding square.
pub const DEFAULT_EXTENT: f32 = 1.0;

/// `2 * num_nodes` values, `[x0, y0, x1, y1, ...]`, drawn in that order.
pub fn seed_positions<R: Rng + ?Sized>(num_nodes: usize, extent: f32, rng: &mut R) -> Vec<f32> {
    if num_nodes == 0 {
        return Vec::new();
    }
    (0..num_nodes * 2).map(|_| rng.gen_range(-extent..extent)).collect()
}
