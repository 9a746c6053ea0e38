use crate::body::{BodyId, Vector2};
use crate::error::Result;
use crate::world::World;

/// Scatters `n` resting bodies uniformly over a disc of radius `extent`
/// around the origin, with radii drawn from the spawn sizes `2..=6`.
pub fn uniform_field(world: &mut World, n: usize, extent: f64, seed: u64) -> Result<Vec<BodyId>> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut ids = Vec::with_capacity(n);

    while ids.len() < n {
        let a = rng.f64() * std::f64::consts::TAU;
        let (sin, cos) = a.sin_cos();
        let r = rng.f64().sqrt() * extent;
        let pos = Vector2::new(cos, sin) * r;
        let radius = 2.0 * rng.u8(1..=3) as f64;

        ids.push(world.spawn(pos, radius, None, None)?);
    }

    Ok(ids)
}
