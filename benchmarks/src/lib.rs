//! Shared scene setup for the collision benchmarks.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sprig::ecs::components::physics::Body;
use sprig::ecs::components::transform::Transform2d;

const SEED: u64 = 0xC011_1DE5;

/// `n` boxes of 8-40 units scattered uniformly over a square `extent` wide.
///
/// About a fifth are static.
pub fn setup_box_world(n: usize, extent: f32) -> hecs::World {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut world = hecs::World::new();
    let half = extent * 0.5;

    for _ in 0..n {
        let position = Vec2::new(rng.gen_range(-half..half), rng.gen_range(-half..half));
        let size = Vec2::new(rng.gen_range(8.0..40.0), rng.gen_range(8.0..40.0));
        world.spawn((
            Transform2d::new(position, size),
            Body {
                is_static: rng.gen_bool(0.2),
            },
        ));
    }

    world
}

/// Density roughly matching a platformer screen: ~one box per 100x100 cell.
pub fn setup_uniform_world(n: usize) -> hecs::World {
    setup_box_world(n, (n as f32).sqrt() * 100.0)
}

/// Everything packed into a small area so most cells hold many boxes.
pub fn setup_dense_world(n: usize) -> hecs::World {
    setup_box_world(n, (n as f32).sqrt() * 20.0)
}

/// Row of static pillars along the x axis, spaced `spacing` apart.
pub fn setup_corridor_world(n: usize, spacing: f32) -> hecs::World {
    let mut world = hecs::World::new();
    for i in 0..n {
        world.spawn((
            Transform2d::new(Vec2::new((i + 1) as f32 * spacing, 0.0), Vec2::new(10.0, 60.0)),
            Body::new_static(),
        ));
    }
    world
}
