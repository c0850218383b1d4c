use anyhow::Context;
use glam::Vec2;
use sprig::ecs::components::transform::Transform2d;
use sprig::{FrameInput, MoveInput, Scene, SceneConfig};

const FRAME_TIME: f64 = 1.0 / 60.0;
const PLAYER_SIZE: Vec2 = Vec2::new(14.0, 17.0);

/// Scripted input: run right, hop the crate, run back left.
fn scripted_input(frame: u32) -> FrameInput {
    let player = match frame {
        0..=59 => MoveInput::default(),
        60..=149 => MoveInput::new(1.0, frame == 110),
        150..=299 => MoveInput::new(-1.0, frame == 220),
        _ => MoveInput::default(),
    };
    FrameInput { player }
}

fn build_level(scene: &mut Scene) -> anyhow::Result<hecs::Entity> {
    // Floor and boundary walls
    scene.spawn_solid(Vec2::new(0.0, 120.0), Vec2::new(800.0, 40.0))?;
    scene.spawn_solid(Vec2::new(-410.0, 0.0), Vec2::new(20.0, 240.0))?;
    scene.spawn_solid(Vec2::new(410.0, 0.0), Vec2::new(20.0, 240.0))?;

    // Ledge
    scene.spawn_solid(Vec2::new(150.0, 40.0), Vec2::new(120.0, 10.0))?;

    // Props dropped overlapping each other and the floor
    scene.spawn_prop(Vec2::new(60.0, 95.0), Vec2::splat(16.0), Vec2::ZERO)?;
    scene.spawn_prop(Vec2::new(70.0, 88.0), Vec2::splat(16.0), Vec2::ZERO)?;
    scene.spawn_prop(Vec2::new(-200.0, 60.0), Vec2::splat(12.0), Vec2::new(20.0, 0.0))?;

    let player = scene.spawn_player(Vec2::new(-100.0, 0.0), PLAYER_SIZE)?;
    Ok(player)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = SceneConfig::default();
    let mut scene = Scene::new(config).context("invalid scene configuration")?;
    let player = build_level(&mut scene).context("failed to build level")?;

    for frame in 0..360u32 {
        let input = scripted_input(frame);
        scene.step(FRAME_TIME, &input);

        if frame % 30 == 0 {
            let position = scene
                .world()
                .get::<&Transform2d>(player)
                .map(|t| t.position)
                .context("player disappeared")?;
            let report = scene.last_report();
            let stats = scene.collision().grid_stats();
            log::info!(
                "frame {frame:>3} player ({:>7.2}, {:>7.2}) grounded={} overlaps={} cells={} \
                 camera=({:.1}, {:.1})",
                position.x,
                position.y,
                report.player.map(|o| o.grounded).unwrap_or(false),
                report.overlaps,
                stats.total_cells,
                scene.camera().position.x,
                scene.camera().position.y,
            );
        }
    }

    let hit = scene.collision().trace_line(
        Vec2::new(-300.0, -100.0),
        Vec2::new(-300.0, 300.0),
        None,
    );
    log::info!(
        "probe straight down at x=-300: hit={} side={:?} distance={:.2}",
        hit.hit,
        hit.side,
        hit.distance
    );

    Ok(())
}
