use std::time::Duration;

use anyhow::{bail, Context, Result};
use glam::{Mat4, Vec3};
use log::info;

mod core;
mod engine;
mod game;

use engine::environment::{Environment, Pose};
use engine::game_loop::GameLoop;
use engine::input::{Action, LocomotionInput, PlayerInput};
use engine::mesh::{Mesh, MeshGroup, MeshNode};
use engine::physics::ProbeWorld;
use engine::sim::SimEnvironment;
use game::characters::{Character, LocomotionStats, VaultStats, VaultStep};

/// Input script: wall-clock seconds, then `+action` to press or `-action`
/// to release
const SCRIPT: &str = "
    0.0 +move_forward
    0.5 +sprint
    3.0 +jump
    3.1 -jump
    4.5 +move_right
    5.0 -move_right
    6.0 +pause
    6.5 +pause
    7.5 -sprint
    8.5 -move_forward
";

/// Simulation time covered by the scripted run
const DEMO_SECONDS: f32 = 10.0;

/// Uneven frame times, cycled, to exercise the fixed-step accumulator
const FRAME_TIMES_MS: [u64; 5] = [16, 17, 20, 12, 33];

/// Ground ray reach below the feet
const GROUND_REACH: f32 = 0.15;

/// Seconds the stalled-animator run holds forward
const STALLED_SECONDS: f32 = 3.0;

#[derive(Debug, Clone, Copy)]
struct ScriptEvent {
    at: f32,
    action: Action,
    pressed: bool,
}

fn parse_script(script: &str) -> Result<Vec<ScriptEvent>> {
    let mut events = Vec::new();
    for (number, line) in script.lines().enumerate().map(|(i, line)| (i + 1, line)) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((at, command)) = line.split_once(' ') else {
            bail!("Script line {}: expected '<seconds> <+|-><action>'", number);
        };
        let at: f32 = at
            .parse()
            .with_context(|| format!("Script line {}: bad time '{}'", number, at))?;
        let command = command.trim();
        let (pressed, name) = if let Some(name) = command.strip_prefix('+') {
            (true, name)
        } else if let Some(name) = command.strip_prefix('-') {
            (false, name)
        } else {
            bail!("Script line {}: '{}' must start with + or -", number, command);
        };
        let action = Action::from_name(name)
            .with_context(|| format!("Script line {}: unknown action '{}'", number, name))?;
        events.push(ScriptEvent {
            at,
            action,
            pressed,
        });
    }
    Ok(events)
}

/// Posts and rails combined into a single fence mesh
fn build_fence() -> Result<MeshGroup> {
    let mut fence = MeshGroup::new(MeshNode::new("Fence", Mat4::IDENTITY));

    let post = Mesh::cuboid(Vec3::new(0.1, 0.75, 0.1));
    for (i, x) in [-3.0, 0.0, 3.0].into_iter().enumerate() {
        fence.add_child(
            MeshNode::new(&format!("Post{i}"), Mat4::from_translation(Vec3::new(x, 0.75, 5.0)))
                .with_mesh(post.clone())
                .with_material("weathered_wood"),
        );
    }

    let rail = Mesh::cuboid(Vec3::new(3.0, 0.08, 0.05));
    for (i, y) in [0.6, 1.3].into_iter().enumerate() {
        fence.add_child(
            MeshNode::new(&format!("Rail{i}"), Mat4::from_translation(Vec3::new(0.0, y, 5.0)))
                .with_mesh(rail.clone())
                .with_material("painted_wood"),
        );
    }

    fence.combine().context("Failed to combine fence meshes")?;
    Ok(fence)
}

/// Ray-cast world holding the combined fence as a single tagged box
fn fence_world() -> Result<ProbeWorld> {
    let fence = build_fence()?;
    let (min, max) = fence
        .root
        .mesh
        .as_ref()
        .and_then(Mesh::bounds)
        .context("Combined fence has no geometry")?;
    info!("Fence bounds {} .. {}", min, max);

    let mut world = ProbeWorld::new();
    world.add_bounds(&fence.root.name, min, max);
    Ok(world)
}

/// Walk, sprint over the fence, jump and run out of stamina, driven by
/// scripted input through the fixed-step loop
fn run_scripted(events: &[ScriptEvent]) -> Result<()> {
    let mut sim = SimEnvironment::new(
        fence_world()?,
        SimEnvironment::standard_animator(),
        Pose::from_yaw(Vec3::ZERO, 0.0),
    )
    .with_camera_yaw(0.0)
    .with_ground_check_distance(GROUND_REACH);
    let mut character = Character::standard("runner");

    let mut input = PlayerInput::new();
    let mut game_loop = GameLoop::new();
    let dt = game_loop.fixed_timestep();
    let mut pending = events.iter().peekable();

    let mut frame = 0;
    while sim.elapsed() < DEMO_SECONDS {
        let wall_time = game_loop.elapsed().as_secs_f32();
        while let Some(event) = pending.next_if(|event| event.at <= wall_time) {
            match event.action {
                Action::Pause if event.pressed => game_loop.toggle_pause(),
                Action::Pause => {}
                action if event.pressed => input.press(action),
                action => input.release(action),
            }
        }

        let frame_time = Duration::from_millis(FRAME_TIMES_MS[frame % FRAME_TIMES_MS.len()]);
        frame += 1;

        for _ in 0..game_loop.advance(frame_time) {
            let report = character.tick(&input.locomotion_input(), dt, &mut sim);
            sim.step(dt);
            input.update();

            let states = character.state_machine();
            if states.state_just_changed() {
                info!(
                    "[{:5.2}s] {} -> {} at {} (stamina {:.0}%)",
                    sim.elapsed(),
                    states.previous_state().animation_name(),
                    report.state.animation_name(),
                    sim.actor_pose().position,
                    character.stamina_fraction() * 100.0
                );
            }
        }
    }

    let stamina = character.locomotion().stamina();
    info!(
        "Scripted run finished: {} frames, {} updates, {} dropped, {:.1} fps",
        game_loop.frame_count(),
        game_loop.update_count(),
        game_loop.dropped_frames(),
        game_loop.fps()
    );
    info!(
        "{} ended at {} facing {:.1} deg, '{}' for {:.2}s, after {} vault(s)",
        character.name,
        sim.pose().position,
        sim.pose().facing_degrees(),
        character.state().animation_name(),
        character.state_machine().state_time(),
        character.vault().completed(),
    );
    info!(
        "Stamina {:.0}/{:.0}{}, animator in '{}' at speed {:.2}, {} sound(s) played",
        stamina.current(),
        stamina.max(),
        if stamina.is_exhausted() { " (exhausted)" } else { "" },
        sim.animator().current_state(),
        sim.animator_params().speed,
        sim.sounds().len()
    );
    Ok(())
}

/// Same fence, but the animator has no vault clip. The enter timeout keeps
/// the character from waiting on it forever.
fn run_stalled() -> Result<()> {
    let mut sim = SimEnvironment::new(
        fence_world()?,
        SimEnvironment::standard_animator(),
        Pose::from_yaw(Vec3::ZERO, 0.0),
    );
    sim.animator_mut().remove_clip("Vault");

    let vault = VaultStats::standard().with_anim_enter_timeout(1.0);
    let mut character = Character::new("stalled", LocomotionStats::standard(), vault)
        .context("Invalid character tuning")?;

    let dt = GameLoop::new().fixed_timestep();
    let forward = LocomotionInput::forward();
    let mut held_ticks = 0;
    while sim.elapsed() < STALLED_SECONDS {
        let report = character.tick(&forward, dt, &mut sim);
        sim.step(dt);
        if report.command.is_none() && report.vault != VaultStep::Aborted {
            held_ticks += 1;
        }
    }

    info!(
        "{} gave up {} vault(s) in {:.1}s after {} ticks waiting, root motion {}",
        character.name,
        character.vault().aborted(),
        sim.elapsed(),
        held_ticks,
        if sim.is_root_motion_enabled() { "on" } else { "off" }
    );
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting fence vault demo...");

    let events = parse_script(SCRIPT)?;
    run_scripted(&events)?;
    run_stalled()?;

    Ok(())
}
