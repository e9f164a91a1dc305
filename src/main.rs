//! Stompbot entry point
//!
//! Headless host: loads settings, runs a short scripted round at a fixed
//! frame interval, and prints the final render snapshot as JSON.

use stompbot::Settings;
use stompbot::assets::LazyMesh;
use stompbot::input::{InputMapper, KeyBindings, MouseButton};
use stompbot::render::{RenderSnapshot, sphere_instances};
use stompbot::sim::{GameEvent, GameState, tick};

/// Frames in the scripted round
const DEMO_FRAMES: u32 = 900;

/// Feed the mapper the keys a player might press on this frame
fn scripted_input(input: &mut InputMapper, frame: u32) {
    match frame {
        0 => {
            input.key_down('e');
            input.key_down('g');
        }
        1 => input.key_down('w'),
        120 => input.key_up('w'),
        300 => input.key_down('g'),
        _ => {}
    }
    if frame % 45 == 0 {
        input.mouse_button(MouseButton::Left);
    }
    // Sweep the view slowly left and right
    let sweep = if (frame / 150) % 2 == 0 { 4.0 } else { -4.0 };
    input.mouse_delta(sweep, 0.0);
    if frame + 1 == DEMO_FRAMES {
        input.key_down('q');
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Stompbot (headless) starting...");

    let settings = Settings::load();
    let seed = settings.resolve_seed();
    log::info!("Seed {seed}");

    if let Some(path) = &settings.cannon_mesh_path {
        let mesh = LazyMesh::new(path, settings.mesh_columns);
        if let Some(grid) = mesh.get() {
            log::info!("Cannon mesh: {} quads", grid.quad_count());
        }
    }

    let mut state = GameState::with_config(seed, settings.sim);
    let mut input = InputMapper::new(KeyBindings::default(), settings.mouse_sensitivity);

    let mut hits = 0;
    let mut destroyed = 0;
    let mut frame = 0;
    while !input.quit_requested() {
        scripted_input(&mut input, frame);
        let tick_input = input.take_tick_input();
        tick(&mut state, &tick_input, settings.frame_ms);

        for event in &state.events {
            match event {
                GameEvent::RobotHit { .. } | GameEvent::OrbDestroyed => hits += 1,
                GameEvent::RobotDestroyed { .. } => destroyed += 1,
                _ => {}
            }
        }
        frame += 1;
    }

    let snapshot = RenderSnapshot::capture(&state);
    log::info!(
        "Ran {} ticks ({:.1} s): {hits} hits, {destroyed} robots destroyed, {} spheres to draw",
        state.ticks,
        state.time_ms / 1000.0,
        sphere_instances(&snapshot).len()
    );

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Could not serialize snapshot: {err}"),
    }
}
