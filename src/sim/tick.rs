//! Frame tick
//!
//! One call advances the whole world by one frame. Timed sequences see the
//! host's elapsed milliseconds; movement rates are per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve_collisions;
use super::movement::{self, MovementIntent};
use super::sequences::advance_sequences;
use super::state::GameState;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Movement keys held
    pub movement: MovementIntent,
    /// Accumulated look rotation (x = yaw, y = pitch, radians)
    pub look_delta: Vec2,
    /// Fire the player's cannon
    pub fire: bool,
    /// Jump (ignored unless enabled in the sim config)
    pub jump: bool,
    pub spawn_robots: bool,
    pub spawn_orb: bool,
}

/// Advance the game state by one frame
///
/// Sequences advance first, so anything a tick starts (a hit flash, a
/// destruction, a cannon disable) first moves on a later tick.
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f32) {
    state.events.clear();
    state.ticks += 1;
    if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
        state.time_ms += f64::from(elapsed_ms);
    }

    advance_sequences(state, elapsed_ms);

    state.camera.look(input.look_delta);
    if input.jump && state.config.jump_enabled && state.camera.try_jump() {
        log::trace!("Jump");
    }

    if input.spawn_robots {
        state.spawn_robots();
    }
    if input.spawn_orb {
        state.spawn_orb();
    }
    if input.fire && !state.fire_player_bullet() {
        log::debug!("Fire ignored, cannon disabled");
    }

    movement::advance(state, &input.movement);
    resolve_collisions(state);
    movement::cull_bullets(state);
}
