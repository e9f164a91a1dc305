//! Stompbot - a single-room first-person robot shooting gallery
//!
//! Core modules:
//! - `sim`: Simulation (camera, bullets, orbs, robots, cannon, timed sequences)
//! - `input`: Raw key/mouse state to per-tick intents
//! - `render`: Read-only render queries and GPU instance data
//! - `assets`: Lazily loaded quad-grid meshes
//! - `settings`: Player and simulation configuration

pub mod assets;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SimConfig};

use glam::Vec3;

/// Game configuration constants
///
/// Rates without a unit suffix are per tick; the host decides how often a
/// tick runs. `_MS` values are wall-clock milliseconds.
pub mod consts {
    /// Half-extent of the square room on both horizontal axes
    pub const PLANE_SIZE: f32 = 50.0;
    /// Camera keeps this far inside the walls
    pub const WALL_MARGIN: f32 = 2.0;

    /// Eye height when standing
    pub const GROUND_LEVEL: f32 = 5.0;
    /// Camera starts at the back of the room
    pub const CAMERA_START_Z: f32 = PLANE_SIZE - 5.0;
    pub const CAMERA_BASE_SPEED: f32 = 0.15;
    pub const SPRINT_MULTIPLIER: f32 = 2.0;
    /// Radians of look rotation per pixel of mouse travel
    pub const MOUSE_SENSITIVITY: f32 = 0.001;
    /// ~20 degrees
    pub const VERTICAL_LOOK_LIMIT: f32 = 0.349;
    pub const JUMP_STRENGTH: f32 = 0.3;
    pub const GRAVITY: f32 = -0.003;

    /// Cannon base length, also the muzzle distance for player shots
    pub const CANNON_LENGTH: f32 = 5.0;
    /// Player shots leave the cannon this far below the eye
    pub const CANNON_DROP: f32 = 1.0;
    /// Cannon hitbox sits this far below the eye
    pub const CANNON_HITBOX_DROP: f32 = 1.5;
    pub const CANNON_HITBOX_RADIUS: f32 = 2.0;

    pub const BULLET_STEP: f32 = 0.5;
    /// Bullets further than this outside the room are culled
    pub const BULLET_CULL_MARGIN: f32 = 10.0;

    pub const ORB_DRIFT_STEP: f32 = 0.05;
    pub const ORB_HIT_RADIUS: f32 = 0.40;
    pub const ORB_SPAWN_Y: f32 = 5.0;

    /// Global robot size factor
    pub const ROBOT_SCALE: f32 = 2.0;
    pub const ROBOT_COUNT: usize = 2;
    pub const ROBOT_HEALTH: u8 = 3;
    pub const ROBOT_SPEED: f32 = 0.05;
    pub const ROBOT_SPAWN_Y: f32 = 6.0;
    pub const REDNESS_PER_HIT: f32 = 0.3;

    // Stomp-walk gait
    pub const STEP_FREQUENCY: f32 = 0.005;
    pub const STEP_HEIGHT: f32 = 0.8;
    pub const BODY_TILT_DEG: f32 = 5.0;
    pub const STOP_DURATION: f32 = 0.2;
    pub const ZIGZAG_FREQUENCY: f32 = 0.01;
    pub const ZIGZAG_AMPLITUDE: f32 = 0.3;
    pub const FORWARD_SCALE: f32 = 0.3;
    pub const LEG_SWING_DEG: f32 = 30.0;
    pub const LOWER_LEG_FOLLOW: f32 = 0.8;
    pub const LOWER_LEG_STOMP_DEG: f32 = 20.0;
    pub const CANNON_SPIN_DEG: f32 = 5.0;

    // Robot fire
    pub const ROBOT_FIRE_INTERVAL_MS: f32 = 2000.0;
    /// Muzzle offset from the robot origin, before scaling
    pub const ROBOT_MUZZLE_OFFSET: [f32; 3] = [-0.45, 0.4, 1.6];
    /// Integer jitter added to each aim axis, in [-N, N)
    pub const ROBOT_AIM_JITTER: i32 = 5;

    // Timed sequences
    pub const SEQUENCE_STEP_MS: f32 = 10.0;
    pub const HIT_FLASH_MS: f32 = 50.0;
    pub const LEAN_STEP_DEG: f32 = 0.5;
    pub const LEAN_MAX_DEG: f32 = 45.0;
    pub const HEAD_STEP: f32 = 0.05;
    pub const HEAD_DROP_LIMIT: f32 = 2.2;
    pub const DEACTIVATE_DELAY_MS: f32 = 1000.0;
    pub const CANNON_LOWER_STEP_DEG: f32 = 0.1;
    pub const CANNON_RAISE_STEP_DEG: f32 = 0.2;
    pub const CANNON_FLOOR_DEG: f32 = -10.0;
    pub const CANNON_REENABLE_DELAY_MS: f32 = 2000.0;
}

/// Unit view direction for the given horizontal and vertical look angles
///
/// Angle zero looks down -Z; positive horizontal angles turn toward +X.
#[inline]
pub fn facing_direction(angle_h: f32, angle_v: f32) -> Vec3 {
    Vec3::new(
        angle_h.sin() * angle_v.cos(),
        angle_v.sin(),
        -angle_h.cos() * angle_v.cos(),
    )
}

/// Rightward strafe direction on the ground plane
#[inline]
pub fn strafe_direction(angle_h: f32) -> Vec3 {
    Vec3::new(angle_h.cos(), 0.0, angle_h.sin())
}

/// Wrap degrees into [0, 360]
#[inline]
pub fn wrap_degrees(mut angle: f32) -> f32 {
    while angle > 360.0 {
        angle -= 360.0;
    }
    while angle < 0.0 {
        angle += 360.0;
    }
    angle
}
