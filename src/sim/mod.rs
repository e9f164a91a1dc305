//! Simulation module
//!
//! All gameplay logic lives here:
//! - Movement rates are per tick, timed sequences use elapsed host time
//! - Seeded RNG only
//! - Stable iteration order (robots by arena slot, bullets and orbs by insertion)
//! - No rendering or platform dependencies

pub mod collision;
pub mod movement;
pub mod sequences;
pub mod state;
pub mod tick;

pub use collision::{resolve_collisions, within_radius};
pub use movement::MovementIntent;
pub use sequences::{CannonSequence, DeathPhase, DeathSequence};
pub use state::{
    Bullet, BulletOwner, Camera, CannonHitbox, GameEvent, GameState, Gait, Orb, Robot, RobotPose,
};
pub use tick::{TickInput, tick};
