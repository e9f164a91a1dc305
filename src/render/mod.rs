//! Render-facing queries
//!
//! The simulation is drawn from snapshots; GPU buffers are built from those.

pub mod instance;
pub mod snapshot;

pub use instance::{SphereInstance, sphere_instances};
pub use snapshot::{RenderSnapshot, RobotView, damage_tint, robot_yaw_deg};
