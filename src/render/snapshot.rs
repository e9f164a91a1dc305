//! Read-only view of the world for drawing
//!
//! A snapshot is taken after a tick and holds everything a renderer needs:
//! where to look from, what to draw, and in which colour. Nothing here feeds
//! back into the simulation.

use glam::Vec3;
use serde::Serialize;

use crate::sim::{BulletOwner, GameState, Robot, RobotPose};

/// Base robot body colour before damage tint
pub const ROBOT_BASE_TINT: [f32; 3] = [1.0, 0.55, 0.0];
/// How much each unit of redness pulls green and blue down
pub const TINT_DESATURATION: f32 = 0.2;

/// Robot yaw (degrees about +Y) that turns its front toward `eye`
pub fn robot_yaw_deg(robot: Vec3, eye: Vec3) -> f32 {
    let dx = eye.x - robot.x;
    let dz = eye.z - robot.z;
    dx.atan2(dz).to_degrees()
}

/// Body colour for a robot with the given redness
pub fn damage_tint(redness: f32) -> [f32; 3] {
    let [r, g, b] = ROBOT_BASE_TINT;
    [
        (r + redness).min(1.0),
        (g - redness * TINT_DESATURATION).max(0.0),
        (b - redness * TINT_DESATURATION).max(0.0),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraView {
    pub eye: Vec3,
    /// Point one unit along the view direction
    pub target: Vec3,
    pub up: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CannonView {
    pub tilt_deg: f32,
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BulletView {
    pub pos: Vec3,
    pub owner: BulletOwner,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotView {
    pub index: usize,
    pub pos: Vec3,
    pub yaw_deg: f32,
    pub tint: [f32; 3],
    pub pose: RobotPose,
    pub upper_body_angle: f32,
    pub head_offset: [f32; 2],
    pub destroyed: bool,
    /// Arm cannon turning; off once destroyed
    pub spinning: bool,
    /// Draw the body (robot is active)
    pub draw_body: bool,
    /// Draw the hit-flash sphere; independent of `draw_body`
    pub draw_flash: bool,
    pub flash_radius: f32,
}

impl RobotView {
    fn capture(index: usize, robot: &Robot, eye: Vec3) -> Self {
        Self {
            index,
            pos: robot.pos,
            yaw_deg: robot_yaw_deg(robot.pos, eye),
            tint: damage_tint(robot.redness),
            pose: robot.pose,
            upper_body_angle: robot.upper_body_angle,
            head_offset: [robot.head_offset_y, robot.head_offset_z],
            destroyed: robot.destroyed,
            spinning: robot.spinning,
            draw_body: robot.active,
            draw_flash: robot.hit_flash,
            flash_radius: robot.collision_radius,
        }
    }

    /// Anything of this robot to draw at all
    pub fn visible(&self) -> bool {
        self.draw_body || self.draw_flash
    }
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub camera: CameraView,
    pub cannon: CannonView,
    pub bullets: Vec<BulletView>,
    /// Orb centres
    pub orbs: Vec<Vec3>,
    pub robots: Vec<RobotView>,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let eye = state.camera.pos;
        Self {
            tick: state.ticks,
            camera: CameraView {
                eye,
                target: eye + state.camera.facing(),
                up: Vec3::Y,
            },
            cannon: CannonView {
                tilt_deg: state.cannon.tilt_deg,
                disabled: state.cannon.disabled,
            },
            bullets: state
                .bullets
                .iter()
                .map(|b| BulletView {
                    pos: b.pos,
                    owner: b.owner,
                })
                .collect(),
            orbs: state.orbs.iter().map(|o| o.pos).collect(),
            robots: state
                .robots
                .iter()
                .enumerate()
                .map(|(i, r)| RobotView::capture(i, r, eye))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::sequences::{start_destruction, start_hit_flash};

    #[test]
    fn yaw_faces_the_eye() {
        assert!(robot_yaw_deg(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0)).abs() < 1e-5);
        assert!((robot_yaw_deg(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)) - 90.0).abs() < 1e-4);
        assert!((robot_yaw_deg(Vec3::ZERO, Vec3::new(-10.0, 5.0, 0.0)) + 90.0).abs() < 1e-4);
    }

    #[test]
    fn tint_saturates() {
        assert_eq!(damage_tint(0.0), [1.0, 0.55, 0.0]);

        let [r, g, b] = damage_tint(0.9);
        assert_eq!(r, 1.0);
        assert!((g - 0.37).abs() < 1e-5);
        assert_eq!(b, 0.0);

        assert_eq!(damage_tint(10.0), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn camera_target_is_one_unit_ahead() {
        let state = GameState::new(1);
        let snap = RenderSnapshot::capture(&state);
        assert_eq!(snap.camera.eye, Vec3::new(0.0, 5.0, 45.0));
        assert!((snap.camera.target - Vec3::new(0.0, 5.0, 44.0)).length() < 1e-6);
    }

    #[test]
    fn flash_is_drawn_after_deactivation() {
        let mut state = GameState::new(1);
        state.robots[1] = Robot::spawned_at(Vec3::new(3.0, 6.0, -20.0));
        start_hit_flash(&mut state.robots[1]);
        state.robots[1].active = false;

        let snap = RenderSnapshot::capture(&state);
        let view = &snap.robots[1];
        assert!(!view.draw_body);
        assert!(view.draw_flash);
        assert!(view.visible());
        assert!(!snap.robots[0].visible());
    }

    #[test]
    fn destroyed_robot_stops_spinning() {
        let mut state = GameState::new(1);
        state.robots[0] = Robot::spawned_at(Vec3::new(-3.0, 6.0, -20.0));
        state.robots[1] = Robot::spawned_at(Vec3::new(3.0, 6.0, -20.0));
        start_destruction(&mut state.robots[1]);

        let snap = RenderSnapshot::capture(&state);
        assert!(!snap.robots[0].destroyed);
        assert!(snap.robots[0].spinning);
        assert!(snap.robots[1].destroyed);
        assert!(!snap.robots[1].spinning);
        // Still drawn while the destruction plays out
        assert!(snap.robots[1].draw_body);
    }

    #[test]
    fn snapshot_serializes() {
        let mut state = GameState::new(1);
        state.spawn_orb();
        state.fire_player_bullet();
        let json = serde_json::to_string(&RenderSnapshot::capture(&state)).unwrap();
        assert!(json.contains("\"owner\":\"Player\""));
    }
}
