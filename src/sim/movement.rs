//! Per-tick movement rules
//!
//! Camera locomotion with clamped bounds and the jump integrator, straight
//! bullet travel, orb homing drift, and the robots' stomp-walk gait.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::state::{Bullet, Camera, GameEvent, GameState, Orb, Robot};
use crate::consts::*;
use crate::{strafe_direction, wrap_degrees};

/// Movement keys held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementIntent {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
}

/// Move the camera for one tick and keep it inside the room
pub fn move_camera(camera: &mut Camera, intent: &MovementIntent) {
    let mut speed = CAMERA_BASE_SPEED;
    if intent.sprint {
        speed *= SPRINT_MULTIPLIER;
    }

    // Forward follows the view but never lifts off the floor
    let (sin_h, cos_h) = camera.angle_h.sin_cos();
    let cos_v = camera.angle_v.cos();
    let forward = Vec3::new(sin_h * cos_v, 0.0, -cos_h * cos_v);
    let strafe = strafe_direction(camera.angle_h);

    if intent.forward {
        camera.pos += forward * speed;
    }
    if intent.back {
        camera.pos -= forward * speed;
    }
    if intent.left {
        camera.pos -= strafe * speed;
    }
    if intent.right {
        camera.pos += strafe * speed;
    }

    let limit = PLANE_SIZE - WALL_MARGIN;
    camera.pos.x = camera.pos.x.clamp(-limit, limit);
    camera.pos.z = camera.pos.z.clamp(-limit, limit);

    integrate_jump(camera);
}

/// Projectile-style vertical motion while airborne
pub fn integrate_jump(camera: &mut Camera) {
    if !camera.airborne {
        return;
    }
    camera.pos.y += camera.vertical_vel;
    camera.vertical_vel += GRAVITY;
    if camera.pos.y <= GROUND_LEVEL {
        camera.pos.y = GROUND_LEVEL;
        camera.airborne = false;
        camera.vertical_vel = 0.0;
    }
}

/// Straight-line bullet travel
pub fn advance_bullets(bullets: &mut [Bullet]) {
    for bullet in bullets {
        bullet.pos += bullet.dir * BULLET_STEP;
        bullet.age_ticks = bullet.age_ticks.saturating_add(1);
    }
}

/// Orbs creep toward the player
pub fn drift_orbs(orbs: &mut [Orb], target: Vec3) {
    for orb in orbs {
        let dir = (target - orb.pos).normalize_or_zero();
        orb.pos += dir * ORB_DRIFT_STEP;
    }
}

/// Stomp-walk one robot toward `target`
///
/// Each robot carries its own gait, so two robots never share step, zigzag,
/// or pause timing.
pub fn stomp_walk(robot: &mut Robot, target: Vec3) {
    if !robot.is_engaged() {
        return;
    }

    let dir = (target - robot.pos).normalize_or_zero();

    // Lateral zigzag perpendicular to the heading
    let gait = &mut robot.gait;
    let sway = ZIGZAG_AMPLITUDE * gait.zigzag_phase.sin();
    let offset_x = -dir.z * sway;
    let offset_z = dir.x * sway;
    gait.zigzag_phase += ZIGZAG_FREQUENCY;

    if gait.stopping {
        gait.stop_timer += STEP_FREQUENCY;
        if gait.stop_timer >= STOP_DURATION {
            gait.stopping = false;
            gait.stop_timer = 0.0;
        }
        return;
    }

    let stride = robot.speed * FORWARD_SCALE;
    robot.pos.x += (dir.x + offset_x) * stride;
    robot.pos.z += (dir.z + offset_z) * stride;

    gait.step_progress += STEP_FREQUENCY;
    if gait.step_progress >= 1.0 {
        gait.step_progress = 0.0;
        gait.leg_forward = !gait.leg_forward;
        gait.stopping = true;
    }

    let lift = (gait.step_progress * PI).sin() * STEP_HEIGHT;
    robot.pos.y = GROUND_LEVEL + lift;

    let pose = &mut robot.pose;
    if gait.leg_forward {
        // Left leg steps, lean onto the right
        pose.leg = lift * LEG_SWING_DEG;
        pose.lower_leg = -pose.leg * LOWER_LEG_FOLLOW + lift * LOWER_LEG_STOMP_DEG;
        pose.body_lean = -BODY_TILT_DEG;
    } else {
        pose.leg = -lift * LEG_SWING_DEG;
        pose.lower_leg = -pose.leg * LOWER_LEG_FOLLOW - lift * LOWER_LEG_STOMP_DEG;
        pose.body_lean = BODY_TILT_DEG;
    }
    if gait.step_progress > 0.8 {
        pose.body_lean *= 0.5;
    }
}

/// Spin a robot's arm cannon
pub fn spin_cannon(robot: &mut Robot) {
    if robot.spinning {
        robot.pose.cannon_spin = wrap_degrees(robot.pose.cannon_spin + CANNON_SPIN_DEG);
    }
}

/// Advance all continuous state by one tick, in a fixed order
pub fn advance(state: &mut GameState, intent: &MovementIntent) {
    move_camera(&mut state.camera, intent);

    let target = state.camera.pos;
    for robot in &mut state.robots {
        stomp_walk(robot, target);
    }
    advance_bullets(&mut state.bullets);
    drift_orbs(&mut state.orbs, target);
    for robot in &mut state.robots {
        spin_cannon(robot);
    }

    state.cannon.follow(&state.camera);
}

/// Drop bullets that are too old or have left the room
pub fn cull_bullets(state: &mut GameState) {
    let max_age = state.config.bullet_max_age_ticks;
    let reach = PLANE_SIZE + BULLET_CULL_MARGIN;
    let before = state.bullets.len();
    state.bullets.retain(|b| {
        b.age_ticks <= max_age
            && b.pos.x.abs() <= reach
            && b.pos.z.abs() <= reach
            && b.pos.y.abs() <= reach
    });
    let culled = before - state.bullets.len();
    if culled > 0 {
        log::debug!("Culled {culled} stray bullets");
        state.events.push(GameEvent::BulletsCulled { count: culled });
    }
}
