//! Timed animation sequences
//!
//! Robot fire cadence, hit flash, the destruction sequence, and the cannon
//! disable/enable cycle. Each is a small state machine owned by the entity it
//! animates and advanced by elapsed host time at the start of every tick, so a
//! sequence started during a tick first moves on the following tick.

use glam::Vec3;
use rand::Rng;

use super::state::{Bullet, BulletOwner, CannonHitbox, GameEvent, GameState, Robot};
use crate::consts::*;

/// Shortest interval a clock will tick at
pub const MIN_STEP_INTERVAL_MS: f32 = 1.0;

/// Fixed-interval clock: reports how many whole intervals have elapsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepClock {
    interval_ms: f32,
    accum_ms: f32,
}

impl StepClock {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            // NaN falls through to the floor as well
            interval_ms: interval_ms.max(MIN_STEP_INTERVAL_MS),
            accum_ms: 0.0,
        }
    }

    /// Add elapsed time, return the number of intervals that completed
    pub fn advance(&mut self, elapsed_ms: f32) -> u32 {
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.accum_ms += elapsed_ms;
        }
        let steps = (self.accum_ms / self.interval_ms).floor();
        self.accum_ms -= steps * self.interval_ms;
        steps as u32
    }

    /// Time accumulated toward the next interval
    pub fn leftover_ms(&self) -> f32 {
        self.accum_ms
    }
}

/// One-shot delay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    pub remaining_ms: f32,
}

impl Countdown {
    pub fn new(delay_ms: f32) -> Self {
        Self {
            remaining_ms: delay_ms,
        }
    }

    /// Returns true once the delay has fully elapsed
    pub fn advance(&mut self, elapsed_ms: f32) -> bool {
        if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            self.remaining_ms -= elapsed_ms;
        }
        self.remaining_ms <= 0.0
    }

    /// Time elapsed past the deadline
    pub fn overshoot_ms(&self) -> f32 {
        (-self.remaining_ms).max(0.0)
    }
}

/// Global repeating robot fire timer, armed at most once
#[derive(Debug, Clone)]
pub struct FireCadence {
    armed: bool,
    clock: StepClock,
}

impl FireCadence {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            armed: false,
            clock: StepClock::new(interval_ms),
        }
    }

    /// Arm the cadence. Returns false if it was already running.
    pub fn arm(&mut self) -> bool {
        if self.armed {
            return false;
        }
        self.armed = true;
        true
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Number of volleys due after `elapsed_ms`
    pub fn advance(&mut self, elapsed_ms: f32) -> u32 {
        if !self.armed {
            return 0;
        }
        self.clock.advance(elapsed_ms)
    }
}

/// Phases of the robot destruction sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeathPhase {
    /// Upper body tips forward toward 45 degrees
    Leaning,
    /// Head drops down and forward off the body
    HeadFalling,
    /// Wreck stays on screen until deactivation
    Lingering(Countdown),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathSequence {
    pub phase: DeathPhase,
    clock: StepClock,
}

impl Default for DeathSequence {
    fn default() -> Self {
        Self {
            phase: DeathPhase::Leaning,
            clock: StepClock::new(SEQUENCE_STEP_MS),
        }
    }
}

/// Cannon disable/enable cycle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CannonSequence {
    /// Ready to fire
    #[default]
    Idle,
    /// Barrel drooping toward the floor angle
    Lowering(StepClock),
    /// Waiting before re-enable
    Paused(Countdown),
    /// Barrel rising back to level
    Raising(StepClock),
}

/// Light the hit flash; a later hit restarts the timer
pub fn start_hit_flash(robot: &mut Robot) {
    robot.hit_flash = true;
    robot.flash_timer = Some(Countdown::new(HIT_FLASH_MS));
}

/// Clear a robot's hit flash. Unknown indices are ignored.
pub fn clear_hit_flash(robots: &mut [Robot], index: usize) {
    if let Some(robot) = robots.get_mut(index) {
        robot.hit_flash = false;
        robot.flash_timer = None;
    }
}

/// Mark a robot destroyed and begin its destruction sequence
pub fn start_destruction(robot: &mut Robot) {
    robot.destroyed = true;
    robot.spinning = false;
    robot.death = Some(DeathSequence::default());
}

/// Disable the cannon if it isn't already. Returns whether the cycle started.
pub fn start_cannon_disable(cannon: &mut CannonHitbox) -> bool {
    if cannon.disabled {
        return false;
    }
    cannon.disabled = true;
    cannon.sequence = CannonSequence::Lowering(StepClock::new(SEQUENCE_STEP_MS));
    true
}

/// Advance every pending sequence by `elapsed_ms`
pub fn advance_sequences(state: &mut GameState, elapsed_ms: f32) {
    let volleys = state.fire_cadence.advance(elapsed_ms);
    for _ in 0..volleys {
        robot_volley(state);
    }

    for index in 0..state.robots.len() {
        let expired = state.robots[index]
            .flash_timer
            .as_mut()
            .is_some_and(|timer| timer.advance(elapsed_ms));
        if expired {
            clear_hit_flash(&mut state.robots, index);
        }

        if advance_death(&mut state.robots[index], elapsed_ms) {
            log::info!("Robot {index} deactivated");
            state.events.push(GameEvent::RobotDeactivated { robot: index });
        }
    }

    if advance_cannon(&mut state.cannon, elapsed_ms) {
        log::info!("Cannon re-enabled");
        state.events.push(GameEvent::CannonRestored);
    }
}

/// Every engaged robot fires one jittered shot at the player's cannon
pub fn robot_volley(state: &mut GameState) {
    let aim = state.camera.pos - Vec3::Y * CANNON_HITBOX_DROP;
    let muzzle_offset = Vec3::from(ROBOT_MUZZLE_OFFSET) * ROBOT_SCALE;

    for (index, robot) in state.robots.iter().enumerate() {
        if !robot.is_engaged() {
            continue;
        }
        let muzzle = robot.pos + muzzle_offset;
        let jitter = Vec3::new(
            state.rng.random_range(-ROBOT_AIM_JITTER..ROBOT_AIM_JITTER) as f32,
            state.rng.random_range(-ROBOT_AIM_JITTER..ROBOT_AIM_JITTER) as f32,
            state.rng.random_range(-ROBOT_AIM_JITTER..ROBOT_AIM_JITTER) as f32,
        );
        let dir = (aim - muzzle + jitter).normalize_or_zero();
        state.bullets.push(Bullet::new(muzzle, dir, BulletOwner::Robot));
        log::debug!("Robot {index} fired");
        state.events.push(GameEvent::RobotFired { robot: index });
    }
}

/// Step a robot's destruction sequence. Returns true when it deactivates.
///
/// Time left over when the head comes to rest counts toward the linger delay.
fn advance_death(robot: &mut Robot, elapsed_ms: f32) -> bool {
    let Some(mut seq) = robot.death.take() else {
        return false;
    };
    // Respawned mid-sequence
    if !robot.destroyed {
        return false;
    }

    let mut budget = elapsed_ms;
    if let DeathPhase::Leaning | DeathPhase::HeadFalling = seq.phase {
        budget = 0.0;
        let steps = seq.clock.advance(elapsed_ms);
        for step in 0..steps {
            match seq.phase {
                DeathPhase::Leaning => {
                    robot.walking = false;
                    robot.upper_body_angle =
                        (robot.upper_body_angle + LEAN_STEP_DEG).min(LEAN_MAX_DEG);
                    if robot.upper_body_angle >= LEAN_MAX_DEG {
                        seq.phase = DeathPhase::HeadFalling;
                    }
                }
                DeathPhase::HeadFalling => {
                    robot.head_offset_y -= HEAD_STEP;
                    robot.head_offset_z += HEAD_STEP;
                    if robot.head_offset_y <= -HEAD_DROP_LIMIT
                        || robot.head_offset_z >= HEAD_DROP_LIMIT
                    {
                        seq.phase = DeathPhase::Lingering(Countdown::new(DEACTIVATE_DELAY_MS));
                        budget = (steps - step - 1) as f32 * SEQUENCE_STEP_MS
                            + seq.clock.leftover_ms();
                        break;
                    }
                }
                DeathPhase::Lingering(_) => break,
            }
        }
    }

    if let DeathPhase::Lingering(ref mut delay) = seq.phase {
        if delay.advance(budget) {
            robot.active = false;
            return true;
        }
    }
    robot.death = Some(seq);
    false
}

/// Step the cannon cycle. Returns true when the cannon is re-enabled.
///
/// Time left over at a phase change carries into the next phase.
fn advance_cannon(cannon: &mut CannonHitbox, elapsed_ms: f32) -> bool {
    let mut budget = elapsed_ms;
    loop {
        match cannon.sequence {
            CannonSequence::Idle => return false,
            CannonSequence::Lowering(mut clock) => {
                let steps = clock.advance(budget);
                cannon.sequence = CannonSequence::Lowering(clock);
                budget = 0.0;
                for step in 0..steps {
                    cannon.tilt_deg =
                        (cannon.tilt_deg - CANNON_LOWER_STEP_DEG).max(CANNON_FLOOR_DEG);
                    if cannon.tilt_deg <= CANNON_FLOOR_DEG {
                        cannon.sequence =
                            CannonSequence::Paused(Countdown::new(CANNON_REENABLE_DELAY_MS));
                        budget =
                            (steps - step - 1) as f32 * SEQUENCE_STEP_MS + clock.leftover_ms();
                        break;
                    }
                }
                if let CannonSequence::Lowering(_) = cannon.sequence {
                    return false;
                }
            }
            CannonSequence::Paused(mut delay) => {
                if !delay.advance(budget) {
                    cannon.sequence = CannonSequence::Paused(delay);
                    return false;
                }
                budget = delay.overshoot_ms();
                cannon.sequence = CannonSequence::Raising(StepClock::new(SEQUENCE_STEP_MS));
            }
            CannonSequence::Raising(mut clock) => {
                for _ in 0..clock.advance(budget) {
                    cannon.tilt_deg = (cannon.tilt_deg + CANNON_RAISE_STEP_DEG).min(0.0);
                    if cannon.tilt_deg >= 0.0 {
                        cannon.sequence = CannonSequence::Idle;
                        cannon.disabled = false;
                        return true;
                    }
                }
                cannon.sequence = CannonSequence::Raising(clock);
                return false;
            }
        }
    }
}
