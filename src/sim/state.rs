//! Game state and core simulation types
//!
//! Everything the frame tick reads or mutates lives here: the player camera,
//! the cannon hitbox, the fixed robot arena, and the bullet/orb collections.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::sequences::{CannonSequence, Countdown, DeathSequence, FireCadence};
use crate::consts::*;
use crate::facing_direction;
use crate::settings::SimConfig;

/// Who fired a bullet. Never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Robot,
}

/// A bullet in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec3,
    /// Unit travel direction
    pub dir: Vec3,
    pub owner: BulletOwner,
    /// Ticks since the bullet was fired
    #[serde(default)]
    pub age_ticks: u32,
}

impl Bullet {
    pub fn new(pos: Vec3, dir: Vec3, owner: BulletOwner) -> Self {
        Self {
            pos,
            dir,
            owner,
            age_ticks: 0,
        }
    }
}

/// A target orb that homes slowly toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orb {
    pub pos: Vec3,
    pub radius: f32,
}

impl Orb {
    pub fn new(pos: Vec3) -> Self {
        Self {
            pos,
            radius: ROBOT_SCALE,
        }
    }
}

/// The player's eye: position, look angles, and jump state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec3,
    /// Horizontal look angle (radians)
    pub angle_h: f32,
    /// Vertical look angle (radians, clamped)
    pub angle_v: f32,
    pub vertical_vel: f32,
    pub airborne: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pos: Vec3::new(0.0, GROUND_LEVEL, CAMERA_START_Z),
            angle_h: 0.0,
            angle_v: 0.0,
            vertical_vel: 0.0,
            airborne: false,
        }
    }
}

impl Camera {
    /// Unit view direction
    pub fn facing(&self) -> Vec3 {
        facing_direction(self.angle_h, self.angle_v)
    }

    /// Apply a look delta (x = yaw, y = pitch, radians)
    pub fn look(&mut self, delta: Vec2) {
        self.angle_h += delta.x;
        self.angle_v = (self.angle_v + delta.y).clamp(-VERTICAL_LOOK_LIMIT, VERTICAL_LOOK_LIMIT);
    }

    /// Start a jump if standing. Returns whether the jump started.
    pub fn try_jump(&mut self) -> bool {
        if self.airborne {
            return false;
        }
        self.airborne = true;
        self.vertical_vel = JUMP_STRENGTH;
        true
    }

    /// Where player shots leave the cannon
    pub fn muzzle(&self) -> Vec3 {
        let dir = self.facing();
        Vec3::new(self.pos.x, self.pos.y - CANNON_DROP, self.pos.z) + dir * CANNON_LENGTH
    }
}

/// Joint angles for procedural robot animation (degrees)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotPose {
    pub leg: f32,
    pub lower_leg: f32,
    pub arm: f32,
    pub lower_arm: f32,
    pub body_lean: f32,
    pub cannon_spin: f32,
}

/// Per-robot stomp-walk state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gait {
    /// Progress through the current step, 0..1
    pub step_progress: f32,
    /// Phase of the lateral zigzag (radians)
    pub zigzag_phase: f32,
    /// Pausing between steps
    pub stopping: bool,
    pub stop_timer: f32,
    /// Which leg leads the current step
    pub leg_forward: bool,
}

impl Default for Gait {
    fn default() -> Self {
        Self {
            step_progress: 0.0,
            zigzag_phase: 0.0,
            stopping: false,
            stop_timer: 0.0,
            leg_forward: true,
        }
    }
}

/// One slot of the fixed robot arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Robot {
    pub pos: Vec3,
    pub active: bool,
    pub destroyed: bool,
    pub health: u8,
    /// Damage tint, grows with each hit (clamped at render time only)
    pub redness: f32,
    pub hit_flash: bool,
    pub pose: RobotPose,
    pub walking: bool,
    pub spinning: bool,
    pub speed: f32,
    /// Collision sphere radius; the sphere is centred on `pos`
    pub collision_radius: f32,
    pub gait: Gait,
    // Destruction animation progress
    pub upper_body_angle: f32,
    pub head_offset_y: f32,
    pub head_offset_z: f32,
    #[serde(skip)]
    pub flash_timer: Option<Countdown>,
    #[serde(skip)]
    pub death: Option<DeathSequence>,
}

impl Default for Robot {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            active: false,
            destroyed: false,
            health: ROBOT_HEALTH,
            redness: 0.0,
            hit_flash: false,
            pose: RobotPose::default(),
            walking: true,
            spinning: false,
            speed: ROBOT_SPEED,
            collision_radius: ROBOT_SCALE,
            gait: Gait::default(),
            upper_body_angle: 0.0,
            head_offset_y: 0.0,
            head_offset_z: 0.0,
            flash_timer: None,
            death: None,
        }
    }
}

impl Robot {
    /// A freshly spawned robot at `pos`
    pub fn spawned_at(pos: Vec3) -> Self {
        Self {
            pos,
            active: true,
            spinning: true,
            ..Self::default()
        }
    }

    /// Active and not yet destroyed: walks, fires, and takes damage
    #[inline]
    pub fn is_engaged(&self) -> bool {
        self.active && !self.destroyed
    }
}

/// The player cannon's hitbox and disable state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannonHitbox {
    pub center: Vec3,
    pub radius: f32,
    pub disabled: bool,
    /// Barrel tilt (degrees, 0 = ready, negative = drooping)
    pub tilt_deg: f32,
    #[serde(skip)]
    pub sequence: CannonSequence,
}

impl CannonHitbox {
    pub fn tracking(camera: &Camera) -> Self {
        let mut cannon = Self {
            center: Vec3::ZERO,
            radius: CANNON_HITBOX_RADIUS,
            disabled: false,
            tilt_deg: 0.0,
            sequence: CannonSequence::Idle,
        };
        cannon.follow(camera);
        cannon
    }

    /// Keep the hitbox under the camera
    pub fn follow(&mut self, camera: &Camera) {
        self.center = camera.pos - Vec3::Y * CANNON_HITBOX_DROP;
    }
}

/// Something that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RobotsSpawned,
    OrbSpawned,
    PlayerFired,
    /// Fire refused because the cannon is disabled
    PlayerFireBlocked,
    RobotFired { robot: usize },
    OrbDestroyed,
    RobotHit { robot: usize, health: u8 },
    RobotDestroyed { robot: usize },
    RobotDeactivated { robot: usize },
    CannonDisabled,
    CannonRestored,
    BulletsCulled { count: usize },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub config: SimConfig,
    /// Simulation tick counter
    pub ticks: u64,
    /// Accumulated host time
    pub time_ms: f64,
    pub camera: Camera,
    pub cannon: CannonHitbox,
    /// Fixed arena; the index is the robot's identity
    pub robots: [Robot; ROBOT_COUNT],
    /// Bullets in flight, insertion ordered
    pub bullets: Vec<Bullet>,
    /// Target orbs, insertion ordered
    pub orbs: Vec<Orb>,
    pub fire_cadence: FireCadence,
    /// Events recorded during the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, SimConfig::default())
    }

    pub fn with_config(seed: u64, config: SimConfig) -> Self {
        let camera = Camera::default();
        let cannon = CannonHitbox::tracking(&camera);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fire_cadence: FireCadence::new(config.robot_fire_interval_ms),
            config,
            ticks: 0,
            time_ms: 0.0,
            camera,
            cannon,
            robots: Default::default(),
            bullets: Vec::new(),
            orbs: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Look up a robot slot; out-of-range indices yield `None`
    pub fn robot(&self, index: usize) -> Option<&Robot> {
        self.robots.get(index)
    }

    /// Respawn every robot slot at the far wall and arm the fire cadence once
    pub fn spawn_robots(&mut self) {
        for robot in &mut self.robots {
            let x = self.rng.random_range(-(PLANE_SIZE as i32)..PLANE_SIZE as i32) as f32;
            let z = (-PLANE_SIZE + 4.0) - self.rng.random_range(0..3i32) as f32;
            *robot = Robot::spawned_at(Vec3::new(x, ROBOT_SPAWN_Y, z));
        }
        if self.fire_cadence.arm() {
            log::info!(
                "Robot fire cadence armed ({} ms)",
                self.config.robot_fire_interval_ms
            );
        }
        log::info!("Spawned {} robots", self.robots.len());
        self.events.push(GameEvent::RobotsSpawned);
    }

    /// Drop a new orb near the far wall
    pub fn spawn_orb(&mut self) {
        let x = self.rng.random_range(-(PLANE_SIZE as i32)..PLANE_SIZE as i32) as f32;
        let z = (-PLANE_SIZE + 1.0) - self.rng.random_range(0..3i32) as f32;
        self.orbs.push(Orb::new(Vec3::new(x, ORB_SPAWN_Y, z)));
        log::debug!("Orb spawned at x={x}, z={z}");
        self.events.push(GameEvent::OrbSpawned);
    }

    /// Fire from the player's cannon tip along the view direction
    ///
    /// Returns false when the cannon is disabled.
    pub fn fire_player_bullet(&mut self) -> bool {
        if self.cannon.disabled {
            self.events.push(GameEvent::PlayerFireBlocked);
            return false;
        }
        let bullet = Bullet::new(self.camera.muzzle(), self.camera.facing(), BulletOwner::Player);
        self.bullets.push(bullet);
        self.events.push(GameEvent::PlayerFired);
        true
    }

    /// Count events of a kind recorded this tick
    pub fn count_events(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|&e| pred(e)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_at_back_of_room() {
        let state = GameState::new(1);
        assert_eq!(state.camera.pos, Vec3::new(0.0, 5.0, 45.0));
        assert_eq!(state.cannon.center, Vec3::new(0.0, 3.5, 45.0));
        assert!(state.robots.iter().all(|r| !r.active));
        assert!(state.bullets.is_empty());
        assert!(!state.fire_cadence.is_armed());
    }

    #[test]
    fn spawn_robots_resets_every_slot() {
        let mut state = GameState::new(7);
        state.robots[0].health = 1;
        state.robots[0].redness = 0.6;
        state.robots[0].destroyed = true;
        state.robots[0].upper_body_angle = 30.0;

        state.spawn_robots();

        for robot in &state.robots {
            assert!(robot.active);
            assert!(!robot.destroyed);
            assert_eq!(robot.health, 3);
            assert_eq!(robot.redness, 0.0);
            assert_eq!(robot.upper_body_angle, 0.0);
            assert!(robot.death.is_none());
            assert!(robot.pos.x >= -50.0 && robot.pos.x < 50.0);
            assert!(robot.pos.z <= -46.0 && robot.pos.z >= -48.0);
            assert_eq!(robot.pos.y, ROBOT_SPAWN_Y);
        }
        assert!(state.fire_cadence.is_armed());
    }

    #[test]
    fn spawn_orb_lands_near_far_wall() {
        let mut state = GameState::new(3);
        state.spawn_orb();
        let orb = &state.orbs[0];
        assert_eq!(orb.pos.y, 5.0);
        assert!(orb.pos.z <= -49.0 && orb.pos.z >= -51.0);
        assert_eq!(orb.radius, 2.0);
    }

    #[test]
    fn player_bullet_leaves_cannon_tip() {
        let mut state = GameState::new(1);
        assert!(state.fire_player_bullet());
        let bullet = &state.bullets[0];
        assert_eq!(bullet.owner, BulletOwner::Player);
        assert!((bullet.pos - Vec3::new(0.0, 4.0, 40.0)).length() < 1e-5);
        assert!((bullet.dir - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn disabled_cannon_refuses_to_fire() {
        let mut state = GameState::new(1);
        state.cannon.disabled = true;
        assert!(!state.fire_player_bullet());
        assert!(state.bullets.is_empty());
        assert_eq!(state.events, vec![GameEvent::PlayerFireBlocked]);
    }

    #[test]
    fn look_clamps_vertical_angle() {
        let mut camera = Camera::default();
        camera.look(Vec2::new(0.2, 5.0));
        assert_eq!(camera.angle_v, VERTICAL_LOOK_LIMIT);
        assert_eq!(camera.angle_h, 0.2);
        camera.look(Vec2::new(0.0, -10.0));
        assert_eq!(camera.angle_v, -VERTICAL_LOOK_LIMIT);
    }

    #[test]
    fn out_of_range_robot_lookup_is_none() {
        let state = GameState::new(1);
        assert!(state.robot(ROBOT_COUNT).is_none());
    }
}
