//! Bullet hit resolution
//!
//! Three passes run in a fixed order every tick: orbs, then robots, then the
//! player's cannon. Each pass filters the bullet list left by the previous
//! one, so a bullet consumed early is never seen by a later pass.

use glam::Vec3;

use super::sequences::{start_cannon_disable, start_destruction, start_hit_flash};
use super::state::{BulletOwner, GameEvent, GameState, Robot};
use crate::consts::*;

/// Squared-distance sphere test
#[inline]
pub fn within_radius(point: Vec3, center: Vec3, radius: f32) -> bool {
    point.distance_squared(center) < radius * radius
}

/// Run all hit passes in order
pub fn resolve_collisions(state: &mut GameState) {
    resolve_orb_hits(state);
    resolve_robot_hits(state);
    resolve_cannon_hits(state);
}

/// Any bullet destroys at most one orb and is consumed doing so
pub fn resolve_orb_hits(state: &mut GameState) {
    let GameState {
        bullets,
        orbs,
        events,
        ..
    } = state;
    if orbs.is_empty() {
        return;
    }

    bullets.retain(|bullet| {
        let Some(hit) = orbs
            .iter()
            .position(|orb| within_radius(bullet.pos, orb.pos, ORB_HIT_RADIUS))
        else {
            return true;
        };
        orbs.remove(hit);
        log::debug!("Orb destroyed, {} left", orbs.len());
        events.push(GameEvent::OrbDestroyed);
        false
    });
}

/// Player bullets damage the first engaged robot they overlap
pub fn resolve_robot_hits(state: &mut GameState) {
    let GameState {
        bullets,
        robots,
        events,
        ..
    } = state;

    bullets.retain(|bullet| {
        if bullet.owner != BulletOwner::Player {
            return true;
        }
        let Some(index) = robots.iter().position(|robot| {
            robot.is_engaged() && within_radius(bullet.pos, robot.pos, robot.collision_radius)
        }) else {
            return true;
        };
        damage_robot(&mut robots[index], index, events);
        false
    });
}

fn damage_robot(robot: &mut Robot, index: usize, events: &mut Vec<GameEvent>) {
    robot.health = robot.health.saturating_sub(1);
    robot.redness += REDNESS_PER_HIT;
    start_hit_flash(robot);
    log::debug!("Robot {index} hit, health {}", robot.health);
    events.push(GameEvent::RobotHit {
        robot: index,
        health: robot.health,
    });

    if robot.health == 0 {
        start_destruction(robot);
        log::info!("Robot {index} destroyed");
        events.push(GameEvent::RobotDestroyed { robot: index });
    }
}

/// Robot bullets that reach the cannon are always consumed; the first one
/// starts the disable cycle
pub fn resolve_cannon_hits(state: &mut GameState) {
    let GameState {
        bullets,
        cannon,
        events,
        ..
    } = state;

    bullets.retain(|bullet| {
        if bullet.owner != BulletOwner::Robot
            || !within_radius(bullet.pos, cannon.center, cannon.radius)
        {
            return true;
        }
        if start_cannon_disable(cannon) {
            log::info!("Cannon has been hit!");
            events.push(GameEvent::CannonDisabled);
        }
        false
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bullet, Orb};

    fn bullet(pos: Vec3, owner: BulletOwner) -> Bullet {
        Bullet::new(pos, Vec3::NEG_Z, owner)
    }

    #[test]
    fn within_radius_is_strict() {
        assert!(within_radius(Vec3::ZERO, Vec3::new(0.39, 0.0, 0.0), 0.4));
        assert!(!within_radius(Vec3::ZERO, Vec3::new(0.4, 0.0, 0.0), 0.4));
    }

    #[test]
    fn bullet_destroys_one_of_two_overlapping_orbs() {
        let mut state = GameState::new(1);
        state.orbs.push(Orb::new(Vec3::new(0.1, 5.0, 0.0)));
        state.orbs.push(Orb::new(Vec3::new(-0.1, 5.0, 0.0)));
        state.bullets.push(bullet(Vec3::new(0.0, 5.0, 0.0), BulletOwner::Player));

        resolve_orb_hits(&mut state);

        assert_eq!(state.orbs.len(), 1);
        assert!(state.bullets.is_empty());
        assert_eq!(state.count_events(|e| *e == GameEvent::OrbDestroyed), 1);
    }

    #[test]
    fn robot_bullets_also_destroy_orbs() {
        let mut state = GameState::new(1);
        state.orbs.push(Orb::new(Vec3::ZERO));
        state.bullets.push(bullet(Vec3::new(0.2, 0.0, 0.0), BulletOwner::Robot));
        state.bullets.push(bullet(Vec3::new(5.0, 0.0, 0.0), BulletOwner::Robot));

        resolve_orb_hits(&mut state);

        assert!(state.orbs.is_empty());
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn player_bullet_damages_robot() {
        let mut state = GameState::new(1);
        state.robots[0] = Robot::spawned_at(Vec3::new(0.0, 5.0, -10.0));
        state.bullets.push(bullet(Vec3::new(0.0, 5.0, -9.0), BulletOwner::Player));

        resolve_robot_hits(&mut state);

        let robot = &state.robots[0];
        assert_eq!(robot.health, 2);
        assert!((robot.redness - 0.3).abs() < 1e-6);
        assert!(robot.hit_flash);
        assert!(!robot.destroyed);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn robot_bullets_pass_through_robots() {
        let mut state = GameState::new(1);
        state.robots[0] = Robot::spawned_at(Vec3::ZERO);
        state.bullets.push(bullet(Vec3::ZERO, BulletOwner::Robot));

        resolve_robot_hits(&mut state);

        assert_eq!(state.robots[0].health, 3);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn first_robot_in_array_order_takes_the_hit() {
        let mut state = GameState::new(1);
        state.robots[0] = Robot::spawned_at(Vec3::new(1.5, 0.0, 0.0));
        state.robots[1] = Robot::spawned_at(Vec3::new(0.1, 0.0, 0.0));
        state.bullets.push(bullet(Vec3::ZERO, BulletOwner::Player));

        resolve_robot_hits(&mut state);

        assert_eq!(state.robots[0].health, 2);
        assert_eq!(state.robots[1].health, 3);
    }

    #[test]
    fn third_hit_destroys_and_later_hits_are_ignored() {
        let mut state = GameState::new(1);
        state.robots[0] = Robot::spawned_at(Vec3::ZERO);

        for _ in 0..3 {
            state.bullets.push(bullet(Vec3::ZERO, BulletOwner::Player));
            resolve_robot_hits(&mut state);
        }
        assert!(state.robots[0].destroyed);
        assert_eq!(state.robots[0].health, 0);
        assert!(state.robots[0].death.is_some());
        assert_eq!(
            state.count_events(|e| matches!(e, GameEvent::RobotDestroyed { robot: 0 })),
            1
        );

        state.bullets.push(bullet(Vec3::ZERO, BulletOwner::Player));
        resolve_robot_hits(&mut state);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.robots[0].health, 0);
    }

    #[test]
    fn cannon_hit_disables_once_and_always_consumes() {
        let mut state = GameState::new(1);
        let at_cannon = state.cannon.center;
        state.bullets.push(bullet(at_cannon, BulletOwner::Robot));
        state.bullets.push(bullet(at_cannon, BulletOwner::Robot));
        state.bullets.push(bullet(at_cannon, BulletOwner::Player));

        resolve_cannon_hits(&mut state);

        assert!(state.cannon.disabled);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].owner, BulletOwner::Player);
        assert_eq!(state.count_events(|e| *e == GameEvent::CannonDisabled), 1);
    }

    #[test]
    fn orb_pass_consumes_bullet_before_robot_pass() {
        let mut state = GameState::new(1);
        state.robots[0] = Robot::spawned_at(Vec3::ZERO);
        state.orbs.push(Orb::new(Vec3::new(0.1, 0.0, 0.0)));
        state.bullets.push(bullet(Vec3::ZERO, BulletOwner::Player));

        resolve_collisions(&mut state);

        assert!(state.orbs.is_empty());
        assert_eq!(state.robots[0].health, 3);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn orb_pass_consumes_bullet_before_cannon_pass() {
        let mut state = GameState::new(1);
        let at_cannon = state.cannon.center;
        state.orbs.push(Orb::new(at_cannon));
        state.bullets.push(bullet(at_cannon, BulletOwner::Robot));

        resolve_collisions(&mut state);

        assert!(state.orbs.is_empty());
        assert!(!state.cannon.disabled);
    }
}
