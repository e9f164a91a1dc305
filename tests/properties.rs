//! Invariants that hold for any input sequence

use glam::{Vec2, Vec3};
use proptest::prelude::*;
use stompbot::consts::{PLANE_SIZE, ROBOT_COUNT, WALL_MARGIN};
use stompbot::sim::{Bullet, BulletOwner, GameEvent, GameState, MovementIntent, TickInput, tick};

fn movement() -> impl Strategy<Value = MovementIntent> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(forward, back, left, right, sprint)| MovementIntent {
            forward,
            back,
            left,
            right,
            sprint,
        },
    )
}

fn tick_input() -> impl Strategy<Value = TickInput> {
    (movement(), -0.5f32..0.5, -0.5f32..0.5, any::<bool>()).prop_map(
        |(movement, yaw, pitch, fire)| TickInput {
            movement,
            look_delta: Vec2::new(yaw, pitch),
            fire,
            ..Default::default()
        },
    )
}

/// Per tick: optionally drop a player bullet near one robot
fn shot() -> impl Strategy<Value = Option<(usize, f32)>> {
    prop::option::of((0..ROBOT_COUNT, 0.0f32..3.0))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn camera_stays_inside_walls(
        seed in any::<u64>(),
        // Long holds so the camera actually reaches the walls
        inputs in prop::collection::vec((tick_input(), 1usize..200), 1..12),
    ) {
        let limit = PLANE_SIZE - WALL_MARGIN;
        let mut state = GameState::new(seed);
        for (input, hold) in &inputs {
            for _ in 0..*hold {
                tick(&mut state, input, 16.0);
                prop_assert!(state.camera.pos.x.abs() <= limit);
                prop_assert!(state.camera.pos.z.abs() <= limit);
            }
        }
    }

    #[test]
    fn health_only_falls_and_destruction_starts_once(
        seed in any::<u64>(),
        shots in prop::collection::vec(shot(), 1..80),
    ) {
        let mut state = GameState::new(seed);
        let spawn = TickInput { spawn_robots: true, ..Default::default() };
        tick(&mut state, &spawn, 16.0);

        let mut destroyed_events = [0usize; ROBOT_COUNT];
        for shot in &shots {
            let before: Vec<u8> = state.robots.iter().map(|r| r.health).collect();
            if let Some((robot, offset)) = *shot {
                let at = state.robots[robot].pos + Vec3::new(offset, 0.0, 0.0);
                state.bullets.push(Bullet::new(at, Vec3::NEG_Z, BulletOwner::Player));
            }
            tick(&mut state, &TickInput::default(), 16.0);

            for (index, robot) in state.robots.iter().enumerate() {
                prop_assert!(robot.health <= before[index]);
                prop_assert!(robot.health <= 3);
                prop_assert_eq!(robot.destroyed, robot.health == 0);
            }
            for event in &state.events {
                if let GameEvent::RobotDestroyed { robot } = event {
                    destroyed_events[*robot] += 1;
                }
            }
        }

        for (index, robot) in state.robots.iter().enumerate() {
            let expected = usize::from(robot.health == 0);
            prop_assert_eq!(destroyed_events[index], expected);
        }
    }

    #[test]
    fn cannon_disables_once_per_cycle(
        seed in any::<u64>(),
        hits in prop::collection::vec(any::<bool>(), 1..400),
    ) {
        let mut state = GameState::new(seed);
        for hit in hits {
            let was_disabled = state.cannon.disabled;
            if hit {
                let at = state.cannon.center;
                state.bullets.push(Bullet::new(at, Vec3::Z, BulletOwner::Robot));
            }
            tick(&mut state, &TickInput::default(), 10.0);

            let disabled_now = state.count_events(|e| *e == GameEvent::CannonDisabled);
            prop_assert!(disabled_now <= 1);
            let restored = state.count_events(|e| *e == GameEvent::CannonRestored) > 0;
            if was_disabled && !restored {
                prop_assert_eq!(disabled_now, 0);
            }
            prop_assert!(state.cannon.tilt_deg <= 0.0 && state.cannon.tilt_deg >= -10.0);
            prop_assert!(state.bullets.is_empty());
        }
    }
}
