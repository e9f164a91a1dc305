//! Raw keyboard and mouse state to per-tick intents
//!
//! Hosts feed key characters and mouse deltas as they arrive; once per frame
//! `take_tick_input` drains them into a `TickInput`. Held keys persist across
//! frames, one-shot actions and look rotation don't.

use glam::Vec2;
use std::collections::{HashMap, HashSet};

use crate::consts::MOUSE_SENSITIVITY;
use crate::sim::{MovementIntent, TickInput};

/// Something a key or button can do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Sprint,
    Fire,
    Jump,
    SpawnRobots,
    SpawnOrb,
    Quit,
}

impl Action {
    /// Held while the key is down, as opposed to firing once per press
    pub fn is_held(self) -> bool {
        matches!(
            self,
            Action::Forward
                | Action::Back
                | Action::StrafeLeft
                | Action::StrafeRight
                | Action::Sprint
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Character-to-action table
#[derive(Debug, Clone)]
pub struct KeyBindings {
    keys: HashMap<char, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = [
            ('w', Action::Forward),
            ('s', Action::Back),
            ('a', Action::StrafeLeft),
            ('d', Action::StrafeRight),
            ('c', Action::Sprint),
            ('f', Action::Fire),
            (' ', Action::Fire),
            ('j', Action::Jump),
            ('e', Action::SpawnRobots),
            ('g', Action::SpawnOrb),
            ('q', Action::Quit),
            ('Q', Action::Quit),
            ('\u{1b}', Action::Quit),
        ];
        Self {
            keys: keys.into_iter().collect(),
        }
    }
}

impl KeyBindings {
    pub fn action(&self, key: char) -> Option<Action> {
        self.keys.get(&key).copied()
    }

    /// Rebind a key, returning what it did before
    pub fn bind(&mut self, key: char, action: Action) -> Option<Action> {
        self.keys.insert(key, action)
    }
}

/// Accumulates host input between ticks
#[derive(Debug, Clone)]
pub struct InputMapper {
    bindings: KeyBindings,
    sensitivity: f32,
    held: HashSet<Action>,
    look: Vec2,
    fire: bool,
    jump: bool,
    spawn_robots: bool,
    spawn_orb: bool,
    quit: bool,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new(KeyBindings::default(), MOUSE_SENSITIVITY)
    }
}

impl InputMapper {
    pub fn new(bindings: KeyBindings, sensitivity: f32) -> Self {
        Self {
            bindings,
            sensitivity,
            held: HashSet::new(),
            look: Vec2::ZERO,
            fire: false,
            jump: false,
            spawn_robots: false,
            spawn_orb: false,
            quit: false,
        }
    }

    pub fn key_down(&mut self, key: char) {
        let Some(action) = self.bindings.action(key) else {
            log::trace!("Unbound key {key:?}");
            return;
        };
        if action.is_held() {
            self.held.insert(action);
        } else {
            self.trigger(action);
        }
    }

    pub fn key_up(&mut self, key: char) {
        if let Some(action) = self.bindings.action(key) {
            self.held.remove(&action);
        }
    }

    /// Mouse travel in pixels; moving up looks up
    pub fn mouse_delta(&mut self, dx: f32, dy: f32) {
        self.look.x += dx * self.sensitivity;
        self.look.y -= dy * self.sensitivity;
    }

    pub fn mouse_button(&mut self, button: MouseButton) {
        if button == MouseButton::Left {
            self.trigger(Action::Fire);
        }
    }

    fn trigger(&mut self, action: Action) {
        match action {
            Action::Fire => self.fire = true,
            Action::Jump => self.jump = true,
            Action::SpawnRobots => self.spawn_robots = true,
            Action::SpawnOrb => self.spawn_orb = true,
            Action::Quit => {
                log::info!("Quit requested");
                self.quit = true;
            }
            _ => {}
        }
    }

    /// Movement keys currently held
    pub fn movement(&self) -> MovementIntent {
        MovementIntent {
            forward: self.held.contains(&Action::Forward),
            back: self.held.contains(&Action::Back),
            left: self.held.contains(&Action::StrafeLeft),
            right: self.held.contains(&Action::StrafeRight),
            sprint: self.held.contains(&Action::Sprint),
        }
    }

    /// Drain pending one-shots and look rotation into a tick's input
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            movement: self.movement(),
            look_delta: self.look,
            fire: self.fire,
            jump: self.jump,
            spawn_robots: self.spawn_robots,
            spawn_orb: self.spawn_orb,
        };
        self.look = Vec2::ZERO;
        self.fire = false;
        self.jump = false;
        self.spawn_robots = false;
        self.spawn_orb = false;
        input
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_persist_across_ticks() {
        let mut input = InputMapper::default();
        input.key_down('w');
        input.key_down('c');

        let first = input.take_tick_input();
        assert!(first.movement.forward && first.movement.sprint);
        let second = input.take_tick_input();
        assert!(second.movement.forward);

        input.key_up('w');
        assert!(!input.take_tick_input().movement.forward);
    }

    #[test]
    fn one_shots_fire_once() {
        let mut input = InputMapper::default();
        input.key_down(' ');
        input.key_down('e');
        input.key_down('g');

        let first = input.take_tick_input();
        assert!(first.fire && first.spawn_robots && first.spawn_orb);
        let second = input.take_tick_input();
        assert!(!second.fire && !second.spawn_robots && !second.spawn_orb);
    }

    #[test]
    fn left_click_fires() {
        let mut input = InputMapper::default();
        input.mouse_button(MouseButton::Right);
        assert!(!input.take_tick_input().fire);
        input.mouse_button(MouseButton::Left);
        assert!(input.take_tick_input().fire);
    }

    #[test]
    fn mouse_delta_scales_and_inverts_pitch() {
        let mut input = InputMapper::default();
        input.mouse_delta(100.0, 50.0);
        input.mouse_delta(100.0, 0.0);

        let tick = input.take_tick_input();
        assert!((tick.look_delta.x - 0.2).abs() < 1e-6);
        assert!((tick.look_delta.y + 0.05).abs() < 1e-6);
        assert_eq!(input.take_tick_input().look_delta, Vec2::ZERO);
    }

    #[test]
    fn quit_keys() {
        for key in ['q', 'Q', '\u{1b}'] {
            let mut input = InputMapper::default();
            input.key_down(key);
            assert!(input.quit_requested());
        }
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut input = InputMapper::default();
        input.key_down('z');
        assert_eq!(input.take_tick_input(), TickInput::default());
    }

    #[test]
    fn rebinding() {
        let mut bindings = KeyBindings::default();
        assert_eq!(bindings.bind('f', Action::Jump), Some(Action::Fire));
        let mut input = InputMapper::new(bindings, MOUSE_SENSITIVITY);
        input.key_down('f');
        let tick = input.take_tick_input();
        assert!(tick.jump && !tick.fire);
    }
}
