//! Keyboard state and per-tick input commands
//!
//! The host forwards `keydown`/`keyup` codes (`KeyboardEvent.code`). Held keys
//! drive movement; fresh presses become one-shot commands that live until the
//! next tick consumes them.

use std::collections::HashMap;

use crate::sim::TickInput;

/// Key bindings by `KeyboardEvent.code`
pub mod bindings {
    pub const LEFT: &[&str] = &["ArrowLeft", "KeyA"];
    pub const RIGHT: &[&str] = &["ArrowRight", "KeyD"];
    pub const JUMP: &[&str] = &["ArrowUp", "KeyW", "Space"];
    pub const START: &[&str] = &["Enter", "Space"];
    pub const PAUSE: &[&str] = &["KeyP", "Escape"];
    pub const RESTART: &[&str] = &["Enter", "Space", "KeyR"];
    pub const MENU: &[&str] = &["KeyM"];
    /// Host-level: cycle the quality preset
    pub const QUALITY: &[&str] = &["KeyQ"];
}

#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    held: HashMap<String, bool>,
    /// Codes pressed since the last tick (auto-repeat excluded)
    pressed: Vec<String>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, code: &str) {
        if !self.is_held(code) {
            self.pressed.push(code.to_string());
        }
        self.held.insert(code.to_string(), true);
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.insert(code.to_string(), false);
    }

    /// Forget every held key (window lost focus)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, code: &str) -> bool {
        self.held.get(code).copied().unwrap_or(false)
    }

    fn any_held(&self, codes: &[&str]) -> bool {
        codes.iter().any(|code| self.is_held(code))
    }

    fn any_pressed(&self, codes: &[&str]) -> bool {
        self.pressed.iter().any(|p| codes.contains(&p.as_str()))
    }

    /// Snapshot for the next tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.any_held(bindings::LEFT),
            right: self.any_held(bindings::RIGHT),
            jump: self.any_held(bindings::JUMP),
            start: self.any_pressed(bindings::START),
            pause: self.any_pressed(bindings::PAUSE),
            restart: self.any_pressed(bindings::RESTART),
            menu: self.any_pressed(bindings::MENU),
        }
    }

    /// Drop one-shot presses once a tick has seen them
    pub fn clear_one_shots(&mut self) {
        self.pressed.clear();
    }

    /// `tick_input` followed by `clear_one_shots`
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = self.tick_input();
        self.clear_one_shots();
        input
    }
}

/// Keys whose browser default (scrolling) should be suppressed
pub fn is_game_key(code: &str) -> bool {
    [
        bindings::LEFT,
        bindings::RIGHT,
        bindings::JUMP,
        bindings::PAUSE,
    ]
    .iter()
    .any(|codes| codes.contains(&code))
        || code == "ArrowDown"
}
