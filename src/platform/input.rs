//! Keyboard tracking
//!
//! Fed with DOM `KeyboardEvent.code` strings. Directions are read from the set
//! of held keys; repair, restart and pause are edges that fire once per key
//! press and ignore auto-repeat.

use std::collections::HashSet;

use crate::sim::TickInput;

/// What a key does in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Repair,
    Restart,
    Pause,
}

impl Action {
    /// Binding for a `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Action::Left),
            "ArrowRight" | "KeyD" => Some(Action::Right),
            "ArrowUp" | "KeyW" => Some(Action::Up),
            "ArrowDown" | "KeyS" => Some(Action::Down),
            "Space" => Some(Action::Repair),
            "KeyR" | "Enter" => Some(Action::Restart),
            "Escape" => Some(Action::Pause),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    /// Codes currently held down
    held: HashSet<String>,
    /// Edges since the last snapshot
    edges: TickInput,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a keydown. Returns true if the key is bound (so the page
    /// shouldn't scroll or otherwise react to it).
    pub fn key_down(&mut self, code: &str, repeat: bool) -> bool {
        let Some(action) = Action::from_code(code) else {
            return false;
        };
        let fresh = self.held.insert(code.to_string());
        if fresh && !repeat {
            match action {
                Action::Repair => self.edges.repair = true,
                Action::Restart => self.edges.restart = true,
                Action::Pause => self.edges.pause = true,
                _ => {}
            }
        }
        true
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Forget held keys, e.g. when the window loses focus and keyups are lost
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Queue a pause edge from outside the keyboard (auto-pause)
    pub fn request_pause(&mut self) {
        self.edges.pause = true;
    }

    fn is_held(&self, action: Action) -> bool {
        self.held
            .iter()
            .any(|code| Action::from_code(code) == Some(action))
    }

    /// Input for the coming frame; edges are consumed
    pub fn snapshot(&mut self) -> TickInput {
        let edges = std::mem::take(&mut self.edges);
        TickInput {
            left: self.is_held(Action::Left),
            right: self.is_held(Action::Right),
            up: self.is_held(Action::Up),
            down: self.is_held(Action::Down),
            ..edges
        }
    }
}
