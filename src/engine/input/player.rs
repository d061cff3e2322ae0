// Per-player input state management

use std::collections::HashSet;

use glam::Vec2;

use super::action::Action;
use super::LocomotionInput;

/// Represents the input state for a single player
#[derive(Debug, Default)]
pub struct PlayerInput {
    /// Actions that are currently pressed this frame
    pressed: HashSet<Action>,

    /// Actions that were just pressed this frame (press events)
    just_pressed: HashSet<Action>,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        self.pressed.remove(&action);
    }

    /// Update input state for a new frame
    /// Call this once per tick after the tick has consumed the input
    pub fn update(&mut self) {
        self.just_pressed.clear();
    }

    /// Get directional input as (horizontal, vertical), each in -1.0..=1.0
    pub fn get_direction(&self) -> Vec2 {
        let mut direction = Vec2::ZERO;

        if self.is_pressed(Action::MoveLeft) {
            direction.x -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            direction.x += 1.0;
        }
        if self.is_pressed(Action::MoveBack) {
            direction.y -= 1.0;
        }
        if self.is_pressed(Action::MoveForward) {
            direction.y += 1.0;
        }

        direction
    }

    /// Snapshot for one locomotion tick.
    /// Sprint is level-triggered, jump fires only on the press edge.
    pub fn locomotion_input(&self) -> LocomotionInput {
        LocomotionInput {
            axis: self.get_direction(),
            ..Default::default()
        }
        .with_sprint(self.is_pressed(Action::Sprint))
        .with_jump(self.just_pressed(Action::Jump))
        .clamped()
    }
}
