// Input handling system
//
// Device handling lives outside the core. This module turns abstract
// action presses into the per-tick `LocomotionInput` snapshot.
//
// - `action`: game actions
// - `player`: pressed / just-pressed tracking and conversion to a snapshot

pub mod action;
pub mod player;

use glam::Vec2;

pub use action::Action;
pub use player::PlayerInput;

/// Input for one locomotion tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocomotionInput {
    /// x = strafe (right positive), y = forward (forward positive)
    pub axis: Vec2,
    /// Sprint held
    pub sprint: bool,
    /// Jump pressed this tick
    pub jump: bool,
}

impl LocomotionInput {
    /// Push straight ahead, no sprint
    pub fn forward() -> Self {
        Self {
            axis: Vec2::Y,
            ..Default::default()
        }
    }

    pub fn with_sprint(mut self, sprint: bool) -> Self {
        self.sprint = sprint;
        self
    }

    pub fn with_jump(mut self, jump: bool) -> Self {
        self.jump = jump;
        self
    }

    /// Axes clamped to `[-1, 1]` and the vector limited to unit length
    pub fn clamped(mut self) -> Self {
        self.axis = if self.axis.is_finite() {
            self.axis
                .clamp(Vec2::NEG_ONE, Vec2::ONE)
                .clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };
        self
    }

    pub fn magnitude(&self) -> f32 {
        self.axis.length()
    }

    /// Forward component of the stick
    pub fn forward_amount(&self) -> f32 {
        self.axis.y
    }
}
