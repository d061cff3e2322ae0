// Character movement state machine

/// Represents the current movement state of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementState {
    /// Standing still on ground
    #[default]
    Idle,
    /// Moving on ground at walk speed
    Walking,
    /// Moving on ground with sprint granted
    Running,
    /// In the air, moving upward
    Jumping,
    /// In the air, moving downward
    Falling,
    /// Root motion owns the transform
    Vaulting,
}

impl MovementState {
    /// Pick the state that matches one tick's outcome
    pub fn classify(
        vaulting: bool,
        grounded: bool,
        vertical_velocity: f32,
        moving: bool,
        running: bool,
    ) -> Self {
        if vaulting {
            Self::Vaulting
        } else if vertical_velocity > 0.0 {
            Self::Jumping
        } else if !grounded {
            Self::Falling
        } else if moving && running {
            Self::Running
        } else if moving {
            Self::Walking
        } else {
            Self::Idle
        }
    }

    /// Get the animation name for this state
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walking => "walk",
            Self::Running => "run",
            Self::Jumping => "jump",
            Self::Falling => "fall",
            Self::Vaulting => "vault",
        }
    }
}

/// Tracks the movement state and how long it has been held
#[derive(Debug)]
pub struct MovementStateMachine {
    current_state: MovementState,
    previous_state: MovementState,
    state_time: f32,
}

impl Default for MovementStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementStateMachine {
    pub fn new() -> Self {
        Self {
            current_state: MovementState::Idle,
            previous_state: MovementState::Idle,
            state_time: 0.0,
        }
    }

    /// Get the current state
    pub fn state(&self) -> MovementState {
        self.current_state
    }

    /// Get the previous state
    pub fn previous_state(&self) -> MovementState {
        self.previous_state
    }

    /// Get time spent in current state
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    /// Check if state just changed this tick
    pub fn state_just_changed(&self) -> bool {
        self.state_time == 0.0
    }

    /// Transition to a new state
    pub fn transition(&mut self, new_state: MovementState) {
        if self.current_state != new_state {
            log::debug!("Movement {:?} -> {:?}", self.current_state, new_state);
            self.previous_state = self.current_state;
            self.current_state = new_state;
            self.state_time = 0.0;
        }
    }

    /// Advance time, then move to `observed` if it differs
    pub fn update(&mut self, dt: f32, observed: MovementState) {
        self.state_time += dt;
        self.transition(observed);
    }
}
