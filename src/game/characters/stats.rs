// Character tuning - movement, stamina and vault parameters
// Defaults match the third-person rig the animations were authored for

/// Stat validation errors
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StatsError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("gravity must point down, got {0}")]
    GravityNotDownward(f32),

    #[error("run speed {run} is slower than walk speed {walk}")]
    RunSlowerThanWalk { walk: f32, run: f32 },

    #[error("{field} must be within (0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("top probe height {top} must be above chest probe height {chest}")]
    ProbeHeightsInverted { chest: f32, top: f32 },

    #[error("exhaustion recovery fraction must be within (0, 1), got {0}")]
    RecoveryUnreachable(f32),
}

fn positive(field: &'static str, value: f32) -> Result<(), StatsError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(StatsError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), StatsError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(StatsError::Negative { field, value })
    }
}

fn unit_range(field: &'static str, value: f32) -> Result<(), StatsError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(StatsError::OutOfUnitRange { field, value })
    }
}

/// Locomotion and stamina parameters
#[derive(Debug, Clone)]
pub struct LocomotionStats {
    // Movement
    /// Speed without sprint (units/second)
    pub walk_speed: f32,
    /// Speed while sprint is granted (units/second)
    pub run_speed: f32,
    /// Approximate time to reach the target facing (seconds)
    pub rotation_smooth_time: f32,
    /// Upper bound on turning rate (degrees/second)
    pub max_turn_speed: f32,
    /// Input magnitude below which the actor neither moves nor turns
    pub input_dead_zone: f32,

    // Jump & gravity
    /// Apex height of a jump (units)
    pub jump_height: f32,
    /// Vertical acceleration (negative is down)
    pub gravity: f32,
    /// Vertical velocity held while grounded to keep contact
    pub ground_stick_velocity: f32,

    // Stamina
    pub max_stamina: f32,
    /// Stamina consumed per second of sprint
    pub stamina_drain_rate: f32,
    /// Stamina restored per second once regen starts
    pub stamina_regen_rate: f32,
    /// Seconds without sprint before regen starts
    pub stamina_regen_delay: f32,
    /// Fraction of max stamina that clears exhaustion
    pub exhaustion_recovery_fraction: f32,
}

/// Default locomotion tuning
pub const BASE_LOCOMOTION: LocomotionStats = LocomotionStats {
    walk_speed: 3.0,
    run_speed: 6.0,
    rotation_smooth_time: 0.1,
    max_turn_speed: 720.0,
    input_dead_zone: 0.1,

    jump_height: 1.5,
    gravity: -9.81,
    ground_stick_velocity: -2.0,

    max_stamina: 100.0,
    stamina_drain_rate: 20.0,
    stamina_regen_rate: 15.0,
    stamina_regen_delay: 1.0,
    exhaustion_recovery_fraction: 0.2,
};

impl Default for LocomotionStats {
    fn default() -> Self {
        BASE_LOCOMOTION
    }
}

impl LocomotionStats {
    pub fn standard() -> Self {
        BASE_LOCOMOTION
    }

    /// Initial upward velocity that reaches `jump_height` under `gravity`
    pub fn jump_velocity(&self) -> f32 {
        (self.jump_height * -2.0 * self.gravity).sqrt()
    }

    /// Stamina level above which exhaustion clears
    pub fn exhaustion_recovery_threshold(&self) -> f32 {
        self.max_stamina * self.exhaustion_recovery_fraction
    }

    pub fn validate(&self) -> Result<(), StatsError> {
        positive("walk_speed", self.walk_speed)?;
        positive("run_speed", self.run_speed)?;
        if self.run_speed < self.walk_speed {
            return Err(StatsError::RunSlowerThanWalk {
                walk: self.walk_speed,
                run: self.run_speed,
            });
        }
        positive("rotation_smooth_time", self.rotation_smooth_time)?;
        positive("max_turn_speed", self.max_turn_speed)?;
        non_negative("input_dead_zone", self.input_dead_zone)?;
        non_negative("jump_height", self.jump_height)?;
        if self.gravity >= 0.0 {
            return Err(StatsError::GravityNotDownward(self.gravity));
        }
        positive("max_stamina", self.max_stamina)?;
        non_negative("stamina_drain_rate", self.stamina_drain_rate)?;
        positive("stamina_regen_rate", self.stamina_regen_rate)?;
        non_negative("stamina_regen_delay", self.stamina_regen_delay)?;
        // Regen stops at max, so exhaustion must clear strictly below it
        let fraction = self.exhaustion_recovery_fraction;
        if fraction > 0.0 && fraction < 1.0 {
            Ok(())
        } else {
            Err(StatsError::RecoveryUnreachable(fraction))
        }
    }
}

/// Fence vault detection and sequencing parameters
#[derive(Debug, Clone)]
pub struct VaultStats {
    // Detection
    /// Length of both forward probes
    pub detect_distance: f32,
    /// Height of the probe that must hit the obstacle
    pub chest_height: f32,
    /// Height of the probe that must find clearance
    pub top_check_height: f32,
    /// Tag an obstacle must carry to be vaulted
    pub vaultable_tag: &'static str,

    // Animation
    /// Animator trigger fired at vault start
    pub trigger: &'static str,
    /// Animator state that plays the vault
    pub state_name: &'static str,
    /// Wait after the vault state is entered before tracking progress
    pub enter_delay: f32,
    /// Normalized progress at which the vault starts settling
    pub exit_progress: f32,
    /// Wait after the final root-motion copy before handing back control
    pub settle_delay: f32,
    /// Give up waiting for the vault state after this many seconds.
    /// `None` waits forever.
    pub anim_enter_timeout: Option<f32>,

    // Audio
    pub sound_clip: &'static str,
    pub sound_volume: f32,
}

/// Default vault tuning
pub const BASE_VAULT: VaultStats = VaultStats {
    detect_distance: 2.0,
    chest_height: 1.2,
    top_check_height: 2.0,
    vaultable_tag: "Fence",

    trigger: "Vault",
    state_name: "Vault",
    enter_delay: 0.1,
    exit_progress: 0.95,
    settle_delay: 0.1,
    anim_enter_timeout: None,

    sound_clip: "vault",
    sound_volume: 1.0,
};

impl Default for VaultStats {
    fn default() -> Self {
        BASE_VAULT
    }
}

impl VaultStats {
    pub fn standard() -> Self {
        BASE_VAULT
    }

    /// Same tuning, but abandon a vault whose animation never starts
    pub fn with_anim_enter_timeout(mut self, seconds: f32) -> Self {
        self.anim_enter_timeout = Some(seconds);
        self
    }

    pub fn validate(&self) -> Result<(), StatsError> {
        positive("detect_distance", self.detect_distance)?;
        non_negative("chest_height", self.chest_height)?;
        if self.top_check_height <= self.chest_height {
            return Err(StatsError::ProbeHeightsInverted {
                chest: self.chest_height,
                top: self.top_check_height,
            });
        }
        non_negative("enter_delay", self.enter_delay)?;
        unit_range("exit_progress", self.exit_progress)?;
        non_negative("settle_delay", self.settle_delay)?;
        if let Some(timeout) = self.anim_enter_timeout {
            positive("anim_enter_timeout", timeout)?;
        }
        non_negative("sound_volume", self.sound_volume)
    }
}
