// Character system
//
// This module contains everything related to the controlled character:
// - Tuning for movement, stamina and vaulting
// - Stamina pool gating the sprint
// - Locomotion controller (steering, sprint, jump, gravity)
// - Vault sequencer (detection and root-motion playback)
// - Movement state machine observed from each tick

pub mod character;
pub mod locomotion;
pub mod stamina;
pub mod state;
pub mod stats;
pub mod vault;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use character::{Character, TickReport};
pub use locomotion::LocomotionController;
pub use stamina::Stamina;
pub use state::{MovementState, MovementStateMachine};
pub use stats::{LocomotionStats, StatsError, VaultStats};
pub use vault::{VaultPhase, VaultSequencer, VaultStep};
