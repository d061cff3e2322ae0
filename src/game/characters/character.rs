// Character entity: locomotion and vaulting sharing one transform

use glam::Vec3;

use crate::engine::environment::{Environment, MovementCommand};
use crate::engine::input::LocomotionInput;

use super::locomotion::LocomotionController;
use super::state::{MovementState, MovementStateMachine};
use super::stats::{LocomotionStats, StatsError, VaultStats};
use super::vault::{VaultSequencer, VaultStep};

/// What happened during one [`Character::tick`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Vault sequencer outcome for this tick
    pub vault: VaultStep,
    /// Locomotion output, present only when locomotion owned the tick
    pub command: Option<MovementCommand>,
    /// Movement state after the tick
    pub state: MovementState,
}

/// A third-person character driven through an [`Environment`]
#[derive(Debug)]
pub struct Character {
    /// Character name (for logs)
    pub name: String,
    locomotion: LocomotionController,
    vault: VaultSequencer,
    state_machine: MovementStateMachine,
}

impl Character {
    /// Create a character after validating its tuning
    pub fn new(
        name: &str,
        locomotion: LocomotionStats,
        vault: VaultStats,
    ) -> Result<Self, StatsError> {
        locomotion.validate()?;
        vault.validate()?;
        Ok(Self {
            name: name.to_string(),
            locomotion: LocomotionController::new(locomotion),
            vault: VaultSequencer::new(vault),
            state_machine: MovementStateMachine::new(),
        })
    }

    /// Character with the default tuning
    pub fn standard(name: &str) -> Self {
        Self {
            name: name.to_string(),
            locomotion: LocomotionController::new(LocomotionStats::standard()),
            vault: VaultSequencer::new(VaultStats::standard()),
            state_machine: MovementStateMachine::new(),
        }
    }

    /// Advance one simulation tick.
    ///
    /// The vault sequencer is polled first. If it is idle and finds nothing
    /// to vault, locomotion runs and its command is applied. Otherwise the
    /// vault owns the transform and locomotion is skipped for the tick. Ticks
    /// the vault owns, including the one it finishes or gives up on, report
    /// [`MovementState::Vaulting`].
    ///
    /// # Panics
    /// Panics if `dt` is not a positive finite number.
    pub fn tick<E: Environment + ?Sized>(
        &mut self,
        input: &LocomotionInput,
        dt: f32,
        env: &mut E,
    ) -> TickReport {
        assert!(
            dt > 0.0 && dt.is_finite(),
            "character tick requires a positive delta time, got {dt}"
        );

        let vault = self.vault.resume(input, dt, env);
        let vaulting = vault.owns_movement();
        let command = if vaulting {
            if vault == VaultStep::Started {
                // Gravity must not fight root motion
                self.locomotion.halt();
            }
            None
        } else {
            let command = self.locomotion.advance(input, dt, &*env);
            env.apply_movement(&command);
            env.set_animator_params(&self.locomotion.animator_params(&command));
            Some(command)
        };

        let (moving, running) = command.map_or((false, false), |command| {
            (command.horizontal != Vec3::ZERO, command.is_running)
        });
        let observed = MovementState::classify(
            vaulting,
            env.is_grounded(),
            self.locomotion.vertical_velocity(),
            moving,
            running,
        );
        self.state_machine.update(dt, observed);

        TickReport {
            vault,
            command,
            state: self.state_machine.state(),
        }
    }

    pub fn locomotion(&self) -> &LocomotionController {
        &self.locomotion
    }

    pub fn vault(&self) -> &VaultSequencer {
        &self.vault
    }

    pub fn state(&self) -> MovementState {
        self.state_machine.state()
    }

    pub fn state_machine(&self) -> &MovementStateMachine {
        &self.state_machine
    }

    /// Stamina in `[0, 1]`
    pub fn stamina_fraction(&self) -> f32 {
        self.locomotion.stamina().fraction()
    }
}
