// Fence vault: obstacle detection and the root-motion vault sequence
//
// The sequence spans many ticks. It is stored as an explicit phase plus the
// timers a coroutine would have kept on its stack, and advanced by a single
// `resume` call per tick.

use glam::Vec3;
use log::{debug, info, warn};

use crate::engine::environment::Environment;
use crate::engine::input::LocomotionInput;

use super::stats::VaultStats;

/// Slack for comparing accumulated tick time against fixed delays
const TIME_EPSILON: f32 = 1e-4;

/// Position of the vault sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VaultPhase {
    /// No vault running; locomotion owns movement
    #[default]
    Idle,
    /// Vault just detected, start actions pending
    Triggered,
    /// Waiting for the animator to enter the vault state, then the enter delay
    WaitingForAnimState,
    /// Copying root motion into the actor every tick
    PlayingRootMotion,
    /// Final pose copied, waiting before handing control back
    Settling,
}

/// What a call to [`VaultSequencer::resume`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultStep {
    /// Nothing to vault; locomotion may run this tick
    Idle,
    /// A vault was detected and started this tick
    Started,
    /// A vault is in progress
    Running,
    /// The vault finished this tick; locomotion resumes next tick
    Finished,
    /// The vault was abandoned waiting for its animation
    Aborted,
}

impl VaultStep {
    /// Whether the sequencer wrote (or withheld) movement this tick
    pub fn owns_movement(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// State of one vault, alive from detection until completion
#[derive(Debug, Clone, Copy, PartialEq)]
struct VaultSession {
    phase: VaultPhase,
    start_position: Vec3,
    /// Seconds accumulated toward the current phase's delay
    phase_time: f32,
    /// Seconds spent waiting for the vault state to appear
    waited: f32,
    /// Whether the animator has reported the vault state yet
    state_entered: bool,
}

enum Resumed {
    Suspended,
    Finished,
    Aborted,
}

impl VaultSession {
    fn new() -> Self {
        Self {
            phase: VaultPhase::Triggered,
            start_position: Vec3::ZERO,
            phase_time: 0.0,
            waited: 0.0,
            state_entered: false,
        }
    }

    pub fn phase(&self) -> VaultPhase {
        self.phase
    }

    fn enter(&mut self, phase: VaultPhase) {
        debug!("Vault phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.phase_time = 0.0;
    }

    /// Run until the next suspension point
    fn resume<E: Environment + ?Sized>(
        &mut self,
        stats: &VaultStats,
        dt: f32,
        env: &mut E,
    ) -> Resumed {
        loop {
            match self.phase {
                VaultPhase::Idle => return Resumed::Finished,

                VaultPhase::Triggered => {
                    self.start_position = env.actor_pose().position;
                    env.set_root_motion(true);
                    env.set_trigger(stats.trigger);
                    env.play_sound(stats.sound_clip, stats.sound_volume);
                    info!("Vault started at {}", self.start_position);
                    self.enter(VaultPhase::WaitingForAnimState);
                    return Resumed::Suspended;
                }

                VaultPhase::WaitingForAnimState if !self.state_entered => {
                    if env.animation_state().is_name(stats.state_name) {
                        debug!("Vault state entered after {:.3}s", self.waited);
                        self.state_entered = true;
                        self.phase_time = 0.0;
                        return Resumed::Suspended;
                    }

                    self.waited += dt;
                    if let Some(timeout) = stats.anim_enter_timeout {
                        if self.waited + TIME_EPSILON >= timeout {
                            warn!(
                                "Vault state '{}' not entered within {:.2}s, abandoning vault",
                                stats.state_name, timeout
                            );
                            env.set_root_motion(false);
                            return Resumed::Aborted;
                        }
                    }
                    return Resumed::Suspended;
                }

                VaultPhase::WaitingForAnimState => {
                    self.phase_time += dt;
                    if self.phase_time + TIME_EPSILON < stats.enter_delay {
                        return Resumed::Suspended;
                    }
                    // Progress is checked on the same tick the delay ends
                    self.enter(VaultPhase::PlayingRootMotion);
                }

                VaultPhase::PlayingRootMotion => {
                    copy_root_motion(env);
                    if env.animation_state().normalized_time >= stats.exit_progress {
                        self.enter(VaultPhase::Settling);
                    }
                    return Resumed::Suspended;
                }

                VaultPhase::Settling => {
                    self.phase_time += dt;
                    if self.phase_time + TIME_EPSILON < stats.settle_delay {
                        return Resumed::Suspended;
                    }
                    env.set_root_motion(false);
                    info!(
                        "Vault completed: {} -> {}",
                        self.start_position,
                        env.actor_pose().position
                    );
                    return Resumed::Finished;
                }
            }
        }
    }
}

fn copy_root_motion<E: Environment + ?Sized>(env: &mut E) {
    let pose = env.root_motion_pose();
    env.set_actor_pose(pose);
}

/// Detects vaultable obstacles and drives the vault sequence
#[derive(Debug, Clone)]
pub struct VaultSequencer {
    stats: VaultStats,
    session: Option<VaultSession>,
    completed: u32,
    aborted: u32,
}

impl VaultSequencer {
    pub fn new(stats: VaultStats) -> Self {
        Self {
            stats,
            session: None,
            completed: 0,
            aborted: 0,
        }
    }

    pub fn phase(&self) -> VaultPhase {
        self.session
            .as_ref()
            .map_or(VaultPhase::Idle, VaultSession::phase)
    }

    /// Number of vaults that ran to completion
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Number of vaults abandoned by the enter timeout
    pub fn aborted(&self) -> u32 {
        self.aborted
    }

    /// Check for a vaultable obstacle directly ahead.
    ///
    /// Requires ground contact and forward input. The chest probe must hit a
    /// surface carrying the vaultable tag and the top probe must hit nothing.
    pub fn detect<E: Environment + ?Sized>(&self, input: &LocomotionInput, env: &E) -> bool {
        if !env.is_grounded() || input.forward_amount() <= 0.0 {
            return false;
        }

        let pose = env.actor_pose();
        let forward = pose.forward();
        let chest = pose.position + Vec3::Y * self.stats.chest_height;
        let top = pose.position + Vec3::Y * self.stats.top_check_height;

        let Some(hit) = env.cast_forward_probe(chest, forward, self.stats.detect_distance) else {
            return false;
        };
        if !hit.has_tag(self.stats.vaultable_tag) {
            return false;
        }

        env.cast_forward_probe(top, forward, self.stats.detect_distance)
            .is_none()
    }

    /// Advance the sequencer by one tick.
    ///
    /// While idle this runs detection and may start a vault. While a vault is
    /// running detection is skipped and the sequence moves to its next
    /// suspension point.
    pub fn resume<E: Environment + ?Sized>(
        &mut self,
        input: &LocomotionInput,
        dt: f32,
        env: &mut E,
    ) -> VaultStep {
        let started = match self.session {
            Some(_) => false,
            None => {
                if !self.detect(&input.clamped(), &*env) {
                    return VaultStep::Idle;
                }
                self.session = Some(VaultSession::new());
                true
            }
        };

        let Some(session) = self.session.as_mut() else {
            return VaultStep::Idle;
        };

        match session.resume(&self.stats, dt, env) {
            Resumed::Suspended if started => VaultStep::Started,
            Resumed::Suspended => VaultStep::Running,
            Resumed::Finished => {
                self.session = None;
                self.completed += 1;
                VaultStep::Finished
            }
            Resumed::Aborted => {
                self.session = None;
                self.aborted += 1;
                VaultStep::Aborted
            }
        }
    }
}
