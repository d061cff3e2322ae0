// Capability surface the character core drives the engine through
//
// Everything the locomotion and vault logic needs from the outside world
// (ground queries, probes, animator, audio, transform writes) goes through
// the `Environment` trait. The core never reaches for globals.

use glam::{Quat, Vec3};

use crate::core::math;

/// World placement of the actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose at `position` facing `yaw_degrees` about the up axis
    pub fn from_yaw(position: Vec3, yaw_degrees: f32) -> Self {
        Self::new(position, math::yaw_rotation(yaw_degrees))
    }

    /// Facing angle in degrees, in `[0, 360)`
    pub fn facing_degrees(&self) -> f32 {
        math::yaw_of(self.rotation)
    }

    /// Unit forward vector on the ground plane
    pub fn forward(&self) -> Vec3 {
        math::yaw_forward(self.facing_degrees())
    }
}

/// Result of a forward probe
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeHit {
    /// Tag of the surface that was hit
    pub tag: String,
    /// Distance from the probe origin to the hit
    pub distance: f32,
}

impl ProbeHit {
    pub fn new(tag: &str, distance: f32) -> Self {
        Self {
            tag: tag.to_string(),
            distance,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag == tag
    }
}

/// Animator layer-0 state as reported by the animation driver
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationStateInfo {
    /// Name of the state currently playing
    pub name: String,
    /// Playback progress; 1.0 marks the end of one cycle
    pub normalized_time: f32,
}

impl AnimationStateInfo {
    pub fn new(name: &str, normalized_time: f32) -> Self {
        Self {
            name: name.to_string(),
            normalized_time,
        }
    }

    pub fn is_name(&self, name: &str) -> bool {
        self.name == name
    }
}

/// Animator parameters written once per locomotion tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimatorParams {
    /// Blend-tree speed in `[0, 1]`
    pub speed: f32,
    pub is_jumping: bool,
    pub is_running: bool,
}

/// One tick of locomotion output
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementCommand {
    /// Horizontal displacement for this tick (world units, y is always 0)
    pub horizontal: Vec3,
    /// Vertical displacement for this tick
    pub vertical: f32,
    /// Facing after this tick, degrees in `[0, 360)`
    pub facing_degrees: f32,
    /// Whether sprint was granted this tick
    pub is_running: bool,
    /// Normalized speed for animation blending, in `[0, 1]`
    pub speed: f32,
}

impl MovementCommand {
    /// Total displacement for this tick
    pub fn displacement(&self) -> Vec3 {
        self.horizontal + Vec3::Y * self.vertical
    }
}

/// Engine capabilities consumed by the character core
pub trait Environment {
    /// Whether the actor is standing on walkable ground
    fn is_grounded(&self) -> bool;

    /// Yaw of the camera's forward reference, in degrees
    fn camera_yaw_degrees(&self) -> f32;

    /// Cast a probe from `origin` along `direction` up to `distance`
    fn cast_forward_probe(&self, origin: Vec3, direction: Vec3, distance: f32)
        -> Option<ProbeHit>;

    /// Current actor transform
    fn actor_pose(&self) -> Pose;

    /// Overwrite the actor transform
    fn set_actor_pose(&mut self, pose: Pose);

    /// Enable or disable animation-driven movement
    fn set_root_motion(&mut self, enabled: bool);

    /// Pose the animator's root motion is currently producing
    fn root_motion_pose(&self) -> Pose;

    /// Fire an animator trigger
    fn set_trigger(&mut self, name: &str);

    /// Current animator state and progress
    fn animation_state(&self) -> AnimationStateInfo;

    /// Fire-and-forget sound playback
    fn play_sound(&mut self, clip: &str, volume: f32);

    /// Move the actor by a locomotion command
    fn apply_movement(&mut self, command: &MovementCommand);

    fn set_animator_params(&mut self, params: &AnimatorParams);
}
