// Scripted environment for unit tests

use std::cell::Cell;

use glam::Vec3;

use crate::core::math;
use crate::engine::environment::{
    AnimationStateInfo, AnimatorParams, Environment, MovementCommand, Pose, ProbeHit,
};

use super::stats::VaultStats;

/// Environment whose every answer is a public field
#[derive(Debug)]
pub struct MockEnvironment {
    pub grounded: bool,
    pub camera_yaw: f32,
    pub pose: Pose,

    /// Answer for probes cast below the midpoint of the two probe heights
    pub chest_hit: Option<ProbeHit>,
    /// Answer for probes cast above it
    pub top_hit: Option<ProbeHit>,
    pub probe_casts: Cell<usize>,

    pub root_motion: bool,
    pub root_pose: Pose,
    pub anim_state: AnimationStateInfo,

    pub triggers: Vec<String>,
    pub sounds: Vec<(String, f32)>,
    pub commands: Vec<MovementCommand>,
    pub params: Vec<AnimatorParams>,
    pub pose_writes: usize,
}

impl Default for MockEnvironment {
    fn default() -> Self {
        Self {
            grounded: true,
            camera_yaw: 0.0,
            pose: Pose::IDENTITY,
            chest_hit: None,
            top_hit: None,
            probe_casts: Cell::new(0),
            root_motion: false,
            root_pose: Pose::IDENTITY,
            anim_state: AnimationStateInfo::new("Locomotion", 0.0),
            triggers: Vec::new(),
            sounds: Vec::new(),
            commands: Vec::new(),
            params: Vec::new(),
            pose_writes: 0,
        }
    }
}

impl MockEnvironment {
    /// A fence right ahead with clear air above it
    pub fn facing_fence() -> Self {
        Self {
            chest_hit: Some(ProbeHit::new("Fence", 1.0)),
            ..Self::default()
        }
    }

    pub fn enter_anim_state(&mut self, name: &str, normalized_time: f32) {
        self.anim_state = AnimationStateInfo::new(name, normalized_time);
    }

    /// Sum of every horizontal displacement applied so far
    pub fn total_horizontal(&self) -> Vec3 {
        self.commands.iter().map(|c| c.horizontal).sum()
    }
}

impl Environment for MockEnvironment {
    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn camera_yaw_degrees(&self) -> f32 {
        self.camera_yaw
    }

    fn cast_forward_probe(
        &self,
        origin: Vec3,
        _direction: Vec3,
        _distance: f32,
    ) -> Option<ProbeHit> {
        self.probe_casts.set(self.probe_casts.get() + 1);
        let stats = VaultStats::standard();
        let split = (stats.chest_height + stats.top_check_height) / 2.0;
        if origin.y - self.pose.position.y < split {
            self.chest_hit.clone()
        } else {
            self.top_hit.clone()
        }
    }

    fn actor_pose(&self) -> Pose {
        self.pose
    }

    fn set_actor_pose(&mut self, pose: Pose) {
        self.pose = pose;
        self.pose_writes += 1;
    }

    fn set_root_motion(&mut self, enabled: bool) {
        self.root_motion = enabled;
    }

    fn root_motion_pose(&self) -> Pose {
        self.root_pose
    }

    fn set_trigger(&mut self, name: &str) {
        self.triggers.push(name.to_string());
    }

    fn animation_state(&self) -> AnimationStateInfo {
        self.anim_state.clone()
    }

    fn play_sound(&mut self, clip: &str, volume: f32) {
        self.sounds.push((clip.to_string(), volume));
    }

    fn apply_movement(&mut self, command: &MovementCommand) {
        self.pose.position += command.displacement();
        self.pose.rotation = math::yaw_rotation(command.facing_degrees);
        self.commands.push(*command);
    }

    fn set_animator_params(&mut self, params: &AnimatorParams) {
        self.params.push(*params);
    }
}
