// Headless simulation environment
//
// A flat ground plane, tagged box obstacles and a scripted animator are
// enough to run the character core without an engine. Used by the demo
// binary and by end-to-end tests.

pub mod animator;

use glam::Vec3;

use crate::core::math;
use crate::engine::environment::{
    AnimationStateInfo, AnimatorParams, Environment, MovementCommand, Pose, ProbeHit,
};
use crate::engine::physics::ProbeWorld;

pub use animator::{AnimationClip, AnimatorEvent, RootMotionCurve, ScriptedAnimator};

/// Height of the ground ray origin above the feet (half the body height)
const BODY_HALF_HEIGHT: f32 = 1.0;

/// Default reach of the ground ray below the feet
const GROUND_CHECK_DISTANCE: f32 = 0.2;

/// Half width of the ground slab added under the spawn point
const GROUND_EXTENT: f32 = 500.0;

/// Tag of the ground slab
const GROUND_TAG: &str = "Ground";

/// Default animator state outside of special moves
pub const LOCOMOTION_STATE: &str = "Locomotion";

/// Simulated world implementing [`Environment`]
#[derive(Debug)]
pub struct SimEnvironment {
    pose: Pose,
    ground_height: f32,
    ground_check_distance: f32,
    camera_yaw: f32,
    world: ProbeWorld,
    animator: ScriptedAnimator,
    root_motion: bool,
    /// Actor pose when the current animator state started
    root_anchor: Pose,
    params: AnimatorParams,
    sounds: Vec<(String, f32)>,
    elapsed: f32,
}

impl SimEnvironment {
    /// World with a ground slab added under `spawn`
    pub fn new(mut world: ProbeWorld, animator: ScriptedAnimator, spawn: Pose) -> Self {
        let ground = spawn.position.y;
        world.add_bounds(
            GROUND_TAG,
            Vec3::new(-GROUND_EXTENT, ground - 1.0, -GROUND_EXTENT),
            Vec3::new(GROUND_EXTENT, ground, GROUND_EXTENT),
        );
        Self {
            pose: spawn,
            ground_height: ground,
            ground_check_distance: GROUND_CHECK_DISTANCE,
            camera_yaw: 0.0,
            world,
            animator,
            root_motion: false,
            root_anchor: spawn,
            params: AnimatorParams::default(),
            sounds: Vec::new(),
            elapsed: 0.0,
        }
    }

    /// Animator with the standard vault clip: one second, 2.5 units forward,
    /// peaking 1.6 units up
    pub fn standard_animator() -> ScriptedAnimator {
        let mut animator =
            ScriptedAnimator::new(AnimationClip::looping(LOCOMOTION_STATE, 1.0), 0.05);
        animator.add_clip(
            "Vault",
            AnimationClip::one_shot("Vault", 1.0).with_root_motion(RootMotionCurve {
                forward_distance: 2.5,
                arc_height: 1.6,
            }),
        );
        animator
    }

    pub fn with_camera_yaw(mut self, yaw_degrees: f32) -> Self {
        self.camera_yaw = yaw_degrees;
        self
    }

    /// How far below the feet the ground ray reaches
    pub fn with_ground_check_distance(mut self, distance: f32) -> Self {
        self.ground_check_distance = distance;
        self
    }

    /// Advance world-side time: animator playback and root-motion anchoring.
    /// Call once per tick after the character has ticked.
    pub fn step(&mut self, dt: f32) {
        self.elapsed += dt;
        if let Some(AnimatorEvent::Entered(state)) = self.animator.update(dt) {
            self.root_anchor = self.pose;
            log::debug!("Animator entered '{}' at t={:.3}", state, self.elapsed);
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn animator(&self) -> &ScriptedAnimator {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut ScriptedAnimator {
        &mut self.animator
    }

    pub fn animator_params(&self) -> AnimatorParams {
        self.params
    }

    pub fn is_root_motion_enabled(&self) -> bool {
        self.root_motion
    }

    /// Every sound played so far, with its volume
    pub fn sounds(&self) -> &[(String, f32)] {
        &self.sounds
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Environment for SimEnvironment {
    /// Downward ray from mid-body, reaching a little below the feet.
    /// Any surface counts, fences included.
    fn is_grounded(&self) -> bool {
        let origin = self.pose.position + Vec3::Y * BODY_HALF_HEIGHT;
        self.world
            .raycast(origin, Vec3::NEG_Y, BODY_HALF_HEIGHT + self.ground_check_distance)
            .is_some()
    }

    fn camera_yaw_degrees(&self) -> f32 {
        self.camera_yaw
    }

    fn cast_forward_probe(
        &self,
        origin: Vec3,
        direction: Vec3,
        distance: f32,
    ) -> Option<ProbeHit> {
        let hit = self.world.raycast(origin, direction, distance)?;
        let obstacle = self.world.get(hit.handle)?;
        Some(ProbeHit::new(&obstacle.tag, hit.distance))
    }

    fn actor_pose(&self) -> Pose {
        self.pose
    }

    fn set_actor_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    fn set_root_motion(&mut self, enabled: bool) {
        self.root_motion = enabled;
    }

    fn root_motion_pose(&self) -> Pose {
        if !self.root_motion {
            return self.pose;
        }
        let anchor = self.root_anchor;
        Pose::new(
            anchor.position + anchor.rotation * self.animator.root_offset(),
            anchor.rotation,
        )
    }

    fn set_trigger(&mut self, name: &str) {
        self.animator.set_trigger(name);
    }

    fn animation_state(&self) -> AnimationStateInfo {
        AnimationStateInfo::new(self.animator.current_state(), self.animator.normalized_time())
    }

    fn play_sound(&mut self, clip: &str, volume: f32) {
        log::debug!("Sound '{}' at volume {:.2}", clip, volume);
        self.sounds.push((clip.to_string(), volume));
    }

    fn apply_movement(&mut self, command: &MovementCommand) {
        // No collision response: the ground plane is the only floor
        let mut position = self.pose.position + command.displacement();
        position.y = position.y.max(self.ground_height);
        self.pose = Pose::new(position, math::yaw_rotation(command.facing_degrees));
    }

    fn set_animator_params(&mut self, params: &AnimatorParams) {
        self.params = *params;
    }
}
