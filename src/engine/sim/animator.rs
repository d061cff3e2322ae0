// Scripted animator: named states, triggers and root-motion curves

use std::collections::HashMap;
use std::f32::consts::PI;

use glam::Vec3;

/// Root displacement authored into a clip, in clip-local space (+Z forward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMotionCurve {
    /// Forward distance covered over one full playback
    pub forward_distance: f32,
    /// Peak height of the arc, reached halfway through
    pub arc_height: f32,
}

impl RootMotionCurve {
    /// Offset from the clip's start pose at `normalized_time`
    pub fn offset(&self, normalized_time: f32) -> Vec3 {
        let t = normalized_time.clamp(0.0, 1.0);
        Vec3::new(
            0.0,
            self.arc_height * (PI * t).sin(),
            self.forward_distance * t,
        )
    }
}

/// A single animation clip
#[derive(Debug, Clone)]
pub struct AnimationClip {
    /// Name of the animator state playing this clip
    pub name: String,
    /// Duration of one playback in seconds
    pub duration: f32,
    /// Whether the clip loops
    pub looping: bool,
    /// Root motion, for clips that move the actor
    pub root_motion: Option<RootMotionCurve>,
}

impl AnimationClip {
    /// Create a looping clip
    pub fn looping(name: &str, duration: f32) -> Self {
        Self {
            name: name.to_string(),
            duration,
            looping: true,
            root_motion: None,
        }
    }

    /// Create a one-shot clip (plays once, then returns to the default state)
    pub fn one_shot(name: &str, duration: f32) -> Self {
        Self {
            looping: false,
            ..Self::looping(name, duration)
        }
    }

    pub fn with_root_motion(mut self, curve: RootMotionCurve) -> Self {
        self.root_motion = Some(curve);
        self
    }
}

/// A trigger waiting out its transition time
#[derive(Debug, Clone)]
struct PendingTransition {
    target: String,
    remaining: f32,
}

/// State changes reported by [`ScriptedAnimator::update`]
#[derive(Debug, Clone, PartialEq)]
pub enum AnimatorEvent {
    /// A state started playing from the beginning
    Entered(String),
}

/// Drives animator states from triggers, with a fixed transition latency
#[derive(Debug)]
pub struct ScriptedAnimator {
    /// All available clips, by state name
    clips: HashMap<String, AnimationClip>,
    /// Trigger name -> target state
    triggers: HashMap<String, String>,
    /// State returned to when a one-shot clip ends
    default_state: String,
    current_state: String,
    /// Seconds into the current state
    state_time: f32,
    /// Seconds between a trigger firing and its state starting
    transition_latency: f32,
    pending: Option<PendingTransition>,
}

impl ScriptedAnimator {
    /// Animator resting in a looping `default_state` clip
    pub fn new(default_state: AnimationClip, transition_latency: f32) -> Self {
        let default_name = default_state.name.clone();
        let mut clips = HashMap::new();
        clips.insert(default_name.clone(), default_state);
        Self {
            clips,
            triggers: HashMap::new(),
            default_state: default_name.clone(),
            current_state: default_name,
            state_time: 0.0,
            transition_latency,
            pending: None,
        }
    }

    /// Add a clip reachable through `trigger`
    pub fn add_clip(&mut self, trigger: &str, clip: AnimationClip) {
        self.triggers.insert(trigger.to_string(), clip.name.clone());
        self.clips.insert(clip.name.clone(), clip);
    }

    /// Remove a clip; its trigger then does nothing
    pub fn remove_clip(&mut self, name: &str) -> Option<AnimationClip> {
        self.clips.remove(name)
    }

    /// Fire a trigger. Unknown triggers and triggers whose state has no clip
    /// are ignored.
    pub fn set_trigger(&mut self, trigger: &str) {
        match self.triggers.get(trigger) {
            Some(target) if self.clips.contains_key(target) => {
                self.pending = Some(PendingTransition {
                    target: target.clone(),
                    remaining: self.transition_latency,
                });
            }
            _ => log::warn!("Animator trigger '{}' leads nowhere, ignored", trigger),
        }
    }

    /// Update the animator (called every tick)
    pub fn update(&mut self, dt: f32) -> Option<AnimatorEvent> {
        self.state_time += dt;

        if let Some(pending) = self.pending.as_mut() {
            pending.remaining -= dt;
            if pending.remaining <= 0.0 {
                let target = pending.target.clone();
                self.pending = None;
                return Some(self.enter(target));
            }
        }

        let finished = self
            .current_clip()
            .is_some_and(|clip| !clip.looping && self.state_time >= clip.duration);
        if finished {
            let default = self.default_state.clone();
            return Some(self.enter(default));
        }

        None
    }

    fn enter(&mut self, state: String) -> AnimatorEvent {
        log::debug!("Animator {} -> {}", self.current_state, state);
        self.current_state = state.clone();
        self.state_time = 0.0;
        AnimatorEvent::Entered(state)
    }

    /// Get the current state name
    pub fn current_state(&self) -> &str {
        &self.current_state
    }

    /// Get the clip info for the current state
    pub fn current_clip(&self) -> Option<&AnimationClip> {
        self.clips.get(&self.current_state)
    }

    /// Progress through the current state; 1.0 per completed playback
    pub fn normalized_time(&self) -> f32 {
        match self.current_clip() {
            Some(clip) if clip.duration > 0.0 => self.state_time / clip.duration,
            _ => 0.0,
        }
    }

    /// Root offset of the current clip relative to where it started
    pub fn root_offset(&self) -> Vec3 {
        self.current_clip()
            .and_then(|clip| clip.root_motion)
            .map_or(Vec3::ZERO, |curve| curve.offset(self.normalized_time()))
    }
}
