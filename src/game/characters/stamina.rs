// Sprint stamina: drains while sprinting, regenerates after a delay

use super::stats::LocomotionStats;

/// Bounded sprint resource with exhaustion lockout
#[derive(Debug, Clone)]
pub struct Stamina {
    current: f32,
    max: f32,
    drain_rate: f32,
    regen_rate: f32,
    regen_delay: f32,
    recovery_threshold: f32,
    /// Seconds since sprint was last granted
    regen_timer: f32,
    exhausted: bool,
}

impl Stamina {
    /// Full stamina using the rates from `stats`
    pub fn new(stats: &LocomotionStats) -> Self {
        Self {
            current: stats.max_stamina,
            max: stats.max_stamina,
            drain_rate: stats.stamina_drain_rate,
            regen_rate: stats.stamina_regen_rate,
            regen_delay: stats.stamina_regen_delay,
            recovery_threshold: stats.exhaustion_recovery_threshold(),
            regen_timer: 0.0,
            exhausted: false,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Stamina as a fraction of max, for HUD bars
    pub fn fraction(&self) -> f32 {
        self.current / self.max
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Whether a sprint request would be granted right now
    pub fn can_sprint(&self) -> bool {
        self.current > 0.0 && !self.exhausted
    }

    /// Advance one tick. Returns whether sprint is granted this tick.
    ///
    /// Sprinting drains and resets the regen timer. Any other tick counts
    /// toward the regen delay and regenerates once it has passed. Exhaustion
    /// is entered only by draining to zero and left only through regen.
    pub fn update(&mut self, sprint_requested: bool, dt: f32) -> bool {
        if sprint_requested && self.can_sprint() {
            self.current = (self.current - self.drain_rate * dt).max(0.0);
            self.regen_timer = 0.0;
            if self.current == 0.0 {
                self.exhausted = true;
                log::debug!("Stamina exhausted");
            }
            return true;
        }

        if self.current < self.max {
            self.regen_timer += dt;
            if self.regen_timer >= self.regen_delay {
                self.current = (self.current + self.regen_rate * dt).min(self.max);
            }
            if self.exhausted && self.current > self.recovery_threshold {
                self.exhausted = false;
                log::debug!("Stamina recovered to {:.1}", self.current);
            }
        }

        false
    }
}
