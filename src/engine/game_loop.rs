/// Fixed timestep driver
///
/// Frame times are fed in by the caller, so the same frame sequence always
/// produces the same number of simulation ticks. Game logic advances in
/// fixed steps while the caller renders (or logs) at whatever rate frames
/// arrive.
use std::time::Duration;

/// Target simulation rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of simulation steps per frame to prevent spiral of death
const MAX_STEPS_PER_FRAME: u32 = 5;

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// Game loop timing state
#[derive(Debug)]
pub struct GameLoop {
    /// Accumulated time for fixed timestep updates
    accumulator: Duration,

    /// Total time fed into the loop
    elapsed: Duration,

    /// Whether the game is paused
    paused: bool,

    /// Frame timing history for FPS calculation
    frame_times: Vec<Duration>,

    /// Current frame number
    frame_count: u64,

    /// Total updates executed
    update_count: u64,

    /// Frames that hit the step cap and dropped time
    dropped_frames: u64,

    /// Current FPS (updated periodically)
    current_fps: f32,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            elapsed: Duration::ZERO,
            paused: false,
            frame_times: Vec::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            update_count: 0,
            dropped_frames: 0,
            current_fps: 0.0,
        }
    }

    /// Begin a new frame that took `frame_time`, returns the number of fixed
    /// updates to run
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;
        self.elapsed += frame_time;

        self.frame_times.push(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.remove(0);
        }

        // Update FPS counter every 10 frames
        if self.frame_count % 10 == 0 {
            self.update_fps();
        }

        // If paused, don't accumulate time for updates
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut updates = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && updates < MAX_STEPS_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            updates += 1;
        }

        // Drop the backlog rather than carry it into the next frame
        if updates == MAX_STEPS_PER_FRAME && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::warn!(
                "Frame {} fell behind by {:?}, dropping backlog",
                self.frame_count,
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
            self.dropped_frames += 1;
        }

        self.update_count += updates as u64;
        updates
    }

    /// Get the fixed timestep for simulation updates (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Get current FPS
    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    /// Get total time fed into the loop
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Get total number of frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of updates executed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }

    /// Pause the game
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game paused");
        }
    }

    /// Resume the game
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            log::info!("Game resumed");
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as u32;

        self.current_fps = if avg_frame_time.as_secs_f32() > 0.0 {
            1.0 / avg_frame_time.as_secs_f32()
        } else {
            0.0
        };
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::new();
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.update_count(), 0);
        assert_eq!(game_loop.dropped_frames(), 0);
    }

    #[test]
    fn test_fixed_timestep() {
        let game_loop = GameLoop::new();
        assert_eq!(game_loop.fixed_timestep(), FIXED_TIMESTEP);
        assert!((game_loop.fixed_timestep() - 1.0 / 60.0).abs() < 0.0001);
    }

    #[test]
    fn test_pause_resume() {
        let mut game_loop = GameLoop::new();
        game_loop.pause();
        assert_eq!(game_loop.advance(FIXED_TIMESTEP_DURATION), 0);
        game_loop.resume();
        assert_eq!(game_loop.advance(FIXED_TIMESTEP_DURATION), 1);
    }

    #[test]
    fn test_toggle_pause() {
        let mut game_loop = GameLoop::new();
        game_loop.toggle_pause();
        assert_eq!(game_loop.advance(FIXED_TIMESTEP_DURATION), 0);
        game_loop.toggle_pause();
        assert_eq!(game_loop.advance(FIXED_TIMESTEP_DURATION), 1);
    }

    #[test]
    fn test_resume_discards_time_banked_before_pause() {
        let mut game_loop = GameLoop::new();
        assert_eq!(game_loop.advance(Duration::from_millis(10)), 0);
        game_loop.toggle_pause();
        game_loop.toggle_pause();
        assert_eq!(game_loop.advance(Duration::from_millis(10)), 0);
    }

    #[test]
    fn test_paused_no_updates() {
        let mut game_loop = GameLoop::new();
        game_loop.pause();
        assert_eq!(game_loop.advance(Duration::from_millis(50)), 0);
        assert_eq!(game_loop.frame_count(), 1);
    }

    #[test]
    fn test_one_step_per_fixed_frame() {
        let mut game_loop = GameLoop::new();
        for _ in 0..60 {
            assert_eq!(game_loop.advance(FIXED_TIMESTEP_DURATION), 1);
        }
        assert_eq!(game_loop.update_count(), 60);
    }

    #[test]
    fn test_short_frames_accumulate() {
        let mut game_loop = GameLoop::new();
        assert_eq!(game_loop.advance(Duration::from_millis(10)), 0);
        assert_eq!(game_loop.advance(Duration::from_millis(10)), 1);
        assert_eq!(game_loop.advance(Duration::from_millis(10)), 0);
    }

    #[test]
    fn test_max_steps_limit_drops_backlog() {
        let mut game_loop = GameLoop::new();

        // 300ms would allow 18 updates
        assert_eq!(game_loop.advance(Duration::from_millis(300)), MAX_STEPS_PER_FRAME);
        assert_eq!(game_loop.dropped_frames(), 1);
        // Backlog is gone: a short frame runs nothing
        assert_eq!(game_loop.advance(Duration::from_millis(10)), 0);
    }

    #[test]
    fn test_fps_from_frame_times() {
        let mut game_loop = GameLoop::new();
        for _ in 0..10 {
            game_loop.advance(Duration::from_millis(20));
        }
        assert!((game_loop.fps() - 50.0).abs() < 0.01);
        assert_eq!(game_loop.elapsed(), Duration::from_millis(200));
    }
}
