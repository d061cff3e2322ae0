// Third-person locomotion: steering, sprint, jump and gravity

use glam::Vec3;

use crate::core::math;
use crate::engine::environment::{AnimatorParams, Environment, MovementCommand};
use crate::engine::input::LocomotionInput;

use super::stamina::Stamina;
use super::stats::LocomotionStats;

/// Turns per-tick input into a movement command. Owns the stamina pool.
#[derive(Debug, Clone)]
pub struct LocomotionController {
    stats: LocomotionStats,
    stamina: Stamina,
    /// Gravity/jump velocity, carried across ticks
    vertical_velocity: f32,
    /// Angular velocity state for facing smoothing (degrees/second)
    turn_velocity: f32,
    /// Set by a jump, cleared once grounded and falling again
    is_jumping: bool,
}

impl LocomotionController {
    pub fn new(stats: LocomotionStats) -> Self {
        let stamina = Stamina::new(&stats);
        Self {
            stats,
            stamina,
            vertical_velocity: 0.0,
            turn_velocity: 0.0,
            is_jumping: false,
        }
    }

    pub fn stamina(&self) -> &Stamina {
        &self.stamina
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Drop accumulated vertical and turning velocity.
    /// Called when something else takes over the transform.
    pub fn halt(&mut self) {
        self.vertical_velocity = 0.0;
        self.turn_velocity = 0.0;
    }

    /// Compute this tick's movement.
    ///
    /// Only queries `env`; the caller applies the returned command.
    ///
    /// # Panics
    /// Panics if `dt` is not a positive finite number.
    pub fn advance<E: Environment + ?Sized>(
        &mut self,
        input: &LocomotionInput,
        dt: f32,
        env: &E,
    ) -> MovementCommand {
        assert!(
            dt > 0.0 && dt.is_finite(),
            "locomotion tick requires a positive delta time, got {dt}"
        );
        let input = input.clamped();

        // Stamina first: it decides the speed for this tick
        let is_running = self.stamina.update(input.sprint, dt);
        let speed = if is_running {
            self.stats.run_speed
        } else {
            self.stats.walk_speed
        };

        // Steering
        let mut facing = env.actor_pose().facing_degrees();
        let magnitude = input.magnitude();
        let mut horizontal = Vec3::ZERO;
        let mut blend_speed = 0.0;
        if magnitude >= self.stats.input_dead_zone {
            let target = input.axis.x.atan2(input.axis.y).to_degrees() + env.camera_yaw_degrees();
            facing = math::smooth_damp_angle(
                facing,
                target,
                &mut self.turn_velocity,
                self.stats.rotation_smooth_time,
                self.stats.max_turn_speed,
                dt,
            )
            .rem_euclid(360.0);
            horizontal = math::yaw_forward(facing) * speed * dt;
            blend_speed = math::clamp(magnitude, 0.0, 1.0);
        }

        // Vertical
        let grounded = env.is_grounded();
        if grounded && self.vertical_velocity < 0.0 {
            self.vertical_velocity = self.stats.ground_stick_velocity;
            self.is_jumping = false;
        }
        if grounded && input.jump {
            self.vertical_velocity = self.stats.jump_velocity();
            self.is_jumping = true;
        }
        self.vertical_velocity += self.stats.gravity * dt;

        MovementCommand {
            horizontal,
            vertical: self.vertical_velocity * dt,
            facing_degrees: facing,
            is_running,
            speed: blend_speed,
        }
    }

    /// Animator parameters matching a command produced by [`Self::advance`]
    pub fn animator_params(&self, command: &MovementCommand) -> AnimatorParams {
        AnimatorParams {
            speed: command.speed,
            is_jumping: self.is_jumping,
            is_running: command.is_running,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::characters::test_support::MockEnvironment;
    use approx::assert_abs_diff_eq;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn controller() -> LocomotionController {
        LocomotionController::new(LocomotionStats::standard())
    }

    fn run_ticks(
        controller: &mut LocomotionController,
        env: &mut MockEnvironment,
        input: LocomotionInput,
        ticks: usize,
    ) {
        for _ in 0..ticks {
            let command = controller.advance(&input, DT, &*env);
            env.apply_movement(&command);
        }
    }

    #[test]
    fn test_walk_forward_one_second() {
        let mut controller = controller();
        let mut env = MockEnvironment::default();

        run_ticks(&mut controller, &mut env, LocomotionInput::forward(), 60);

        let moved = env.total_horizontal();
        assert_abs_diff_eq!(moved.z, 3.0, epsilon = 1e-4);
        assert_abs_diff_eq!(moved.x, 0.0, epsilon = 1e-4);
        assert_eq!(controller.stamina().current(), 100.0);
        assert!(env.commands.iter().all(|c| !c.is_running));
    }

    #[test]
    fn test_sprint_uses_run_speed() {
        let mut controller = controller();
        let env = MockEnvironment::default();
        let command = controller.advance(&LocomotionInput::forward().with_sprint(true), DT, &env);

        assert!(command.is_running);
        assert_abs_diff_eq!(command.horizontal.length(), 6.0 * DT, epsilon = 1e-5);
        assert!(controller.stamina().current() < 100.0);
    }

    #[test]
    fn test_exhausted_sprint_falls_back_to_walk() {
        let mut controller = controller();
        let mut env = MockEnvironment::default();
        // 5 seconds at 20/s empties the pool
        run_ticks(
            &mut controller,
            &mut env,
            LocomotionInput::forward().with_sprint(true),
            5 * 60 + 1,
        );
        assert!(controller.stamina().is_exhausted());

        let command = controller.advance(&LocomotionInput::forward().with_sprint(true), DT, &env);
        assert!(!command.is_running);
        assert_abs_diff_eq!(command.horizontal.length(), 3.0 * DT, epsilon = 1e-5);
    }

    #[test]
    fn test_dead_zone_keeps_facing_and_position() {
        let mut controller = controller();
        let mut env = MockEnvironment::default();
        env.pose = crate::engine::environment::Pose::from_yaw(Vec3::ZERO, 30.0);

        let input = LocomotionInput {
            axis: Vec2::new(0.05, 0.05),
            ..Default::default()
        };
        let command = controller.advance(&input, DT, &env);

        assert_eq!(command.horizontal, Vec3::ZERO);
        assert_eq!(command.speed, 0.0);
        assert_abs_diff_eq!(command.facing_degrees, 30.0, epsilon = 1e-3);
    }

    #[test]
    fn test_turn_is_smoothed_not_snapped() {
        let mut controller = controller();
        let env = MockEnvironment::default();
        let right = LocomotionInput {
            axis: Vec2::X,
            ..Default::default()
        };

        let command = controller.advance(&right, DT, &env);
        assert!(command.facing_degrees > 0.0);
        assert!(command.facing_degrees < 90.0);
        // Moves along the smoothed facing, not the target
        let expected = math::yaw_forward(command.facing_degrees) * 3.0 * DT;
        assert_abs_diff_eq!(command.horizontal.x, expected.x, epsilon = 1e-5);
        assert_abs_diff_eq!(command.horizontal.z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn test_turn_converges_to_camera_relative_target() {
        let mut controller = controller();
        let mut env = MockEnvironment {
            camera_yaw: 90.0,
            ..Default::default()
        };

        run_ticks(&mut controller, &mut env, LocomotionInput::forward(), 120);

        let facing = env.pose.facing_degrees();
        assert_abs_diff_eq!(facing, 90.0, epsilon = 0.1);
    }

    #[test]
    fn test_grounded_stick_velocity() {
        let mut controller = controller();
        let env = MockEnvironment::default();
        let idle = LocomotionInput::default();

        controller.advance(&idle, DT, &env);
        // Second tick: velocity was negative, reset to stick value then gravity
        controller.advance(&idle, DT, &env);
        assert_abs_diff_eq!(
            controller.vertical_velocity(),
            -2.0 - 9.81 * DT,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_jump_sets_launch_velocity() {
        let mut controller = controller();
        let env = MockEnvironment::default();
        let command = controller.advance(&LocomotionInput::default().with_jump(true), DT, &env);

        let launch = (1.5f32 * 2.0 * 9.81).sqrt();
        assert_abs_diff_eq!(controller.vertical_velocity(), launch - 9.81 * DT, epsilon = 1e-5);
        assert!(command.vertical > 0.0);
        assert!(controller.animator_params(&command).is_jumping);
    }

    #[test]
    fn test_no_jump_while_airborne() {
        let mut controller = controller();
        let env = MockEnvironment {
            grounded: false,
            ..Default::default()
        };
        let command = controller.advance(&LocomotionInput::default().with_jump(true), DT, &env);
        assert!(controller.vertical_velocity() < 0.0);
        assert!(!controller.animator_params(&command).is_jumping);
    }

    #[test]
    fn test_landing_clears_jump_flag() {
        let mut controller = controller();
        let mut env = MockEnvironment::default();
        controller.advance(&LocomotionInput::default().with_jump(true), DT, &env);

        env.grounded = false;
        // Rise and fall until the velocity turns negative
        let mut command = MovementCommand::default();
        while controller.vertical_velocity() >= 0.0 {
            command = controller.advance(&LocomotionInput::default(), DT, &env);
        }
        assert!(controller.animator_params(&command).is_jumping);

        env.grounded = true;
        let command = controller.advance(&LocomotionInput::default(), DT, &env);
        assert!(!controller.animator_params(&command).is_jumping);
    }

    #[test]
    fn test_halt_zeroes_vertical_velocity() {
        let mut controller = controller();
        let env = MockEnvironment::default();
        controller.advance(&LocomotionInput::default().with_jump(true), DT, &env);
        controller.halt();
        assert_eq!(controller.vertical_velocity(), 0.0);
    }

    #[test]
    fn test_stamina_bounded_every_tick() {
        let mut controller = controller();
        let mut env = MockEnvironment::default();
        for i in 0..3000 {
            let input = LocomotionInput::forward().with_sprint(i % 900 < 500);
            let command = controller.advance(&input, DT, &env);
            env.apply_movement(&command);
            let stamina = controller.stamina();
            assert!(stamina.current() >= 0.0 && stamina.current() <= stamina.max());
        }
    }

    #[test]
    #[should_panic(expected = "positive delta time")]
    fn test_negative_dt_is_a_contract_violation() {
        let mut controller = controller();
        let env = MockEnvironment::default();
        controller.advance(&LocomotionInput::forward(), -DT, &env);
    }
}
