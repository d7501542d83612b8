//! Software-timed step pulse driver
//!
//! Generates step pulses on a step/dir/enable GPIO triple by accumulating
//! fractional steps over the elapsed interval. No hardware timer is used;
//! the control loop hands in a monotonic timestamp on every run and the
//! driver emits whatever whole pulses have come due since the last one.

use micromath::F32Ext;

use harpax_core::traits::StepActuator;

use crate::gpio::OutputPin;

/// Upper bound on pulses emitted per [`run`](StepActuator::run) call
///
/// A stalled loop iteration would otherwise discharge its whole backlog as
/// one burst; the remainder is dropped instead. The axis is open-loop, so a
/// dropped backlog is position error either way — a controlled pulse rate
/// matters more than catching up.
pub const MAX_STEPS_PER_RUN: u32 = 16;

/// Electrical configuration of one stepper channel
#[derive(Debug, Clone, Copy)]
pub struct PulseStepperConfig {
    /// Speed bound in steps/s (positive)
    pub max_speed_sps: f32,
    /// Enable input is active-low (the common case for driver breakouts)
    pub enable_inverted: bool,
}

impl Default for PulseStepperConfig {
    fn default() -> Self {
        Self {
            max_speed_sps: 4000.0,
            enable_inverted: true,
        }
    }
}

/// Step/dir/enable pulse driver for one axis
///
/// Positive speed raises the direction pin. Speed changes take effect on
/// the next run; a non-zero acceleration setpoint integrates the speed
/// autonomously, saturating at the configured bound.
pub struct PulseStepper<P> {
    step: P,
    dir: P,
    enable: P,
    config: PulseStepperConfig,
    /// Signed steps/s
    speed: f32,
    /// Signed steps/s², integrated on every run
    accel: f32,
    /// Fractional steps owed to the motor
    step_debt: f32,
    last_run_us: Option<u64>,
    enabled: bool,
    dir_forward: bool,
}

impl<P: OutputPin> PulseStepper<P> {
    /// Create a driver with its output stage disabled
    pub fn new(step: P, mut dir: P, mut enable: P, config: PulseStepperConfig) -> Self {
        dir.set_low();
        // Start disabled regardless of polarity
        enable.set_state(config.enable_inverted);

        Self {
            step,
            dir,
            enable,
            config,
            speed: 0.0,
            accel: 0.0,
            step_debt: 0.0,
            last_run_us: None,
            enabled: false,
            // Matches the low direction pin set above
            dir_forward: false,
        }
    }

    fn clamp_speed(&self, sps: f32) -> f32 {
        sps.clamp(-self.config.max_speed_sps, self.config.max_speed_sps)
    }
}

impl<P: OutputPin> StepActuator for PulseStepper<P> {
    fn set_speed(&mut self, sps: f32) {
        self.speed = self.clamp_speed(sps);
    }

    fn set_acceleration(&mut self, sps2: f32) {
        self.accel = sps2;
    }

    fn current_speed(&self) -> f32 {
        self.speed
    }

    fn max_speed(&self) -> f32 {
        self.config.max_speed_sps
    }

    fn run(&mut self, now_us: u64) {
        let Some(last) = self.last_run_us.replace(now_us) else {
            // First run only anchors the clock
            return;
        };
        let dt = now_us.saturating_sub(last) as f32 * 1e-6;
        if dt <= 0.0 {
            return;
        }

        if self.accel != 0.0 {
            self.speed = self.clamp_speed(self.speed + self.accel * dt);
        }

        if !self.enabled || self.speed == 0.0 {
            self.step_debt = 0.0;
            return;
        }

        let forward = self.speed > 0.0;
        if forward != self.dir_forward {
            self.dir_forward = forward;
            self.dir.set_state(forward);
        }

        self.step_debt += self.speed.abs() * dt;
        let due = self.step_debt as u32;
        if due > MAX_STEPS_PER_RUN {
            self.step_debt = 0.0;
        } else {
            self.step_debt -= due as f32;
        }

        for _ in 0..due.min(MAX_STEPS_PER_RUN) {
            self.step.set_high();
            self.step.set_low();
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.step_debt = 0.0;
        self.enable.set_state(enabled != self.config.enable_inverted);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockPin {
        high: bool,
        rising_edges: u32,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            if !self.high {
                self.rising_edges += 1;
            }
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }
    }

    fn stepper() -> PulseStepper<MockPin> {
        let mut stepper = PulseStepper::new(
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
            PulseStepperConfig::default(),
        );
        stepper.set_enabled(true);
        stepper
    }

    #[test]
    fn test_enable_polarity() {
        let disabled = PulseStepper::new(
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
            PulseStepperConfig::default(),
        );
        // Active-low enable: disabled = pin high
        assert!(disabled.enable.high);

        let mut enabled = disabled;
        enabled.set_enabled(true);
        assert!(!enabled.enable.high);
        assert!(enabled.is_enabled());
    }

    #[test]
    fn test_pulses_match_elapsed_time() {
        let mut stepper = stepper();
        stepper.set_speed(1000.0);

        stepper.run(0);
        assert_eq!(stepper.step.rising_edges, 0);

        // 10 ms at 1000 steps/s = 10 steps, delivered over many small runs
        for ms in 1..=10u64 {
            stepper.run(ms * 1000);
        }
        assert_eq!(stepper.step.rising_edges, 10);
    }

    #[test]
    fn test_fractional_steps_carry_over() {
        let mut stepper = stepper();
        stepper.set_speed(500.0);

        stepper.run(0);
        // 1 ms at 500 steps/s = 0.5 steps: nothing yet
        stepper.run(1000);
        assert_eq!(stepper.step.rising_edges, 0);
        // The second half-step completes the first pulse
        stepper.run(2000);
        assert_eq!(stepper.step.rising_edges, 1);
    }

    #[test]
    fn test_direction_pin_tracks_sign() {
        let mut stepper = stepper();

        stepper.set_speed(1000.0);
        stepper.run(0);
        stepper.run(1000);
        assert!(stepper.dir.high);

        stepper.set_speed(-1000.0);
        stepper.run(2000);
        assert!(!stepper.dir.high);
    }

    #[test]
    fn test_speed_clamped_to_bound() {
        let mut stepper = stepper();
        stepper.set_speed(10_000.0);
        assert_eq!(stepper.current_speed(), 4000.0);
        stepper.set_speed(-10_000.0);
        assert_eq!(stepper.current_speed(), -4000.0);
    }

    #[test]
    fn test_acceleration_integrates_and_saturates() {
        let mut stepper = stepper();
        stepper.set_acceleration(1000.0);

        stepper.run(0);
        stepper.run(1_000_000);
        assert!((stepper.current_speed() - 1000.0).abs() < 1e-3);

        // Keep integrating: saturates at the bound instead of overshooting
        for s in 2..=10u64 {
            stepper.run(s * 1_000_000);
        }
        assert_eq!(stepper.current_speed(), 4000.0);
    }

    #[test]
    fn test_burst_capped_after_stall() {
        let mut stepper = stepper();
        stepper.set_speed(4000.0);

        stepper.run(0);
        // One second gap: 4000 steps owed, only the cap is emitted
        stepper.run(1_000_000);
        assert_eq!(stepper.step.rising_edges, MAX_STEPS_PER_RUN);

        // The backlog is dropped, not replayed
        stepper.run(1_001_000);
        assert_eq!(stepper.step.rising_edges, MAX_STEPS_PER_RUN + 4);
    }

    #[test]
    fn test_disabled_stepper_emits_nothing() {
        let mut stepper = stepper();
        stepper.set_speed(1000.0);
        stepper.set_enabled(false);

        stepper.run(0);
        stepper.run(100_000);
        assert_eq!(stepper.step.rising_edges, 0);
    }
}
