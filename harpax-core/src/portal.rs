//! Portal controller
//!
//! One `Portal` owns the whole machine: the three axis actuators, their
//! endstop inputs, the vacuum valve, and the per-axis regulators. The
//! control loop threads it through every iteration — there is exactly one
//! instance and no global state.
//!
//! A tick runs in fixed order: regulate each axis (tracking policy, then
//! endstop override), mirror the gripper flag, then let every actuator emit
//! the pulses owed for the elapsed interval.

use harpax_protocol::Command;

use crate::config::PortalConfig;
use crate::motion::{Axis, AxisDrive, AxisRegulator, UnitConverter, AXIS_COUNT};
use crate::traits::{EndstopInput, GripperValve, StepActuator};

/// The gantry with its vacuum end-effector
pub struct Portal<A, E, V> {
    axes: [A; AXIS_COUNT],
    endstops: [E; AXIS_COUNT],
    regulators: [AxisRegulator; AXIS_COUNT],
    valve: V,
    converter: UnitConverter,
    grip: bool,
}

impl<A, E, V> Portal<A, E, V>
where
    A: StepActuator,
    E: EndstopInput,
    V: GripperValve,
{
    /// Assemble the portal and enable the motor output stages
    ///
    /// All axes start at rest with no target; the gripper starts released.
    pub fn new(mut axes: [A; AXIS_COUNT], endstops: [E; AXIS_COUNT], valve: V, config: &PortalConfig) -> Self {
        for axis in &mut axes {
            axis.set_enabled(true);
        }

        let regulators = [
            AxisRegulator::new(config.axes[0].max_speed_sps, config.mode),
            AxisRegulator::new(config.axes[1].max_speed_sps, config.mode),
            AxisRegulator::new(config.axes[2].max_speed_sps, config.mode),
        ];

        Self {
            axes,
            endstops,
            regulators,
            valve,
            converter: UnitConverter::new(config.steps_per_unit),
            grip: false,
        }
    }

    /// Take over the latest command
    ///
    /// Converts the physical setpoints to native pulse rates and replaces
    /// every axis target and the gripper flag. Last write wins — nothing of
    /// the previous command survives.
    pub fn apply(&mut self, cmd: &Command) {
        let native = self.converter.to_native(cmd.axis);
        for (regulator, target) in self.regulators.iter_mut().zip(native) {
            regulator.set_target(target);
        }
        self.grip = cmd.activate_gripper;
    }

    /// Run one control iteration
    ///
    /// `now_us` is a monotonic microsecond timestamp used by the actuators
    /// to pace pulse emission.
    pub fn tick(&mut self, now_us: u64) {
        for i in 0..AXIS_COUNT {
            let limits = self.endstops[i].sample();
            let measured = self.axes[i].current_speed();
            match self.regulators[i].tick(measured, limits) {
                AxisDrive::Speed(sps) => self.axes[i].set_speed(sps),
                AxisDrive::Accel(sps2) => self.axes[i].set_acceleration(sps2),
                AxisDrive::Brake(sps) => {
                    self.axes[i].set_acceleration(0.0);
                    self.axes[i].set_speed(sps);
                }
            }
        }

        self.valve.set_active(self.grip);

        for axis in &mut self.axes {
            axis.run(now_us);
        }
    }

    /// Latest gripper flag
    pub fn is_gripping(&self) -> bool {
        self.grip
    }

    /// Regulator of one axis
    pub fn regulator(&self, axis: Axis) -> &AxisRegulator {
        &self.regulators[axis.index()]
    }

    /// Actuator handle of one axis
    pub fn axis(&self, axis: Axis) -> &A {
        &self.axes[axis.index()]
    }

    /// Endstop input of one axis
    pub fn endstops_mut(&mut self, axis: Axis) -> &mut E {
        &mut self.endstops[axis.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AxisConfig, ControlMode, PortalConfig};
    use micromath::F32Ext;
    use crate::motion::regulator::DEFAULT_RATE_STEP_SPS;
    use crate::motion::AxisState;
    use crate::safety::LimitSwitches;

    struct MockAxis {
        speed: f32,
        accel: f32,
        max: f32,
        enabled: bool,
        runs: u32,
        last_run_us: Option<u64>,
    }

    impl MockAxis {
        fn new(max: f32) -> Self {
            Self {
                speed: 0.0,
                accel: 0.0,
                max,
                enabled: false,
                runs: 0,
                last_run_us: None,
            }
        }
    }

    impl StepActuator for MockAxis {
        fn set_speed(&mut self, sps: f32) {
            self.speed = sps.clamp(-self.max, self.max);
        }

        fn set_acceleration(&mut self, sps2: f32) {
            self.accel = sps2;
        }

        fn current_speed(&self) -> f32 {
            self.speed
        }

        fn max_speed(&self) -> f32 {
            self.max
        }

        fn run(&mut self, now_us: u64) {
            self.runs += 1;
            if let Some(last) = self.last_run_us.replace(now_us) {
                // Integrate acceleration like the real pulse driver
                let dt = (now_us - last) as f32 * 1e-6;
                self.speed = (self.speed + self.accel * dt).clamp(-self.max, self.max);
            }
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }
    }

    struct MockEndstops(LimitSwitches);

    impl EndstopInput for MockEndstops {
        fn sample(&mut self) -> LimitSwitches {
            self.0
        }
    }

    #[derive(Default)]
    struct MockValve {
        active: bool,
        writes: u32,
    }

    impl GripperValve for MockValve {
        fn set_active(&mut self, active: bool) {
            self.active = active;
            self.writes += 1;
        }

        fn is_active(&self) -> bool {
            self.active
        }
    }

    fn test_config(mode: ControlMode) -> PortalConfig {
        PortalConfig {
            steps_per_unit: 1000.0,
            mode,
            axes: [AxisConfig {
                max_speed_sps: 4000.0,
            }; AXIS_COUNT],
        }
    }

    fn velocity_portal() -> Portal<MockAxis, MockEndstops, MockValve> {
        Portal::new(
            [
                MockAxis::new(4000.0),
                MockAxis::new(4000.0),
                MockAxis::new(4000.0),
            ],
            [
                MockEndstops(LimitSwitches::CLEAR),
                MockEndstops(LimitSwitches::CLEAR),
                MockEndstops(LimitSwitches::CLEAR),
            ],
            MockValve::default(),
            &test_config(ControlMode::default()),
        )
    }

    #[test]
    fn test_new_enables_outputs_at_rest() {
        let portal = velocity_portal();
        for axis in Axis::ALL {
            assert!(portal.axis(axis).is_enabled());
            assert_eq!(portal.axis(axis).current_speed(), 0.0);
            assert_eq!(portal.regulator(axis).state(), AxisState::Idle);
        }
        assert!(!portal.is_gripping());
    }

    #[test]
    fn test_apply_converts_physical_units() {
        let mut portal = velocity_portal();
        portal.apply(&Command {
            axis: [2.0, -1.0, 0.0],
            activate_gripper: false,
        });

        assert_eq!(portal.regulator(Axis::X).target(), 2000.0);
        assert_eq!(portal.regulator(Axis::Y).target(), -1000.0);
        assert_eq!(portal.regulator(Axis::Z).target(), 0.0);
    }

    #[test]
    fn test_tick_steps_actuator_toward_target() {
        let mut portal = velocity_portal();
        portal.apply(&Command {
            axis: [2.0, 0.0, 0.0],
            activate_gripper: false,
        });

        portal.tick(1000);
        assert_eq!(portal.axis(Axis::X).current_speed(), DEFAULT_RATE_STEP_SPS);
        assert_eq!(portal.axis(Axis::Y).current_speed(), 0.0);

        portal.tick(2000);
        assert_eq!(
            portal.axis(Axis::X).current_speed(),
            2.0 * DEFAULT_RATE_STEP_SPS
        );
    }

    #[test]
    fn test_last_command_wins() {
        let mut portal = velocity_portal();
        portal.apply(&Command {
            axis: [3.0, 3.0, 3.0],
            activate_gripper: true,
        });
        portal.apply(&Command {
            axis: [0.0, -2.0, 0.0],
            activate_gripper: false,
        });

        assert_eq!(portal.regulator(Axis::X).target(), 0.0);
        assert_eq!(portal.regulator(Axis::Y).target(), -2000.0);
        assert!(!portal.is_gripping());

        portal.tick(1000);
        assert_eq!(portal.axis(Axis::X).current_speed(), 0.0);
        assert_eq!(portal.axis(Axis::Y).current_speed(), -DEFAULT_RATE_STEP_SPS);
    }

    #[test]
    fn test_gripper_mirrored_every_tick() {
        let mut portal = velocity_portal();
        portal.apply(&Command {
            axis: [0.0; 3],
            activate_gripper: true,
        });

        portal.tick(1000);
        assert!(portal.valve.is_active());
        assert_eq!(portal.valve.writes, 1);

        // No new command: the mirror is still written each tick
        portal.tick(2000);
        assert!(portal.valve.is_active());
        assert_eq!(portal.valve.writes, 2);

        portal.apply(&Command {
            axis: [0.0; 3],
            activate_gripper: false,
        });
        portal.tick(3000);
        assert!(!portal.valve.is_active());
    }

    #[test]
    fn test_blocked_axis_brakes_independently() {
        let mut portal = velocity_portal();
        portal.apply(&Command {
            axis: [2.0, 2.0, 0.0],
            activate_gripper: false,
        });

        // Drive both moving axes up to speed
        for tick in 1..=400u64 {
            portal.tick(tick * 1000);
        }
        assert_eq!(portal.axis(Axis::X).current_speed(), 2000.0);
        assert_eq!(portal.axis(Axis::Y).current_speed(), 2000.0);

        // X hits its max endstop; Y keeps going
        portal.endstops_mut(Axis::X).0 = LimitSwitches {
            min: false,
            max: true,
        };
        portal.tick(401_000);

        assert!((portal.axis(Axis::X).current_speed() - 1980.0).abs() < 1e-2);
        assert_eq!(portal.regulator(Axis::X).state(), AxisState::LimitStop);
        assert_eq!(portal.axis(Axis::Y).current_speed(), 2000.0);
        assert_eq!(portal.regulator(Axis::Y).state(), AxisState::Tracking);
    }

    #[test]
    fn test_acceleration_mode_round_trip() {
        let mut portal = Portal::new(
            [
                MockAxis::new(4000.0),
                MockAxis::new(4000.0),
                MockAxis::new(4000.0),
            ],
            [
                MockEndstops(LimitSwitches::CLEAR),
                MockEndstops(LimitSwitches::CLEAR),
                MockEndstops(LimitSwitches::CLEAR),
            ],
            MockValve::default(),
            &test_config(ControlMode::Acceleration),
        );

        // 0.5 m/s² -> 500 steps/s²
        portal.apply(&Command {
            axis: [0.5, 0.0, 0.0],
            activate_gripper: false,
        });

        portal.tick(0);
        assert_eq!(portal.axis(Axis::X).accel, 500.0);

        // One second of integration in the actuator
        portal.tick(1_000_000);
        assert!((portal.axis(Axis::X).current_speed() - 500.0).abs() < 1e-3);

        // The regulator adopts the actuator speed on the next tick
        portal.tick(2_000_000);
        assert!((portal.regulator(Axis::X).current_speed() - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_acceleration_mode_saturation_via_portal() {
        let mut portal = Portal::new(
            [
                MockAxis::new(1000.0),
                MockAxis::new(1000.0),
                MockAxis::new(1000.0),
            ],
            [
                MockEndstops(LimitSwitches::CLEAR),
                MockEndstops(LimitSwitches::CLEAR),
                MockEndstops(LimitSwitches::CLEAR),
            ],
            MockValve::default(),
            &PortalConfig {
                steps_per_unit: 1000.0,
                mode: ControlMode::Acceleration,
                axes: [AxisConfig {
                    max_speed_sps: 1000.0,
                }; AXIS_COUNT],
            },
        );

        portal.apply(&Command {
            axis: [1.0, 0.0, 0.0],
            activate_gripper: false,
        });

        // Integrate until the actuator saturates at its bound
        let mut now = 0;
        for _ in 0..40 {
            now += 100_000;
            portal.tick(now);
        }
        assert_eq!(portal.axis(Axis::X).current_speed(), 1000.0);

        // At the bound the forwarded demand collapses to zero
        now += 100_000;
        portal.tick(now);
        assert_eq!(portal.axis(Axis::X).accel, 0.0);
        assert_eq!(portal.axis(Axis::X).current_speed(), 1000.0);
    }
}
