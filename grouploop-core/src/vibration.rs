//! Vibration behavior engine
//!
//! Haptic counterpart of the LED engine: one active variant at a time,
//! switched at runtime, with non-active variants keeping their state.
//! Burst and Pulse both alternate the motor at a configured frequency;
//! a frequency of zero disables toggling entirely, leaving the motor at
//! its last commanded level.

use grouploop_hal::VibrationMotor;

use crate::time::Timer;

/// The closed set of vibration behavior variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VibePattern {
    Off,
    Constant,
    Burst,
    Pulse,
}

/// Interval for a toggling behavior at `frequency` Hz; zero disables
const fn toggle_interval_ms(frequency: u32) -> u32 {
    if frequency > 0 {
        1000 / frequency
    } else {
        0
    }
}

/// Motor off
#[derive(Debug, Default)]
pub struct MotorOff;

impl MotorOff {
    fn setup<M: VibrationMotor>(&mut self, motor: &mut M) {
        motor.set_duty(0);
    }
}

/// Constant intensity
#[derive(Debug)]
pub struct Constant {
    pub intensity: u8,
}

impl Constant {
    fn setup<M: VibrationMotor>(&mut self, motor: &mut M) {
        motor.set_duty(self.intensity);
    }
}

/// Motor toggled on/off at a fixed frequency
#[derive(Debug)]
pub struct Toggling {
    pub intensity: u8,
    timer: Timer,
    motor_on: bool,
}

impl Toggling {
    fn new(intensity: u8, frequency_hz: u32) -> Self {
        Self {
            intensity,
            timer: Timer::new(toggle_interval_ms(frequency_hz)),
            motor_on: false,
        }
    }

    /// Reconfigure the toggle frequency; zero freezes the motor at its
    /// current level
    pub fn set_frequency(&mut self, frequency_hz: u32) {
        self.timer.set_interval(toggle_interval_ms(frequency_hz));
    }

    fn setup<M: VibrationMotor>(&mut self, motor: &mut M, now: u32) {
        self.timer.reset(now);
        self.motor_on = false;
        motor.set_duty(0);
    }

    fn update<M: VibrationMotor>(&mut self, motor: &mut M, now: u32) {
        if self.timer.check_and_reset(now) {
            self.motor_on = !self.motor_on;
            motor.set_duty(if self.motor_on { self.intensity } else { 0 });
        }
    }
}

/// All vibration variants plus the tag selecting the active one
pub struct VibeEngine {
    active: VibePattern,
    off: MotorOff,
    constant: Constant,
    burst: Toggling,
    pulse: Toggling,
}

impl Default for VibeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl VibeEngine {
    pub fn new() -> Self {
        Self {
            active: VibePattern::Off,
            off: MotorOff,
            constant: Constant { intensity: 128 },
            burst: Toggling::new(192, 8),
            pulse: Toggling::new(0, 0),
        }
    }

    pub fn pattern(&self) -> VibePattern {
        self.active
    }

    /// Switch the active variant, running its setup
    pub fn set_pattern<M: VibrationMotor>(&mut self, pattern: VibePattern, motor: &mut M, now: u32) {
        self.active = pattern;
        match pattern {
            VibePattern::Off => self.off.setup(motor),
            VibePattern::Constant => self.constant.setup(motor),
            VibePattern::Burst => self.burst.setup(motor, now),
            VibePattern::Pulse => self.pulse.setup(motor, now),
        }
    }

    /// Drive the active variant
    pub fn update<M: VibrationMotor>(&mut self, motor: &mut M, now: u32) {
        match self.active {
            VibePattern::Off | VibePattern::Constant => {}
            VibePattern::Burst => self.burst.update(motor, now),
            VibePattern::Pulse => self.pulse.update(motor, now),
        }
    }
}

/// The vibration subsystem process
///
/// Runs the behavior engine and services `vibrate:<ms>` requests: a
/// one-shot full-duty override armed by the command surface and cleared by
/// a timer, never by blocking.
pub struct VibrationProcess<M: VibrationMotor> {
    motor: M,
    engine: VibeEngine,
    override_timer: Timer,
    override_active: bool,
}

impl<M: VibrationMotor> VibrationProcess<M> {
    pub fn new(motor: M) -> Self {
        Self {
            motor,
            engine: VibeEngine::new(),
            override_timer: Timer::new(0),
            override_active: false,
        }
    }

    pub fn setup(&mut self, now: u32) {
        self.engine.set_pattern(VibePattern::Off, &mut self.motor, now);
    }

    pub fn update(&mut self, now: u32) {
        if self.override_active {
            if self.override_timer.has_elapsed(now) {
                self.override_active = false;
                // Hand the motor back to the active behavior
                let pattern = self.engine.pattern();
                self.engine.set_pattern(pattern, &mut self.motor, now);
            }
            return;
        }
        self.engine.update(&mut self.motor, now);
    }

    /// Run the motor at full duty for `duration_ms`
    pub fn vibrate(&mut self, duration_ms: u32, now: u32) {
        log::info!("vibrating for {duration_ms} ms");
        self.override_timer.set_interval(duration_ms);
        self.override_timer.reset(now);
        self.override_active = true;
        self.motor.set_duty(255);
    }

    pub fn engine_mut(&mut self) -> &mut VibeEngine {
        &mut self.engine
    }

    pub fn pattern(&self) -> VibePattern {
        self.engine.pattern()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct TestMotor {
        duty: u8,
        writes: u32,
    }

    impl VibrationMotor for TestMotor {
        fn set_duty(&mut self, duty: u8) {
            self.duty = duty;
            self.writes += 1;
        }
    }

    #[test]
    fn burst_toggles_at_the_configured_frequency() {
        let mut motor = TestMotor::default();
        let mut engine = VibeEngine::new();
        engine.burst = Toggling::new(200, 10); // 100 ms half-period
        engine.set_pattern(VibePattern::Burst, &mut motor, 0);
        assert_eq!(motor.duty, 0);

        engine.update(&mut motor, 50);
        assert_eq!(motor.duty, 0);

        engine.update(&mut motor, 101);
        assert_eq!(motor.duty, 200);

        engine.update(&mut motor, 202);
        assert_eq!(motor.duty, 0);
    }

    #[test]
    fn zero_frequency_never_toggles() {
        let mut motor = TestMotor::default();
        let mut engine = VibeEngine::new();
        engine.set_pattern(VibePattern::Pulse, &mut motor, 0);
        let writes_after_setup = motor.writes;

        for now in (0..10_000u32).step_by(50) {
            engine.update(&mut motor, now);
        }
        assert_eq!(motor.writes, writes_after_setup);
    }

    #[test]
    fn constant_holds_its_intensity() {
        let mut motor = TestMotor::default();
        let mut engine = VibeEngine::new();
        engine.constant.intensity = 77;
        engine.set_pattern(VibePattern::Constant, &mut motor, 0);
        assert_eq!(motor.duty, 77);

        engine.update(&mut motor, 1000);
        assert_eq!(motor.duty, 77);
    }

    #[test]
    fn vibrate_override_runs_full_duty_then_restores() {
        let mut process = VibrationProcess::new(TestMotor::default());
        process.setup(0);

        process.vibrate(200, 0);
        assert_eq!(process.motor.duty, 255);

        process.update(100);
        assert_eq!(process.motor.duty, 255);

        process.update(201);
        // Returned to the Off behavior
        assert_eq!(process.motor.duty, 0);
        assert_eq!(process.pattern(), VibePattern::Off);
    }
}
