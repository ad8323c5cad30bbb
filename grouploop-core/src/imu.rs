//! IMU sampling process
//!
//! Polls the accelerometer at a fixed short interval, converts raw units
//! to g, and latches a tap event whenever the acceleration magnitude
//! exceeds a fixed threshold. The latch is consumed by the publisher.
//! A sensor that fails to initialize marks the subsystem unavailable;
//! sampling quietly becomes a no-op and nothing else is affected.

use grouploop_hal::Accelerometer;

use crate::latch::EventLatch;
use crate::time::Timer;

/// Conversion factor from cm/s² to standard gravity (1 g = 980.665 cm/s²)
pub const CM_S2_TO_G: f32 = 0.0010197;

/// Tap detection threshold, acceleration magnitude in g
pub const TAP_THRESHOLD_G: f32 = 3.0;

/// Sampling interval in milliseconds
pub const SAMPLE_INTERVAL_MS: u32 = 10;

/// Latest converted accelerometer reading, in g per axis
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    /// Squared vector magnitude, in g²
    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

/// The IMU subsystem process
pub struct ImuProcess<A: Accelerometer> {
    sensor: A,
    read_timer: Timer,
    sensor_ok: bool,
    sample: AccelSample,
    tap: EventLatch,
}

impl<A: Accelerometer> ImuProcess<A> {
    pub fn new(sensor: A) -> Self {
        Self {
            sensor,
            read_timer: Timer::new(SAMPLE_INTERVAL_MS),
            sensor_ok: false,
            sample: AccelSample::default(),
            tap: EventLatch::new(),
        }
    }

    pub fn setup(&mut self, now: u32) {
        self.read_timer.reset(now);
        match self.sensor.init() {
            Ok(()) => {
                self.sensor_ok = true;
                log::info!("IMU sensor initialized");
            }
            Err(err) => {
                self.sensor_ok = false;
                log::warn!("could not initialize IMU sensor: {err:?}");
            }
        }
    }

    pub fn update(&mut self, now: u32) {
        if !self.sensor_ok || !self.read_timer.check_and_reset(now) || !self.sensor.data_ready() {
            return;
        }

        match self.sensor.read() {
            Ok(raw) => {
                self.sample = AccelSample {
                    x: raw.x * CM_S2_TO_G,
                    y: raw.y * CM_S2_TO_G,
                    z: raw.z * CM_S2_TO_G,
                };
                // Compare in squared space; the threshold is constant
                if self.sample.magnitude_squared() > TAP_THRESHOLD_G * TAP_THRESHOLD_G {
                    self.tap.set();
                }
            }
            Err(err) => {
                log::warn!("IMU read failed: {err:?}");
            }
        }
    }

    /// Latest converted sample
    pub fn sample(&self) -> AccelSample {
        self.sample
    }

    /// Consume the tap latch
    pub fn take_tap(&mut self) -> bool {
        self.tap.take()
    }

    /// True when the sensor initialized successfully
    pub fn available(&self) -> bool {
        self.sensor_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grouploop_hal::{RawAccel, SensorError};

    struct ScriptedSensor {
        fail_init: bool,
        reading: RawAccel,
        reads: u32,
    }

    impl Accelerometer for ScriptedSensor {
        fn init(&mut self) -> Result<(), SensorError> {
            if self.fail_init {
                Err(SensorError::NotDetected)
            } else {
                Ok(())
            }
        }

        fn data_ready(&mut self) -> bool {
            true
        }

        fn read(&mut self) -> Result<RawAccel, SensorError> {
            self.reads += 1;
            Ok(self.reading)
        }
    }

    fn resting() -> RawAccel {
        // 1 g on the z axis
        RawAccel { x: 0.0, y: 0.0, z: 980.665 }
    }

    fn spike() -> RawAccel {
        // ~4 g along x: well past the tap threshold
        RawAccel { x: 4000.0, y: 0.0, z: 980.665 }
    }

    #[test]
    fn converts_to_gravity_units() {
        let mut imu = ImuProcess::new(ScriptedSensor {
            fail_init: false,
            reading: resting(),
            reads: 0,
        });
        imu.setup(0);
        imu.update(11);

        let s = imu.sample();
        assert!((s.z - 1.0).abs() < 0.01);
        assert!(!imu.take_tap());
    }

    #[test]
    fn tap_latch_is_sticky_until_consumed() {
        let mut imu = ImuProcess::new(ScriptedSensor {
            fail_init: false,
            reading: spike(),
            reads: 0,
        });
        imu.setup(0);
        imu.update(11);

        // Sensor calms down; the latch holds
        imu.sensor.reading = resting();
        imu.update(22);
        assert!(imu.take_tap());
        imu.update(33);
        assert!(!imu.take_tap());
    }

    #[test]
    fn rapid_taps_before_consumption_collapse_to_one() {
        let mut imu = ImuProcess::new(ScriptedSensor {
            fail_init: false,
            reading: spike(),
            reads: 0,
        });
        imu.setup(0);
        imu.update(11);
        imu.update(22);

        assert!(imu.take_tap());
        assert!(!imu.take_tap());
    }

    #[test]
    fn failed_init_disables_sampling() {
        let mut imu = ImuProcess::new(ScriptedSensor {
            fail_init: true,
            reading: spike(),
            reads: 0,
        });
        imu.setup(0);
        assert!(!imu.available());

        imu.update(11);
        imu.update(22);
        assert_eq!(imu.sensor.reads, 0);
        assert!(!imu.take_tap());
    }

    #[test]
    fn sampling_respects_the_poll_interval() {
        let mut imu = ImuProcess::new(ScriptedSensor {
            fail_init: false,
            reading: resting(),
            reads: 0,
        });
        imu.setup(0);

        imu.update(5);
        assert_eq!(imu.sensor.reads, 0);
        imu.update(11);
        assert_eq!(imu.sensor.reads, 1);
        imu.update(15);
        assert_eq!(imu.sensor.reads, 1);
    }
}
