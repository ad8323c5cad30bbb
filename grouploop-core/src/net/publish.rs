//! Publish process
//!
//! On a fixed tick rate while connected, builds one sensor frame from the
//! shared readings and sends it. Sending consumes the tap latch, so a tap
//! is reported in exactly one frame.

use grouploop_hal::SocketClient;
use grouploop_protocol::SensorReport;

use crate::beacon::Direction;
use crate::node::SensorReadings;
use crate::time::Timer;

use super::ConnectionManager;

/// Publish interval in milliseconds (20 Hz)
pub const PUBLISH_INTERVAL_MS: u32 = 50;

/// The publish process
pub struct PublishProcess {
    timer: Timer,
}

impl Default for PublishProcess {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishProcess {
    pub fn new() -> Self {
        Self {
            timer: Timer::new(PUBLISH_INTERVAL_MS),
        }
    }

    pub fn setup(&mut self, now: u32) {
        self.timer.reset(now);
    }

    pub fn update<S: SocketClient>(
        &mut self,
        conn: &mut ConnectionManager<S>,
        readings: &mut SensorReadings,
        now: u32,
    ) {
        if !conn.is_connected() || !self.timer.check_and_reset(now) {
            return;
        }

        let report = SensorReport {
            device_id: conn.device_id(),
            accel_g: [readings.accel.x, readings.accel.y, readings.accel.z],
            rssi_dbm: [
                readings.beacons.get(Direction::NorthWest),
                readings.beacons.get(Direction::NorthEast),
                readings.beacons.get(Direction::SouthEast),
                readings.beacons.get(Direction::SouthWest),
            ],
            tap: readings.tap.take(),
        };
        conn.send(&report.encode());
    }
}
