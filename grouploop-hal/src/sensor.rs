//! Accelerometer abstractions
//!
//! The IMU is polled, not interrupt-driven: the application asks whether a
//! fresh sample is available each tick and reads it when it is.

/// Errors from accelerometer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor did not respond during initialization
    NotDetected,
    /// Bus transaction failed
    Bus,
    /// No sample ready to read
    NoData,
}

/// A raw 3-axis acceleration sample in cm/s² per axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawAccel {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// 3-axis accelerometer
pub trait Accelerometer {
    /// Initialize the sensor (mode, data rate, scale)
    ///
    /// Returns an error when the sensor is absent or unresponsive; the
    /// caller is expected to mark the subsystem unavailable and carry on.
    fn init(&mut self) -> Result<(), SensorError>;

    /// True when a fresh sample can be read
    fn data_ready(&mut self) -> bool;

    /// Read the latest sample
    fn read(&mut self) -> Result<RawAccel, SensorError>;
}
