//! Grouploop Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that can be implemented
//! by platform-specific backends (ESP32-C3 vendor SDK, host simulator, ...).
//! This enables the same application code to run on different hardware
//! platforms and to be tested on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (grouploop-core)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  grouploop-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ target board  │       │ grouploop-sim │
//! │ (vendor SDK)  │       │ (host)        │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`pixels::PixelStrip`] - Addressable LED strip output
//! - [`motor::VibrationMotor`] - PWM haptic motor output
//! - [`sensor::Accelerometer`] - 3-axis IMU sampling
//! - [`radio::BeaconRadio`] - Non-blocking BLE advertisement scanning
//! - [`link::WirelessLink`] - The underlying wireless (WiFi) link
//! - [`socket::SocketClient`] - Persistent socket to the server
//! - [`storage::ConfigStore`] - Durable namespaced key/value storage
//! - [`gpio::InputPin`] - Digital input (boot button)
//! - [`console::SerialConsole`] - Line-oriented configuration channel
//! - [`system::SystemControl`] - Device identity and restart

#![no_std]
#![deny(unsafe_code)]

pub mod board;
pub mod console;
pub mod gpio;
pub mod link;
pub mod motor;
pub mod pixels;
pub mod radio;
pub mod sensor;
pub mod socket;
pub mod storage;
pub mod system;

// Re-export key traits at crate root for convenience
pub use board::{Board, Peripherals};
pub use console::SerialConsole;
pub use gpio::InputPin;
pub use link::WirelessLink;
pub use motor::VibrationMotor;
pub use pixels::{PixelStrip, Rgb};
pub use radio::{Advertisement, BeaconRadio, ScanError, ScanParams, ServiceUuid};
pub use sensor::{Accelerometer, RawAccel, SensorError};
pub use socket::{SocketClient, SocketError, SocketEvent, MAX_INBOUND_LEN};
pub use storage::{ConfigStore, StoreError, MAX_VALUE_LEN};
pub use system::SystemControl;
