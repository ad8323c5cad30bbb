//! Board-agnostic application core for the grouploop scanner node
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Cooperative process scheduler (typed registry, round-robin tick)
//! - Interval timer utility
//! - LED and vibration behavior state machines
//! - BLE duty-cycle scanner and beacon RSSI cache
//! - IMU sampling with tap detection
//! - Connection manager, publish and receive processes
//! - WiFi link gate state machine
//! - Button-triggered configuration mode
//! - Command registry and the built-in command surface
//!
//! Hardware is reached exclusively through the `grouploop-hal` traits, and
//! time is injected as millisecond timestamps, so the whole crate runs and
//! tests on the host.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod beacon;
pub mod command;
pub mod commands;
pub mod config;
pub mod configmode;
pub mod imu;
pub mod latch;
pub mod led;
pub mod net;
pub mod node;
pub mod process;
pub mod scan;
pub mod time;
pub mod vibration;
pub mod wifi;
