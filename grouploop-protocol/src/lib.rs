//! Grouploop wire formats
//!
//! This crate defines the three text formats the scanner node exchanges
//! with the outside world:
//!
//! - the outbound sensor frame, one hex-encoded line per publish tick
//!   ([`frame`]),
//! - the inbound `command:parameters` line ([`command`]),
//! - the configuration JSON document used over the interactive
//!   configuration channel ([`config`]).
//!
//! # Sensor frame
//!
//! ```text
//! ┌──────────┬────┬────┬────┬─────┬─────┬─────┬─────┬─────┐
//! │ deviceId │ ax │ ay │ az │ dNW │ dNE │ dSE │ dSW │ tap │
//! │ 4 hex    │ 2  │ 2  │ 2  │ 2   │ 2   │ 2   │ 2   │ 2   │
//! └──────────┴────┴────┴────┴─────┴─────┴─────┴─────┴─────┘
//! ```
//!
//! 20 hex characters, newline-terminated. The device id is uppercase hex,
//! all payload bytes lowercase.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod config;
pub mod frame;

pub use command::CommandLine;
pub use config::{ConfigDocument, ConfigUpdate, MAX_DOCUMENT_LEN, MAX_FIELD_LEN};
pub use frame::{FrameError, RawFrame, SensorReport, FRAME_LEN};
