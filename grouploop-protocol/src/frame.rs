//! Sensor frame encoding and decoding
//!
//! One frame is sent per publish tick. Field encodings:
//! - acceleration: linear map of a ±2 g window onto 0..255, clamped at the
//!   window edges
//! - signal strength: linear map of a −100..−40 dBm window onto 0..255,
//!   clamped
//! - tap: 0x00 (no tap) or 0xff (tap observed since the last frame)

use core::fmt::Write;

use heapless::String;

/// Hex characters in one frame, excluding the trailing newline
pub const FRAME_HEX_LEN: usize = 20;

/// Full frame length including the trailing newline
pub const FRAME_LEN: usize = FRAME_HEX_LEN + 1;

/// Acceleration window half-width in g
pub const ACCEL_WINDOW_G: f32 = 2.0;

/// Signal strength window in dBm
pub const RSSI_MIN_DBM: i8 = -100;
pub const RSSI_MAX_DBM: i8 = -40;

/// Errors that can occur while parsing a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Frame is not exactly 20 hex characters
    Length,
    /// A field is not valid hexadecimal
    BadHex,
}

/// One outbound sensor report, in physical units
///
/// `rssi_dbm` is ordered NW, NE, SE, SW to match the slot order of the
/// beacon cache and the layout the server expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReport {
    pub device_id: u16,
    pub accel_g: [f32; 3],
    pub rssi_dbm: [i8; 4],
    pub tap: bool,
}

impl SensorReport {
    /// Map an acceleration in g onto the 8-bit wire range, clamping
    pub fn accel_byte(g: f32) -> u8 {
        let clamped = g.clamp(-ACCEL_WINDOW_G, ACCEL_WINDOW_G);
        let t = (clamped + ACCEL_WINDOW_G) / (2.0 * ACCEL_WINDOW_G);
        (t * 255.0 + 0.5) as u8
    }

    /// Map a signal strength in dBm onto the 8-bit wire range, clamping
    pub fn rssi_byte(dbm: i8) -> u8 {
        let clamped = dbm.clamp(RSSI_MIN_DBM, RSSI_MAX_DBM);
        let span = (RSSI_MAX_DBM as i16 - RSSI_MIN_DBM as i16) as f32;
        let t = (clamped as i16 - RSSI_MIN_DBM as i16) as f32 / span;
        (t * 255.0 + 0.5) as u8
    }

    /// Encode this report as a newline-terminated hex line
    pub fn encode(&self) -> String<FRAME_LEN> {
        let mut out = String::new();
        // The buffer is sized for exactly one frame; none of these can fail.
        let _ = write!(out, "{:04X}", self.device_id);
        for g in self.accel_g {
            let _ = write!(out, "{:02x}", Self::accel_byte(g));
        }
        for dbm in self.rssi_dbm {
            let _ = write!(out, "{:02x}", Self::rssi_byte(dbm));
        }
        let _ = write!(out, "{:02x}", if self.tap { 0xffu8 } else { 0 });
        let _ = out.push('\n');
        out
    }
}

/// One decoded frame, as raw wire bytes
///
/// This is the server-side view: the linear field maps are not inverted,
/// because consumers work directly with the 8-bit values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawFrame {
    pub device_id: u16,
    pub accel: [u8; 3],
    pub distance: [u8; 4],
    pub tap: u8,
}

impl RawFrame {
    /// Parse a frame line; a trailing newline is tolerated
    pub fn parse(line: &str) -> Result<Self, FrameError> {
        let hex = line.trim_end_matches(['\r', '\n']);
        if hex.len() != FRAME_HEX_LEN {
            return Err(FrameError::Length);
        }
        if !hex.is_ascii() {
            return Err(FrameError::BadHex);
        }

        let field = |range: core::ops::Range<usize>| -> Result<u16, FrameError> {
            u16::from_str_radix(&hex[range], 16).map_err(|_| FrameError::BadHex)
        };

        Ok(Self {
            device_id: field(0..4)?,
            accel: [
                field(4..6)? as u8,
                field(6..8)? as u8,
                field(8..10)? as u8,
            ],
            distance: [
                field(10..12)? as u8,
                field(12..14)? as u8,
                field(14..16)? as u8,
                field(16..18)? as u8,
            ],
            tap: field(18..20)? as u8,
        })
    }
}
