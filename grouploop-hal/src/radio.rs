//! BLE advertisement scanning abstractions
//!
//! Scanning is strictly non-blocking: `start_scan` begins an indefinite
//! passive scan, `stop_scan` ends it, and the accumulated results are read
//! back afterwards. The application owns all duty-cycle timing.

/// A 128-bit advertised service identifier
pub type ServiceUuid = [u8; 16];

/// Errors from radio operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanError {
    /// Radio failed to start or stop
    Radio,
    /// A scan is already in the requested state
    AlreadyInState,
}

/// Low-level scan timing parameters, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanParams {
    /// Time between the start of consecutive scan windows
    pub interval_ms: u16,
    /// Listening time within each interval
    pub window_ms: u16,
    /// Active (scan-request) vs passive scanning
    pub active: bool,
}

/// One advertisement observed during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Advertisement {
    /// Primary advertised service, if any
    pub service: Option<ServiceUuid>,
    /// Received signal strength in dBm
    pub rssi: i8,
}

impl Advertisement {
    /// True if this advertisement carries the given service identifier
    pub fn advertises(&self, uuid: &ServiceUuid) -> bool {
        self.service.as_ref() == Some(uuid)
    }
}

/// BLE scanner
pub trait BeaconRadio {
    /// Apply low-level scan timing
    fn configure(&mut self, params: ScanParams);

    /// Begin an indefinite scan; returns immediately
    fn start_scan(&mut self) -> Result<(), ScanError>;

    /// Stop the running scan; results become available afterwards
    fn stop_scan(&mut self) -> Result<(), ScanError>;

    /// Advertisements observed by the last completed scan, in discovery order
    fn results(&mut self) -> &[Advertisement];
}
