//! BLE duty-cycle scanner process
//!
//! Two-phase timer-driven state machine: while off, an off-timer counts
//! down the inter-scan gap; on expiry a scan starts. While on, an on-timer
//! counts down the scan window; on expiry the scan stops and its results
//! are processed synchronously into the beacon cache.

use grouploop_hal::{BeaconRadio, ScanParams, ServiceUuid};

use crate::beacon::RssiCache;
use crate::time::Timer;

/// Scan window length in milliseconds
pub const SCAN_DURATION_MS: u32 = 1_000;

/// Gap between scan windows in milliseconds
pub const SCAN_GAP_MS: u32 = 5_000 - SCAN_DURATION_MS;

/// Low-level radio timing
pub const RADIO_INTERVAL_MS: u16 = 100;
pub const RADIO_WINDOW_MS: u16 = 50;

/// The service identifier the corner beacons advertise
/// (19b10000-e8f2-537e-4f6c-d104768a1214)
pub const BEACON_SERVICE_UUID: ServiceUuid = [
    0x19, 0xb1, 0x00, 0x00, 0xe8, 0xf2, 0x53, 0x7e, 0x4f, 0x6c, 0xd1, 0x04, 0x76, 0x8a, 0x12,
    0x14,
];

/// The BLE scanning process
pub struct ScanProcess<R: BeaconRadio> {
    radio: R,
    on_timer: Timer,
    off_timer: Timer,
    scanning: bool,
    cache: RssiCache,
}

impl<R: BeaconRadio> ScanProcess<R> {
    pub fn new(radio: R) -> Self {
        Self {
            radio,
            on_timer: Timer::new(SCAN_DURATION_MS),
            off_timer: Timer::new(SCAN_GAP_MS),
            scanning: false,
            cache: RssiCache::new(),
        }
    }

    pub fn setup(&mut self, now: u32) {
        self.radio.configure(ScanParams {
            interval_ms: RADIO_INTERVAL_MS,
            window_ms: RADIO_WINDOW_MS,
            active: false,
        });
        // Start in the off phase; the first scan begins after one gap
        self.off_timer.reset(now);
        log::info!("BLE scanner initialized");
    }

    pub fn update(&mut self, now: u32) {
        if !self.scanning {
            if self.off_timer.check_and_reset(now) {
                self.start_scan(now);
            }
        } else if self.on_timer.check_and_reset(now) {
            self.stop_scan(now);
        }
    }

    fn start_scan(&mut self, now: u32) {
        log::debug!("starting BLE scan");
        match self.radio.start_scan() {
            Ok(()) => {
                self.scanning = true;
                self.on_timer.reset(now);
            }
            Err(err) => {
                // Transient radio failure; retry after the next gap
                log::warn!("BLE scan failed to start: {err:?}");
                self.off_timer.reset(now);
            }
        }
    }

    fn stop_scan(&mut self, now: u32) {
        log::debug!("stopping BLE scan");
        if let Err(err) = self.radio.stop_scan() {
            log::warn!("BLE scan failed to stop: {err:?}");
        }
        self.scanning = false;
        let matched = self
            .cache
            .absorb(self.radio.results(), &BEACON_SERVICE_UUID);
        log::debug!("scan cycle complete, {matched} beacon(s) matched");
        self.off_timer.reset(now);
    }

    /// The beacon cache as of the last completed scan cycle
    pub fn beacons(&self) -> &RssiCache {
        &self.cache
    }

    /// True while the radio is actively scanning
    pub fn is_scanning(&self) -> bool {
        self.scanning
    }
}
