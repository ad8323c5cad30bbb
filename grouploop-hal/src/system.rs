//! Device identity and system control

/// Platform identity and lifecycle operations
pub trait SystemControl {
    /// The station MAC address of this device
    fn mac_address(&self) -> [u8; 6];

    /// Restart the device
    ///
    /// On real hardware this does not return. Host implementations record
    /// the request and let the surrounding loop wind down.
    fn restart(&mut self);
}
