//! Wireless link abstraction
//!
//! The link is the station-mode WiFi association underneath the socket
//! connection. Association is slow, so attempts are issued as non-blocking
//! requests whose outcome is polled on later ticks.

/// Station-mode wireless link
pub trait WirelessLink {
    /// Replace the stored network credentials
    fn set_credentials(&mut self, ssid: &str, password: &str);

    /// Begin a (re)association attempt; returns immediately
    fn begin_connect(&mut self);

    /// Drop the current association
    fn disconnect(&mut self);

    /// True while the link is associated
    fn is_connected(&self) -> bool;
}
