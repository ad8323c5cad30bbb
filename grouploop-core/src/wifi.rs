//! WiFi link gate process
//!
//! Governs the underlying wireless link, distinct from the socket
//! connection manager layered above it. The link's state gates whether
//! scanning and publishing are allowed to run at all. Reconnection
//! attempts are capped: once the cap is hit the process parks in Failed
//! and stays there until a credential update resets the counter.

use grouploop_hal::WirelessLink;

use crate::config::Configuration;
use crate::time::Timer;

/// How often the link status is re-checked
pub const CHECK_INTERVAL_MS: u32 = 5_000;

/// Pause between reconnection attempts
pub const RETRY_INTERVAL_MS: u32 = 10_000;

/// Attempt cap before parking in Failed
pub const MAX_ATTEMPTS: u8 = 5;

/// Link state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Connecting,
    Connected,
    Failed,
}

/// The WiFi link process
pub struct WifiProcess<W: WirelessLink> {
    link: W,
    state: LinkState,
    check_timer: Timer,
    retry_timer: Timer,
    attempts: u8,
}

impl<W: WirelessLink> WifiProcess<W> {
    pub fn new(link: W) -> Self {
        Self {
            link,
            state: LinkState::Connecting,
            check_timer: Timer::new(CHECK_INTERVAL_MS),
            retry_timer: Timer::new(RETRY_INTERVAL_MS),
            attempts: 0,
        }
    }

    pub fn setup(&mut self, config: &Configuration, now: u32) {
        if config.wifi_ssid.is_empty() {
            log::warn!("no WiFi SSID configured");
        } else {
            self.link
                .set_credentials(&config.wifi_ssid, &config.wifi_password);
            log::info!("WiFi network configured: {}", config.wifi_ssid);
        }
        self.check_timer.reset(now);
        self.retry_timer.reset(now);
        self.attempt(now);
    }

    pub fn update(&mut self, now: u32) {
        if self.check_timer.check_and_reset(now) {
            self.check_connection(now);
        }

        if self.state == LinkState::Connecting && self.retry_timer.check_and_reset(now) {
            if self.attempts < MAX_ATTEMPTS {
                self.attempt(now);
            } else {
                self.state = LinkState::Failed;
                log::error!("max WiFi reconnection attempts reached, giving up");
            }
        }
    }

    fn check_connection(&mut self, now: u32) {
        let up = self.link.is_connected();
        match (self.state, up) {
            (LinkState::Connected, false) => {
                log::warn!("WiFi connection lost");
                self.state = LinkState::Connecting;
                self.retry_timer.reset(now);
            }
            (LinkState::Connecting | LinkState::Failed, true) => {
                log::info!("WiFi connected");
                self.state = LinkState::Connected;
                self.attempts = 0;
            }
            _ => {}
        }
    }

    fn attempt(&mut self, now: u32) {
        self.attempts = self.attempts.saturating_add(1);
        log::info!(
            "attempting WiFi connection ({}/{})",
            self.attempts,
            MAX_ATTEMPTS
        );
        self.link.begin_connect();
        self.retry_timer.reset(now);
    }

    /// Replace credentials and force a fresh connection round
    ///
    /// This is the only way out of [`LinkState::Failed`].
    pub fn update_credentials(&mut self, ssid: &str, password: &str, now: u32) {
        log::info!("updating WiFi credentials");
        self.link.set_credentials(ssid, password);
        self.link.disconnect();
        self.state = LinkState::Connecting;
        self.attempts = 0;
        self.attempt(now);
    }

    /// True while the link is up (as of the last status check)
    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    pub fn state(&self) -> LinkState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct ScriptedLink {
        up: bool,
        connect_attempts: u32,
    }

    impl WirelessLink for ScriptedLink {
        fn set_credentials(&mut self, _ssid: &str, _password: &str) {}

        fn begin_connect(&mut self) {
            self.connect_attempts += 1;
        }

        fn disconnect(&mut self) {
            self.up = false;
        }

        fn is_connected(&self) -> bool {
            self.up
        }
    }

    fn run_for(wifi: &mut WifiProcess<ScriptedLink>, from_ms: u32, to_ms: u32) {
        let mut now = from_ms;
        while now < to_ms {
            now += 100;
            wifi.update(now);
        }
    }

    #[test]
    fn connects_when_the_link_comes_up() {
        let mut wifi = WifiProcess::new(ScriptedLink::default());
        wifi.setup(&Configuration::default(), 0);
        assert_eq!(wifi.state(), LinkState::Connecting);

        wifi.link.up = true;
        run_for(&mut wifi, 0, CHECK_INTERVAL_MS + 200);
        assert!(wifi.is_connected());
    }

    #[test]
    fn parks_in_failed_after_the_attempt_cap() {
        let mut wifi = WifiProcess::new(ScriptedLink::default());
        wifi.setup(&Configuration::default(), 0);

        // Never comes up: one attempt per retry interval until the cap
        run_for(&mut wifi, 0, RETRY_INTERVAL_MS * (MAX_ATTEMPTS as u32 + 2));
        assert_eq!(wifi.state(), LinkState::Failed);
        assert_eq!(wifi.link.connect_attempts, MAX_ATTEMPTS as u32);

        // Failed is terminal: no further attempts
        let attempts_at_park = wifi.link.connect_attempts;
        run_for(
            &mut wifi,
            RETRY_INTERVAL_MS * (MAX_ATTEMPTS as u32 + 2),
            RETRY_INTERVAL_MS * (MAX_ATTEMPTS as u32 + 6),
        );
        assert_eq!(wifi.link.connect_attempts, attempts_at_park);
    }

    #[test]
    fn credential_update_unparks_failed() {
        let mut wifi = WifiProcess::new(ScriptedLink::default());
        wifi.setup(&Configuration::default(), 0);
        run_for(&mut wifi, 0, RETRY_INTERVAL_MS * (MAX_ATTEMPTS as u32 + 2));
        assert_eq!(wifi.state(), LinkState::Failed);

        let t = RETRY_INTERVAL_MS * (MAX_ATTEMPTS as u32 + 2);
        wifi.update_credentials("newnet", "newpass", t);
        assert_eq!(wifi.state(), LinkState::Connecting);

        wifi.link.up = true;
        run_for(&mut wifi, t, t + CHECK_INTERVAL_MS + 200);
        assert!(wifi.is_connected());
    }

    #[test]
    fn reconnect_counter_resets_on_success() {
        let mut wifi = WifiProcess::new(ScriptedLink::default());
        wifi.setup(&Configuration::default(), 0);

        // Two failed rounds, then the link comes up
        run_for(&mut wifi, 0, RETRY_INTERVAL_MS * 2 + 200);
        wifi.link.up = true;
        run_for(&mut wifi, RETRY_INTERVAL_MS * 2 + 200, RETRY_INTERVAL_MS * 3);
        assert!(wifi.is_connected());

        // Drop again: all five attempts are available once more
        wifi.link.up = false;
        run_for(
            &mut wifi,
            RETRY_INTERVAL_MS * 3,
            RETRY_INTERVAL_MS * (MAX_ATTEMPTS as u32 + 10),
        );
        assert_eq!(wifi.state(), LinkState::Failed);
    }
}
