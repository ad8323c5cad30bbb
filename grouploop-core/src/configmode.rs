//! Button-triggered configuration mode
//!
//! A falling edge on the boot button (previous-state comparison, no timed
//! debounce) enters an interactive reconfiguration session: the current
//! configuration is dumped, and line-oriented JSON is accepted on the
//! console until a timeout. A successful update is persisted and followed
//! by a delayed restart; `CANCEL` (any case) or the timeout return to
//! normal operation. While a session is pending, the node suppresses every
//! other process.

use grouploop_hal::{ConfigStore, InputPin, SerialConsole, SystemControl};
use grouploop_protocol::ConfigUpdate;
use heapless::String;

use crate::config::Configuration;
use crate::time::Timer;

/// Session timeout in milliseconds
pub const CONFIG_TIMEOUT_MS: u32 = 30_000;

/// Delay between accepting a configuration and restarting
pub const RESTART_DELAY_MS: u32 = 2_000;

/// Maximum accepted line length
pub const MAX_LINE_LEN: usize = 512;

/// Configuration-mode state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigState {
    Normal,
    ConfigurationPending,
}

/// The configuration-mode process
pub struct ConfigModeProcess<Btn: InputPin, Con: SerialConsole> {
    button: Btn,
    console: Con,
    state: ConfigState,
    last_level_high: bool,
    session_timer: Timer,
    line: String<MAX_LINE_LEN>,
    restart_timer: Timer,
    restart_armed: bool,
}

impl<Btn: InputPin, Con: SerialConsole> ConfigModeProcess<Btn, Con> {
    pub fn new(button: Btn, console: Con) -> Self {
        Self {
            button,
            console,
            state: ConfigState::Normal,
            last_level_high: true,
            session_timer: Timer::new(CONFIG_TIMEOUT_MS),
            line: String::new(),
            restart_timer: Timer::new(RESTART_DELAY_MS),
            restart_armed: false,
        }
    }

    pub fn setup(&mut self, _now: u32) {
        // Pull-up wiring: unpressed reads high
        self.last_level_high = self.button.is_high();
        self.state = ConfigState::Normal;
        self.line.clear();
    }

    pub fn update<S: ConfigStore, Y: SystemControl>(
        &mut self,
        config: &mut Configuration,
        store: &mut S,
        system: &mut Y,
        now: u32,
    ) {
        if self.restart_armed && self.restart_timer.has_elapsed(now) {
            log::info!("restarting device");
            self.restart_armed = false;
            system.restart();
            return;
        }

        let level_high = self.button.is_high();
        if self.last_level_high && !level_high {
            self.enter_session(config, now);
        }
        self.last_level_high = level_high;

        if self.state == ConfigState::ConfigurationPending {
            self.run_session(config, store, now);
        }
    }

    /// True while a configuration session is pending; the node must
    /// suppress every other process's update.
    pub fn is_pending(&self) -> bool {
        self.state == ConfigState::ConfigurationPending
    }

    pub fn state(&self) -> ConfigState {
        self.state
    }

    fn enter_session(&mut self, config: &Configuration, now: u32) {
        log::info!("=== CONFIGURATION MODE ===");
        config.log_summary();
        match config.to_document().to_json() {
            Ok(json) => self.console.write_line(&json),
            Err(()) => log::warn!("could not serialize configuration"),
        }
        self.console
            .write_line("send new configuration JSON, or CANCEL to abort");

        self.state = ConfigState::ConfigurationPending;
        self.line.clear();
        self.session_timer.reset(now);
        log::info!(
            "waiting {} s for configuration input",
            CONFIG_TIMEOUT_MS / 1000
        );
    }

    fn run_session<S: ConfigStore>(
        &mut self,
        config: &mut Configuration,
        store: &mut S,
        now: u32,
    ) {
        if self.session_timer.has_elapsed(now) {
            log::info!("configuration timeout, returning to normal operation");
            self.exit_session();
            return;
        }

        while let Some(byte) = self.console.read_byte() {
            if byte == b'\n' || byte == b'\r' {
                if !self.line.is_empty() {
                    self.process_line(config, store, now);
                    // A full update ends the session; stop draining
                    if self.state == ConfigState::Normal || self.restart_armed {
                        self.line.clear();
                        return;
                    }
                }
                self.line.clear();
            } else if self.line.push(byte as char).is_err() {
                log::warn!("configuration line too long, discarding");
                self.line.clear();
            }
        }
    }

    fn process_line<S: ConfigStore>(&mut self, config: &mut Configuration, store: &mut S, now: u32) {
        let text = self.line.trim();

        if text.eq_ignore_ascii_case("CANCEL") {
            log::info!("configuration cancelled");
            self.exit_session();
            return;
        }

        match ConfigUpdate::from_json(text) {
            Ok(update) => {
                config.apply(update);
                if let Err(err) = config.save(store) {
                    log::warn!("configuration save failed: {err:?}");
                }
                log::info!("configuration accepted");
                config.log_summary();

                self.exit_session();
                self.restart_timer.reset(now);
                self.restart_armed = true;
                log::info!("restarting in {} s", RESTART_DELAY_MS / 1000);
            }
            Err(()) => {
                log::warn!("invalid configuration JSON, try again");
                self.console
                    .write_line("invalid JSON; expected {\"wifiSSID\":\"...\",...}");
            }
        }
    }

    fn exit_session(&mut self) {
        self.state = ConfigState::Normal;
        self.line.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grouploop_hal::{StoreError, MAX_VALUE_LEN};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::string::String as StdString;
    use std::vec::Vec;

    struct FakeButton {
        level_high: Rc<RefCell<bool>>,
    }

    impl InputPin for FakeButton {
        fn is_high(&self) -> bool {
            *self.level_high.borrow()
        }
    }

    #[derive(Default)]
    struct FakeConsole {
        inbound: VecDeque<u8>,
        lines: Vec<StdString>,
    }

    impl SerialConsole for FakeConsole {
        fn read_byte(&mut self) -> Option<u8> {
            self.inbound.pop_front()
        }

        fn write_line(&mut self, line: &str) {
            self.lines.push(line.into());
        }
    }

    #[derive(Default)]
    struct NullStore {
        saves: u32,
    }

    impl ConfigStore for NullStore {
        fn open(&mut self, _namespace: &str) -> Result<(), StoreError> {
            Ok(())
        }
        fn get_str(&mut self, _key: &str) -> Result<heapless::String<MAX_VALUE_LEN>, StoreError> {
            Err(StoreError::NotFound)
        }
        fn put_str(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            self.saves += 1;
            Ok(())
        }
        fn get_u8(&mut self, _key: &str) -> Result<u8, StoreError> {
            Err(StoreError::NotFound)
        }
        fn put_u8(&mut self, _key: &str, _value: u8) -> Result<(), StoreError> {
            self.saves += 1;
            Ok(())
        }
        fn close(&mut self) {}
    }

    #[derive(Default)]
    struct FakeSystem {
        restarts: u32,
    }

    impl SystemControl for FakeSystem {
        fn mac_address(&self) -> [u8; 6] {
            [0; 6]
        }
        fn restart(&mut self) {
            self.restarts += 1;
        }
    }

    struct Rig {
        process: ConfigModeProcess<FakeButton, FakeConsole>,
        level: Rc<RefCell<bool>>,
        config: Configuration,
        store: NullStore,
        system: FakeSystem,
    }

    fn rig() -> Rig {
        let level = Rc::new(RefCell::new(true));
        let button = FakeButton {
            level_high: level.clone(),
        };
        let mut process = ConfigModeProcess::new(button, FakeConsole::default());
        process.setup(0);
        Rig {
            process,
            level,
            config: Configuration::default(),
            store: NullStore::default(),
            system: FakeSystem::default(),
        }
    }

    impl Rig {
        fn tick(&mut self, now: u32) {
            self.process
                .update(&mut self.config, &mut self.store, &mut self.system, now);
        }

        fn press(&mut self, now: u32) {
            *self.level.borrow_mut() = false;
            self.tick(now);
            *self.level.borrow_mut() = true;
            self.tick(now + 1);
        }

        fn send_line(&mut self, text: &str) {
            for b in text.bytes() {
                self.process.console.inbound.push_back(b);
            }
            self.process.console.inbound.push_back(b'\n');
        }
    }

    #[test]
    fn falling_edge_enters_pending_state() {
        let mut rig = rig();
        assert_eq!(rig.process.state(), ConfigState::Normal);

        rig.press(10);
        assert!(rig.process.is_pending());
        // The current configuration was dumped as JSON
        assert!(rig.process.console.lines[0].contains("wifiSSID"));
    }

    #[test]
    fn holding_the_button_is_a_single_edge() {
        let mut rig = rig();
        *rig.level.borrow_mut() = false;
        rig.tick(10);
        assert!(rig.process.is_pending());

        // Still held: cancel the session, the held level must not re-enter
        rig.send_line("CANCEL");
        rig.tick(20);
        assert_eq!(rig.process.state(), ConfigState::Normal);
        rig.tick(30);
        assert_eq!(rig.process.state(), ConfigState::Normal);
    }

    #[test]
    fn cancel_returns_to_normal_without_restart() {
        let mut rig = rig();
        rig.press(10);

        rig.send_line("cAnCeL");
        rig.tick(20);
        assert_eq!(rig.process.state(), ConfigState::Normal);

        // No restart, no save
        for now in (20..40_000).step_by(500) {
            rig.tick(now);
        }
        assert_eq!(rig.system.restarts, 0);
        assert_eq!(rig.store.saves, 0);
    }

    #[test]
    fn timeout_reverts_silently() {
        let mut rig = rig();
        rig.press(10);
        assert!(rig.process.is_pending());

        rig.tick(CONFIG_TIMEOUT_MS + 20);
        assert_eq!(rig.process.state(), ConfigState::Normal);
        assert_eq!(rig.system.restarts, 0);
    }

    #[test]
    fn valid_json_persists_and_restarts_after_delay() {
        let mut rig = rig();
        rig.press(10);

        rig.send_line(r#"{"wifiSSID":"newnet","LEDPin":8}"#);
        rig.tick(20);

        assert_eq!(rig.config.wifi_ssid.as_str(), "newnet");
        assert_eq!(rig.config.led_pin, 8);
        // Other fields kept their previous values
        assert_eq!(rig.config.motor_pin, 2);
        assert!(rig.store.saves > 0);
        assert_eq!(rig.system.restarts, 0);

        // The restart fires only after the grace delay
        rig.tick(20 + RESTART_DELAY_MS - 100);
        assert_eq!(rig.system.restarts, 0);
        rig.tick(20 + RESTART_DELAY_MS + 10);
        assert_eq!(rig.system.restarts, 1);
    }

    #[test]
    fn malformed_json_keeps_the_session_open() {
        let mut rig = rig();
        rig.press(10);

        rig.send_line("this is not json");
        rig.tick(20);
        assert!(rig.process.is_pending());
        assert_eq!(rig.config, Configuration::default());

        // A valid document still goes through afterwards
        rig.send_line(r#"{"motorPin":9}"#);
        rig.tick(30);
        assert_eq!(rig.config.motor_pin, 9);
    }
}
