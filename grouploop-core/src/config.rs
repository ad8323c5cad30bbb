//! Device configuration
//!
//! One process-wide configuration value with an explicit load/save
//! lifecycle: read-all-or-defaults at boot, write-all on every mutation.
//! Storage failures are never fatal — the compiled-in defaults keep the
//! device running.

use grouploop_hal::{ConfigStore, StoreError};
use grouploop_protocol::config::{ConfigDocument, ConfigString, ConfigUpdate};

/// Storage namespace for all configuration keys
pub const STORE_NAMESPACE: &str = "config";

/// Storage key names
pub mod keys {
    pub const WIFI_SSID: &str = "wifi_ssid";
    pub const WIFI_PASSWORD: &str = "wifi_pass";
    pub const SOCKET_URL: &str = "socket_url";
    pub const LED_PIN: &str = "led_pin";
    pub const MOTOR_PIN: &str = "motor_pin";
    pub const DEVICE_PREFIX: &str = "device_prefix";
    pub const BEACON_NE: &str = "beacon_ne";
    pub const BEACON_NW: &str = "beacon_nw";
    pub const BEACON_SE: &str = "beacon_se";
    pub const BEACON_SW: &str = "beacon_sw";
}

mod defaults {
    pub const WIFI_SSID: &str = "IOT";
    pub const WIFI_PASSWORD: &str = "!HVAIOT!";
    pub const SOCKET_URL: &str = "ws://feib.nl:5003";
    pub const LED_PIN: u8 = 3;
    pub const MOTOR_PIN: u8 = 2;
    pub const DEVICE_PREFIX: &str = "HitloopScanner";
    pub const BEACON_NE: &str = "64:e8:33:84:43:9a";
    pub const BEACON_NW: &str = "64:e8:33:87:0d:62";
    pub const BEACON_SE: &str = "98:3d:ae:aa:16:8a";
    pub const BEACON_SW: &str = "98:3d:ae:ab:b2:7a";
}

fn field(s: &str) -> ConfigString {
    let mut out = ConfigString::new();
    // Compiled-in defaults all fit MAX_FIELD_LEN
    let _ = out.push_str(s);
    out
}

/// The device configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub wifi_ssid: ConfigString,
    pub wifi_password: ConfigString,
    pub socket_url: ConfigString,
    pub led_pin: u8,
    pub motor_pin: u8,
    pub device_prefix: ConfigString,
    pub beacon_ne: ConfigString,
    pub beacon_nw: ConfigString,
    pub beacon_se: ConfigString,
    pub beacon_sw: ConfigString,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            wifi_ssid: field(defaults::WIFI_SSID),
            wifi_password: field(defaults::WIFI_PASSWORD),
            socket_url: field(defaults::SOCKET_URL),
            led_pin: defaults::LED_PIN,
            motor_pin: defaults::MOTOR_PIN,
            device_prefix: field(defaults::DEVICE_PREFIX),
            beacon_ne: field(defaults::BEACON_NE),
            beacon_nw: field(defaults::BEACON_NW),
            beacon_se: field(defaults::BEACON_SE),
            beacon_sw: field(defaults::BEACON_SW),
        }
    }
}

impl Configuration {
    /// Load from durable storage, falling back to defaults for anything
    /// missing — including the whole store being unopenable.
    pub fn load<S: ConfigStore>(store: &mut S) -> Self {
        let mut config = Self::default();
        if store.open(STORE_NAMESPACE).is_err() {
            log::warn!("config store unavailable, using defaults");
            return config;
        }

        let mut get = |key: &str, slot: &mut ConfigString| {
            if let Ok(value) = store.get_str(key) {
                *slot = value;
            }
        };
        get(keys::WIFI_SSID, &mut config.wifi_ssid);
        get(keys::WIFI_PASSWORD, &mut config.wifi_password);
        get(keys::SOCKET_URL, &mut config.socket_url);
        get(keys::DEVICE_PREFIX, &mut config.device_prefix);
        get(keys::BEACON_NE, &mut config.beacon_ne);
        get(keys::BEACON_NW, &mut config.beacon_nw);
        get(keys::BEACON_SE, &mut config.beacon_se);
        get(keys::BEACON_SW, &mut config.beacon_sw);

        if let Ok(pin) = store.get_u8(keys::LED_PIN) {
            config.led_pin = pin;
        }
        if let Ok(pin) = store.get_u8(keys::MOTOR_PIN) {
            config.motor_pin = pin;
        }
        store.close();

        log::info!("configuration loaded from storage");
        config
    }

    /// Write every field to durable storage
    pub fn save<S: ConfigStore>(&self, store: &mut S) -> Result<(), StoreError> {
        store.open(STORE_NAMESPACE)?;
        let result = self.save_fields(store);
        store.close();
        if result.is_ok() {
            log::info!("configuration saved to storage");
        }
        result
    }

    fn save_fields<S: ConfigStore>(&self, store: &mut S) -> Result<(), StoreError> {
        store.put_str(keys::WIFI_SSID, &self.wifi_ssid)?;
        store.put_str(keys::WIFI_PASSWORD, &self.wifi_password)?;
        store.put_str(keys::SOCKET_URL, &self.socket_url)?;
        store.put_u8(keys::LED_PIN, self.led_pin)?;
        store.put_u8(keys::MOTOR_PIN, self.motor_pin)?;
        store.put_str(keys::DEVICE_PREFIX, &self.device_prefix)?;
        store.put_str(keys::BEACON_NE, &self.beacon_ne)?;
        store.put_str(keys::BEACON_NW, &self.beacon_nw)?;
        store.put_str(keys::BEACON_SE, &self.beacon_se)?;
        store.put_str(keys::BEACON_SW, &self.beacon_sw)?;
        Ok(())
    }

    /// Apply a partial update; absent fields keep their current value
    pub fn apply(&mut self, update: ConfigUpdate) {
        if let Some(v) = update.wifi_ssid {
            self.wifi_ssid = v;
        }
        if let Some(v) = update.wifi_password {
            self.wifi_password = v;
        }
        if let Some(v) = update.socket_url {
            self.socket_url = v;
        }
        if let Some(v) = update.led_pin {
            self.led_pin = v;
        }
        if let Some(v) = update.motor_pin {
            self.motor_pin = v;
        }
        if let Some(v) = update.device_prefix {
            self.device_prefix = v;
        }
        if let Some(v) = update.beacon_ne {
            self.beacon_ne = v;
        }
        if let Some(v) = update.beacon_nw {
            self.beacon_nw = v;
        }
        if let Some(v) = update.beacon_se {
            self.beacon_se = v;
        }
        if let Some(v) = update.beacon_sw {
            self.beacon_sw = v;
        }
    }

    /// The full document form, for dumps and serialization
    pub fn to_document(&self) -> ConfigDocument {
        ConfigDocument {
            wifi_ssid: self.wifi_ssid.clone(),
            wifi_password: self.wifi_password.clone(),
            socket_url: self.socket_url.clone(),
            led_pin: self.led_pin,
            motor_pin: self.motor_pin,
            device_prefix: self.device_prefix.clone(),
            beacon_ne: self.beacon_ne.clone(),
            beacon_nw: self.beacon_nw.clone(),
            beacon_se: self.beacon_se.clone(),
            beacon_sw: self.beacon_sw.clone(),
        }
    }

    /// Log every field (the password included — this device's serial
    /// console doubles as its recovery interface)
    pub fn log_summary(&self) {
        log::info!("=== Configuration ===");
        log::info!("WiFi SSID: {}", self.wifi_ssid);
        log::info!("WiFi password: {}", self.wifi_password);
        log::info!("Socket server URL: {}", self.socket_url);
        log::info!("LED pin: {}", self.led_pin);
        log::info!("Motor pin: {}", self.motor_pin);
        log::info!("Device name prefix: {}", self.device_prefix);
        log::info!("Beacon NE: {}", self.beacon_ne);
        log::info!("Beacon NW: {}", self.beacon_nw);
        log::info!("Beacon SE: {}", self.beacon_se);
        log::info!("Beacon SW: {}", self.beacon_sw);
    }
}
