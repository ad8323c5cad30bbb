//! Configuration JSON document
//!
//! The interactive configuration channel exchanges one JSON object. Every
//! field is optional on the way in: absent fields keep their previous value.
//! Malformed JSON is reported and leaves the configuration untouched.

use heapless::String;
use serde::{Deserialize, Serialize};

/// Maximum length of one string-valued configuration field
pub const MAX_FIELD_LEN: usize = 64;

/// Maximum length of a serialized configuration document
pub const MAX_DOCUMENT_LEN: usize = 1024;

/// A string-valued configuration field
pub type ConfigString = String<MAX_FIELD_LEN>;

/// The full configuration document, as dumped to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(rename = "wifiSSID")]
    pub wifi_ssid: ConfigString,
    #[serde(rename = "wifiPassword")]
    pub wifi_password: ConfigString,
    #[serde(rename = "socketServerURL")]
    pub socket_url: ConfigString,
    #[serde(rename = "LEDPin")]
    pub led_pin: u8,
    #[serde(rename = "motorPin")]
    pub motor_pin: u8,
    #[serde(rename = "deviceNamePrefix")]
    pub device_prefix: ConfigString,
    #[serde(rename = "beaconNE")]
    pub beacon_ne: ConfigString,
    #[serde(rename = "beaconNW")]
    pub beacon_nw: ConfigString,
    #[serde(rename = "beaconSE")]
    pub beacon_se: ConfigString,
    #[serde(rename = "beaconSW")]
    pub beacon_sw: ConfigString,
}

impl ConfigDocument {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String<MAX_DOCUMENT_LEN>, ()> {
        serde_json_core::to_string(self).map_err(|_| ())
    }
}

/// A partial configuration update received from the operator
///
/// Every field is optional; `None` means "keep the current value".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigUpdate {
    #[serde(rename = "wifiSSID")]
    pub wifi_ssid: Option<ConfigString>,
    #[serde(rename = "wifiPassword")]
    pub wifi_password: Option<ConfigString>,
    #[serde(rename = "socketServerURL")]
    pub socket_url: Option<ConfigString>,
    #[serde(rename = "LEDPin")]
    pub led_pin: Option<u8>,
    #[serde(rename = "motorPin")]
    pub motor_pin: Option<u8>,
    #[serde(rename = "deviceNamePrefix")]
    pub device_prefix: Option<ConfigString>,
    #[serde(rename = "beaconNE")]
    pub beacon_ne: Option<ConfigString>,
    #[serde(rename = "beaconNW")]
    pub beacon_nw: Option<ConfigString>,
    #[serde(rename = "beaconSE")]
    pub beacon_se: Option<ConfigString>,
    #[serde(rename = "beaconSW")]
    pub beacon_sw: Option<ConfigString>,
}

impl ConfigUpdate {
    /// Parse an update document from JSON text
    pub fn from_json(json: &str) -> Result<Self, ()> {
        serde_json_core::from_str(json)
            .map(|(update, _rest)| update)
            .map_err(|_| ())
    }
}
