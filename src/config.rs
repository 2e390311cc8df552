//! Device registry entries and controller settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::errors::Error;
use crate::scale::{CtScale, DimmerScale};
use crate::types::Dimmer;

type Result<T> = std::result::Result<T, Error>;

/// Kind of device, as named in the registry document.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum DeviceKind {
    #[serde(rename = "tasmota-plug")]
    #[strum(serialize = "tasmota-plug")]
    Plug,
    #[serde(rename = "tasmota-switch")]
    #[strum(serialize = "tasmota-switch")]
    Switch,
    #[serde(rename = "tasmota-light-RGBCCT")]
    #[strum(serialize = "tasmota-light-RGBCCT")]
    RgbcctLight,
    #[serde(rename = "yeelight-bulb")]
    #[strum(serialize = "yeelight-bulb")]
    ProprietaryBulb,
}

impl DeviceKind {
    /// True for kinds driven through the text protocol.
    pub fn speaks_text_protocol(self) -> bool {
        !matches!(self, DeviceKind::ProprietaryBulb)
    }

    /// True for kinds with a settings panel beyond the power toggle.
    pub fn has_light_controls(self) -> bool {
        matches!(self, DeviceKind::RgbcctLight | DeviceKind::ProprietaryBulb)
    }
}

/// One registry entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    #[serde(rename = "ip", alias = "address")]
    pub address: String,
    /// Ask the user before toggling.
    #[serde(default)]
    pub confirm: bool,
}

impl Device {
    pub fn new(name: &str, kind: DeviceKind, address: &str) -> Self {
        Device {
            name: name.to_string(),
            kind,
            address: address.to_string(),
            confirm: false,
        }
    }

    pub fn with_confirmation(mut self) -> Self {
        self.confirm = true;
        self
    }
}

/// The device list handed over by the application bootstrap.
///
/// # Examples
///
/// ```
/// use iot_control::{DeviceKind, DeviceRegistry};
///
/// let registry = DeviceRegistry::from_json(r#"{"iot": {"devices": [
///     {"name": "Desk", "type": "tasmota-plug", "ip": "192.168.1.30", "confirm": true}
/// ]}}"#).unwrap();
/// assert_eq!(registry.devices()[0].kind, DeviceKind::Plug);
/// assert!(registry.find("Desk").unwrap().confirm);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

#[derive(Deserialize)]
struct RegistryDocument {
    iot: RegistryBody,
}

#[derive(Deserialize)]
struct RegistryBody {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    pub fn new(devices: Vec<Device>) -> Self {
        DeviceRegistry { devices }
    }

    /// Parse a `{"iot": {"devices": [...]}}` document.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: RegistryDocument = serde_json::from_str(json).map_err(Error::JsonLoad)?;
        Ok(DeviceRegistry::new(doc.iot.devices))
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn find(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name == name)
    }
}

/// Tunables of the control layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    request_timeout_ms: u64,
    bulb_timeout_ms: u64,
    dimmer_multiplier: u8,
    ct_multiplier: u16,
    ct_margin: u16,
    default_dimmer: u8,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            request_timeout_ms: 4000,
            bulb_timeout_ms: 3000,
            dimmer_multiplier: 10,
            ct_multiplier: 35,
            ct_margin: 1,
            default_dimmer: 50,
        }
    }
}

impl ControllerConfig {
    /// Parse and validate; omitted keys keep their defaults.
    ///
    /// ```
    /// use iot_control::ControllerConfig;
    ///
    /// let config = ControllerConfig::from_json(r#"{"dimmer_multiplier": 20}"#).unwrap();
    /// assert_eq!(config.dimmer_scale().slider_max(), 5);
    /// assert!(ControllerConfig::from_json(r#"{"dimmer_multiplier": 30}"#).is_err());
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ControllerConfig = serde_json::from_str(json).map_err(Error::JsonLoad)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_ms == 0 || self.bulb_timeout_ms == 0 {
            return Err(Error::InvalidConfig("timeouts must be positive".into()));
        }
        if DimmerScale::new(self.dimmer_multiplier).is_none() {
            return Err(Error::InvalidConfig(format!(
                "dimmer multiplier {} does not divide 100",
                self.dimmer_multiplier
            )));
        }
        if CtScale::new(self.ct_multiplier, self.ct_margin).is_none() {
            return Err(Error::InvalidConfig(format!(
                "ct multiplier {} with margin {} leaves no usable slider range",
                self.ct_multiplier, self.ct_margin
            )));
        }
        if Dimmer::create(self.default_dimmer).is_none() {
            return Err(Error::InvalidConfig(format!(
                "default dimmer {} is above 100",
                self.default_dimmer
            )));
        }
        Ok(())
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn bulb_timeout(&self) -> Duration {
        Duration::from_millis(self.bulb_timeout_ms)
    }

    pub fn dimmer_scale(&self) -> DimmerScale {
        DimmerScale::new(self.dimmer_multiplier).unwrap_or_default()
    }

    pub fn ct_scale(&self) -> CtScale {
        CtScale::new(self.ct_multiplier, self.ct_margin).unwrap_or_default()
    }

    /// Dimmer level re-asserted when leaving RGB mode.
    pub fn default_dimmer(&self) -> Dimmer {
        Dimmer::clamped(i64::from(self.default_dimmer))
    }
}
