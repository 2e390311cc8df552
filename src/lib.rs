//! # iot_control
//!
//! Control and state synchronization for a small home automation panel:
//! Tasmota plugs and switches, 5-channel RGBCCT lights running Tasmota, and
//! Yeelight color bulbs.
//!
//! ## Quick Start
//!
//! ```ignore
//! use iot_control::{ControllerConfig, HttpTransport, LightController, Mode};
//!
//! async fn go_blue() -> Result<(), iot_control::Error> {
//!     let config = ControllerConfig::default();
//!     let transport = HttpTransport::new(config.request_timeout())?;
//!     let (mut light, failure) = LightController::open("192.168.1.50", transport, config).await;
//!     if let Some(err) = failure {
//!         return Err(err);
//!     }
//!
//!     // Zeroes all channels, then sets the color.
//!     light.pick_color("#0000ff").await?;
//!     assert_eq!(light.mode(), Mode::Rgb);
//!     Ok(())
//! }
//! ```
//!
//! ## Devices
//!
//! - **Plugs and switches** only toggle, through [`ToggleFacade`].
//! - **RGBCCT lights** carry an RGB LED and two white LEDs that must never be
//!   lit together. [`LightController`] drives them through [`CommandProtocol`]
//!   and always zeroes all five channels before switching LED groups.
//! - **Yeelight bulbs** are driven through the [`BulbLink`] capability by
//!   [`BulbAdapter`].
//!
//! ## Communication
//!
//! Tasmota devices take one command per HTTP request
//! (`GET http://<ip>/cm?cmnd=<command>`) and answer with their state as JSON.
//! Yeelight bulbs speak newline-delimited JSON over TCP port 55443. Every
//! request is bounded by a timeout and never retried; a failed request leaves
//! the cached state as it was.

mod bulb;
pub mod color;
mod command;
mod config;
mod controller;
mod errors;
mod history;
mod protocol;
mod response;
mod scale;
mod state;
mod toggle;
pub mod transport;
mod types;

// Re-export public API
pub use bulb::{
    BulbAdapter, BulbConnector, BulbLink, BulbProperties, LinkState, YeelightConnector,
    YeelightLink,
};
pub use command::Command;
pub use config::{ControllerConfig, Device, DeviceKind, DeviceRegistry};
pub use controller::{ControllerStatus, LightController, PanelView};
pub use errors::Error;
pub use history::{CommandHistory, HistoryEntry, HistorySummary, MessageType};
pub use protocol::CommandProtocol;
pub use response::Outcome;
pub use scale::{CtScale, DimmerScale};
pub use state::{DeviceState, Mode};
pub use toggle::{Confirm, ToggleFacade, ToggleOutcome};
pub use transport::{HttpTransport, Transport, TransportResponse};
pub use types::{ChannelVector, ColorTemperature, Dimmer, HsbColor, PowerState, Rgb};
