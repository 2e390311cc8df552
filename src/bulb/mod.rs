//! Control of the proprietary color bulb family.
//!
//! The bulb is not driven through text commands. Its native operations sit
//! behind the [`BulbLink`] capability, and [`BulbAdapter`] orchestrates them
//! for the settings panel.

use std::future::Future;

use log::{info, warn};
use strum_macros::Display;

use crate::color;
use crate::errors::Error;
use crate::response::Outcome;
use crate::types::{Dimmer, PowerState, Rgb};

mod yeelight;

#[cfg(test)]
pub(crate) mod fake;

pub use yeelight::{YeelightConnector, YeelightLink};

type Result<T> = std::result::Result<T, Error>;

/// Properties fetched from a bulb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulbProperties {
    pub power: PowerState,
    pub brightness: Dimmer,
    pub rgb: Rgb,
}

/// Native operations of a connected bulb.
pub trait BulbLink: Send {
    fn get_properties(&mut self) -> impl Future<Output = Result<BulbProperties>> + Send;

    fn set_brightness(&mut self, brightness: Dimmer) -> impl Future<Output = Result<()>> + Send;

    fn set_rgb(&mut self, rgb: Rgb) -> impl Future<Output = Result<()>> + Send;

    fn toggle(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Opens [`BulbLink`]s by address.
pub trait BulbConnector: Send + Sync {
    type Link: BulbLink;

    fn connect(&self, address: &str) -> impl Future<Output = Result<Self::Link>> + Send;
}

/// Connection state of a [`BulbAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum LinkState {
    /// No fetch has succeeded yet.
    NeverConnected,
    Online,
    /// A link operation failed. Only a successful [`BulbAdapter::refresh`]
    /// brings the adapter back.
    Offline,
}

/// Settings panel logic for one bulb.
///
/// Control operations run only while [`LinkState::Online`]; otherwise they
/// answer [`Outcome::Offline`] without touching the network. There is no
/// reconnect loop.
pub struct BulbAdapter<C: BulbConnector> {
    address: String,
    connector: C,
    link: Option<C::Link>,
    link_state: LinkState,
    properties: Option<BulbProperties>,
}

impl<C: BulbConnector> BulbAdapter<C> {
    pub fn new(address: &str, connector: C) -> Self {
        BulbAdapter {
            address: address.to_string(),
            connector,
            link: None,
            link_state: LinkState::NeverConnected,
            properties: None,
        }
    }

    /// Connect and fetch the properties once.
    pub async fn open(address: &str, connector: C) -> (Self, Option<Error>) {
        let mut adapter = Self::new(address, connector);
        let failure = adapter.refresh().await.err();
        (adapter, failure)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn link_state(&self) -> LinkState {
        self.link_state
    }

    pub fn is_online(&self) -> bool {
        self.link_state == LinkState::Online
    }

    /// Last fetched or applied properties.
    pub fn properties(&self) -> Option<&BulbProperties> {
        self.properties.as_ref()
    }

    /// Swatch color for the panel.
    pub fn color_hex(&self) -> Option<String> {
        self.properties
            .map(|properties| color::rgb_int_to_hex(properties.rgb.packed()))
    }

    /// Re-fetch the properties, connecting first if needed.
    pub async fn refresh(&mut self) -> Result<&BulbProperties> {
        match self.fetch().await {
            Ok(properties) => {
                if self.link_state != LinkState::Online {
                    info!("bulb {}: {} -> online", self.address, self.link_state);
                    self.link_state = LinkState::Online;
                }
                Ok(self.properties.insert(properties))
            }
            Err(err) => Err(self.go_offline(err)),
        }
    }

    pub async fn set_brightness(&mut self, brightness: Dimmer) -> Result<Outcome> {
        let Some(link) = self.online_link() else {
            return Ok(Outcome::Offline);
        };
        if let Err(err) = link.set_brightness(brightness).await {
            return Err(self.go_offline(err));
        }
        if let Some(properties) = self.properties.as_mut() {
            properties.brightness = brightness;
        }
        Ok(Outcome::Applied)
    }

    pub async fn set_rgb(&mut self, rgb: Rgb) -> Result<Outcome> {
        let Some(link) = self.online_link() else {
            return Ok(Outcome::Offline);
        };
        if let Err(err) = link.set_rgb(rgb).await {
            return Err(self.go_offline(err));
        }
        if let Some(properties) = self.properties.as_mut() {
            properties.rgb = rgb;
        }
        Ok(Outcome::Applied)
    }

    pub async fn toggle(&mut self) -> Result<Outcome> {
        let Some(link) = self.online_link() else {
            return Ok(Outcome::Offline);
        };
        if let Err(err) = link.toggle().await {
            return Err(self.go_offline(err));
        }
        if let Some(properties) = self.properties.as_mut() {
            properties.power = PowerState::from(!properties.power.is_on());
        }
        Ok(Outcome::Applied)
    }

    async fn fetch(&mut self) -> Result<BulbProperties> {
        let mut link = match self.link.take() {
            Some(link) => link,
            None => self.connector.connect(&self.address).await?,
        };
        let properties = link.get_properties().await?;
        self.link = Some(link);
        Ok(properties)
    }

    fn online_link(&mut self) -> Option<&mut C::Link> {
        match self.link_state {
            LinkState::Online => self.link.as_mut(),
            LinkState::NeverConnected | LinkState::Offline => None,
        }
    }

    /// Drop the link. A bulb that was never online stays `NeverConnected`.
    fn go_offline(&mut self, err: Error) -> Error {
        warn!("{err}");
        if self.link_state == LinkState::Online {
            info!("bulb {}: online -> offline", self.address);
            self.link_state = LinkState::Offline;
        }
        self.link = None;
        err
    }
}
