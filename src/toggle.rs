//! One-shot power toggle for every device kind.

use log::{info, warn};

use crate::bulb::{BulbConnector, BulbLink};
use crate::config::{Device, DeviceKind};
use crate::errors::Error;
use crate::protocol::CommandProtocol;
use crate::transport::Transport;
use crate::types::PowerState;

type Result<T> = std::result::Result<T, Error>;

/// Asks the user whether a device flagged with `confirm` should be toggled.
pub trait Confirm {
    fn confirm(&mut self, device: &Device) -> bool;
}

impl<F: FnMut(&Device) -> bool> Confirm for F {
    fn confirm(&mut self, device: &Device) -> bool {
        self(device)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The device acknowledged the toggle. Text-protocol devices report the
    /// new power state; bulbs only acknowledge.
    Toggled(Option<PowerState>),
    /// The user declined the confirmation; nothing was sent.
    Declined,
}

/// Toggles any registered device with a single command.
///
/// Failures are returned once and never retried.
#[derive(Debug, Clone)]
pub struct ToggleFacade<T, C> {
    transport: T,
    connector: C,
}

impl<T: Transport, C: BulbConnector> ToggleFacade<T, C> {
    pub fn new(transport: T, connector: C) -> Self {
        ToggleFacade {
            transport,
            connector,
        }
    }

    /// Toggle a device that has no open panel. A light whose
    /// [`LightController`](crate::LightController) is open should go through
    /// its `toggle_power` so the panel sees the new power state.
    pub async fn toggle(
        &self,
        device: &Device,
        confirm: &mut impl Confirm,
    ) -> Result<ToggleOutcome> {
        if device.confirm && !confirm.confirm(device) {
            info!("{}: toggle declined", device.name);
            return Ok(ToggleOutcome::Declined);
        }

        let power = match device.kind {
            DeviceKind::Plug | DeviceKind::Switch | DeviceKind::RgbcctLight => {
                let mut protocol = CommandProtocol::new(&device.address, &self.transport);
                Some(protocol.toggle_power().await?)
            }
            DeviceKind::ProprietaryBulb => {
                self.toggle_bulb(&device.address)
                    .await
                    .inspect_err(|err| warn!("{err}"))?;
                None
            }
        };
        info!("{}: toggled", device.name);
        Ok(ToggleOutcome::Toggled(power))
    }

    async fn toggle_bulb(&self, address: &str) -> Result<()> {
        let mut link = self.connector.connect(address).await?;
        link.toggle().await
    }
}
