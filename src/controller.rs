//! Settings panel logic for RGBCCT lights.

use log::{info, warn};

use crate::color;
use crate::command::Command;
use crate::config::ControllerConfig;
use crate::errors::Error;
use crate::history::CommandHistory;
use crate::protocol::CommandProtocol;
use crate::response::Outcome;
use crate::scale::{CtScale, DimmerScale};
use crate::state::{DeviceState, Mode};
use crate::transport::Transport;
use crate::types::{ChannelVector, HsbColor, PowerState};

type Result<T> = std::result::Result<T, Error>;

/// Whether the controller may talk to its device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerStatus {
    Enabled,
    /// The initial state query failed; mutating operations are no-ops until a
    /// [`LightController::refresh`] succeeds.
    Disabled,
}

/// What the settings panel should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub mode: Mode,
    pub power: Option<PowerState>,
    pub dimmer_slider: u8,
    pub ct_slider: u16,
    /// Swatch color; white while no HSB color is set.
    pub color_hex: String,
}

/// Turns panel input into commands for one RGBCCT light.
///
/// The RGB and white LED groups of these lights must never be lit together.
/// Every operation that switches groups therefore zeroes all five channels
/// first and only then asserts the new group, one command after the other.
/// Because every mutating operation takes `&mut self`, no second command can
/// start before the previous one has resolved.
#[derive(Debug)]
pub struct LightController<T> {
    protocol: CommandProtocol<T>,
    dimmer_scale: DimmerScale,
    ct_scale: CtScale,
    config: ControllerConfig,
    mode: Mode,
    status: ControllerStatus,
    dispatch_suppressed: bool,
}

impl<T: Transport> LightController<T> {
    /// Query the device once and derive the mode from its HSB color.
    ///
    /// On failure the controller is returned disabled, together with the error
    /// to show the user.
    pub async fn open(address: &str, transport: T, config: ControllerConfig) -> (Self, Option<Error>) {
        let mut controller = LightController {
            protocol: CommandProtocol::new(address, transport),
            dimmer_scale: config.dimmer_scale(),
            ct_scale: config.ct_scale(),
            config,
            mode: Mode::WhiteCt,
            status: ControllerStatus::Disabled,
            dispatch_suppressed: false,
        };

        let failure = controller.refresh().await.err();
        if failure.is_some() {
            warn!("{address}: light controls disabled");
        }
        (controller, failure)
    }

    pub fn address(&self) -> &str {
        self.protocol.address()
    }

    pub fn status(&self) -> ControllerStatus {
        self.status
    }

    pub fn is_enabled(&self) -> bool {
        self.status == ControllerStatus::Enabled
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> Option<&DeviceState> {
        self.protocol.state()
    }

    pub fn history(&self) -> &CommandHistory {
        self.protocol.history()
    }

    pub fn dimmer_scale(&self) -> DimmerScale {
        self.dimmer_scale
    }

    pub fn ct_scale(&self) -> CtScale {
        self.ct_scale
    }

    pub fn is_dispatch_suppressed(&self) -> bool {
        self.dispatch_suppressed
    }

    /// Panel contents derived from the cached state.
    pub fn view(&self) -> Option<PanelView> {
        let state = self.protocol.state()?;
        let color_hex = match state.hsb_color() {
            Some(hsb) if !hsb.is_unset() => hsb.to_rgb().to_hex(),
            _ => "#ffffff".to_string(),
        };
        Some(PanelView {
            mode: self.mode,
            power: state.power(),
            dimmer_slider: state
                .dimmer()
                .map_or(0, |dimmer| self.dimmer_scale.to_slider(dimmer)),
            ct_slider: state
                .color_temperature()
                .map_or(self.ct_scale.slider_min(), |ct| self.ct_scale.to_slider(ct)),
            color_hex,
        })
    }

    /// Start writing the view back into the widgets.
    ///
    /// Until [`Self::end_view_sync`], slider and mode callbacks are answered
    /// with [`Outcome::Suppressed`] so programmatic widget updates are not
    /// echoed back to the device.
    pub fn begin_view_sync(&mut self) -> Option<PanelView> {
        self.dispatch_suppressed = true;
        self.view()
    }

    pub fn end_view_sync(&mut self) {
        self.dispatch_suppressed = false;
    }

    /// Re-query the full state.
    ///
    /// A disabled controller is enabled again by a successful refresh, and its
    /// mode is derived from the fetched state as on open.
    pub async fn refresh(&mut self) -> Result<()> {
        let mode = self.protocol.query_state().await?.mode();
        if !self.is_enabled() {
            self.mode = mode;
            self.status = ControllerStatus::Enabled;
            info!("{}: controls enabled in {} mode", self.protocol.address(), mode);
        }
        Ok(())
    }

    /// Dimmer slider moved to `slider`.
    pub async fn set_dimmer_slider(&mut self, slider: u8) -> Result<Outcome> {
        if let Some(skipped) = self.gate() {
            return Ok(skipped);
        }
        let dimmer = self.dimmer_scale.to_device(slider);
        if self.cached(DeviceState::dimmer) == Some(dimmer) {
            return Ok(Outcome::Unchanged);
        }
        self.protocol.send(&Command::Dimmer(dimmer)).await?;
        Ok(Outcome::Applied)
    }

    /// Color temperature slider moved to `slider`. Only active in white mode.
    pub async fn set_ct_slider(&mut self, slider: u16) -> Result<Outcome> {
        if let Some(skipped) = self.gate() {
            return Ok(skipped);
        }
        if self.mode != Mode::WhiteCt {
            return Ok(Outcome::Inactive);
        }
        let ct = self.ct_scale.to_device(slider);
        if self.cached(DeviceState::color_temperature) == Some(ct) {
            return Ok(Outcome::Unchanged);
        }
        self.protocol.send(&Command::ColorTemperature(ct)).await?;
        Ok(Outcome::Applied)
    }

    /// The user selected a LED group.
    ///
    /// Switching to RGB only swaps the panel; the channels are reset when a
    /// color is picked. Switching to white resets all channels and then
    /// re-asserts the default dimmer level.
    pub async fn select_mode(&mut self, mode: Mode) -> Result<Outcome> {
        if let Some(skipped) = self.gate() {
            return Ok(skipped);
        }
        if mode == self.mode {
            return Ok(Outcome::Unchanged);
        }

        if mode == Mode::WhiteCt {
            self.protocol.send(&Command::CHANNEL_RESET).await?;
            self.switch_mode(Mode::WhiteCt);
            self.protocol
                .send(&Command::Dimmer(self.config.default_dimmer()))
                .await?;
        } else {
            self.switch_mode(Mode::Rgb);
        }
        Ok(Outcome::Applied)
    }

    /// The user picked `hex` in the color chooser.
    ///
    /// Input that is not a hex color is converted by the fail-closed rules of
    /// [`color::rgb_hex_to_hsv`].
    pub async fn pick_color(&mut self, hex: &str) -> Result<Outcome> {
        let (h, s, v) = color::rgb_hex_to_hsv(hex);
        let hsb = HsbColor::create(h, s, v).unwrap_or(HsbColor::UNSET);
        self.set_color(hsb).await
    }

    /// Reset every channel, then set `hsb`.
    ///
    /// The unset sentinel leaves every channel dark, so the mode is kept.
    pub async fn set_color(&mut self, hsb: HsbColor) -> Result<Outcome> {
        if let Some(skipped) = self.gate() {
            return Ok(skipped);
        }
        self.protocol.send(&Command::CHANNEL_RESET).await?;
        self.protocol.send(&Command::HsbColor(hsb)).await?;
        if !hsb.is_unset() {
            self.switch_mode(Mode::Rgb);
        }
        Ok(Outcome::Applied)
    }

    /// Toggle the relay and keep the acknowledged power state.
    pub async fn toggle_power(&mut self) -> Result<Outcome> {
        if let Some(skipped) = self.gate() {
            return Ok(skipped);
        }
        self.protocol.toggle_power().await?;
        Ok(Outcome::Applied)
    }

    /// Write all five channels.
    ///
    /// The channels are reset first when the device has the other LED group
    /// lit, or when its channels are not known.
    pub async fn set_channels(&mut self, channels: ChannelVector) -> Result<Outcome> {
        if let Some(skipped) = self.gate() {
            return Ok(skipped);
        }
        let target = target_mode(&channels);
        let needs_reset = match (target, self.cached(DeviceState::channels)) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(mode), Some(lit)) => lights_other_group(&lit, mode),
        };
        if needs_reset {
            self.protocol.send(&Command::CHANNEL_RESET).await?;
        }
        self.protocol.send(&Command::Channels(channels)).await?;
        if let Some(mode) = target {
            self.switch_mode(mode);
        }
        Ok(Outcome::Applied)
    }

    fn gate(&self) -> Option<Outcome> {
        if !self.is_enabled() {
            Some(Outcome::Disabled)
        } else if self.dispatch_suppressed {
            Some(Outcome::Suppressed)
        } else {
            None
        }
    }

    fn cached<V>(&self, field: impl Fn(&DeviceState) -> Option<V>) -> Option<V> {
        self.protocol.state().and_then(field)
    }

    fn switch_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            info!("{}: {} -> {} mode", self.protocol.address(), self.mode, mode);
            self.mode = mode;
        }
    }
}

/// True when `lit` drives a LED group other than the one of `mode`.
fn lights_other_group(lit: &[u8; 5], mode: Mode) -> bool {
    let [r, g, b, cold, warm] = *lit;
    match mode {
        Mode::Rgb => cold > 0 || warm > 0,
        Mode::WhiteCt => r > 0 || g > 0 || b > 0,
    }
}

fn target_mode(channels: &ChannelVector) -> Option<Mode> {
    let [r, g, b, cold, warm] = channels.channels();
    if r > 0 || g > 0 || b > 0 {
        Some(Mode::Rgb)
    } else if cold > 0 || warm > 0 {
        Some(Mode::WhiteCt)
    } else {
        None
    }
}
