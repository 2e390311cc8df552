//! Command-line control panel for the devices of a registry document.
//!
//! Run with: cargo run --example panel_cli -- --registry devices.json --help
//!
//! The registry has the shape
//! `{"iot": {"devices": [{"name": "Lamp", "type": "tasmota-light-RGBCCT", "ip": "192.168.1.32"}]}}`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use iot_control::{
    BulbAdapter, ControllerConfig, Device, DeviceKind, DeviceRegistry, Dimmer, HttpTransport,
    LightController, Mode, Rgb, ToggleFacade, ToggleOutcome, YeelightConnector,
};

#[derive(Parser)]
#[command(name = "panel-cli")]
#[command(about = "Toggle and tune Tasmota and Yeelight devices", long_about = None)]
struct Cli {
    /// Registry document listing the devices
    #[arg(short, long, default_value = "devices.json")]
    registry: PathBuf,

    /// Controller settings as JSON (defaults apply to omitted keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the registered devices
    List,

    /// Toggle a device's power
    Toggle {
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the settings panel of an RGBCCT light or a bulb
    State { name: String },

    /// Move the dimmer slider of an RGBCCT light
    Dimmer { name: String, slider: u8 },

    /// Move the color temperature slider of an RGBCCT light
    Ct { name: String, slider: u16 },

    /// Pick a color (#rrggbb) on an RGBCCT light
    Color { name: String, hex: String },

    /// Switch an RGBCCT light between its LED groups
    Mode { name: String, mode: ModeArg },

    /// Set a bulb's brightness (0-100)
    BulbBrightness {
        name: String,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        level: u8,
    },

    /// Set a bulb's color (#rrggbb)
    BulbColor { name: String, hex: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    White,
    Rgb,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::White => Mode::WhiteCt,
            ModeArg::Rgb => Mode::Rgb,
        }
    }
}

fn find<'a>(registry: &'a DeviceRegistry, name: &str) -> Result<&'a Device, String> {
    registry
        .find(name)
        .ok_or_else(|| format!("no device named {name:?} in the registry"))
}

fn require_kind(device: &Device, kind: DeviceKind) -> Result<(), String> {
    if device.kind == kind {
        Ok(())
    } else {
        Err(format!("{} is a {}, not a {kind}", device.name, device.kind))
    }
}

fn ask(device: &Device) -> bool {
    confirm_with(device, io::stdin().lock(), io::stdout())
}

/// Prompt on `output` and read the answer from `input`. Any I/O failure counts as "no".
fn confirm_with(device: &Device, mut input: impl BufRead, mut output: impl Write) -> bool {
    if write!(output, "Toggle {}? [y/N] ", device.name).is_err() || output.flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    input.read_line(&mut answer).is_ok() && answer.trim().eq_ignore_ascii_case("y")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let registry = DeviceRegistry::from_json(&std::fs::read_to_string(&cli.registry)?)?;
    let config = match &cli.config {
        Some(path) => ControllerConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => ControllerConfig::default(),
    };
    let transport = HttpTransport::new(config.request_timeout())?;
    let connector = YeelightConnector::new(config.bulb_timeout());

    match cli.command {
        Commands::List => {
            for device in registry.devices() {
                let confirm = if device.confirm { "  (confirm)" } else { "" };
                println!("{:20} {:22} {}{confirm}", device.name, device.kind, device.address);
            }
        }

        Commands::Toggle { name, yes } => {
            let device = find(&registry, &name)?;
            let facade = ToggleFacade::new(transport, connector);
            let mut confirm = |device: &Device| yes || ask(device);
            match facade.toggle(device, &mut confirm).await? {
                ToggleOutcome::Toggled(Some(power)) => println!("{name} is now {power}"),
                ToggleOutcome::Toggled(None) => println!("{name} toggled"),
                ToggleOutcome::Declined => println!("Cancelled"),
            }
        }

        Commands::State { name } => {
            let device = find(&registry, &name)?;
            match device.kind {
                DeviceKind::RgbcctLight => {
                    let (mut light, failure) =
                        LightController::open(&device.address, transport, config).await;
                    if let Some(err) = failure {
                        return Err(err.into());
                    }
                    if let Some(view) = light.begin_view_sync() {
                        println!("Mode:        {}", view.mode);
                        if let Some(power) = view.power {
                            println!("Power:       {power}");
                        }
                        println!(
                            "Dimmer:      {}/{}",
                            view.dimmer_slider,
                            light.dimmer_scale().slider_max()
                        );
                        println!(
                            "Temperature: {} ({:?})",
                            view.ct_slider,
                            light.ct_scale().slider_range()
                        );
                        println!("Color:       {}", view.color_hex);
                    }
                    light.end_view_sync();
                }
                DeviceKind::ProprietaryBulb => {
                    let (bulb, failure) = BulbAdapter::open(&device.address, connector).await;
                    if let Some(err) = failure {
                        return Err(err.into());
                    }
                    if let Some(properties) = bulb.properties() {
                        println!("Power:      {}", properties.power);
                        println!("Brightness: {}", properties.brightness.value());
                    }
                    if let Some(hex) = bulb.color_hex() {
                        println!("Color:      {hex}");
                    }
                }
                DeviceKind::Plug | DeviceKind::Switch => {
                    println!("{name} has no settings, use toggle");
                }
            }
        }

        Commands::Dimmer { name, slider } => {
            let device = find(&registry, &name)?;
            require_kind(device, DeviceKind::RgbcctLight)?;
            let mut light = open_light(device, transport, config).await?;
            println!("{:?}", light.set_dimmer_slider(slider).await?);
        }

        Commands::Ct { name, slider } => {
            let device = find(&registry, &name)?;
            require_kind(device, DeviceKind::RgbcctLight)?;
            let mut light = open_light(device, transport, config).await?;
            println!("{:?}", light.set_ct_slider(slider).await?);
        }

        Commands::Color { name, hex } => {
            let device = find(&registry, &name)?;
            require_kind(device, DeviceKind::RgbcctLight)?;
            let mut light = open_light(device, transport, config).await?;
            println!("{:?}", light.pick_color(&hex).await?);
        }

        Commands::Mode { name, mode } => {
            let device = find(&registry, &name)?;
            require_kind(device, DeviceKind::RgbcctLight)?;
            let mut light = open_light(device, transport, config).await?;
            println!("{:?}", light.select_mode(mode.into()).await?);
        }

        Commands::BulbBrightness { name, level } => {
            let device = find(&registry, &name)?;
            require_kind(device, DeviceKind::ProprietaryBulb)?;
            let (mut bulb, failure) = BulbAdapter::open(&device.address, connector).await;
            if let Some(err) = failure {
                return Err(err.into());
            }
            let level = Dimmer::create(level).ok_or("brightness out of range")?;
            println!("{:?}", bulb.set_brightness(level).await?);
        }

        Commands::BulbColor { name, hex } => {
            let device = find(&registry, &name)?;
            require_kind(device, DeviceKind::ProprietaryBulb)?;
            let rgb = Rgb::from_str(&hex)?;
            let (mut bulb, failure) = BulbAdapter::open(&device.address, connector).await;
            if let Some(err) = failure {
                return Err(err.into());
            }
            println!("{:?}", bulb.set_rgb(rgb).await?);
        }
    }

    Ok(())
}

async fn open_light(
    device: &Device,
    transport: HttpTransport,
    config: ControllerConfig,
) -> Result<LightController<HttpTransport>, iot_control::Error> {
    let (light, failure) = LightController::open(&device.address, transport, config).await;
    match failure {
        Some(err) => Err(err),
        None => Ok(light),
    }
}
