use std::io::Write;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::{parse_display_mode, parse_log_level, BridgeConfig};
use crate::display::platform::DisplayPlatform;
use crate::display::session::SessionController;
use crate::display::types::{DisplayModeDescriptor, DisplayRequest, MIN_TRUE_COLOR_BITS};

/// Display bridge diagnostics
#[derive(Parser, Debug)]
#[command(name = "display-bridge")]
#[command(version)]
#[command(about = "Inspect display modes and probe fullscreen surface creation", long_about = None)]
pub struct Cli {
    /// Log file path (stderr when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub logfile: Option<String>,

    /// Log level (nothing, user, error, warning, info, debug, all)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub loglevel: Option<String>,

    /// Window title
    #[arg(long, value_name = "TITLE", global = true)]
    pub title: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List every display mode with its alpha/depth/stencil combinations
    Modes {
        /// Only show modes with at least this many colour bits
        #[arg(long, value_name = "BITS", default_value_t = MIN_TRUE_COLOR_BITS)]
        min_bpp: u32,
    },
    /// Create a display, report it, then destroy it
    Probe(ProbeArgs),
}

#[derive(Args, Debug, PartialEq, Eq)]
pub struct ProbeArgs {
    /// Display mode (e.g., 800x600x32@60)
    #[arg(short, long, value_name = "WxHxBPP[@HZ]")]
    pub mode: String,

    /// Alpha bits
    #[arg(long, value_name = "BITS", default_value_t = 0)]
    pub alpha: u32,

    /// Depth buffer bits
    #[arg(long, value_name = "BITS", default_value_t = 0)]
    pub depth: u32,

    /// Stencil buffer bits
    #[arg(long, value_name = "BITS", default_value_t = 0)]
    pub stencil: u32,

    /// Switch the display mode and use a borderless window
    #[arg(short, long)]
    pub fullscreen: bool,

    /// How long to keep the display up before destroying it
    #[arg(long, value_name = "MS", default_value_t = 0)]
    pub hold_ms: u64,
}

impl ProbeArgs {
    pub fn to_request(&self) -> Result<DisplayRequest> {
        let mode = parse_display_mode(&self.mode).context("Invalid display mode")?;
        Ok(DisplayRequest {
            width: mode.width,
            height: mode.height,
            bpp: mode.bits_per_pixel,
            refresh_hz: mode.refresh_hz,
            alpha_bits: self.alpha,
            depth_bits: self.depth,
            stencil_bits: self.stencil,
            fullscreen: self.fullscreen,
        })
    }
}

impl Cli {
    /// Merge CLI arguments into the configuration
    pub fn merge_into_config(&self, mut config: BridgeConfig) -> Result<BridgeConfig> {
        if let Some(ref log_file) = self.logfile {
            config.log_file = Some(log_file.clone());
        }
        if let Some(ref level) = self.loglevel {
            config.log_level = parse_log_level(level).context("Invalid log level")?;
        }
        if let Some(ref title) = self.title {
            config.window_title = title.clone();
        }
        Ok(config)
    }
}

fn write_mode(out: &mut impl Write, mode: &DisplayModeDescriptor) -> Result<()> {
    writeln!(
        out,
        "{}x{}x{}@{} alpha {} depth {} stencil {}",
        mode.width,
        mode.height,
        mode.color_bits_per_pixel,
        mode.refresh_hz,
        mode.alpha_bits,
        mode.depth_bits,
        mode.stencil_bits
    )?;
    Ok(())
}

/// Run a subcommand against `controller`, writing the report to `out`.
pub fn execute<P: DisplayPlatform>(
    command: &Command,
    controller: &mut SessionController<P>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Modes { min_bpp } => {
            let modes: Vec<_> = controller
                .list_modes()
                .into_iter()
                .filter(|m| m.color_bits_per_pixel >= *min_bpp)
                .collect();
            for mode in &modes {
                write_mode(out, mode)?;
            }
            writeln!(out, "{} modes", modes.len())?;
        }
        Command::Probe(args) => {
            let request = args.to_request()?;
            let window = controller
                .create_display(&request)
                .context("Display creation failed")?;
            writeln!(out, "window {:#x}", window.0)?;
            if let Some(format) = controller.accepted_format() {
                let d = format.described;
                writeln!(
                    out,
                    "pixel format {} color {} alpha {} depth {} stencil {}",
                    format.id.0, d.color_bits, d.alpha_bits, d.depth_bits, d.stencil_bits
                )?;
            }
            if args.hold_ms > 0 {
                thread::sleep(Duration::from_millis(args.hold_ms));
            }
            controller.destroy_display();
            writeln!(out, "destroyed")?;
        }
    }
    Ok(())
}
