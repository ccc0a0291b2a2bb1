use anyhow::{Context, Result};

use crate::display::input::DEFAULT_INPUT_VERSION;
use crate::display::types::RawDisplayMode;
use crate::logging::LogLevel;

/// Window class registered for the surface window unless overridden.
pub const DEFAULT_CLASS_NAME: &str = "DISPLAYBRIDGEWINDOW";

/// Title of the surface window unless overridden.
pub const DEFAULT_WINDOW_TITLE: &str = "Display Bridge";

pub const ENV_CLASS: &str = "DISPLAY_BRIDGE_CLASS";
pub const ENV_TITLE: &str = "DISPLAY_BRIDGE_TITLE";
pub const ENV_INPUT_VERSION: &str = "DISPLAY_BRIDGE_INPUT_VERSION";
pub const ENV_LOG_LEVEL: &str = "DISPLAY_BRIDGE_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "DISPLAY_BRIDGE_LOG_FILE";

/// Bridge options that can be set via the environment or the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub window_class_name: String,
    pub window_title: String,
    pub input_version: u32,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            window_class_name: DEFAULT_CLASS_NAME.to_string(),
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            input_version: DEFAULT_INPUT_VERSION,
            log_level: LogLevel::Info,
            log_file: None,
        }
    }
}

/// Load configuration from the process environment
pub fn load_config() -> Result<BridgeConfig> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration, reading overrides through `lookup`.
///
/// Empty values are treated as unset.
pub fn load_config_from<F>(lookup: F) -> Result<BridgeConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut config = BridgeConfig::default();

    if let Some(class) = get(ENV_CLASS) {
        config.window_class_name = class;
    }
    if let Some(title) = get(ENV_TITLE) {
        config.window_title = title;
    }
    if let Some(version) = get(ENV_INPUT_VERSION) {
        config.input_version =
            parse_input_version(&version).with_context(|| format!("Invalid {}", ENV_INPUT_VERSION))?;
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.log_level =
            parse_log_level(&level).with_context(|| format!("Invalid {}", ENV_LOG_LEVEL))?;
    }
    if let Some(file) = get(ENV_LOG_FILE) {
        config.log_file = Some(file);
    }

    Ok(config)
}

/// Parse a display mode string in the format "WIDTHxHEIGHTxBPP[@HZ]"
///
/// A missing refresh rate means "driver default" and is stored as 0.
pub fn parse_display_mode(s: &str) -> Result<RawDisplayMode> {
    let (dims, refresh) = match s.split_once('@') {
        Some((dims, hz)) => (dims, Some(hz)),
        None => (s, None),
    };

    let parts: Vec<&str> = dims.split('x').collect();
    if parts.len() != 3 {
        anyhow::bail!("Display mode must be in WIDTHxHEIGHTxBPP[@HZ] format");
    }

    let width: u32 = parts[0].trim().parse().context("Invalid width value")?;
    let height: u32 = parts[1].trim().parse().context("Invalid height value")?;
    let bpp: u32 = parts[2].trim().parse().context("Invalid bit depth value")?;
    let refresh: u32 = match refresh {
        Some(hz) => hz.trim().parse().context("Invalid refresh rate value")?,
        None => 0,
    };

    if width == 0 || height == 0 || bpp == 0 {
        anyhow::bail!("Display mode values must be positive");
    }

    Ok(RawDisplayMode::new(width, height, bpp, refresh))
}

/// Parse an input interface version, decimal or `0x`-prefixed hex
pub fn parse_input_version(s: &str) -> Result<u32> {
    let s = s.trim();
    let version = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).context("Invalid hex input version")?,
        None => s.parse().context("Invalid input version")?,
    };
    if version == 0 || version > 0xFFFF {
        anyhow::bail!("Input version out of range (0x0001 to 0xFFFF)");
    }
    Ok(version)
}

/// Parse a log level by name (error, warning, ...) or number (0-6)
pub fn parse_log_level(s: &str) -> Result<LogLevel> {
    let s = s.trim();
    if let Ok(n) = s.parse::<i32>() {
        if !(0..=6).contains(&n) {
            anyhow::bail!("Log level out of range (0 to 6)");
        }
        return Ok(LogLevel::from_i32(n));
    }
    match s.to_lowercase().as_str() {
        "nothing" | "off" | "none" => Ok(LogLevel::Nothing),
        "user" => Ok(LogLevel::User),
        "error" => Ok(LogLevel::Error),
        "warning" | "warn" => Ok(LogLevel::Warning),
        "info" => Ok(LogLevel::Info),
        "debug" => Ok(LogLevel::Debug),
        "all" | "trace" => Ok(LogLevel::All),
        _ => anyhow::bail!(
            "Invalid log level: {}. Valid options: nothing, user, error, warning, info, debug, all",
            s
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_display_mode_valid() {
        let mode = parse_display_mode("800x600x32@60").unwrap();
        assert_eq!(mode, RawDisplayMode::new(800, 600, 32, 60));

        let mode = parse_display_mode("1024x768x16").unwrap();
        assert_eq!(mode.refresh_hz, 0);
    }

    #[test]
    fn test_parse_display_mode_invalid_format() {
        assert!(parse_display_mode("800x600").is_err());
        assert!(parse_display_mode("800-600-32").is_err());
        assert!(parse_display_mode("800x600x32@").is_err());
    }

    #[test]
    fn test_parse_display_mode_invalid_values() {
        assert!(parse_display_mode("0x600x32").is_err());
        assert!(parse_display_mode("800x600x0").is_err());
        assert!(parse_display_mode("axbxc").is_err());
    }

    #[test]
    fn test_parse_input_version() {
        assert_eq!(parse_input_version("0x0800").unwrap(), 0x0800);
        assert_eq!(parse_input_version("0X0300").unwrap(), 0x0300);
        assert_eq!(parse_input_version("2048").unwrap(), 0x0800);
        assert!(parse_input_version("0").is_err());
        assert!(parse_input_version("0x10000").is_err());
        assert!(parse_input_version("0xZZ").is_err());
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("debug").unwrap(), LogLevel::Debug);
        assert_eq!(parse_log_level("WARN").unwrap(), LogLevel::Warning);
        assert_eq!(parse_log_level("2").unwrap(), LogLevel::Error);
        assert!(parse_log_level("7").is_err());
        assert!(parse_log_level("loud").is_err());
    }

    #[test]
    fn test_config_default() {
        let config = BridgeConfig::default();
        assert_eq!(config.window_class_name, DEFAULT_CLASS_NAME);
        assert_eq!(config.window_title, "Display Bridge");
        assert_eq!(config.input_version, 0x0800);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_load_config_overrides() {
        let config = load_config_from(env(&[
            (ENV_CLASS, "HOSTWINDOW"),
            (ENV_TITLE, "Host"),
            (ENV_INPUT_VERSION, "0x0700"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_LOG_FILE, "bridge.log"),
        ]))
        .unwrap();
        assert_eq!(config.window_class_name, "HOSTWINDOW");
        assert_eq!(config.window_title, "Host");
        assert_eq!(config.input_version, 0x0700);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_file.as_deref(), Some("bridge.log"));
    }

    #[test]
    fn test_load_config_ignores_empty_values() {
        let config = load_config_from(env(&[(ENV_CLASS, "  "), (ENV_LOG_FILE, "")])).unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_load_config_rejects_bad_values() {
        assert!(load_config_from(env(&[(ENV_INPUT_VERSION, "eight")])).is_err());
        assert!(load_config_from(env(&[(ENV_LOG_LEVEL, "chatty")])).is_err());
    }
}
