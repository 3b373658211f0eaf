use std::fs;
use std::path::{Path, PathBuf};

use directories_next::BaseDirs;
use serde::Deserialize;
use thiserror::Error;
use viewport::{ChannelMask, PowerPreference, Rgba};

/// Smallest window the viewport is usable at, per side.
pub const MIN_WINDOW_SIZE: u32 = 32;

const APPLICATION: &str = "texview";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub window: WindowConfig,
    pub background: BackgroundConfig,
    pub channels: ChannelConfig,
    pub gpu: GpuConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    #[default]
    Checkerboard,
    Solid,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundConfig {
    pub mode: BackgroundMode,
    /// Colour used by solid mode, `[r, g, b, a]`.
    pub solid: [f32; 4],
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            mode: BackgroundMode::Checkerboard,
            solid: [0.2, 0.2, 0.2, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelConfig {
    pub red: bool,
    pub green: bool,
    pub blue: bool,
    pub alpha: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            red: true,
            green: true,
            blue: true,
            alpha: false,
        }
    }
}

impl ChannelConfig {
    pub fn mask(&self) -> ChannelMask {
        ChannelMask::new(self.red, self.green, self.blue, self.alpha)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuPower {
    #[default]
    Low,
    High,
}

impl From<GpuPower> for PowerPreference {
    fn from(value: GpuPower) -> Self {
        match value {
            GpuPower::Low => PowerPreference::Low,
            GpuPower::High => PowerPreference::High,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GpuConfig {
    pub power: GpuPower,
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `explicit` if given (it must exist), else the per-user file if
    /// present, else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_path() {
                Some(path) if path.is_file() => path,
                _ => {
                    tracing::debug!("no configuration file; using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let input = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&input)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let WindowConfig { width, height } = self.window;
        if width < MIN_WINDOW_SIZE || height < MIN_WINDOW_SIZE {
            return Err(ConfigError::Invalid(format!(
                "window size {width}x{height} is below the {MIN_WINDOW_SIZE}x{MIN_WINDOW_SIZE} minimum"
            )));
        }

        if let Some(component) = self
            .background
            .solid
            .iter()
            .find(|component| !(0.0..=1.0).contains(*component))
        {
            return Err(ConfigError::Invalid(format!(
                "background.solid component {component} must be within [0, 1]"
            )));
        }

        Ok(())
    }

    pub fn solid_color(&self) -> Rgba {
        Rgba::from(self.background.solid)
    }
}

/// `<config dir>/texview/config.toml` for the current user.
pub fn default_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join(APPLICATION).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::from_toml_str("").expect("empty config");
        assert_eq!(config, Config::default());
        assert_eq!(config.window.width, 600);
        assert_eq!(config.channels.mask(), ChannelMask::default());
        assert_eq!(config.background.mode, BackgroundMode::Checkerboard);
    }

    #[test]
    fn parses_every_section() {
        let config = Config::from_toml_str(
            r#"
[window]
width = 1024
height = 768

[background]
mode = "solid"
solid = [0.1, 0.2, 0.3, 1.0]

[channels]
red = false
alpha = true

[gpu]
power = "high"
"#,
        )
        .expect("valid config");

        assert_eq!(config.window.height, 768);
        assert_eq!(config.background.mode, BackgroundMode::Solid);
        assert_eq!(config.solid_color(), Rgba::new(0.1, 0.2, 0.3, 1.0));
        assert_eq!(
            config.channels.mask(),
            ChannelMask::new(false, true, true, true)
        );
        assert_eq!(PowerPreference::from(config.gpu.power), PowerPreference::High);
    }

    #[test]
    fn rejects_out_of_range_colours() {
        let err = Config::from_toml_str("[background]\nsolid = [1.5, 0.0, 0.0, 1.0]\n")
            .expect_err("colour out of range");
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn rejects_tiny_windows() {
        let err = Config::from_toml_str("[window]\nwidth = 16\nheight = 600\n")
            .expect_err("window too small");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_keys_and_modes() {
        assert!(matches!(
            Config::from_toml_str("[background]\nmode = \"plaid\"\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[window]\ndepth = 3\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("texview.toml");
        fs::write(&path, "[gpu]\npower = \"high\"\n").unwrap();

        let config = Config::load(Some(&path)).expect("load config");
        assert_eq!(config.gpu.power, GpuPower::High);
    }

    #[test]
    fn load_reports_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = Config::load(Some(&missing)).expect_err("missing file");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
