use std::path::PathBuf;

use clap::Parser;
use viewport::{PowerPreference, Rgba};

use crate::config::MIN_WINDOW_SIZE;

#[derive(Parser, Debug)]
#[command(
    name = "texview",
    author,
    version,
    about = "GPU texture viewer with checkerboard backgrounds and channel masking"
)]
pub struct Args {
    /// Image to open at start-up (TGA, PNG, JPG, TIF, BMP or DDS).
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Configuration file; defaults to `<config dir>/texview/config.toml`.
    #[arg(long, value_name = "FILE", env = "TEXVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Initial window size in logical pixels (e.g. `800x600`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<WindowSize>,

    /// Background: `checkerboard`, or a solid `#rrggbb[aa]` colour.
    #[arg(long, value_name = "COLOR", value_parser = parse_background)]
    pub background: Option<BackgroundArg>,

    /// GPU adapter preference: `low` or `high`.
    #[arg(long, value_name = "PREFERENCE", value_parser = parse_power)]
    pub power: Option<PowerPreference>,

    /// Print GPU diagnostics at start-up.
    #[arg(long)]
    pub info: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundArg {
    Checkerboard,
    Solid(Rgba),
}

pub fn parse() -> Args {
    Args::parse()
}

pub fn parse_size(value: &str) -> Result<WindowSize, String> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{trimmed}'; expected WIDTHxHEIGHT"))?;
    let parse_dimension = |raw: &str| -> Result<u32, String> {
        let dimension: u32 = raw
            .trim()
            .parse()
            .map_err(|_| format!("invalid dimension '{raw}' in size '{trimmed}'"))?;
        if dimension < MIN_WINDOW_SIZE {
            return Err(format!(
                "size '{trimmed}' is below the {MIN_WINDOW_SIZE}x{MIN_WINDOW_SIZE} minimum"
            ));
        }
        Ok(dimension)
    };
    Ok(WindowSize {
        width: parse_dimension(width)?,
        height: parse_dimension(height)?,
    })
}

pub fn parse_background(value: &str) -> Result<BackgroundArg, String> {
    let trimmed = value.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "checkerboard" | "checker" | "checkers" => Ok(BackgroundArg::Checkerboard),
        _ => Rgba::from_hex(trimmed).map(BackgroundArg::Solid).ok_or_else(|| {
            format!("invalid background '{trimmed}'; use checkerboard or #rrggbb[aa]")
        }),
    }
}

pub fn parse_power(value: &str) -> Result<PowerPreference, String> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_accepts_either_separator() {
        assert_eq!(
            parse_size("1280x720"),
            Ok(WindowSize {
                width: 1280,
                height: 720
            })
        );
        assert_eq!(
            parse_size(" 64X48 "),
            Ok(WindowSize {
                width: 64,
                height: 48
            })
        );
    }

    #[test]
    fn size_rejects_garbage_and_tiny_windows() {
        assert!(parse_size("1280").is_err());
        assert!(parse_size("wide x tall").is_err());
        let err = parse_size("16x600").expect_err("below minimum");
        assert!(err.contains("32x32"), "{err}");
    }

    #[test]
    fn background_accepts_checkerboard_and_hex() {
        assert_eq!(
            parse_background("Checkerboard"),
            Ok(BackgroundArg::Checkerboard)
        );
        assert_eq!(
            parse_background("#ff000080"),
            Ok(BackgroundArg::Solid(Rgba::new(1.0, 0.0, 0.0, 128.0 / 255.0)))
        );
        assert!(parse_background("plaid").is_err());
    }

    #[test]
    fn args_parse_overrides() {
        let args = Args::try_parse_from([
            "texview",
            "--size",
            "320x240",
            "--background",
            "#102030",
            "--power",
            "high",
            "--info",
            "brick.png",
        ])
        .expect("valid arguments");
        assert_eq!(args.path, Some(PathBuf::from("brick.png")));
        assert_eq!(
            args.size,
            Some(WindowSize {
                width: 320,
                height: 240
            })
        );
        assert!(matches!(args.background, Some(BackgroundArg::Solid(_))));
        assert_eq!(args.power, Some(PowerPreference::High));
        assert!(args.info);
    }
}
