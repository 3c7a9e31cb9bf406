//! Command-line argument parsing for Orrery.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Environment variable that forces the reduced-motion preference on.
pub const REDUCED_MOTION_ENV: &str = "ORRERY_REDUCED_MOTION";

/// Orrery command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Animated planet panel")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Background colour (`#rrggbb`, `rgb(r, g, b)`, `black`, ...).
    #[arg(long)]
    pub background_color: Option<String>,

    /// Camera fit padding multiplier.
    #[arg(long)]
    pub fit_padding: Option<f32>,

    /// Maximum device pixel ratio used for rendering.
    #[arg(long)]
    pub pixel_ratio_cap: Option<f64>,

    /// Start with reduced motion (animation frozen).
    #[arg(long, env = REDUCED_MOTION_ENV)]
    pub reduced_motion: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    ///
    /// `--reduced-motion` can only switch the preference on; leaving the flag
    /// off keeps whatever the file says.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref color) = args.background_color {
            self.panel.background_color = color.clone();
        }
        if let Some(padding) = args.fit_padding {
            self.panel.fit_padding = padding;
        }
        if let Some(cap) = args.pixel_ratio_cap {
            self.panel.pixel_ratio_cap = cap;
        }
        if args.reduced_motion {
            self.motion.reduced_motion = true;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            background_color: Some("black".to_string()),
            reduced_motion: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.panel.background_color, "black");
        assert!(config.motion.reduced_motion);
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 600);
        assert!((config.panel.fit_padding - 1.15).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_absent_flag_keeps_file_preference() {
        let mut config = Config::default();
        config.motion.reduced_motion = true;
        config.apply_cli_overrides(&CliArgs::default());
        assert!(config.motion.reduced_motion);
    }

    #[test]
    fn test_parse_from_args() {
        let args = CliArgs::try_parse_from([
            "orrery",
            "--fit-padding",
            "1.3",
            "--pixel-ratio-cap",
            "1.5",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.fit_padding, Some(1.3));
        assert_eq!(args.pixel_ratio_cap, Some(1.5));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.config.is_none());
    }
}
