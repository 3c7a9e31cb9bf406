//! Configuration system for Orrery.
//!
//! Settings persist to disk as a RON file, can be overridden from the command
//! line via clap, and deserialize forward/backward compatibly because every
//! section falls back to its defaults.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, REDUCED_MOTION_ENV};
pub use config::{CONFIG_FILE_NAME, Config, DebugConfig, MotionConfig, PanelConfig, WindowConfig};
pub use error::ConfigError;
