//! The orrery desktop host.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags, e.g. `orrery --width 1280 --height 720 --reduced-motion`.

use clap::Parser;
use orrery_app::platform::AppDirs;
use orrery_app::window;
use orrery_config::{CliArgs, Config};
use tracing::{error, info};

fn main() {
    let args = CliArgs::parse();

    let dirs = match AppDirs::resolve(args.config.as_deref()) {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to resolve config directory: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create {}: {e}", dirs.config_dir.display());
    }

    let loaded = Config::load_or_create(&dirs.config_dir);
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    if let Err(e) = loaded {
        error!("Failed to load config: {e}, using defaults");
    }
    info!(config_dir = %dirs.config_dir.display(), "Starting orrery");

    if let Err(e) = window::run(config) {
        error!("{e}");
        std::process::exit(1);
    }
}
