//! Platform directory resolution.
//!
//! Configuration lives in the OS config directory under `orrery/`, logs in
//! its `logs/` subdirectory. `--config` replaces the whole base.

use std::path::{Path, PathBuf};
use std::{fmt, io};

/// Errors that can occur while resolving or creating directories.
#[derive(Debug)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    NoConfigDir,
    /// Directory creation failed.
    Io(io::Error),
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoConfigDir => write!(f, "could not determine OS configuration directory"),
            Self::Io(e) => write!(f, "platform I/O error: {e}"),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::NoConfigDir => None,
        }
    }
}

impl From<io::Error> for PlatformError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

const APP_NAME: &str = "orrery";

/// Where the host reads its configuration and writes its logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl AppDirs {
    /// Use `config_override` when given, else `<os config dir>/orrery`.
    ///
    /// # Errors
    ///
    /// [`PlatformError::NoConfigDir`] when there is no override and the OS
    /// exposes no configuration directory.
    pub fn resolve(config_override: Option<&Path>) -> Result<Self, PlatformError> {
        let config_dir = match config_override {
            Some(dir) => dir.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(PlatformError::NoConfigDir)?
                .join(APP_NAME),
        };
        Ok(Self::from_config_dir(config_dir))
    }

    pub fn from_config_dir(config_dir: PathBuf) -> Self {
        let log_dir = config_dir.join("logs");
        Self {
            config_dir,
            log_dir,
        }
    }

    /// Create both directories on disk.
    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_is_used_verbatim() {
        let dirs = AppDirs::resolve(Some(Path::new("/tmp/orrery-test"))).unwrap();
        assert_eq!(dirs.config_dir, PathBuf::from("/tmp/orrery-test"));
        assert_eq!(dirs.log_dir, PathBuf::from("/tmp/orrery-test/logs"));
    }

    #[test]
    fn test_default_dir_ends_with_app_name() {
        if let Ok(dirs) = AppDirs::resolve(None) {
            assert!(dirs.config_dir.ends_with(APP_NAME));
            assert!(dirs.log_dir.starts_with(&dirs.config_dir));
        }
    }

    #[test]
    fn test_create_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = AppDirs::from_config_dir(tmp.path().join("orrery"));
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
    }

    #[test]
    fn test_error_display_and_source() {
        use std::error::Error;

        let err = PlatformError::NoConfigDir;
        assert_eq!(err.to_string(), "could not determine OS configuration directory");
        assert!(err.source().is_none());

        let err = PlatformError::from(io::Error::other("denied"));
        assert!(err.to_string().contains("denied"));
        assert!(err.source().is_some());
    }
}
