//! Unified error types for accent-sync.

use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// SettingsError
// ---------------------------------------------------------------------------

/// Errors from the desktop settings backend.
#[derive(Debug)]
pub enum SettingsError {
    /// The settings tool could not be started at all.
    Spawn(std::io::Error),
    /// The settings tool ran but reported a failure (unknown schema/key, ...).
    Command { program: String, message: String },
    /// The notification stream is no longer available.
    Closed,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(e) => write!(f, "spawn: {e}"),
            Self::Command { program, message } => write!(f, "{program}: {message}"),
            Self::Closed => write!(f, "settings stream closed"),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Spawn(e)
    }
}

// ---------------------------------------------------------------------------
// PatchError
// ---------------------------------------------------------------------------

/// Errors while reading or writing the target script.
#[derive(Debug)]
pub enum PatchError {
    Read { path: PathBuf, source: std::io::Error },
    Write { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "read {}: {source}", path.display()),
            Self::Write { path, source } => write!(f, "write {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for PatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// SyncError — top-level
// ---------------------------------------------------------------------------

/// Top-level error type for one-shot commands.
#[derive(Debug)]
pub enum SyncError {
    Config(ConfigError),
    Settings(SettingsError),
    Patch(PatchError),
    /// The watcher could not subscribe to the setting; details are logged.
    NotEnabled,
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Settings(e) => write!(f, "settings: {e}"),
            Self::Patch(e) => write!(f, "patch: {e}"),
            Self::NotEnabled => write!(f, "could not subscribe to the accent setting"),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<ConfigError> for SyncError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SettingsError> for SyncError {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e)
    }
}

impl From<PatchError> for SyncError {
    fn from(e: PatchError) -> Self {
        Self::Patch(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_error_display() {
        let e = SettingsError::Command {
            program: "gsettings".into(),
            message: "No such schema".into(),
        };
        assert_eq!(e.to_string(), "gsettings: No such schema");
        assert_eq!(SettingsError::Closed.to_string(), "settings stream closed");
    }

    #[test]
    fn settings_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no gsettings");
        let s = SettingsError::from(io_err).to_string();
        assert!(s.starts_with("spawn:"), "got: {s}");
    }

    #[test]
    fn patch_error_names_the_path() {
        let e = PatchError::Write {
            path: PathBuf::from("/tmp/prompt.sh"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(e.to_string(), "write /tmp/prompt.sh: denied");
    }

    #[test]
    fn patch_error_keeps_io_cause() {
        use std::error::Error as _;
        let e = PatchError::Read {
            path: PathBuf::from("/tmp/prompt.sh"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let cause = e.source().expect("io cause");
        let io = cause.downcast_ref::<std::io::Error>().expect("io::Error");
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn config_error_from_toml() {
        let toml_err: toml::de::Error = toml::from_str::<toml::Value>("x = [unclosed").unwrap_err();
        let e = ConfigError::from(toml_err);
        assert!(e.to_string().starts_with("toml:"));
    }

    #[test]
    fn sync_error_wraps_layers() {
        let e = SyncError::from(ConfigError::Invalid("empty key".into()));
        assert_eq!(e.to_string(), "config: invalid config: empty key");
        let e = SyncError::from(SettingsError::Closed);
        assert!(e.to_string().starts_with("settings:"), "got: {e}");
    }
}
