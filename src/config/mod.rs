//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. CLI flags (applied by the binary after loading)
//! 2. Environment variables (`ACCENT_SYNC_SCRIPT`, `ACCENT_SYNC_CONFIG_DIR`,
//!    `ACCENT_SYNC_SCHEMA`, `ACCENT_SYNC_KEY`)
//! 3. TOML file specified via --config CLI flag
//! 4. ./accent-sync.toml in the current directory
//! 5. $XDG_CONFIG_HOME/accent-sync/accent-sync.toml
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;

mod defaults;
mod env;
mod sources;
mod types;

use defaults::{
    APP_DIR_NAME, DEFAULT_CONFIG_NAME, DEFAULT_CONFIG_PREFIX, DEFAULT_GSETTINGS_BIN, DEFAULT_KEY,
    DEFAULT_SCHEMA, DEFAULT_SCRIPT_RELATIVE, DEFAULT_SYS_CONFIG, DEFAULT_USER_CONFIG,
};
use env::apply_env_overrides;
use sources::read_config_text_with_sources;
pub use types::{Config, PlatformDirs, ScriptConfig, SettingsConfig};
use types::FileConfig;

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        &PlatformDirs::current(),
    )
}

fn load_config_from_sources<FRead, FEnv>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    dirs: &PlatformDirs,
) -> Result<Config, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
{
    let (config_text, source) =
        read_config_text_with_sources(path_override, &read_file, dirs.config.as_deref())?;
    debug!(?source, "config source");
    let mut parsed: FileConfig = toml::from_str(&config_text)?;
    apply_env_overrides(&mut parsed, &env_lookup);
    resolve_config(parsed, dirs)
}

fn resolve_config(parsed: FileConfig, dirs: &PlatformDirs) -> Result<Config, ConfigError> {
    let settings = SettingsConfig {
        schema: required(parsed.settings.schema, DEFAULT_SCHEMA, "settings.schema")?,
        key: required(parsed.settings.key, DEFAULT_KEY, "settings.key")?,
        gsettings_bin: required(
            parsed.settings.gsettings_bin,
            DEFAULT_GSETTINGS_BIN,
            "settings.gsettings_bin",
        )?,
    };

    let path = match normalized(parsed.script.path) {
        Some(path) => expand_home(&path, dirs.home.as_deref())?,
        None => dirs
            .home
            .as_ref()
            .map(|home| home.join(DEFAULT_SCRIPT_RELATIVE))
            .ok_or_else(|| {
                ConfigError::Invalid(
                    "unable to resolve home directory; set script.path".to_string(),
                )
            })?,
    };
    let config_dir = match normalized(parsed.script.config_dir) {
        Some(dir) => expand_home(&dir, dirs.home.as_deref())?,
        None => default_config_dir(dirs)?,
    };

    let script = ScriptConfig {
        path,
        config_dir,
        config_prefix: required(
            parsed.script.config_prefix,
            DEFAULT_CONFIG_PREFIX,
            "script.config_prefix",
        )?,
        default_user_config: required(
            parsed.script.default_user_config,
            DEFAULT_USER_CONFIG,
            "script.default_user_config",
        )?,
        default_sys_config: required(
            parsed.script.default_sys_config,
            DEFAULT_SYS_CONFIG,
            "script.default_sys_config",
        )?,
        default_config_name: required(
            parsed.script.default_config_name,
            DEFAULT_CONFIG_NAME,
            "script.default_config_name",
        )?,
    };

    Ok(Config { settings, script })
}

fn default_config_dir(dirs: &PlatformDirs) -> Result<PathBuf, ConfigError> {
    if let Some(data) = &dirs.data {
        return Ok(data.join(APP_DIR_NAME));
    }
    dirs.home
        .as_ref()
        .map(|home| home.join(".local").join("share").join(APP_DIR_NAME))
        .ok_or_else(|| {
            ConfigError::Invalid(
                "unable to resolve data directory; set script.config_dir".to_string(),
            )
        })
}

/// Use `value` if given, else `default`; an explicitly blank value is an error.
fn required(value: Option<String>, default: &str, field: &str) -> Result<String, ConfigError> {
    match value {
        None => Ok(default.to_string()),
        Some(v) => normalized(Some(v))
            .ok_or_else(|| ConfigError::Invalid(format!("{field} must not be empty"))),
    }
}

fn normalized(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Expand a leading `~` or `~/` against the home directory.
pub fn expand_home(raw: &str, home: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let rest = if raw == "~" {
        ""
    } else if let Some(rest) = raw.strip_prefix("~/") {
        rest
    } else {
        return Ok(PathBuf::from(raw));
    };
    let home = home.ok_or_else(|| {
        ConfigError::Invalid(format!("cannot expand `{raw}`: home directory unknown"))
    })?;
    Ok(home.join(rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn dirs() -> PlatformDirs {
        PlatformDirs {
            home: Some(PathBuf::from("/home/ada")),
            config: Some(PathBuf::from("/home/ada/.config")),
            data: Some(PathBuf::from("/home/ada/.local/share")),
        }
    }

    fn load_with(
        path_override: Option<&str>,
        files: &[(&str, &str)],
        env: &[(&str, &str)],
        dirs: &PlatformDirs,
    ) -> Result<Config, ConfigError> {
        let files: HashMap<PathBuf, String> = files
            .iter()
            .map(|(p, t)| (PathBuf::from(p), t.to_string()))
            .collect();
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_config_from_sources(
            path_override,
            |path| {
                files.get(path).cloned().ok_or_else(|| {
                    std::io::Error::new(std::io::ErrorKind::NotFound, "not found")
                })
            },
            |name| env.get(name).cloned(),
            dirs,
        )
    }

    #[test]
    fn built_in_defaults() {
        let config = load_with(None, &[], &[], &dirs()).unwrap();
        assert_eq!(config.settings.schema, "org.gnome.desktop.interface");
        assert_eq!(config.settings.key, "accent-color");
        assert_eq!(config.settings.gsettings_bin, "gsettings");
        assert_eq!(
            config.script.path,
            PathBuf::from("/home/ada/.config/synth-shell/synth-shell-prompt.sh")
        );
        assert_eq!(
            config.script.config_dir,
            PathBuf::from("/home/ada/.local/share/accent-sync")
        );
        assert_eq!(config.script.config_prefix, "auto-synthshell-colors-prompt");
        assert_eq!(
            config.script.default_user_config,
            "$HOME/.config/synth-shell/synth-shell-prompt.config"
        );
        assert_eq!(
            config.script.default_sys_config,
            "/etc/synth-shell/synth-shell-prompt.config"
        );
        assert_eq!(config.script.default_config_name, "synth-shell-prompt.config");
    }

    #[test]
    fn global_file_is_used_when_no_local_file() {
        let config = load_with(
            None,
            &[(
                "/home/ada/.config/accent-sync/accent-sync.toml",
                "[script]\npath = \"~/bin/prompt.sh\"\n",
            )],
            &[],
            &dirs(),
        )
        .unwrap();
        assert_eq!(config.script.path, PathBuf::from("/home/ada/bin/prompt.sh"));
    }

    #[test]
    fn local_file_beats_global_file() {
        let config = load_with(
            None,
            &[
                ("accent-sync.toml", "[settings]\nkey = \"local-key\"\n"),
                (
                    "/home/ada/.config/accent-sync/accent-sync.toml",
                    "[settings]\nkey = \"global-key\"\n",
                ),
            ],
            &[],
            &dirs(),
        )
        .unwrap();
        assert_eq!(config.settings.key, "local-key");
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_with(Some("/nope.toml"), &[], &[], &dirs()).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)), "got: {err}");
    }

    #[test]
    fn env_overrides_file_values() {
        let config = load_with(
            Some("/etc/accent.toml"),
            &[(
                "/etc/accent.toml",
                "[settings]\nschema = \"file.schema\"\n[script]\nconfig_dir = \"/from/file\"\n",
            )],
            &[
                ("ACCENT_SYNC_SCHEMA", "env.schema"),
                ("ACCENT_SYNC_CONFIG_DIR", "/from/env"),
                ("ACCENT_SYNC_KEY", "  "),
            ],
            &dirs(),
        )
        .unwrap();
        assert_eq!(config.settings.schema, "env.schema");
        assert_eq!(config.settings.key, "accent-color");
        assert_eq!(config.script.config_dir, PathBuf::from("/from/env"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = load_with(
            Some("/c.toml"),
            &[("/c.toml", "[script]\ncolour = \"red\"\n")],
            &[],
            &dirs(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("toml:"), "got: {err}");
    }

    #[test]
    fn blank_values_are_invalid() {
        let err = load_with(
            Some("/c.toml"),
            &[("/c.toml", "[script]\nconfig_prefix = \" \"\n")],
            &[],
            &dirs(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid config: script.config_prefix must not be empty"
        );
    }

    #[test]
    fn missing_home_requires_explicit_script_path() {
        let dirs = PlatformDirs::default();
        let err = load_with(None, &[], &[], &dirs).unwrap_err();
        assert!(err.to_string().contains("script.path"), "got: {err}");

        let config = load_with(
            None,
            &[],
            &[
                ("ACCENT_SYNC_SCRIPT", "/srv/prompt.sh"),
                ("ACCENT_SYNC_CONFIG_DIR", "/srv/configs"),
            ],
            &dirs,
        )
        .unwrap();
        assert_eq!(config.script.path, PathBuf::from("/srv/prompt.sh"));
    }

    #[test]
    fn data_dir_falls_back_to_home() {
        let dirs = PlatformDirs {
            data: None,
            ..dirs()
        };
        let config = load_with(None, &[], &[], &dirs).unwrap();
        assert_eq!(
            config.script.config_dir,
            PathBuf::from("/home/ada/.local/share/accent-sync")
        );
    }

    #[test]
    fn expand_home_only_touches_leading_tilde() {
        let home = Path::new("/home/ada");
        assert_eq!(expand_home("~", Some(home)).unwrap(), PathBuf::from("/home/ada"));
        assert_eq!(
            expand_home("/a/~/b", Some(home)).unwrap(),
            PathBuf::from("/a/~/b")
        );
        assert!(expand_home("~/x", None).is_err());
    }

    #[test]
    fn layout_uses_configured_prefix() {
        let config = load_with(None, &[], &[], &dirs()).unwrap();
        let layout = config.script.layout();
        assert_eq!(
            layout.color_config_path(crate::color::AccentColor::Teal),
            "/home/ada/.local/share/accent-sync/auto-synthshell-colors-prompt.teal.config"
        );
    }
}
