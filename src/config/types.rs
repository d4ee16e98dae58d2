//! Configuration data model.
//!
//! Struct definitions only. Loading and precedence live in `config::mod`.

use serde::Deserialize;
use std::path::PathBuf;

use crate::patch::PatchLayout;

/// Top-level runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: SettingsConfig,
    pub script: ScriptConfig,
}

/// Which desktop setting to follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsConfig {
    pub schema: String,
    pub key: String,
    /// Program used to read and monitor the setting.
    pub gsettings_bin: String,
}

/// Which script to patch and what to write into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptConfig {
    pub path: PathBuf,
    /// Directory the per-color config files are expected in.
    pub config_dir: PathBuf,
    pub config_prefix: String,
    pub default_user_config: String,
    pub default_sys_config: String,
    pub default_config_name: String,
}

impl ScriptConfig {
    pub fn layout(&self) -> PatchLayout {
        PatchLayout::new(
            self.config_dir.clone(),
            self.config_prefix.clone(),
            self.default_user_config.clone(),
            self.default_sys_config.clone(),
            self.default_config_name.clone(),
        )
    }
}

/// Platform directories used to fill in path defaults.
#[derive(Debug, Clone, Default)]
pub struct PlatformDirs {
    pub home: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub data: Option<PathBuf>,
}

impl PlatformDirs {
    pub fn current() -> Self {
        Self {
            home: dirs::home_dir(),
            config: dirs::config_dir(),
            data: dirs::data_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileConfig {
    pub(super) settings: FileSettingsConfig,
    pub(super) script: FileScriptConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileSettingsConfig {
    pub(super) schema: Option<String>,
    pub(super) key: Option<String>,
    pub(super) gsettings_bin: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct FileScriptConfig {
    pub(super) path: Option<String>,
    pub(super) config_dir: Option<String>,
    pub(super) config_prefix: Option<String>,
    pub(super) default_user_config: Option<String>,
    pub(super) default_sys_config: Option<String>,
    pub(super) default_config_name: Option<String>,
}
