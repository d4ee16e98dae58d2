//! Environment overrides.
//!
//! `ACCENT_SYNC_*` variables sit above the config file and below CLI flags.

use super::types::FileConfig;

pub(super) const ENV_SCRIPT: &str = "ACCENT_SYNC_SCRIPT";
pub(super) const ENV_CONFIG_DIR: &str = "ACCENT_SYNC_CONFIG_DIR";
pub(super) const ENV_SCHEMA: &str = "ACCENT_SYNC_SCHEMA";
pub(super) const ENV_KEY: &str = "ACCENT_SYNC_KEY";

/// Overlay env values onto the parsed file config. Empty values are ignored.
pub(super) fn apply_env_overrides<FEnv>(parsed: &mut FileConfig, env_lookup: &FEnv)
where
    FEnv: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| env_lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(path) = lookup(ENV_SCRIPT) {
        parsed.script.path = Some(path);
    }
    if let Some(dir) = lookup(ENV_CONFIG_DIR) {
        parsed.script.config_dir = Some(dir);
    }
    if let Some(schema) = lookup(ENV_SCHEMA) {
        parsed.settings.schema = Some(schema);
    }
    if let Some(key) = lookup(ENV_KEY) {
        parsed.settings.key = Some(key);
    }
}
