//! Default configuration constants.
//!
//! Callers share these constants instead of duplicating literals.

/// Directory name used under the XDG config and data roots.
pub(super) const APP_DIR_NAME: &str = "accent-sync";
/// Config file name looked up locally and under the XDG config root.
pub(super) const CONFIG_FILE_NAME: &str = "accent-sync.toml";
/// GSettings schema holding the accent color.
pub(super) const DEFAULT_SCHEMA: &str = "org.gnome.desktop.interface";
/// GSettings key holding the accent color.
pub(super) const DEFAULT_KEY: &str = "accent-color";
/// Settings CLI used to read and monitor the key.
pub(super) const DEFAULT_GSETTINGS_BIN: &str = "gsettings";
/// Prompt script location relative to the home directory.
pub(super) const DEFAULT_SCRIPT_RELATIVE: &str = ".config/synth-shell/synth-shell-prompt.sh";
/// File-name prefix of the per-color config variants.
pub(super) const DEFAULT_CONFIG_PREFIX: &str = "auto-synthshell-colors-prompt";
/// Stock `user_config_file` value. `$HOME` is expanded by the shell, not by us.
pub(super) const DEFAULT_USER_CONFIG: &str = "$HOME/.config/synth-shell/synth-shell-prompt.config";
/// Stock `sys_config_file` value.
pub(super) const DEFAULT_SYS_CONFIG: &str = "/etc/synth-shell/synth-shell-prompt.config";
/// Stock config file name.
pub(super) const DEFAULT_CONFIG_NAME: &str = "synth-shell-prompt.config";
