//! accent-sync — follow the desktop accent color in the synth-shell prompt.
//!
//! The agent watches a GSettings string key, maps its value onto one of nine
//! known colors and rewrites the prompt script's config-path assignments to
//! point at the matching config variant. Disabling the agent restores the
//! stock paths.
//!
//! # Quick start
//!
//! ```no_run
//! use accent_sync::agent::ColorSyncAgent;
//! use accent_sync::config::load_config;
//! use accent_sync::script::ScriptPatcher;
//! use accent_sync::settings::GSettings;
//!
//! # async fn example() {
//! let config = load_config(None).unwrap();
//! let settings = GSettings::new(&config.settings.gsettings_bin, &config.settings.schema);
//! let patcher = ScriptPatcher::new(config.script.path.clone(), config.script.layout());
//! let mut agent = ColorSyncAgent::new(settings, &config.settings.key, patcher);
//! agent.enable();
//! while agent.next_change().await.is_some() {
//!     agent.on_accent_changed();
//! }
//! agent.disable();
//! # }
//! ```

pub mod agent;
pub mod color;
pub mod config;
pub mod error;
pub mod patch;
pub mod script;
pub mod settings;
