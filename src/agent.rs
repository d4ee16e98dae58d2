//! The accent-color sync agent: listener lifecycle plus the sync handler.
//!
//! Every public method here swallows and logs its own failures. A broken
//! settings store or an unwritable script never takes the process down.

use tracing::{debug, error, info, warn};

use crate::color::{normalize, AccentColor};
use crate::script::{PatchOutcome, ScriptPatcher};
use crate::settings::{SettingsBackend, Subscription};

/// Resources held while the agent is enabled.
#[derive(Debug)]
struct ActiveWatch {
    subscription: Subscription,
}

/// Keeps the prompt script in step with the desktop accent color.
pub struct ColorSyncAgent<S> {
    settings: S,
    key: String,
    patcher: ScriptPatcher,
    active: Option<ActiveWatch>,
}

impl<S: SettingsBackend> ColorSyncAgent<S> {
    pub fn new(settings: S, key: impl Into<String>, patcher: ScriptPatcher) -> Self {
        Self {
            settings,
            key: key.into(),
            patcher,
            active: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.active.is_some()
    }

    pub fn patcher(&self) -> &ScriptPatcher {
        &self.patcher
    }

    /// Subscribe to accent changes and sync once immediately.
    ///
    /// Calling this while already enabled does nothing. If the settings store
    /// is unavailable the agent stays disabled and the script is untouched.
    pub fn enable(&mut self) {
        if self.is_enabled() {
            debug!("already enabled");
            return;
        }
        match self.settings.subscribe(&self.key) {
            Ok(subscription) => {
                self.active = Some(ActiveWatch { subscription });
                self.on_accent_changed();
                info!(key = %self.key, "enabled");
            }
            Err(e) => error!(key = %self.key, error = %e, "enable error"),
        }
    }

    /// Wait for the next change notification.
    ///
    /// Returns `None` when disabled or once the settings stream has ended.
    pub async fn next_change(&mut self) -> Option<String> {
        let active = self.active.as_mut()?;
        active.subscription.recv().await
    }

    /// Read the current accent value and bring the script in line with it.
    pub fn on_accent_changed(&mut self) -> Option<AccentColor> {
        let value = match self.settings.get_string(&self.key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %self.key, error = %e, "accent change handler error");
                return None;
            }
        };
        let color = normalize(Some(&value));
        debug!(%value, %color, "accent color resolved");
        self.sync_to(color);
        Some(color)
    }

    /// Point the script at `color`, logging rather than returning failures.
    pub fn sync_to(&self, color: AccentColor) -> Option<PatchOutcome> {
        match self.patcher.apply(color) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!(error = %e, "error updating prompt script");
                None
            }
        }
    }

    /// Deregister the listener and restore the stock config paths.
    ///
    /// The restore runs even if [`enable`](Self::enable) never succeeded.
    pub fn disable(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.subscription.cancel();
        }
        match self.patcher.restore() {
            Ok(_) => info!("disabled and restored defaults"),
            Err(e) => error!(error = %e, "error restoring prompt script"),
        }
    }

    /// Deregister the listener but leave the script pointing at the current color.
    pub fn detach(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.subscription.cancel();
            info!("disabled, prompt script left as is");
        }
    }
}
