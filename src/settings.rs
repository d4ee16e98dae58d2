//! Desktop settings access and change subscriptions.
//!
//! [`SettingsBackend`] is the seam between the agent and the settings store.
//! [`GSettings`] drives the `gsettings` tool; [`MemorySettings`] keeps the
//! value in-process and is used by tests and embedders.

use std::process::Stdio;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::SettingsError;

/// Read access plus change notification for string-valued settings.
pub trait SettingsBackend {
    /// Current value of `key`.
    fn get_string(&self, key: &str) -> Result<String, SettingsError>;

    /// Register for change notifications on `key`.
    ///
    /// The returned subscription yields the new value on every change until
    /// it is cancelled or dropped.
    fn subscribe(&self, key: &str) -> Result<Subscription, SettingsError>;
}

/// Live registration returned by [`SettingsBackend::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<String>,
    child: Option<Child>,
    reader: Option<JoinHandle<()>>,
}

impl Subscription {
    fn from_channel(rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            rx,
            child: None,
            reader: None,
        }
    }

    /// Wait for the next changed value. `None` once the source is gone.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Deregister; once buffered values are drained `recv` returns `None`.
    pub fn cancel(&mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.rx.close();
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.start_kill() {
                debug!(error = %e, "settings monitor already exited");
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ---------------------------------------------------------------------------
// gsettings
// ---------------------------------------------------------------------------

/// Settings backend that shells out to the `gsettings` tool.
#[derive(Debug, Clone)]
pub struct GSettings {
    program: String,
    schema: String,
}

impl GSettings {
    pub fn new(program: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            schema: schema.into(),
        }
    }
}

impl SettingsBackend for GSettings {
    fn get_string(&self, key: &str) -> Result<String, SettingsError> {
        let output = std::process::Command::new(&self.program)
            .args(["get", &self.schema, key])
            .stdin(Stdio::null())
            .output()?;
        if !output.status.success() {
            return Err(SettingsError::Command {
                program: self.program.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let raw = String::from_utf8_lossy(&output.stdout);
        Ok(unquote_gvariant_string(raw.trim()))
    }

    /// Spawns `gsettings monitor`; must be called from within a tokio runtime.
    fn subscribe(&self, key: &str) -> Result<Subscription, SettingsError> {
        // Fail early on a missing schema or key instead of handing out a
        // subscription whose monitor exits immediately.
        self.get_string(key)?;

        let mut child = Command::new(&self.program)
            .args(["monitor", &self.schema, key])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;
        let stdout = child.stdout.take().ok_or(SettingsError::Closed)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let key = key.to_string();
        let reader = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => match parse_monitor_line(&line, &key) {
                        Some(value) => {
                            if tx.send(value).is_err() {
                                break;
                            }
                        }
                        None => debug!(%line, "ignoring unrelated monitor output"),
                    },
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "settings monitor read failed");
                        break;
                    }
                }
            }
        });

        Ok(Subscription {
            rx,
            child: Some(child),
            reader: Some(reader),
        })
    }
}

/// Parse a `gsettings monitor` line (`<key>: <value>`) for `key`.
fn parse_monitor_line(line: &str, key: &str) -> Option<String> {
    let value = line.strip_prefix(key)?.strip_prefix(':')?;
    Some(unquote_gvariant_string(value.trim()))
}

/// Strip GVariant text quoting from a string value (`'blue'` -> `blue`).
///
/// Values that are not quoted are returned unchanged.
fn unquote_gvariant_string(raw: &str) -> String {
    let inner = ['\'', '"'].into_iter().find_map(|quote| {
        raw.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
    });
    let Some(inner) = inner else {
        return raw.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryState {
    value: String,
    available: bool,
    subscribers: Vec<mpsc::UnboundedSender<String>>,
}

/// In-process settings store. Clones share state.
#[derive(Debug, Clone)]
pub struct MemorySettings {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySettings {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                value: value.into(),
                available: true,
                subscribers: Vec::new(),
            })),
        }
    }

    /// A store whose every access fails, like a missing schema.
    pub fn unavailable() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }

    /// Change the value and notify live subscribers.
    pub fn set(&self, value: impl Into<String>) {
        let value = value.into();
        let mut state = self.lock();
        state.value = value.clone();
        state
            .subscribers
            .retain(|tx| tx.send(value.clone()).is_ok());
    }

    /// Number of subscriptions that have not been cancelled.
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.lock();
        state.subscribers.retain(|tx| !tx.is_closed());
        state.subscribers.len()
    }

    /// Drop every subscriber sender, ending their streams.
    pub fn close(&self) {
        self.lock().subscribers.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A poisoned lock only means a test panicked mid-update; the data is
        // still a plain string.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_available(&self, key: &str) -> Result<(), SettingsError> {
        if self.lock().available {
            Ok(())
        } else {
            Err(SettingsError::Command {
                program: "memory".to_string(),
                message: format!("no such key `{key}`"),
            })
        }
    }
}

impl SettingsBackend for MemorySettings {
    fn get_string(&self, key: &str) -> Result<String, SettingsError> {
        self.check_available(key)?;
        Ok(self.lock().value.clone())
    }

    fn subscribe(&self, key: &str) -> Result<Subscription, SettingsError> {
        self.check_available(key)?;
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.push(tx);
        Ok(Subscription::from_channel(rx))
    }
}
