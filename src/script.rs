//! Read/compare/write boundary around the prompt script.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::color::AccentColor;
use crate::error::PatchError;
use crate::patch::{rewrite, PatchLayout, RewriteTarget};

/// Result of a single apply/restore pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The script does not exist; nothing was created.
    Missing,
    /// The script already matched the target.
    Unchanged,
    /// The script was rewritten (or would have been, under dry-run).
    Updated,
}

/// Applies [`rewrite`] to a script on disk.
#[derive(Debug, Clone)]
pub struct ScriptPatcher {
    path: PathBuf,
    layout: PatchLayout,
    dry_run: bool,
}

impl ScriptPatcher {
    pub fn new(path: PathBuf, layout: PatchLayout) -> Self {
        Self {
            path,
            layout,
            dry_run: false,
        }
    }

    /// Compute outcomes without writing anything.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Point the script at the config variant for `color`.
    pub fn apply(&self, color: AccentColor) -> Result<PatchOutcome, PatchError> {
        let outcome = self.patch(RewriteTarget::Apply(color))?;
        match outcome {
            PatchOutcome::Missing => {
                info!(path = %self.path.display(), "prompt script not found")
            }
            PatchOutcome::Unchanged => {
                info!(path = %self.path.display(), %color, "prompt script already up-to-date for this color")
            }
            PatchOutcome::Updated => info!(
                path = %self.path.display(),
                config = %self.layout.color_config_path(color),
                dry_run = self.dry_run,
                "prompt script updated"
            ),
        }
        Ok(outcome)
    }

    /// Put the stock synth-shell config paths back.
    pub fn restore(&self) -> Result<PatchOutcome, PatchError> {
        let outcome = self.patch(RewriteTarget::Restore)?;
        match outcome {
            PatchOutcome::Missing => {
                info!(path = %self.path.display(), "prompt script not found for restore")
            }
            PatchOutcome::Unchanged => {
                info!(path = %self.path.display(), "prompt script already at defaults")
            }
            PatchOutcome::Updated => info!(
                path = %self.path.display(),
                dry_run = self.dry_run,
                "prompt script restored to defaults"
            ),
        }
        Ok(outcome)
    }

    fn patch(&self, target: RewriteTarget) -> Result<PatchOutcome, PatchError> {
        if !self.path.exists() {
            return Ok(PatchOutcome::Missing);
        }
        let raw = fs::read(&self.path).map_err(|source| PatchError::Read {
            path: self.path.clone(),
            source,
        })?;
        let original = String::from_utf8_lossy(&raw);
        let updated = rewrite(&original, target, &self.layout);
        if updated == original {
            return Ok(PatchOutcome::Unchanged);
        }
        if self.dry_run {
            debug!(path = %self.path.display(), "dry run, skipping write");
        } else {
            write_atomic(&self.path, updated.as_bytes()).map_err(|source| PatchError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        Ok(PatchOutcome::Updated)
    }
}

/// Replace `path` with `contents` via a sibling temp file and rename.
fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.accent-sync-{}", std::process::id()));

    let result = write_then_rename(&tmp, path, contents);
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_then_rename(tmp: &Path, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(contents)?;
    file.sync_all()?;
    // Keep the script's mode (it is usually sourced, sometimes executed).
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp, meta.permissions())?;
    }
    fs::rename(tmp, path)
}
