//! Staged, atomic replacement of generated files.
//!
//! Every output is first written to a unique sibling temp file, synced, and only
//! then renamed over its final path. A downstream build polling the outputs sees
//! either the previous file or the complete new one, never a truncated write.

use crate::error::{RegistryError, RegistryErrorExt};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

const TMP_MARKER: &str = ".drvregtmp.";
const STALE_AFTER: Duration = Duration::from_secs(300);

static TMP_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A fully written temp file waiting to replace `target`.
///
/// Dropping an uncommitted stage removes the temp file.
#[derive(Debug)]
pub struct StagedFile {
    target: PathBuf,
    temp: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Writes `contents` next to `target` without touching `target` itself.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    /// Returns [`RegistryError::Io`] if the temp file cannot be created, written,
    /// or synced. The partial temp file is removed.
    pub fn stage(target: impl Into<PathBuf>, contents: &[u8]) -> Result<Self, RegistryError> {
        let target = target.into();
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create output directory {}", parent.display()))?;
        }

        let staged = Self { temp: unique_tmp_path(&target), target, committed: false };

        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&staged.temp)
            .context(format!("Temp creation failed: {}", staged.temp.display()))?;
        file.write_all(contents).context(format!("Write failed: {}", staged.temp.display()))?;
        file.sync_all().context(format!("Sync failed: {}", staged.temp.display()))?;

        Ok(staged)
    }

    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Renames the temp file over the target.
    ///
    /// # Errors
    /// Returns [`RegistryError::Io`] if the rename fails; the target keeps its
    /// previous contents and the temp file is removed.
    pub fn commit(mut self) -> Result<PathBuf, RegistryError> {
        if let Err(err) = fs::rename(&self.temp, &self.target) {
            if err.kind() != ErrorKind::AlreadyExists {
                return Err(RegistryError::Io {
                    source: err,
                    context: Some(self.swap_context().into()),
                });
            }
            // Platforms without atomic replace refuse to rename over an existing file.
            fs::remove_file(&self.target).context(format!(
                "Failed to replace existing file: {}",
                self.target.display()
            ))?;
            fs::rename(&self.temp, &self.target).context(self.swap_context())?;
        }
        self.committed = true;

        if let Some(parent) = self.target.parent() {
            sync_dir(parent);
        }

        debug!(path = %self.target.display(), "Output replaced atomically");
        Ok(self.target.clone())
    }

    fn swap_context(&self) -> String {
        format!("Atomic swap failed: {} -> {}", self.temp.display(), self.target.display())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(err) = fs::remove_file(&self.temp) {
                if err.kind() != ErrorKind::NotFound {
                    warn!(path = %self.temp.display(), error = %err, "Failed to remove temp file");
                }
            }
        }
    }
}

/// Stages every output first and commits only once all of them are on disk.
///
/// A failure while staging leaves every target untouched.
///
/// # Errors
/// Propagates the first staging or commit failure.
pub fn write_all_atomic<'a, I>(outputs: I) -> Result<Vec<PathBuf>, RegistryError>
where
    I: IntoIterator<Item = (&'a Path, &'a str)>,
{
    let staged = outputs
        .into_iter()
        .map(|(target, contents)| StagedFile::stage(target, contents.as_bytes()))
        .collect::<Result<Vec<_>, _>>()?;

    staged.into_iter().map(StagedFile::commit).collect()
}

/// Removes temp files left next to `target` by an interrupted run.
///
/// Only temps older than a few minutes are touched. Failures are logged, never
/// returned.
pub(crate) fn purge_stale(target: &Path) {
    let (Some(dir), Some(name)) = (target.parent(), target.file_name().and_then(|n| n.to_str()))
    else {
        return;
    };
    let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
    let prefix = format!("{name}{TMP_MARKER}");

    let Ok(entries) = fs::read_dir(dir) else { return };
    let now = SystemTime::now();

    for path in entries.flatten().map(|entry| entry.path()) {
        let is_ours = path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with(&prefix));
        if !is_ours || !is_stale(&path, now) {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "Removed stale temp file"),
            Err(err) => warn!(path = %path.display(), error = %err, "Failed to remove stale temp file"),
        }
    }
}

fn is_stale(path: &Path, now: SystemTime) -> bool {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > STALE_AFTER)
}

fn unique_tmp_path(target: &Path) -> PathBuf {
    let counter = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|n| n.to_str()).unwrap_or("output");
    target.with_file_name(format!("{file_name}{TMP_MARKER}{}.{counter}", std::process::id()))
}

fn sync_dir(path: &Path) {
    #[cfg(unix)]
    match fs::File::open(path).and_then(|dir| dir.sync_all()) {
        Ok(()) => {},
        Err(err) => warn!(path = %path.display(), error = %err, "Directory sync failed"),
    }
    #[cfg(not(unix))]
    let _ = path;
}
