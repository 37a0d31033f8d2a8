//! Scoped persistence of uploaded files.
//!
//! Uploads live in the configured upload directory only for the duration
//! of one request. [`SavedUpload`] owns the file and removes it when
//! dropped, which covers every exit path through the pipeline, including
//! errors and panics.

use crate::config::Config;
use crate::error::{UploadError, UploadResult};
use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]+").unwrap());

/// Monotonic discriminator so same-millisecond uploads of the same file
/// name cannot collide.
static UPLOAD_SEQ: AtomicU64 = AtomicU64::new(0);

/// Reduce a client-supplied filename to a safe basename.
///
/// Path separators are stripped, anything outside `[A-Za-z0-9_.-]` is
/// collapsed to `_`, and leading dots are removed so the result can never
/// name a hidden file or escape the upload directory.
pub fn secure_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = UNSAFE_CHARS.replace_all(base, "_");
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Lowercase extension of a filename, if it has one.
pub fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Reject filenames whose extension is not in the configured allowed set.
pub fn validate_extension(filename: &str, config: &Config) -> UploadResult<()> {
    let ext = extension_of(filename).unwrap_or_default();
    if config.extension_allowed(&ext) {
        Ok(())
    } else {
        Err(UploadError::UnsupportedFileType(ext))
    }
}

/// An upload persisted to disk for the duration of one request.
#[derive(Debug)]
pub struct SavedUpload {
    path: PathBuf,
}

impl SavedUpload {
    /// Write the upload bytes into `dir` under a unique sanitized name.
    /// Creates the directory if absent.
    pub fn persist(dir: &Path, original_name: &str, bytes: &[u8]) -> io::Result<Self> {
        fs::create_dir_all(dir)?;

        let stamp = Local::now().format("%Y%m%d%H%M%S");
        let seq = UPLOAD_SEQ.fetch_add(1, Ordering::Relaxed);
        let unique = format!("{}_{}_{}", stamp, seq, secure_filename(original_name));

        let path = dir.join(unique);
        fs::write(&path, bytes)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SavedUpload {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!("failed to remove upload {}: {}", self.path.display(), e);
            }
        }
    }
}
