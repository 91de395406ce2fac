//! Rewriter
//!
//! Persists a modified document over its original path by writing a sibling
//! temporary file and renaming it into place. A failed write leaves the
//! original untouched and removes the temporary file.

use crate::document::Document;
use crate::error::RewriteError;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Default, Clone)]
pub struct Rewriter;

impl Rewriter {
    pub fn new() -> Self {
        Self
    }

    /// Returns `Ok(false)` without touching the filesystem when the document
    /// is not marked modified.
    pub fn rewrite(&self, document: &Document) -> Result<bool, RewriteError> {
        if !document.is_modified() {
            return Ok(false);
        }

        let path = document.path();
        let tmp_path = temp_path_for(path)?;
        let contents = document.serialize();

        if let Err(source) = write_temp(path, &tmp_path, contents.as_bytes()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(RewriteError::TempWrite {
                path: tmp_path,
                source,
            });
        }
        if let Err(source) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(RewriteError::Replace {
                path: path.to_path_buf(),
                source,
            });
        }

        info!(path = %path.display(), bytes = contents.len(), "rewrote page");
        Ok(true)
    }
}

/// `.<name>.<uuid>.tmp` in the same directory, so the rename stays on one
/// filesystem
fn temp_path_for(path: &Path) -> Result<PathBuf, RewriteError> {
    let parent = path
        .parent()
        .ok_or_else(|| RewriteError::NoParent(path.to_path_buf()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(parent.join(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple())))
}

fn write_temp(original: &Path, tmp_path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(tmp_path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    if let Ok(metadata) = fs::metadata(original) {
        fs::set_permissions(tmp_path, metadata.permissions())?;
    }
    Ok(())
}
