//! Timestamped backups of config files
//!
//! A backup of `dir/provider.yml` is `dir/provider_backup_20250115_093000.yml`.
//! The timestamp is fixed width, so the lexically greatest name is the newest.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::consts::{BACKUP_INFIX, BACKUP_TIMESTAMP_FORMAT};
use crate::error::AppError;

fn stem_and_suffix(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, suffix)
}

/// Name of the backup of `path` taken at `now`
pub(crate) fn backup_path(path: &Path, now: NaiveDateTime) -> PathBuf {
    let (stem, suffix) = stem_and_suffix(path);
    let timestamp = now.format(BACKUP_TIMESTAMP_FORMAT);
    path.with_file_name(format!("{stem}{BACKUP_INFIX}{timestamp}{suffix}"))
}

/// Copy `path` to a timestamped sibling. Returns `None` if `path` does not exist yet.
pub(crate) fn backup_file(path: &Path) -> Result<Option<PathBuf>, AppError> {
    if !path.exists() {
        return Ok(None);
    }

    let target = backup_path(path, Local::now().naive_local());
    fs::copy(path, &target).map_err(|e| AppError::io(&target, e))?;
    tracing::debug!(from = %path.display(), to = %target.display(), "backup written");
    Ok(Some(target))
}

/// All backups of `path`, oldest first
pub(crate) fn list_backups(path: &Path) -> Vec<PathBuf> {
    let (stem, suffix) = stem_and_suffix(path);
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let pattern = format!(
        "{}/{}{}*{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        glob::Pattern::escape(&stem),
        BACKUP_INFIX,
        glob::Pattern::escape(&suffix),
    );

    let mut backups: Vec<PathBuf> = match glob::glob(&pattern) {
        Ok(entries) => entries.flatten().collect(),
        Err(e) => {
            tracing::warn!(%pattern, error = %e, "invalid backup pattern");
            Vec::new()
        }
    };
    backups.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    backups
}

/// Copy the newest backup over `path`. Returns the backup that was restored.
pub(crate) fn restore_latest(path: &Path) -> Result<PathBuf, AppError> {
    let latest = list_backups(path)
        .pop()
        .ok_or_else(|| AppError::NoBackups {
            path: path.to_path_buf(),
        })?;

    fs::copy(&latest, path).map_err(|e| AppError::io(path, e))?;
    tracing::debug!(from = %latest.display(), to = %path.display(), "backup restored");
    Ok(latest)
}
