//! Writing rendered articles to disk.
//!
//! Files are only touched when their content actually changes, so watch mode
//! and repeated runs don't churn modification times.

use anyhow::{Context, Result};
use colored::Colorize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Created,
    Updated,
    Unchanged,
}

impl FileStatus {
    fn label(self) -> colored::ColoredString {
        match self {
            FileStatus::Created => "Created".green().bold(),
            FileStatus::Updated => "Updated".yellow().bold(),
            FileStatus::Unchanged => "Unchanged".dimmed(),
        }
    }
}

fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

fn file_hash(path: &Path) -> Result<String> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(content_hash(&content))
}

/// Write `content` to `path` unless it already holds exactly those bytes.
///
/// With `dry_run` nothing is written, but the status that would result is
/// still returned.
pub fn write_if_changed(path: &Path, content: &str, dry_run: bool) -> Result<FileStatus> {
    let status = if !path.exists() {
        FileStatus::Created
    } else if file_hash(path)? == content_hash(content.as_bytes()) {
        return Ok(FileStatus::Unchanged);
    } else {
        FileStatus::Updated
    };

    if !dry_run {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(status)
}

/// Send `content` to `out`, or to stdout when no path is given.
pub fn emit(content: &str, out: Option<&Path>, dry_run: bool, quiet: bool) -> Result<()> {
    let Some(path) = out else {
        print!("{content}");
        return Ok(());
    };

    let status = write_if_changed(path, content, dry_run)?;
    if !quiet {
        let suffix = if dry_run && status != FileStatus::Unchanged {
            format!(" {}", "(dry run)".yellow())
        } else {
            String::new()
        };
        println!("{} {}{}", status.label(), path.display(), suffix);
    }
    Ok(())
}
