//! Adding and removing the `.odt` extension across a directory.
//!
//! Each rename is checked against the directory snapshot and the disk right
//! before it happens. The first collision stops the command; renames done
//! before it are kept.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::OdtError;
use crate::odt;
use crate::scan::{DirectoryEntry, read_entries};

pub const ODT_EXTENSION: &str = ".odt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renamed {
    pub from: String,
    pub to: String,
}

/// Strip `.odt` from every file in `dir` that carries it.
///
/// The file contents are not inspected.
pub fn remove_extensions(dir: &Path) -> Result<Vec<Renamed>, OdtError> {
    let entries = read_entries(dir)?;
    let mut renamed = Vec::new();

    for entry in entries.iter().filter(|e| !e.is_dir) {
        let Some(stem) = entry.name.strip_suffix(ODT_EXTENSION) else {
            continue;
        };
        if stem.is_empty() {
            continue;
        }
        renamed.push(rename_checked(dir, &entries, &entry.name, stem)?);
    }

    info!(dir = %dir.display(), count = renamed.len(), "removed extensions");
    Ok(renamed)
}

/// Append `.odt` to every OpenDocument text file in `dir` that lacks it.
///
/// A file qualifies when it starts with the ZIP magic and its `mimetype`
/// member is exactly the OpenDocument text media type.
pub fn add_extensions(dir: &Path) -> Result<Vec<Renamed>, OdtError> {
    let entries = read_entries(dir)?;
    let mut renamed = Vec::new();

    for entry in entries.iter().filter(|e| !e.is_dir) {
        if entry.name.ends_with(ODT_EXTENSION) {
            continue;
        }
        if !odt::is_text_document(&dir.join(&entry.name))? {
            debug!(file = %entry.name, "not an OpenDocument text file");
            continue;
        }
        let target = format!("{}{}", entry.name, ODT_EXTENSION);
        renamed.push(rename_checked(dir, &entries, &entry.name, &target)?);
    }

    info!(dir = %dir.display(), count = renamed.len(), "added extensions");
    Ok(renamed)
}

fn rename_checked(
    dir: &Path,
    entries: &[DirectoryEntry],
    from: &str,
    to: &str,
) -> Result<Renamed, OdtError> {
    let target = dir.join(to);
    if entries.iter().any(|e| e.name == to) || target.symlink_metadata().is_ok() {
        return Err(OdtError::NameCollision {
            name: to.to_string(),
        });
    }

    let origin = dir.join(from);
    fs::rename(&origin, &target).map_err(|source| OdtError::Rename {
        from: origin,
        to: target,
        source,
    })?;

    debug!(from, to, "renamed");
    Ok(Renamed {
        from: from.to_string(),
        to: to.to_string(),
    })
}
