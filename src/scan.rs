//! Directory scanning: one pass over a directory snapshot that extracts a
//! metric from every document and feeds it to the ranking.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::date::normalize_date;
use crate::error::OdtError;
use crate::odt::{self, DocumentMetadata};
use crate::rank::{RankedEntry, rank};
use crate::statistic::Statistic;
use crate::zip::has_zip_magic;

/// A name in the scanned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Snapshot the entries of `dir`, sorted by name.
///
/// Symlinks are followed when deciding whether an entry is a directory.
/// Names that are not valid UTF-8 are skipped.
pub fn read_entries(dir: &Path) -> Result<Vec<DirectoryEntry>, OdtError> {
    let read_err = |source| OdtError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let Ok(name) = entry.file_name().into_string() else {
            warn!(path = %entry.path().display(), "skipping entry with non UTF-8 name");
            continue;
        };
        entries.push(DirectoryEntry {
            is_dir: entry.path().is_dir(),
            name,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Extract a metric from every document among `entries`.
///
/// Directories and files without the ZIP magic are ignored, as are archives
/// without `meta.xml`. Any other failure, including an error returned by
/// `metric`, aborts the scan.
pub fn collect_metrics<F>(
    dir: &Path,
    entries: &[DirectoryEntry],
    mut metric: F,
) -> Result<HashMap<String, u64>, OdtError>
where
    F: FnMut(&Path, &DocumentMetadata) -> Result<u64, OdtError>,
{
    let mut values = HashMap::new();

    for entry in entries.iter().filter(|e| !e.is_dir) {
        let path = dir.join(&entry.name);

        let reader = odt::open_file(&path)?;
        let is_zip = has_zip_magic(&reader).map_err(|source| OdtError::FileOpen {
            path: path.clone(),
            source,
        })?;
        if !is_zip {
            debug!(file = %entry.name, "not an archive");
            continue;
        }

        let archive = odt::open_archive(reader, &path)?;
        let meta = match odt::metadata_from_archive(&archive, &path) {
            Ok(meta) => meta,
            Err(err) if err.is_recoverable() => {
                debug!(file = %entry.name, "skipping: {err}");
                continue;
            }
            Err(err) => return Err(err),
        };
        drop(archive);

        values.insert(entry.name.clone(), metric(&path, &meta)?);
    }

    info!(dir = %dir.display(), documents = values.len(), "scanned directory");
    Ok(values)
}

/// Rank the documents in `dir` by one of their statistics.
pub fn rank_by_statistic(dir: &Path, statistic: Statistic) -> Result<Vec<RankedEntry>, OdtError> {
    let entries = read_entries(dir)?;
    let values = collect_metrics(dir, &entries, |_, meta| Ok(statistic.select(&meta.statistics)))?;
    Ok(rank(&values))
}

/// Rank the documents in `dir` by creation date, newest first.
///
/// Metrics are `YYYYMMDD` keys; see [`crate::date::render_date`].
pub fn rank_by_creation_date(dir: &Path) -> Result<Vec<RankedEntry>, OdtError> {
    let entries = read_entries(dir)?;
    let values = collect_metrics(dir, &entries, |path, meta| {
        normalize_date(&meta.creation_date)
            .map(u64::from)
            .map_err(|source| OdtError::DateParse {
                path: path.to_path_buf(),
                source,
            })
    })?;
    Ok(rank(&values))
}
