//! OpenDocument text packages.
//!
//! An `.odt` file is a ZIP archive holding, among others, a `mimetype` member
//! naming the document family and a `meta.xml` member with the title,
//! creation date and document statistics.

mod meta;

pub use meta::{DocumentMetadata, MetaParseError, StatisticsBlock, parse_meta_xml};

use std::path::Path;

use tracing::debug;

use crate::error::OdtError;
use crate::io::{LocalFileReader, ReadAt};
use crate::zip::ZipArchive;

/// Archive member holding document metadata.
pub const META_ENTRY: &str = "meta.xml";

/// Archive member naming the document's media type.
pub const MIMETYPE_ENTRY: &str = "mimetype";

/// Media type of OpenDocument text documents.
pub const TEXT_MIMETYPE: &str = "application/vnd.oasis.opendocument.text";

/// Open `path` for random access reads.
pub fn open_file(path: &Path) -> Result<LocalFileReader, OdtError> {
    LocalFileReader::new(path).map_err(|source| OdtError::FileOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse the archive structure of an already opened file.
pub fn open_archive<R: ReadAt>(reader: R, path: &Path) -> Result<ZipArchive<R>, OdtError> {
    ZipArchive::new(reader).map_err(|cause| OdtError::Archive {
        path: path.to_path_buf(),
        cause,
    })
}

/// Extract and parse `meta.xml` from the document at `path`.
pub fn extract_metadata(path: &Path) -> Result<DocumentMetadata, OdtError> {
    let archive = open_archive(open_file(path)?, path)?;
    metadata_from_archive(&archive, path)
}

/// Extract and parse `meta.xml` from an open archive.
///
/// A missing member is [`OdtError::MetadataNotFound`]; a member that cannot
/// be decompressed is [`OdtError::Archive`].
pub fn metadata_from_archive<R: ReadAt>(
    archive: &ZipArchive<R>,
    path: &Path,
) -> Result<DocumentMetadata, OdtError> {
    let data = archive
        .read_by_name(META_ENTRY)
        .map_err(|cause| OdtError::Archive {
            path: path.to_path_buf(),
            cause,
        })?
        .ok_or_else(|| OdtError::MetadataNotFound {
            path: path.to_path_buf(),
        })?;

    parse_meta_xml(&data).map_err(|source| OdtError::MalformedMetadata {
        path: path.to_path_buf(),
        source,
    })
}

/// Check whether the archive's `mimetype` member is exactly [`TEXT_MIMETYPE`].
pub fn is_text_archive<R: ReadAt>(archive: &ZipArchive<R>, path: &Path) -> Result<bool, OdtError> {
    let mimetype = archive
        .read_by_name(MIMETYPE_ENTRY)
        .map_err(|cause| OdtError::Archive {
            path: path.to_path_buf(),
            cause,
        })?;

    let matches = mimetype.as_deref() == Some(TEXT_MIMETYPE.as_bytes());
    debug!(path = %path.display(), matches, "checked mimetype");
    Ok(matches)
}

/// Check whether the file at `path` is an OpenDocument text package.
///
/// Files that do not start with the ZIP magic are rejected without being
/// parsed.
pub fn is_text_document(path: &Path) -> Result<bool, OdtError> {
    let reader = open_file(path)?;
    let is_zip = crate::zip::has_zip_magic(&reader).map_err(|source| OdtError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    if !is_zip {
        return Ok(false);
    }
    let archive = open_archive(reader, path)?;
    is_text_archive(&archive, path)
}
