use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::date::DateParseError;
use crate::odt::MetaParseError;

/// Everything that can go wrong while scanning, ranking or renaming.
///
/// Only [`OdtError::MetadataNotFound`] is recoverable: the file is left out
/// of the listing. Every other kind aborts the command.
#[derive(Debug, Error)]
pub enum OdtError {
    #[error("failed to read directory {}", path.display())]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open {}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The container itself is corrupt or a member could not be decoded.
    #[error("{} is not a readable archive: {cause:#}", path.display())]
    Archive { path: PathBuf, cause: anyhow::Error },

    #[error("{} does not contain meta.xml", path.display())]
    MetadataNotFound { path: PathBuf },

    #[error("malformed meta.xml in {}", path.display())]
    MalformedMetadata {
        path: PathBuf,
        #[source]
        source: MetaParseError,
    },

    #[error("bad creation date in {}", path.display())]
    DateParse {
        path: PathBuf,
        #[source]
        source: DateParseError,
    },

    #[error("{name} already exists in the current directory")]
    NameCollision { name: String },

    #[error("failed to rename {} to {}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OdtError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, OdtError::MetadataNotFound { .. })
    }
}
