//! Content-based archive detection.
//!
//! A ZIP archive starts with a local file header whose first two bytes are
//! `PK`. Nothing else is validated here; false positives surface later when
//! the Central Directory fails to parse.

use std::io;
use std::path::Path;

use crate::io::{LocalFileReader, ReadAt};

/// Leading bytes of every local file header.
pub const ZIP_MAGIC: &[u8; 2] = b"PK";

/// Check whether a source begins with [`ZIP_MAGIC`].
///
/// Sources shorter than the magic are not archives.
pub fn has_zip_magic<R: ReadAt + ?Sized>(reader: &R) -> io::Result<bool> {
    let mut header = [0u8; 2];
    let mut filled = 0;
    while filled < header.len() {
        match reader.read_at(filled as u64, &mut header[filled..]) {
            Ok(0) => return Ok(false),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(&header == ZIP_MAGIC)
}

/// Classify the file at `path` as a ZIP archive by its first two bytes.
///
/// The file is closed again before returning.
pub fn is_archive(path: &Path) -> io::Result<bool> {
    let reader = LocalFileReader::new(path)?;
    has_zip_magic(&reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_magic_regardless_of_extension() {
        let temp = tempdir().unwrap();
        let plain = temp.path().join("notes");
        std::fs::write(&plain, b"PK\x03\x04rest").unwrap();
        assert!(is_archive(&plain).unwrap());

        let fake = temp.path().join("fake.odt");
        std::fs::write(&fake, b"%PDF-1.7").unwrap();
        assert!(!is_archive(&fake).unwrap());
    }

    #[test]
    fn test_short_files_are_not_archives() {
        assert!(!has_zip_magic(&Vec::<u8>::new()).unwrap());
        assert!(!has_zip_magic(&b"P".to_vec()).unwrap());
        assert!(has_zip_magic(&b"PK".to_vec()).unwrap());
        assert!(!has_zip_magic(&b"pk".to_vec()).unwrap());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp = tempdir().unwrap();
        assert!(is_archive(&temp.path().join("gone")).is_err());
    }
}
