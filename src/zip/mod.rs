//! ZIP archive reading.
//!
//! OpenDocument files are ZIP packages. This module reads just enough of the
//! format to list members and pull individual ones into memory:
//!
//! - [`structures`]: on-disk records (EOCD, header signatures, member info)
//! - [`parser`]: locating the Central Directory and member data
//! - [`archive`]: the open-archive handle with member lookup and decompression
//! - [`sniff`]: content-based detection from the leading `PK` bytes
//!
//! STORED and DEFLATE members are supported and checked against their CRC-32.
//! Encryption, ZIP64 and multi-disk archives are rejected.

mod archive;
mod parser;
pub mod sniff;
mod structures;

#[cfg(test)]
pub(crate) mod fixture;

pub use archive::{MAX_MEMBER_SIZE, ZipArchive};
pub use parser::ZipParser;
pub use sniff::{ZIP_MAGIC, has_zip_magic, is_archive};
pub use structures::*;
