use flate2::Crc;
use flate2::read::DeflateDecoder;
use std::io::Read;

use crate::io::ReadAt;
use anyhow::{Context, Result, bail};

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// Largest member we are willing to inflate into memory.
pub const MAX_MEMBER_SIZE: u64 = 64 * 1024 * 1024;

/// An open archive: the parsed member list plus the source it was read from.
///
/// Dropping the archive drops the reader, which closes any underlying file.
pub struct ZipArchive<R: ReadAt> {
    parser: ZipParser<R>,
    entries: Vec<ZipFileEntry>,
}

impl<R: ReadAt> ZipArchive<R> {
    /// Open an archive by reading its Central Directory.
    pub fn new(reader: R) -> Result<Self> {
        let parser = ZipParser::new(reader);
        let entries = parser.list_files()?;
        Ok(Self { parser, entries })
    }

    pub fn entries(&self) -> &[ZipFileEntry] {
        &self.entries
    }

    /// Find a member whose path inside the archive is exactly `name`.
    pub fn by_name(&self, name: &str) -> Option<&ZipFileEntry> {
        self.entries.iter().find(|e| e.file_name == name)
    }

    /// Read and decompress a member, verifying its size and CRC-32.
    pub fn read(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        if entry.uncompressed_size > MAX_MEMBER_SIZE || entry.compressed_size > MAX_MEMBER_SIZE {
            bail!(
                "{} is too large to read ({} bytes)",
                entry.file_name,
                entry.uncompressed_size
            );
        }

        let data_offset = self.parser.get_data_offset(entry)?;
        let mut raw = vec![0u8; entry.compressed_size as usize];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut raw)
            .with_context(|| format!("Failed to read data for {}", entry.file_name))?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => raw,
            CompressionMethod::Deflate => {
                let mut data = Vec::with_capacity(entry.uncompressed_size as usize);
                // One byte past the declared size is enough to detect a lie.
                DeflateDecoder::new(raw.as_slice())
                    .take(entry.uncompressed_size + 1)
                    .read_to_end(&mut data)
                    .with_context(|| format!("Failed to inflate {}", entry.file_name))?;
                data
            }
            CompressionMethod::Unknown(method) => {
                bail!(
                    "Unsupported compression method {} for {}",
                    method,
                    entry.file_name
                );
            }
        };

        if data.len() as u64 != entry.uncompressed_size {
            bail!(
                "Size mismatch for {}: expected {} bytes, got {}",
                entry.file_name,
                entry.uncompressed_size,
                data.len()
            );
        }

        let mut crc = Crc::new();
        crc.update(&data);
        if crc.sum() != entry.crc32 {
            bail!("CRC mismatch for {}", entry.file_name);
        }

        Ok(data)
    }

    /// Read a member by name, `None` when the archive has no such member.
    pub fn read_by_name(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match self.by_name(name) {
            Some(entry) => self.read(entry).map(Some),
            None => Ok(None),
        }
    }
}
