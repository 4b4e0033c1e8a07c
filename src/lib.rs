//! # odtrank
//!
//! Lists the OpenDocument text files of a directory ranked by the metadata
//! embedded in them: creation date, page, word, character, paragraph, image,
//! table, non-whitespace character or object count.
//!
//! Every candidate file is classified by its leading `PK` bytes rather than
//! its extension, opened as a ZIP archive, and its `meta.xml` member parsed.
//! Files without `meta.xml` are left out of the listing; corrupt archives and
//! malformed metadata abort it.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use odtrank::{Statistic, rank_by_statistic};
//!
//! fn main() -> anyhow::Result<()> {
//!     for entry in rank_by_statistic(Path::new("."), Statistic::Words)? {
//!         println!("{:<15}{}", entry.metric, entry.file_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod date;
pub mod error;
pub mod io;
pub mod odt;
pub mod rank;
pub mod rename;
pub mod scan;
pub mod statistic;
pub mod zip;

pub use cli::{Cli, Command};
pub use error::OdtError;
pub use io::{LocalFileReader, ReadAt};
pub use odt::{DocumentMetadata, StatisticsBlock, extract_metadata};
pub use rank::{RankedEntry, rank};
pub use scan::{rank_by_creation_date, rank_by_statistic};
pub use statistic::Statistic;
pub use zip::{ZipArchive, ZipFileEntry};
