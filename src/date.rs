//! Creation dates as sortable integer keys.
//!
//! `meta:creation-date` values look like `2023-09-15T10:00:00.123456789`.
//! The date part is compacted to `20230915` so that the regular integer
//! ranking orders documents newest first.

use thiserror::Error;

/// Length of the `YYYY-MM-DD` prefix.
const DATE_PREFIX_LEN: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{value:?} does not start with a YYYY-MM-DD date")]
pub struct DateParseError {
    pub value: String,
}

/// Compact the `YYYY-MM-DD` prefix of `value` into `YYYYMMDD`.
///
/// The separators are dropped without being checked; only the digits have
/// to form a valid number.
pub fn normalize_date(value: &str) -> Result<u32, DateParseError> {
    let err = || DateParseError {
        value: value.to_string(),
    };

    let date = value.get(..DATE_PREFIX_LEN).ok_or_else(err)?;
    let (year, month, day) = match (date.get(..4), date.get(5..7), date.get(8..)) {
        (Some(y), Some(m), Some(d)) => (y, m, d),
        _ => return Err(err()),
    };

    let compact = format!("{year}{month}{day}");
    if !compact.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    compact.parse().map_err(|_| err())
}

/// Render a `YYYYMMDD` key as `DD/MM/YYYY`.
pub fn render_date(key: u64) -> String {
    format!("{:02}/{:02}/{:04}", key % 100, key / 100 % 100, key / 10_000)
}
