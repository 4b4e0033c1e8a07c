//! Descending ranking of files by an integer metric.

use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};

/// Column width of numeric listings.
pub const METRIC_COLUMN_WIDTH: usize = 15;

/// Column width of the creation date listing (`DD/MM/YYYY` plus ten spaces).
pub const DATE_COLUMN_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub metric: u64,
    pub file_name: String,
}

/// Order files by metric, highest first.
///
/// Files sharing a metric are emitted together, alphabetically, so the
/// output is the same on every run.
pub fn rank(values: &HashMap<String, u64>) -> Vec<RankedEntry> {
    let mut groups: BTreeMap<u64, Vec<&str>> = BTreeMap::new();
    for (name, &metric) in values {
        groups.entry(metric).or_default().push(name);
    }

    let mut ranked = Vec::with_capacity(values.len());
    for (metric, mut names) in groups.into_iter().rev() {
        names.sort_unstable();
        ranked.extend(names.into_iter().map(|name| RankedEntry {
            metric,
            file_name: name.to_string(),
        }));
    }
    ranked
}

/// Write one `<label><padding><file name>` line per entry.
///
/// `render` turns the metric into its display label, which is left-aligned
/// in a column of `width` characters. Labels wider than the column are not
/// truncated.
pub fn write_ranking<W, F>(
    out: &mut W,
    entries: &[RankedEntry],
    width: usize,
    render: F,
) -> io::Result<()>
where
    W: Write,
    F: Fn(u64) -> String,
{
    for entry in entries {
        let label = render(entry.metric);
        writeln!(out, "{label:<width$}{}", entry.file_name)?;
    }
    Ok(())
}
