//! Main entry point for the odtrank CLI application.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use odtrank::date::render_date;
use odtrank::rank::{DATE_COLUMN_WIDTH, METRIC_COLUMN_WIDTH, RankedEntry, write_ranking};
use odtrank::{Cli, Command, Statistic, rename, scan};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Command::Rmex => {
            rename::remove_extensions(&cli.dir)?;
        }
        Command::Adex => {
            rename::add_extensions(&cli.dir)?;
        }
        Command::Lsdc => {
            let ranked = scan::rank_by_creation_date(&cli.dir)?;
            print_ranking(&ranked, DATE_COLUMN_WIDTH, render_date)?;
        }
        Command::Lswd => list_statistic(&cli.dir, Statistic::Words)?,
        Command::Lsch => list_statistic(&cli.dir, Statistic::Characters)?,
        Command::Lspg => list_statistic(&cli.dir, Statistic::Pages)?,
        Command::Lspa => list_statistic(&cli.dir, Statistic::Paragraphs)?,
        Command::Lsim => list_statistic(&cli.dir, Statistic::Images)?,
        Command::Lstb => list_statistic(&cli.dir, Statistic::Tables)?,
        Command::Lsnw => list_statistic(&cli.dir, Statistic::NonWhitespaceCharacters)?,
        Command::Lsob => list_statistic(&cli.dir, Statistic::Objects)?,
    }

    Ok(())
}

/// Install a stderr subscriber when `--verbose` or `RUST_LOG` asks for one.
///
/// `RUST_LOG` is honored as given; `--verbose` adds `odtrank=debug` on top.
/// Without either, nothing is installed and stdout carries only listings.
fn init_logging(verbose: bool) -> Result<()> {
    if !verbose && std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let mut filter = EnvFilter::from_default_env();
    if verbose {
        filter = filter.add_directive("odtrank=debug".parse()?);
    }
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
    Ok(())
}

fn list_statistic(dir: &Path, statistic: Statistic) -> Result<()> {
    let ranked = scan::rank_by_statistic(dir, statistic)?;
    print_ranking(&ranked, METRIC_COLUMN_WIDTH, |metric| metric.to_string())
}

fn print_ranking(ranked: &[RankedEntry], width: usize, render: impl Fn(u64) -> String) -> Result<()> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    write_ranking(&mut out, ranked, width, render)?;
    out.flush()?;
    Ok(())
}
