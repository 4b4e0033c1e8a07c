use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "odtrank")]
#[command(version)]
#[command(about = "Operates on .odt documents in the current directory", long_about = None)]
#[command(arg_required_else_help = true)]
#[command(after_help = "Examples:\n  \
  odtrank lswd              list documents by word count\n  \
  odtrank -C ~/letters lsdc list documents in ~/letters by creation date\n  \
  odtrank adex              add .odt to OpenDocument files missing it")]
pub struct Cli {
    /// Operate on DIR instead of the current directory
    #[arg(short = 'C', long = "dir", value_name = "DIR", default_value = ".", global = true)]
    pub dir: PathBuf,

    /// Log progress to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Remove .odt extensions
    Rmex,
    /// Add .odt extensions
    Adex,
    /// List by date created
    Lsdc,
    /// List by word count
    Lswd,
    /// List by character count
    Lsch,
    /// List by page count
    Lspg,
    /// List by paragraph count
    Lspa,
    /// List by image count
    Lsim,
    /// List by table count
    Lstb,
    /// List by non-white-space character count
    Lsnw,
    /// List by object count
    Lsob,
}
