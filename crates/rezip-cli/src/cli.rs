//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rezip")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List archive entries and where their bytes come from
    List(ListArgs),
    /// Add, replace, or remove entries and rewrite the archive
    Modify(ModifyArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,
}

#[derive(clap::Args)]
pub struct ModifyArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Write the result here instead of replacing ARCHIVE
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Add a new entry from a file (fails if NAME exists, can be repeated)
    #[arg(long, value_name = "NAME=PATH", value_parser = parse_entry_spec)]
    pub add: Vec<EntrySpec>,

    /// Add or overwrite an entry from a file (can be repeated)
    #[arg(long, value_name = "NAME=PATH", value_parser = parse_entry_spec)]
    pub replace: Vec<EntrySpec>,

    /// Remove an entry by full name (can be repeated)
    #[arg(long, value_name = "NAME")]
    pub remove: Vec<String>,

    /// Remove every entry whose file name matches exactly (can be repeated)
    #[arg(long, value_name = "FILE")]
    pub remove_basename: Vec<String>,

    /// Print the resulting listing without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Skip syncing the output to disk before it replaces the destination
    #[arg(long)]
    pub no_sync: bool,

    /// Do not carry the archive comment over
    #[arg(long)]
    pub drop_comment: bool,
}

/// Entry name paired with the file supplying its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySpec {
    pub name: String,
    pub path: PathBuf,
}

/// Parse `NAME=PATH`, splitting on the first `=`
fn parse_entry_spec(s: &str) -> Result<EntrySpec, String> {
    let Some((name, path)) = s.split_once('=') else {
        return Err(format!("expected NAME=PATH, got '{s}'"));
    };
    if name.is_empty() {
        return Err(format!("missing entry name in '{s}'"));
    }
    if path.is_empty() {
        return Err(format!("missing file path in '{s}'"));
    }

    Ok(EntrySpec {
        name: name.to_string(),
        path: PathBuf::from(path),
    })
}
