use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Empty Sweeper - find and remove recursively empty directories
#[derive(Parser, Debug)]
#[command(name = "empty-sweeper")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH", env = "EMPTY_SWEEPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find empty directories and delete them
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Print the man page
    Man,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Root directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Show what would be deleted without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Move directories to the trash instead of deleting them
    #[arg(short, long)]
    pub trash: bool,

    /// Descend into symlinks and mount points
    #[arg(long)]
    pub follow_reparse_points: bool,

    /// Also delete the root directory if it ends up empty
    #[arg(long)]
    pub delete_root: bool,

    /// Maximum recursion depth (root = 0)
    #[arg(short = 'd', long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Directory name patterns to skip (semicolon-separated globs)
    #[arg(short, long, value_delimiter = ';', value_name = "PATTERNS")]
    pub exclude: Vec<String>,

    /// Directories to skip together with their contents
    #[arg(short = 'x', long, value_name = "PATH")]
    pub exclude_path: Vec<PathBuf>,

    /// Skip confirmation prompts
    #[arg(short, long)]
    pub force: bool,

    /// Output the result as JSON
    #[arg(long)]
    pub json: bool,
}
