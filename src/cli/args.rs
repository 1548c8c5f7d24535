//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};
use clap_complete::Shell;

/// Store hierarchy manager: depth-annotated tree outlines and drag-and-drop
/// order reconciliation
#[derive(Parser, Debug)]
#[command(name = "storetree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Nodes file (default: from configuration)
    #[arg(short = 'f', long = "file", global = true, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    /// Print author and version
    #[arg(long)]
    pub info: bool,

    /// Generate shell completions
    #[arg(long = "generate", value_enum)]
    pub generator: Option<Shell>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the hierarchy as a tree
    Show,

    /// List nodes as an indented table (name, weight, depth, parent)
    List,

    /// Report dangling parents, cycles, and depth drift
    Check,

    /// Move one node to a new parent or root position
    Move {
        /// Node to move
        id: String,

        /// New parent node
        #[arg(long, conflicts_with = "root")]
        parent: Option<String>,

        /// Make the node a root
        #[arg(long)]
        root: bool,

        /// Weight for a root position
        #[arg(long, allow_hyphen_values = true)]
        weight: Option<i64>,
    },

    /// Apply a full submission file (drag-and-drop row order)
    Apply {
        /// Submission file with [[row]] entries
        #[arg(value_hint = ValueHint::FilePath)]
        submission: PathBuf,
    },
}
