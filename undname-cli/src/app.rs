use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// undname - decode Microsoft C++ decorated symbol names
#[derive(Debug, Parser)]
#[command(
    name = "undname",
    version,
    about,
    long_about = None,
    args_conflicts_with_subcommands = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Decorated symbol to decode, e.g. ?Foo@@YAHH@Z.
    ///
    /// A symbol spelled like a subcommand needs `--` or the `decode` subcommand.
    #[arg(value_name = "SYMBOL")]
    pub symbol: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decode a single symbol, whatever it is spelled like.
    Decode {
        /// Decorated or plain symbol name.
        #[arg(value_name = "SYMBOL", allow_hyphen_values = true)]
        symbol: String,
    },

    /// Classify a list of symbols and group them by owning class.
    Classify {
        /// Text file with one decorated symbol per line.
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Replay golden fixture files and report every rendering that differs.
    Verify {
        /// Fixture files in `is :-` / `undname:` format.
        #[arg(value_name = "FIXTURE", required = true)]
        paths: Vec<PathBuf>,
    },
}
