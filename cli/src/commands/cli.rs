use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Json,
    Sexp,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotateArg {
    /// Number of nodes in each subtree.
    Size,
}

#[derive(Parser, Debug)]
#[command(name = "semflow", version, about = "Parse and diff source files")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, value_enum, global = true)]
    pub color: Option<ColorArg>,

    /// error, warning, info, debug or none.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Echo the offending source line in assignment errors.
    #[arg(long, global = true)]
    pub print_source: bool,

    /// Write rendered output here instead of stdout.
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Write pipeline diagnostics here instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ParseArgs {
    /// Read a JSON blob payload from stdin.
    #[arg(long, conflicts_with = "files")]
    pub stdin: bool,

    #[arg(required_unless_present = "stdin")]
    pub files: Vec<PathBuf>,

    /// Language for every file, overriding extension detection.
    #[arg(long)]
    pub language: Option<String>,

    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    pub format: FormatArg,

    #[arg(long, value_enum)]
    pub annotate: Option<AnnotateArg>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DiffArgs {
    /// Read a JSON blob pair payload from stdin.
    #[arg(long, conflicts_with_all = ["before", "after"])]
    pub stdin: bool,

    #[arg(required_unless_present = "stdin")]
    pub before: Option<PathBuf>,

    #[arg(required_unless_present = "stdin")]
    pub after: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = FormatArg::Json)]
    pub format: FormatArg,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse inputs and render their syntax trees.
    Parse(ParseArgs),
    /// Diff two inputs and render the tree diff.
    Diff(DiffArgs),
}
