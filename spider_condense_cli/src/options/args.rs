use clap::{Parser, ValueEnum};
use spider_condense::MarkerStyle;
use std::path::PathBuf;

/// program to condense HTML documents for LLM context windows.
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// The HTML file to condense. Reads standard input when omitted or "-".
    pub input: Option<PathBuf>,
    /// Write the condensed HTML to this file instead of standard output.
    #[clap(short, long)]
    pub output: Option<PathBuf>,
    /// JSON configuration file. Flags below override its values.
    #[clap(short, long)]
    pub config: Option<PathBuf>,
    /// Minimum repeated siblings before a group is collapsed.
    #[clap(short, long)]
    pub min_repeat: Option<usize>,
    /// Skip the structural deduplication phase.
    #[clap(long)]
    pub no_dedupe: bool,
    /// Keep generated class names and ids.
    #[clap(long)]
    pub keep_generated: bool,
    /// Truncate href and src values longer than this.
    #[clap(long)]
    pub max_url_length: Option<usize>,
    /// Truncate text nodes longer than this.
    #[clap(long)]
    pub max_text_length: Option<usize>,
    /// Marker written for collapsed groups.
    #[clap(long, value_enum)]
    pub marker: Option<MarkerArg>,
    /// Print the run statistics as JSON on standard error.
    #[clap(short, long)]
    pub stats: bool,
    /// Print log output on standard error.
    #[clap(short, long)]
    pub verbose: bool,
}

/// Marker representation accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerArg {
    /// An HTML comment.
    Comment,
    /// A bracketed text node.
    Text,
}

impl From<MarkerArg> for MarkerStyle {
    fn from(arg: MarkerArg) -> Self {
        match arg {
            MarkerArg::Comment => MarkerStyle::Comment,
            MarkerArg::Text => MarkerStyle::Text,
        }
    }
}
