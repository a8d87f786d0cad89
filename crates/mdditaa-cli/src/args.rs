//! Command-line argument definitions for the mdditaa CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, renderer settings, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the mdditaa preprocessor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input Markdown file
    #[arg(help = "Path to the input file, or `-` for standard input")]
    pub input: Option<String>,

    /// Path to the output file (standard output if omitted)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Render command template with `{infile}` and `{outfile}` placeholders
    #[arg(long)]
    pub command: Option<String>,

    /// Directory where generated images are written
    #[arg(long)]
    pub image_dir: Option<String>,

    /// Directory receiving an extra copy of every generated image
    #[arg(long)]
    pub extra_copy_dir: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
