//! CLI logic for the mdditaa preprocessor.
//!
//! This module contains the core CLI logic: resolve configuration, read the
//! document, render its diagram blocks, and write the result.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    env, fs,
    io::{self, Read, Write},
};

use log::info;

use mdditaa::{MdditaaError, Preprocessor};

/// Run the mdditaa CLI application
///
/// Reads the input document (a file, or standard input when no path or
/// `-` is given), replaces its diagram blocks and writes the result to the
/// output file or standard output.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `MdditaaError` for:
/// - File I/O errors
/// - Configuration loading errors
///
/// Diagrams that fail to render are not errors; they are kept as code.
pub fn run(args: &Args) -> Result<(), MdditaaError> {
    run_with_env(args, |key| env::var(key).ok())
}

/// Run the CLI with environment values supplied by `lookup`
///
/// Behaves like [`run`], but `DITAA_CMD` and `DITAA_IMAGE_DIR` are read
/// through `lookup` instead of the process environment.
///
/// # Errors
///
/// Same as [`run`].
pub fn run_with_env<F>(args: &Args, lookup: F) -> Result<(), MdditaaError>
where
    F: Fn(&str) -> Option<String>,
{
    let input = args.input.as_deref().filter(|path| *path != "-");
    info!(
        input_path = input.unwrap_or("<stdin>"),
        output_path = args.output.as_deref().unwrap_or("<stdout>");
        "Processing document"
    );

    let config = config::resolve_config(args, lookup)?;

    let document = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut document = String::new();
            io::stdin().read_to_string(&mut document)?;
            document
        }
    };

    let output = Preprocessor::new(config).process_str(&document);

    match &args.output {
        Some(path) => fs::write(path, output)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
    }

    info!("Document processed successfully");

    Ok(())
}
