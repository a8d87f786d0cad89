//! Error types for mdditaa operations.
//!
//! [`RenderError`] describes why a single diagram could not be rendered. It
//! never escapes the document pass: the preprocessor logs it and falls back
//! to a literal block. [`MdditaaError`] covers failures around the pass,
//! such as reading the document or loading configuration.

use std::{io, process::ExitStatus};

use thiserror::Error;

/// Failure of the rendering step for one diagram block.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render command is empty")]
    EmptyCommand,

    #[error("failed to start renderer `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("renderer `{program}` exited with {status}")]
    Exit { program: String, status: ExitStatus },

    #[error("I/O error while rendering: {0}")]
    Io(#[from] io::Error),
}

/// The main error type for mdditaa operations.
#[derive(Debug, Error)]
pub enum MdditaaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
