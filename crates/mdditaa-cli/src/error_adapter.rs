//! Error adapter for converting MdditaaError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::Diagnostic;

use mdditaa::MdditaaError;

/// Adapter giving [`MdditaaError`] a diagnostic code and help text.
pub struct ErrorAdapter<'a>(pub &'a MdditaaError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl Diagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            MdditaaError::Io(_) => "mdditaa::io",
            MdditaaError::Config(_) => "mdditaa::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            MdditaaError::Io(_) => None,
            MdditaaError::Config(_) => Some(Box::new(
                "settings live under a [preprocess] table: render_command, image_dir, extra_copy_dir",
            )),
        }
    }
}
