//! Configuration types for the mdditaa preprocessor.
//!
//! [`PreprocessConfig`] is an immutable value handed to the preprocessor for
//! one run. It implements [`serde::Deserialize`] so callers can load it from
//! any serde format, and it exposes an explicit resolution step that applies
//! environment overrides once, before any document is processed.
//!
//! Precedence, highest first:
//!
//! 1. Environment (`DITAA_CMD`, `DITAA_IMAGE_DIR`)
//! 2. Caller-supplied values
//! 3. Built-in defaults
//!
//! # Example
//!
//! ```
//! # use mdditaa::config::PreprocessConfig;
//! let config = PreprocessConfig::default()
//!     .with_image_dir("img")
//!     .with_env_overrides(|_| None);
//! assert_eq!(config.image_dir().to_str(), Some("img"));
//! ```

use std::{
    env,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Deserialize;

/// Command template used when no other command is configured.
pub const DEFAULT_RENDER_COMMAND: &str = "ditaa {infile} {outfile} --overwrite";

/// Environment variable overriding [`PreprocessConfig::render_command`].
pub const RENDER_COMMAND_ENV: &str = "DITAA_CMD";

/// Environment variable overriding [`PreprocessConfig::image_dir`].
pub const IMAGE_DIR_ENV: &str = "DITAA_IMAGE_DIR";

/// Settings for a single preprocessing run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Renderer command line with `{infile}` and `{outfile}` placeholders.
    render_command: String,

    /// Directory receiving generated images.
    image_dir: PathBuf,

    /// Directory receiving a second copy of every generated image.
    extra_copy_dir: Option<PathBuf>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            render_command: DEFAULT_RENDER_COMMAND.to_string(),
            image_dir: PathBuf::from("."),
            extra_copy_dir: None,
        }
    }
}

impl PreprocessConfig {
    /// Replaces the render command template.
    pub fn with_render_command(mut self, render_command: impl Into<String>) -> Self {
        self.render_command = render_command.into();
        self
    }

    /// Replaces the image directory.
    pub fn with_image_dir(mut self, image_dir: impl Into<PathBuf>) -> Self {
        self.image_dir = image_dir.into();
        self
    }

    /// Sets the extra copy directory.
    pub fn with_extra_copy_dir(mut self, extra_copy_dir: impl Into<PathBuf>) -> Self {
        self.extra_copy_dir = Some(extra_copy_dir.into());
        self
    }

    /// Applies overrides from the process environment.
    ///
    /// Call this once per run, after caller-supplied values are in place.
    pub fn resolve(self) -> Self {
        self.with_env_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides looked up through `lookup`.
    ///
    /// `lookup` receives an environment variable name and returns its value,
    /// if set. [`PreprocessConfig::resolve`] passes the real environment.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(command) = lookup(RENDER_COMMAND_ENV) {
            debug!(render_command = command; "Render command overridden by environment");
            self.render_command = command;
        }
        if let Some(dir) = lookup(IMAGE_DIR_ENV) {
            debug!(image_dir = dir; "Image directory overridden by environment");
            self.image_dir = PathBuf::from(dir);
        }
        self
    }

    /// Returns the render command template.
    pub fn render_command(&self) -> &str {
        &self.render_command
    }

    /// Returns the image output directory.
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Returns the extra copy directory, if configured.
    pub fn extra_copy_dir(&self) -> Option<&Path> {
        self.extra_copy_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PreprocessConfig::default();
        assert_eq!(config.render_command(), DEFAULT_RENDER_COMMAND);
        assert_eq!(config.image_dir(), Path::new("."));
        assert!(config.extra_copy_dir().is_none());
    }

    #[test]
    fn test_environment_wins_over_caller_values() {
        let config = PreprocessConfig::default()
            .with_render_command("caller {infile} {outfile}")
            .with_image_dir("caller")
            .with_env_overrides(|key| match key {
                RENDER_COMMAND_ENV => Some("env {infile} {outfile}".to_string()),
                IMAGE_DIR_ENV => Some("env-dir".to_string()),
                _ => None,
            });

        assert_eq!(config.render_command(), "env {infile} {outfile}");
        assert_eq!(config.image_dir(), Path::new("env-dir"));
    }

    #[test]
    fn test_caller_values_kept_without_environment() {
        let config = PreprocessConfig::default()
            .with_image_dir("caller")
            .with_extra_copy_dir("copies")
            .with_env_overrides(|_| None);

        assert_eq!(config.render_command(), DEFAULT_RENDER_COMMAND);
        assert_eq!(config.image_dir(), Path::new("caller"));
        assert_eq!(config.extra_copy_dir(), Some(Path::new("copies")));
    }

    #[test]
    fn test_environment_does_not_touch_extra_copy_dir() {
        let config = PreprocessConfig::default()
            .with_extra_copy_dir("copies")
            .with_env_overrides(|_| Some("anything".to_string()));

        assert_eq!(config.extra_copy_dir(), Some(Path::new("copies")));
    }
}
