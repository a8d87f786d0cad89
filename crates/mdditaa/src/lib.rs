//! mdditaa - render ditaa diagram blocks in Markdown documents.
//!
//! The preprocessor scans a document for fenced blocks opened with
//! `` ```ditaa ``, renders each one to a PNG through an external renderer,
//! and replaces the block with an image embed. Blocks that cannot be
//! rendered are kept as indented code so no content is lost.
//!
//! Images are named after the Adler-32 checksum of their source, so
//! unchanged diagrams keep their file names between runs.

pub mod config;

mod checksum;
mod error;
mod fence;
mod path;
mod render;

pub use checksum::{checksum, image_file_name};
pub use error::{MdditaaError, RenderError};
pub use fence::{CLOSE_MARKER, DiagramBlock, OPEN_MARKER, Segment, scan};
pub use render::{CommandRenderer, Renderer, generate_image};

use log::{info, warn};

use config::PreprocessConfig;

/// Preprocessor replacing diagram blocks with rendered images.
///
/// # Examples
///
/// ```rust,no_run
/// use mdditaa::{Preprocessor, config::PreprocessConfig};
///
/// let config = PreprocessConfig::default().with_image_dir("img").resolve();
/// let preprocessor = Preprocessor::new(config);
///
/// let output = preprocessor.process_str("```ditaa\nA->B\n```\n");
/// println!("{output}");
/// ```
#[derive(Debug, Clone)]
pub struct Preprocessor<R = CommandRenderer> {
    config: PreprocessConfig,
    renderer: R,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(PreprocessConfig::default())
    }
}

impl Preprocessor {
    /// Create a preprocessor running the configured render command.
    ///
    /// The configuration is used as given. Call
    /// [`PreprocessConfig::resolve`] first to apply environment overrides.
    pub fn new(config: PreprocessConfig) -> Self {
        let renderer = CommandRenderer::new(config.render_command());
        Self { config, renderer }
    }
}

impl<R: Renderer> Preprocessor<R> {
    /// Replace the renderer, keeping the configuration.
    pub fn with_renderer<T: Renderer>(self, renderer: T) -> Preprocessor<T> {
        Preprocessor {
            config: self.config,
            renderer,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Transform a document given as lines.
    ///
    /// Blocks are rendered one at a time, in document order. A block whose
    /// rendering fails is replaced by its body as an indented code block
    /// between blank lines.
    pub fn run<I, S>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments = fence::scan(lines);
        let mut output = Vec::with_capacity(segments.len());
        let mut rendered = 0usize;
        let mut failed = 0usize;

        for segment in segments {
            match segment {
                Segment::Line(line) => output.push(line),
                Segment::Diagram(block) => {
                    match render::generate_image(&self.renderer, &self.config, &block) {
                        Ok(reference) => {
                            rendered += 1;
                            output.push(block.embed_line(&reference));
                        }
                        Err(err) => {
                            failed += 1;
                            warn!(err:err; "Diagram rendering failed, keeping source as code");
                            output.extend(block.fallback_lines());
                        }
                    }
                }
            }
        }

        if rendered + failed > 0 {
            info!(rendered, failed; "Processed diagram blocks");
        }

        output
    }

    /// Transform a document given as one string.
    ///
    /// Lines are split on `\n` (a trailing `\r` is dropped) and joined back
    /// with `\n`. A trailing newline on the input is kept.
    pub fn process_str(&self, document: &str) -> String {
        let (body, trailing_newline) = match document.strip_suffix('\n') {
            Some(body) => (body, true),
            None => (document, false),
        };
        if body.is_empty() && !trailing_newline {
            return String::new();
        }

        let lines = body
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line));
        let mut output = self.run(lines).join("\n");
        if trailing_newline {
            output.push('\n');
        }
        output
    }
}

/// Transform `lines` with `config` and the command renderer it names.
///
/// Shorthand for `Preprocessor::new(config.clone()).run(lines)`.
pub fn transform<I, S>(lines: I, config: &PreprocessConfig) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Preprocessor::new(config.clone()).run(lines)
}
