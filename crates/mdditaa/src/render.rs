//! Diagram rendering.
//!
//! [`Renderer`] is the seam to the external tool that turns diagram source
//! into an image. [`CommandRenderer`] runs a command built from a template
//! such as `ditaa {infile} {outfile} --overwrite`. [`generate_image`] wraps a
//! renderer with the per-block bookkeeping: content-addressed naming,
//! temporary files, the optional extra copy and the embed reference.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::Command,
};

use log::{debug, info, trace};

use crate::{checksum, config::PreprocessConfig, error::RenderError, fence::DiagramBlock, path};

/// Placeholder replaced with the diagram source path.
pub const INFILE_PLACEHOLDER: &str = "{infile}";

/// Placeholder replaced with the image output path.
pub const OUTFILE_PLACEHOLDER: &str = "{outfile}";

/// Converts a diagram source file into an image file.
pub trait Renderer {
    /// Renders the diagram in `input` to the image at `output`.
    ///
    /// An existing image at `output` is expected to be overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when the image could not be produced.
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError> {
        (**self).render(input, output)
    }
}

/// Renderer running an external command.
///
/// The template is filled in and split on whitespace into the program and
/// its arguments, so neither the template nor the substituted paths may
/// rely on quoting. The command's standard output is captured in a
/// temporary file that is removed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRenderer {
    template: String,
    temp_dir: Option<PathBuf>,
}

impl CommandRenderer {
    /// Creates a renderer from a command template.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            temp_dir: None,
        }
    }

    /// Places the stdout capture file in `dir` instead of the system
    /// temporary directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Builds the argument vector for one invocation.
    pub fn command_line(&self, input: &Path, output: &Path) -> Vec<String> {
        self.template
            .replace(INFILE_PLACEHOLDER, &input.to_string_lossy())
            .replace(OUTFILE_PLACEHOLDER, &output.to_string_lossy())
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

impl Renderer for CommandRenderer {
    fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError> {
        let argv = self.command_line(input, output);
        let (program, args) = argv.split_first().ok_or(RenderError::EmptyCommand)?;

        let mut builder = tempfile::Builder::new();
        builder.prefix("ditaaout");
        let stdout = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        debug!(program = program, args:? = args; "Running renderer");

        let status = Command::new(program)
            .args(args)
            .stdout(stdout.reopen()?)
            .status()
            .map_err(|source| RenderError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(RenderError::Exit {
                program: program.clone(),
                status,
            });
        }

        Ok(())
    }
}

/// Renders `block` and returns the reference to embed in its place.
///
/// The image is written to `image_dir/diagram-<checksum>.png` and copied on a
/// best-effort basis into the configured extra copy directory and into the
/// block's `path=` override, whichever are present. The reference points
/// into the override if there is one, else into the extra copy directory,
/// else at the image path relative to the current working directory.
///
/// The temporary source file is removed on every return path.
///
/// # Errors
///
/// Returns [`RenderError`] if the image directory cannot be created, the
/// source cannot be written, or the renderer fails. A failed copy is not an
/// error.
pub fn generate_image<R>(
    renderer: &R,
    config: &PreprocessConfig,
    block: &DiagramBlock,
) -> Result<String, RenderError>
where
    R: Renderer + ?Sized,
{
    let text = block.text();
    let file_name = checksum::image_file_name(&text);
    let image = checksum::image_path(config.image_dir(), &text);
    trace!(text = text; "Diagram source");

    fs::create_dir_all(config.image_dir())?;

    let mut source = tempfile::Builder::new().prefix("ditaasrc").tempfile()?;
    source.write_all(text.as_bytes())?;
    source.flush()?;

    renderer.render(source.path(), &image)?;
    info!(image = image.display().to_string(); "Diagram rendered");

    let override_dir = block.path_override().map(Path::new);
    if let Some(dir) = config.extra_copy_dir() {
        copy_best_effort(&image, dir, &file_name);
    }
    if let Some(dir) = override_dir {
        copy_best_effort(&image, dir, &file_name);
    }

    let reference = match override_dir.or(config.extra_copy_dir()) {
        Some(dir) => dir.join(&file_name),
        None => path::relative_to_cwd(&image)?,
    };

    Ok(reference.to_string_lossy().into_owned())
}

/// Copies `image` into `dir`, logging and ignoring any failure.
fn copy_best_effort(image: &Path, dir: &Path, file_name: &str) {
    let target: PathBuf = dir.join(file_name);
    match fs::copy(image, &target) {
        Ok(_) => debug!(target = target.display().to_string(); "Copied diagram image"),
        Err(err) => debug!(
            target = target.display().to_string(),
            err:err;
            "Could not copy diagram image, ignoring"
        ),
    }
}
