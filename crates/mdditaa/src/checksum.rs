//! Content-addressed image naming.
//!
//! Image names are derived from the Adler-32 checksum of the diagram text, so
//! the same diagram always maps to the same file and a changed diagram maps
//! to a new one.

use std::path::{Path, PathBuf};

/// Adler-32 checksum of the UTF-8 bytes of `text`.
pub fn checksum(text: &str) -> u32 {
    adler2::adler32_slice(text.as_bytes())
}

/// File name of the image generated for `text`, e.g. `diagram-24d00ef.png`.
///
/// The checksum is written in lowercase hex without zero padding.
pub fn image_file_name(text: &str) -> String {
    format!("diagram-{:x}.png", checksum(text))
}

/// Full path of the image generated for `text` inside `image_dir`.
pub fn image_path(image_dir: &Path, text: &str) -> PathBuf {
    image_dir.join(image_file_name(text))
}
