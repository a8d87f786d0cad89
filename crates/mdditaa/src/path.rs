//! Lexical path helpers for building embed references.

use std::{
    env, io,
    path::{Component, Path, PathBuf},
};

/// Expresses `path` relative to the current working directory.
pub fn relative_to_cwd(path: &Path) -> io::Result<PathBuf> {
    let cwd = env::current_dir()?;
    Ok(relative_to(path, &cwd))
}

/// Expresses `path` relative to the absolute directory `base`.
///
/// Relative inputs are taken to be relative to `base` already and are only
/// normalized. Nothing touches the filesystem, so symlinks are not resolved.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    if path.is_relative() {
        return normalize(path);
    }

    let path = normalize(path);
    let base = normalize(base);
    let mut path_parts = path.components().peekable();
    let mut base_parts = base.components().peekable();

    while let (Some(a), Some(b)) = (path_parts.peek(), base_parts.peek()) {
        if a != b {
            break;
        }
        path_parts.next();
        base_parts.next();
    }

    let mut relative = PathBuf::new();
    for _ in base_parts {
        relative.push(Component::ParentDir);
    }
    relative.extend(path_parts);

    if relative.as_os_str().is_empty() {
        PathBuf::from(Component::CurDir.as_os_str())
    } else {
        relative
    }
}

/// Removes `.` components and folds `..` into the preceding component.
fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        PathBuf::from(Component::CurDir.as_os_str())
    } else {
        parts.iter().collect()
    }
}
