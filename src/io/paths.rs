//! Path helpers for the command surface

use std::path::{Component, Path, PathBuf};

/// Expand a leading `~` to the user's home directory.
///
/// `~user` forms are left untouched, as is everything when no home
/// directory is known.
pub fn expand_user(path: &Path) -> PathBuf {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => match dirs::home_dir() {
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Absolute, lexically normalized form of `path`, relative paths being
/// taken from the current directory
pub fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    Ok(normalize(&std::path::absolute(path)?))
}

/// Remove `.` and resolve `..` without touching the file system
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                ) && normalized.pop();
                if !popped && !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Path of `path` as seen from directory `base`, joined with `/`.
///
/// Both paths should be absolute and normalized. Falls back to `path`
/// itself when the two live on different roots.
pub fn relative_to(path: &Path, base: &Path) -> String {
    let path_components: Vec<Component> = path.components().collect();
    let base_components: Vec<Component> = base.components().collect();

    let same_root = path_components.first() == base_components.first();
    if !same_root {
        return to_slash(path);
    }

    let common = path_components
        .iter()
        .zip(&base_components)
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    segments.extend(base_components[common..].iter().map(|_| "..".to_string()));
    segments.extend(
        path_components[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
