use anyhow::Result;
use std::path::{Component, Path, PathBuf};

pub fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Resolves a path given on the command line against the current directory.
pub fn resolve_from_cwd(path: &Path) -> Result<PathBuf> {
    Ok(std::env::current_dir()?.join(path))
}

/// Computes the path of `target` relative to `root` without touching the filesystem.
///
/// Both paths should be absolute. `..` components are emitted for every component of `root` not
/// shared with `target`.
pub fn get_relative_from(root: &Path, target: &Path) -> PathBuf {
    let root: Vec<_> = root.components().filter(|x| *x != Component::CurDir).collect();
    let target: Vec<_> = target.components().filter(|x| *x != Component::CurDir).collect();

    let common = root.iter().zip(&target).take_while(|(a, b)| a == b).count();

    let mut out = PathBuf::new();
    for _ in common..root.len() {
        out.push("..");
    }
    for component in &target[common..] {
        out.push(component);
    }
    out
}

/// Formats a path for display, relative to the current directory where possible.
pub fn display_relative(path: &Path) -> String {
    match std::env::current_dir() {
        Ok(cwd) if path.is_absolute() => path_to_string(&get_relative_from(&cwd, path)),
        _ => path_to_string(path),
    }
}
