//! Book-path handling.
//!
//! A book path is the location of a member relative to the package root,
//! always `/`-separated regardless of host platform.

use crate::core::error::{FolioError, FolioResult};
use std::cmp::Ordering;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;

/// Characters that may never appear in a proposed filename: the path
/// separators of the host and container formats plus the characters
/// illegal in most file systems.
pub const FORBIDDEN_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Final segment of a book path.
pub fn filename(bookpath: &str) -> &str {
    match bookpath.rfind('/') {
        Some(i) => &bookpath[i + 1..],
        None => bookpath,
    }
}

/// Directory part of a book path, `""` for root-level members.
pub fn folder(bookpath: &str) -> &str {
    match bookpath.rfind('/') {
        Some(i) => &bookpath[..i],
        None => "",
    }
}

/// Join a folder and a filename into a book path.
pub fn join(folder: &str, name: &str) -> String {
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{folder}/{name}")
    }
}

/// Filename without its extension. `".hidden"` has an empty stem.
pub fn stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) => &name[..i],
        None => name,
    }
}

/// Extension without the leading dot, `None` when the name has no dot.
pub fn extension(name: &str) -> Option<&str> {
    name.rfind('.').map(|i| &name[i + 1..])
}

/// Convert a filesystem-relative path into a book path.
pub fn from_relative(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.join("/")
}

/// Resolve an href-style reference against the folder of the referencing
/// file, collapsing `.` and `..` segments.
pub fn resolve(base_folder: &str, href: &str) -> String {
    let mut segments: Vec<&str> = if base_folder.is_empty() {
        Vec::new()
    } else {
        base_folder.split('/').collect()
    };
    for part in href.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Relative reference from `from_folder` to the member at `target`.
pub fn relative_to(target: &str, from_folder: &str) -> String {
    let target_segments: Vec<&str> = target.split('/').collect();
    let from_segments: Vec<&str> = if from_folder.is_empty() {
        Vec::new()
    } else {
        from_folder.split('/').collect()
    };
    let mut common = 0;
    while common < from_segments.len()
        && common + 1 < target_segments.len()
        && from_segments[common] == target_segments[common]
    {
        common += 1;
    }
    let mut out: Vec<&str> = Vec::new();
    for _ in common..from_segments.len() {
        out.push("..");
    }
    out.extend(&target_segments[common..]);
    out.join("/")
}

/// Alphanumeric comparison: case-insensitive, with digit runs compared
/// numerically so that `page2` sorts before `page10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();
    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let run_a = take_digit_run(&mut ai);
                let run_b = take_digit_run(&mut bi);
                let na = run_a.trim_start_matches('0');
                let nb = run_b.trim_start_matches('0');
                let ord = na.len().cmp(&nb.len()).then_with(|| na.cmp(nb));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let xl = x.to_lowercase().next().unwrap_or(x);
                let yl = y.to_lowercase().next().unwrap_or(y);
                if xl != yl {
                    return xl.cmp(&yl);
                }
                ai.next();
                bi.next();
            }
        }
    }
}

fn take_digit_run(it: &mut Peekable<Chars>) -> String {
    let mut run = String::new();
    while let Some(c) = it.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        it.next();
    }
    run
}

/// Get the Folio home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\folio
/// - Linux: ~/.config/folio
/// - macOS: ~/Library/Application Support/folio
pub fn folio_home() -> FolioResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| FolioError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("folio"))
}

/// Get the config file path
pub fn config_file() -> FolioResult<PathBuf> {
    Ok(folio_home()?.join("config.yaml"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> FolioResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
