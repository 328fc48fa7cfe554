//! Cross-reference rewriting.
//!
//! When members change book paths, every reference embedded inside the
//! package's text files (href/src attributes, CSS `url(...)` values) must
//! be rewritten to the new locations. The rewriter receives the whole
//! member set and the complete old→new mapping once per batch, so a
//! single pass covers multi-file fan-out such as a stylesheet rename.

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;

use regex::{Captures, Regex};
use tracing::debug;

use folio_core::core::path as bookpath;
use folio_core::{FolioError, FolioResult};

use crate::resource::member::PackageMember;

pub trait ReferenceRewriter: Send + Sync {
    /// Rewrite embedded cross-references across `members` using the
    /// old-book-path → new-book-path `mapping`. Returns the number of
    /// files changed.
    fn rewrite_references(
        &self,
        members: &[Arc<PackageMember>],
        mapping: &HashMap<String, String>,
    ) -> FolioResult<usize>;
}

/// Pattern-based rewriter for the package's XHTML/CSS/XML text files.
pub struct RegexRewriter {
    attr_double: Regex,
    attr_single: Regex,
    css_url: Regex,
}

impl RegexRewriter {
    pub fn new() -> FolioResult<Self> {
        Ok(Self {
            attr_double: compile(r#"(?i)\b(href|src)\s*=\s*"([^"]*)""#)?,
            attr_single: compile(r#"(?i)\b(href|src)\s*=\s*'([^']*)'"#)?,
            css_url: compile(r#"url\(\s*['"]?([^'")]+)['"]?\s*\)"#)?,
        })
    }

    fn rewrite_text(&self, folder: &str, text: &str, mapping: &HashMap<String, String>) -> String {
        let pass = self.attr_double.replace_all(text, |caps: &Captures| {
            match remap(folder, &caps[2], mapping) {
                Some(value) => format!("{}=\"{}\"", &caps[1], value),
                None => caps[0].to_string(),
            }
        });
        let pass = self.attr_single.replace_all(&pass, |caps: &Captures| {
            match remap(folder, &caps[2], mapping) {
                Some(value) => format!("{}='{}'", &caps[1], value),
                None => caps[0].to_string(),
            }
        });
        let pass = self.css_url.replace_all(&pass, |caps: &Captures| {
            match remap(folder, &caps[1], mapping) {
                Some(value) => format!("url(\"{value}\")"),
                None => caps[0].to_string(),
            }
        });
        pass.into_owned()
    }
}

impl ReferenceRewriter for RegexRewriter {
    fn rewrite_references(
        &self,
        members: &[Arc<PackageMember>],
        mapping: &HashMap<String, String>,
    ) -> FolioResult<usize> {
        if mapping.is_empty() {
            return Ok(0);
        }
        let mut changed = 0;
        for member in members {
            if member.is_deleted() || !member.kind().carries_references() {
                continue;
            }
            let full_path = member.full_path();
            // Unreadable or non-UTF-8 content carries no rewritable text.
            let Ok(text) = fs::read_to_string(&full_path) else {
                continue;
            };
            let rewritten = self.rewrite_text(&member.folder(), &text, mapping);
            if rewritten != text {
                fs::write(&full_path, rewritten).map_err(|source| FolioError::FileOperation {
                    path: member.bookpath(),
                    source,
                })?;
                member.save_stamp();
                debug!(path = %member.bookpath(), "references rewritten");
                changed += 1;
            }
        }
        Ok(changed)
    }
}

fn compile(pattern: &str) -> FolioResult<Regex> {
    Regex::new(pattern).map_err(|e| FolioError::Config(format!("bad reference pattern: {e}")))
}

/// Resolve a raw reference against the referencing file's folder; when it
/// points at a remapped book path, produce the new reference with any URL
/// fragment preserved.
fn remap(folder: &str, raw: &str, mapping: &HashMap<String, String>) -> Option<String> {
    if raw.is_empty() || raw.starts_with('#') || raw.contains("://") || raw.starts_with("data:") {
        return None;
    }
    let (target, fragment) = match raw.find('#') {
        Some(i) => (&raw[..i], &raw[i..]),
        None => (raw, ""),
    };
    let resolved = bookpath::resolve(folder, target);
    let new_path = mapping.get(&resolved)?;
    Some(format!(
        "{}{}",
        bookpath::relative_to(new_path, folder),
        fragment
    ))
}
