use std::fs;
use std::path::Path;
use std::sync::Arc;

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use folio_core::core::path as bookpath;
use folio_core::{FolioError, FolioResult};

use crate::book::manifest::PackageManifest;
use crate::events::EventBus;
use crate::resource::kind::ResourceKind;
use crate::resource::registry::MemberRegistry;

/// A book opened from an unpacked folder: the member registry plus the
/// manifest state derived from it.
pub struct LoadedBook {
    pub registry: Arc<MemberRegistry>,
    pub manifest: PackageManifest,
}

/// Walk an unpacked book folder and build the registry and manifest.
///
/// Every regular file becomes a member classified by extension; the
/// `mimetype` marker is not a member. The package format version is
/// sniffed from the manifest descriptor's text and the initial spine is
/// the documents in natural path order.
pub fn load_book(root: &Path, events: Arc<EventBus>) -> FolioResult<LoadedBook> {
    let registry = MemberRegistry::new(root, events);
    let mut opf_path: Option<String> = None;
    let mut nav_path: Option<String> = None;

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).map_err(|_| {
            FolioError::Path(format!(
                "file outside the book root: {}",
                entry.path().display()
            ))
        })?;
        let path = bookpath::from_relative(relative);
        if path == "mimetype" {
            continue;
        }
        let member = registry.add_file(&path);
        match member.kind() {
            ResourceKind::ManifestDescriptor => opf_path = Some(path),
            ResourceKind::NavigationDescriptor => nav_path = Some(path),
            _ => {}
        }
    }
    registry.update_short_names();
    debug!(members = registry.len(), root = %root.display(), "book loaded");

    let manifest = PackageManifest::new(sniff_epub_version(root, opf_path.as_deref()));
    if let Some(path) = opf_path {
        manifest.set_opf_path(path);
    }
    if let Some(path) = nav_path {
        manifest.set_nav_path(path);
    }

    let mut documents: Vec<_> = registry
        .all_members()
        .into_iter()
        .filter(|m| m.kind() == ResourceKind::Document)
        .collect();
    documents.sort_by(|a, b| bookpath::natural_cmp(&a.bookpath(), &b.bookpath()));
    manifest.set_reading_order(documents.iter().map(|m| m.id()).collect());

    Ok(LoadedBook {
        registry: Arc::new(registry),
        manifest,
    })
}

fn sniff_epub_version(root: &Path, opf_path: Option<&str>) -> String {
    let fallback = "2.0".to_string();
    let Some(opf_path) = opf_path else {
        return fallback;
    };
    let Ok(text) = fs::read_to_string(root.join(opf_path)) else {
        return fallback;
    };
    let Ok(pattern) = Regex::new(r#"<package[^>]*\bversion\s*=\s*"([^"]+)""#) else {
        return fallback;
    };
    pattern
        .captures(&text)
        .map(|caps| caps[1].to_string())
        .unwrap_or(fallback)
}
