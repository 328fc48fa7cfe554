use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::resource::kind::ResourceKind;
use crate::resource::member::{MemberId, PackageMember};

/// The manifest/spine owner: linear reading order, per-path manifest
/// properties and semantic roles, the package format version, and the
/// self-referential paths of the two descriptor singletons.
///
/// Semantic roles come from different sources depending on the format
/// version: the guide for the older manifest style, navigation landmarks
/// (plus manifest properties) for the newer one.
pub struct PackageManifest {
    epub_version: RwLock<String>,
    spine: RwLock<Vec<MemberId>>,
    manifest_properties: RwLock<HashMap<String, String>>,
    guide_semantics: RwLock<HashMap<String, String>>,
    landmarks: RwLock<HashMap<String, String>>,
    opf_path: RwLock<Option<String>>,
    nav_path: RwLock<Option<String>>,
}

impl PackageManifest {
    pub fn new(epub_version: impl Into<String>) -> Self {
        Self {
            epub_version: RwLock::new(epub_version.into()),
            spine: RwLock::new(Vec::new()),
            manifest_properties: RwLock::new(HashMap::new()),
            guide_semantics: RwLock::new(HashMap::new()),
            landmarks: RwLock::new(HashMap::new()),
            opf_path: RwLock::new(None),
            nav_path: RwLock::new(None),
        }
    }

    pub fn epub_version(&self) -> String {
        self.epub_version
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Spine position of each given member that appears in the reading
    /// order; members not in the spine are absent from the result.
    pub fn reading_order_for(&self, members: &[Arc<PackageMember>]) -> HashMap<MemberId, usize> {
        let spine = self.spine.read().unwrap_or_else(PoisonError::into_inner);
        let positions: HashMap<MemberId, usize> = spine
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i))
            .collect();
        members
            .iter()
            .filter_map(|m| positions.get(&m.id()).map(|i| (m.id(), *i)))
            .collect()
    }

    pub fn reading_order(&self) -> Vec<MemberId> {
        self.spine
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the spine with the given ordered document list.
    pub fn set_reading_order(&self, ordered: Vec<MemberId>) {
        let mut spine = self.spine.write().unwrap_or_else(PoisonError::into_inner);
        *spine = ordered;
    }

    pub fn manifest_properties_for_paths(&self) -> HashMap<String, String> {
        self.manifest_properties
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_manifest_property(&self, path: impl Into<String>, value: impl Into<String>) {
        let mut props = self
            .manifest_properties
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        props.insert(path.into(), value.into());
    }

    pub fn set_guide_semantic(&self, path: impl Into<String>, role: impl Into<String>) {
        let mut guide = self
            .guide_semantics
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guide.insert(path.into(), role.into());
    }

    pub fn set_landmark(&self, path: impl Into<String>, role: impl Into<String>) {
        let mut landmarks = self
            .landmarks
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        landmarks.insert(path.into(), role.into());
    }

    /// Semantic role per book path, from the version-appropriate source.
    pub fn semantic_roles_for_paths(&self) -> HashMap<String, String> {
        if self.epub_version().starts_with('3') {
            self.landmarks
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        } else {
            self.guide_semantics
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    pub fn opf_path(&self) -> Option<String> {
        self.opf_path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn nav_path(&self) -> Option<String> {
        self.nav_path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_opf_path(&self, path: impl Into<String>) {
        let mut opf = self.opf_path.write().unwrap_or_else(PoisonError::into_inner);
        *opf = Some(path.into());
    }

    pub fn set_nav_path(&self, path: impl Into<String>) {
        let mut nav = self.nav_path.write().unwrap_or_else(PoisonError::into_inner);
        *nav = Some(path.into());
    }

    /// A descriptor singleton was renamed or moved: its self-referential
    /// metadata must follow the new path.
    pub fn descriptor_relocated(&self, kind: ResourceKind, old_path: &str, new_path: &str) {
        match kind {
            ResourceKind::ManifestDescriptor => {
                let mut opf = self.opf_path.write().unwrap_or_else(PoisonError::into_inner);
                if opf.as_deref() == Some(old_path) || opf.is_none() {
                    *opf = Some(new_path.to_string());
                }
            }
            ResourceKind::NavigationDescriptor => {
                let mut nav = self.nav_path.write().unwrap_or_else(PoisonError::into_inner);
                if nav.as_deref() == Some(old_path) || nav.is_none() {
                    *nav = Some(new_path.to_string());
                }
            }
            _ => {}
        }
    }

    /// Re-key all path-indexed metadata after a batch of successful
    /// renames/moves, so properties and roles stay attached to their
    /// members.
    pub fn paths_relocated(&self, mapping: &HashMap<String, String>) {
        remap_keys(&self.manifest_properties, mapping);
        remap_keys(&self.guide_semantics, mapping);
        remap_keys(&self.landmarks, mapping);
    }
}

fn remap_keys(map: &RwLock<HashMap<String, String>>, mapping: &HashMap<String, String>) {
    let mut guard = map.write().unwrap_or_else(PoisonError::into_inner);
    for (old, new) in mapping {
        if let Some(value) = guard.remove(old) {
            guard.insert(new.clone(), value);
        }
    }
}
