use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use folio_core::core::path as bookpath;
use folio_core::{FolioError, FolioResult};

use crate::events::EventBus;
use crate::resource::kind::ResourceKind;
use crate::resource::member::{MemberId, PackageMember};

/// Owns the authoritative set of package members by identifier. The tree
/// is a derived, rebuildable view of this registry; no component other
/// than the rename/move transaction mutates a member's path.
pub struct MemberRegistry {
    book_root: PathBuf,
    members: RwLock<HashMap<MemberId, Arc<PackageMember>>>,
    events: Arc<EventBus>,
}

impl MemberRegistry {
    pub fn new(book_root: impl Into<PathBuf>, events: Arc<EventBus>) -> Self {
        Self {
            book_root: book_root.into(),
            members: RwLock::new(HashMap::new()),
            events,
        }
    }

    pub fn book_root(&self) -> &Path {
        &self.book_root
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Track a file already present under the book root, classifying it by
    /// extension.
    pub fn add_file(&self, path: &str) -> Arc<PackageMember> {
        self.add_file_as(path, ResourceKind::from_bookpath(path))
    }

    pub fn add_file_as(&self, path: &str, kind: ResourceKind) -> Arc<PackageMember> {
        let member = Arc::new(PackageMember::new(
            &self.book_root,
            path,
            kind,
            Arc::clone(&self.events),
        ));
        let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
        members.insert(member.id(), Arc::clone(&member));
        member
    }

    pub fn member(&self, id: MemberId) -> Option<Arc<PackageMember>> {
        let members = self.members.read().unwrap_or_else(PoisonError::into_inner);
        members.get(&id).cloned()
    }

    pub fn require(&self, id: MemberId) -> FolioResult<Arc<PackageMember>> {
        self.member(id)
            .ok_or_else(|| FolioError::UnknownIdentifier(id.to_string()))
    }

    /// All tracked members, ordered by book path for deterministic
    /// iteration.
    pub fn all_members(&self) -> Vec<Arc<PackageMember>> {
        let members = self.members.read().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<Arc<PackageMember>> = members.values().cloned().collect();
        all.sort_by(|a, b| bookpath::natural_cmp(&a.bookpath(), &b.bookpath()));
        all
    }

    /// Every member's current book path, used for duplicate-path checks.
    pub fn all_bookpaths(&self) -> Vec<String> {
        self.all_members().iter().map(|m| m.bookpath()).collect()
    }

    pub fn member_by_bookpath(&self, path: &str) -> Option<Arc<PackageMember>> {
        let members = self.members.read().unwrap_or_else(PoisonError::into_inner);
        members.values().find(|m| m.bookpath() == path).cloned()
    }

    pub fn member_by_full_path(&self, path: &Path) -> Option<Arc<PackageMember>> {
        let members = self.members.read().unwrap_or_else(PoisonError::into_inner);
        members.values().find(|m| m.full_path() == path).cloned()
    }

    /// Stop tracking a member, after its file has been deleted.
    pub fn remove(&self, id: MemberId) -> Option<Arc<PackageMember>> {
        let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
        members.remove(&id)
    }

    pub fn len(&self) -> usize {
        let members = self.members.read().unwrap_or_else(PoisonError::into_inner);
        members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Regenerate every member's short display name. A plain filename is
    /// used when unique; colliding names grow trailing folder segments
    /// until they are distinct.
    pub fn update_short_names(&self) {
        let members = self.all_members();
        let paths: Vec<String> = members.iter().map(|m| m.bookpath()).collect();
        let mut depths = vec![1usize; paths.len()];
        loop {
            let names: Vec<String> = paths
                .iter()
                .zip(&depths)
                .map(|(p, d)| tail_segments(p, *d))
                .collect();
            let mut counts: HashMap<String, usize> = HashMap::new();
            for name in &names {
                *counts.entry(name.to_lowercase()).or_insert(0) += 1;
            }
            let mut grew = false;
            for (i, name) in names.iter().enumerate() {
                if counts[&name.to_lowercase()] > 1 {
                    let max_depth = paths[i].split('/').count();
                    if depths[i] < max_depth {
                        depths[i] += 1;
                        grew = true;
                    }
                }
            }
            if !grew {
                for (member, name) in members.iter().zip(names) {
                    member.set_short_name(name);
                }
                return;
            }
        }
    }
}

/// Last `n` segments of a book path, joined back with `/`.
fn tail_segments(path: &str, n: usize) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let start = segments.len().saturating_sub(n);
    segments[start..].join("/")
}
