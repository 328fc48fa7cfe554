//! The in-memory presentation tree.
//!
//! Members are grouped into seven permanent top-level categories, each
//! sorted alphanumerically, with the Text group additionally ordered by
//! the linear reading order. The tree is a derived view: it is always
//! rebuilt in full from the registry's current state, never patched
//! incrementally, so a refresh after any structural change guarantees
//! convergence.

use tracing::debug;

use folio_core::core::path as bookpath;
use folio_core::{FolioError, FolioResult};

use crate::book::manifest::PackageManifest;
use crate::config::Settings;
use crate::events::{EventBus, ResourceEvent};
use crate::resource::kind::{Category, ResourceKind};
use crate::resource::member::MemberId;
use crate::resource::registry::MemberRegistry;

/// One presentation entry referencing a member by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: MemberId,
    pub display_name: String,
    pub tooltip: String,
    /// Display name without its extension, used for alphanumeric sorting.
    lexical_key: String,
    /// Reading-order position; `Some` only for Document-typed members that
    /// appear in the spine.
    pub order_key: Option<usize>,
}

/// Bias applied when looking up a member's position, used for "select the
/// next logical item after this one is removed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexChoice {
    Exact,
    Previous,
    Next,
}

/// Position of a member in the tree. `category` is `None` for the two
/// descriptor singletons, which live at the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLocation {
    pub category: Option<Category>,
    pub row: usize,
}

#[derive(Default)]
pub struct ResourceTree {
    groups: [Vec<TreeNode>; 7],
    descriptors: Vec<TreeNode>,
}

impl ResourceTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the entire tree from the registry's current member set.
    /// Idempotent: two refreshes without intervening mutation produce an
    /// identical tree.
    pub fn refresh(
        &mut self,
        registry: &MemberRegistry,
        manifest: &PackageManifest,
        settings: &Settings,
    ) {
        for group in &mut self.groups {
            group.clear();
        }
        self.descriptors.clear();

        let members = registry.all_members();
        let reading_order = manifest.reading_order_for(&members);
        let roles = manifest.semantic_roles_for_paths();
        let properties = manifest.manifest_properties_for_paths();

        for member in &members {
            if member.is_deleted() {
                continue;
            }
            let path = member.bookpath();
            let display_name = if settings.show_full_paths {
                path.clone()
            } else {
                member.short_name()
            };
            let mut tooltip = path.clone();
            if let Some(role) = roles.get(&path) {
                tooltip.push_str(&format!(" ({role})"));
            }
            if let Some(props) = properties.get(&path) {
                tooltip.push_str(&format!(" [{props}]"));
            }
            let order_key = if member.kind() == ResourceKind::Document {
                reading_order.get(&member.id()).copied()
            } else {
                None
            };
            let node = TreeNode {
                id: member.id(),
                lexical_key: bookpath::stem(&display_name).to_string(),
                display_name,
                tooltip,
                order_key,
            };
            match member.kind().category() {
                Some(category) => self.groups[category.index()].push(node),
                None => self.descriptors.push(node),
            }
        }

        for group in &mut self.groups {
            group.sort_by(|a, b| bookpath::natural_cmp(&a.lexical_key, &b.lexical_key));
        }
        self.descriptors
            .sort_by(|a, b| bookpath::natural_cmp(&a.lexical_key, &b.lexical_key));
        // Documents missing from the spine sort after ordered ones.
        self.groups[Category::Text.index()].sort_by_key(|n| n.order_key.unwrap_or(usize::MAX));
        debug!("tree refreshed");
    }

    pub fn category_nodes(&self, category: Category) -> &[TreeNode] {
        &self.groups[category.index()]
    }

    pub fn descriptor_nodes(&self) -> &[TreeNode] {
        &self.descriptors
    }

    /// The first entry of the Text group. Downstream consumers need at
    /// least one content document to proceed, so an empty group is a
    /// reportable condition rather than a silent empty result.
    pub fn first_document(&self) -> FolioResult<&TreeNode> {
        self.groups[Category::Text.index()]
            .first()
            .ok_or(FolioError::NoContentDocuments)
    }

    /// Find a member's position, optionally biased to the previous or next
    /// sibling. The bias clamps at group edges and is never applied to the
    /// root-level descriptors.
    pub fn locate(&self, id: MemberId, choice: IndexChoice) -> Option<TreeLocation> {
        if let Some(row) = self.descriptors.iter().position(|n| n.id == id) {
            return Some(TreeLocation {
                category: None,
                row,
            });
        }
        for category in Category::ALL {
            let nodes = &self.groups[category.index()];
            if let Some(mut row) = nodes.iter().position(|n| n.id == id) {
                match choice {
                    IndexChoice::Previous if row > 0 => row -= 1,
                    IndexChoice::Next if row + 1 < nodes.len() => row += 1,
                    _ => {}
                }
                return Some(TreeLocation {
                    category: Some(category),
                    row,
                });
            }
        }
        None
    }

    /// Relocate a Text row, as a drag/drop of a document does. The caller
    /// must follow up with [`documents_repositioned`]: reordering is
    /// detected from final positions, not from move events.
    pub fn relocate_document(&mut self, from: usize, to: usize) -> FolioResult<()> {
        let text = &mut self.groups[Category::Text.index()];
        if from >= text.len() || to >= text.len() {
            return Err(FolioError::Path(format!(
                "document row out of range: {from} -> {to}"
            )));
        }
        let node = text.remove(from);
        text.insert(to, node);
        Ok(())
    }

    /// Re-sort exactly the given subset of Text rows alphanumerically,
    /// reinserting the sorted block at the subset's first position so the
    /// untouched siblings keep their relative order.
    pub fn sort_documents_alphanumeric(&mut self, rows: &[usize]) {
        let text = &mut self.groups[Category::Text.index()];
        let mut rows: Vec<usize> = rows.iter().copied().filter(|r| *r < text.len()).collect();
        rows.sort_unstable();
        rows.dedup();
        if rows.is_empty() {
            return;
        }
        let insert_at = rows[0];
        let mut selected = Vec::with_capacity(rows.len());
        for row in rows.iter().rev() {
            selected.push(text.remove(*row));
        }
        selected.sort_by(|a, b| bookpath::natural_cmp(&a.lexical_key, &b.lexical_key));
        for (offset, node) in selected.into_iter().enumerate() {
            text.insert(insert_at + offset, node);
        }
    }

    /// Renumber the Text group top-to-bottom and return the ordered member
    /// list for the spine push.
    pub fn renumber_documents(&mut self) -> Vec<MemberId> {
        let text = &mut self.groups[Category::Text.index()];
        let mut ordered = Vec::with_capacity(text.len());
        for (i, node) in text.iter_mut().enumerate() {
            node.order_key = Some(i);
            ordered.push(node.id);
        }
        ordered
    }

    pub fn document_count(&self) -> usize {
        self.groups[Category::Text.index()].len()
    }
}

/// Full recomputation of the reading order: walk the Text group
/// top-to-bottom, assign each member's order key to its position and push
/// the ordered list to the manifest spine. Never an incremental delta,
/// since drag/drop and batch rename can reshuffle several positions at once.
pub fn recompute_reading_order(tree: &mut ResourceTree, manifest: &PackageManifest) {
    let ordered = tree.renumber_documents();
    manifest.set_reading_order(ordered);
}

/// Entry point for position-based reorder detection (drag/drop within the
/// Text group with no rename/move involved): renumber, persist the spine
/// and mark the book as modified.
pub fn documents_repositioned(
    tree: &mut ResourceTree,
    manifest: &PackageManifest,
    events: &EventBus,
) {
    recompute_reading_order(tree, manifest);
    events.emit(&ResourceEvent::BookContentModified);
}

/// Re-sort the selected Text rows alphanumerically and renumber the whole
/// group.
pub fn sort_documents(
    tree: &mut ResourceTree,
    manifest: &PackageManifest,
    events: &EventBus,
    rows: &[usize],
) {
    tree.sort_documents_alphanumeric(rows);
    documents_repositioned(tree, manifest, events);
}
