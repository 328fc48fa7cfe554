//! Filename/path validation and the batch rename/move transaction.
//!
//! Batches are user-driven, so one bad name does not abort the rest:
//! every entry that validates is applied, failures are collected and
//! reported together, and atomicity holds per member only. Every batch,
//! even an empty one, ends with a full tree refresh and a reading-order
//! recomputation so the presentation always reflects the authoritative
//! member set.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use folio_core::core::path as bookpath;
use folio_core::core::path::FORBIDDEN_FILENAME_CHARS;
use folio_core::{FolioResult, ValidationError};

use crate::book::manifest::PackageManifest;
use crate::config::Settings;
use crate::events::ResourceEvent;
use crate::refs::ReferenceRewriter;
use crate::resource::member::{MemberId, PackageMember};
use crate::resource::registry::MemberRegistry;
use crate::tree::{recompute_reading_order, ResourceTree};

/// Reserved package subfolder never eligible for user rename/move.
pub const PROTECTED_FOLDER: &str = "META-INF/";

/// Outcome of a batch rename/move. Entries that did not validate or whose
/// file operation failed are listed by their current display form; the
/// entries that did validate were applied regardless.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub not_processed: Vec<String>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.not_processed.is_empty()
    }
}

pub struct RenamePlanner<'a> {
    registry: &'a MemberRegistry,
    manifest: &'a PackageManifest,
    rewriter: &'a dyn ReferenceRewriter,
    settings: &'a Settings,
}

impl<'a> RenamePlanner<'a> {
    pub fn new(
        registry: &'a MemberRegistry,
        manifest: &'a PackageManifest,
        rewriter: &'a dyn ReferenceRewriter,
        settings: &'a Settings,
    ) -> Self {
        Self {
            registry,
            manifest,
            rewriter,
            settings,
        }
    }

    /// Validate a proposed filename within the member's current folder.
    /// Rejections are detected before any mutation and report the specific
    /// reason with the offending value.
    pub fn validate_filename(
        &self,
        old_bookpath: &str,
        new_filename: &str,
    ) -> Result<(), ValidationError> {
        for character in new_filename.chars() {
            if FORBIDDEN_FILENAME_CHARS.contains(&character) {
                return Err(ValidationError::ForbiddenCharacter {
                    name: new_filename.to_string(),
                    character,
                });
            }
        }
        if new_filename.is_empty() || bookpath::stem(new_filename).is_empty() {
            return Err(ValidationError::EmptyFilename);
        }
        // The proposed path must be free even on case-insensitive file
        // systems, as many reading devices have.
        let proposed = bookpath::join(bookpath::folder(old_bookpath), new_filename);
        let proposed_lower = proposed.to_lowercase();
        if self
            .registry
            .all_bookpaths()
            .iter()
            .any(|p| p.to_lowercase() == proposed_lower)
        {
            return Err(ValidationError::DuplicateFilename(new_filename.to_string()));
        }
        Ok(())
    }

    /// Validate a proposed full book path for a move. A move specifies a
    /// full normalized path, so the duplicate check is exact.
    pub fn validate_bookpath(&self, new_bookpath: &str) -> Result<(), ValidationError> {
        if new_bookpath.is_empty() {
            return Err(ValidationError::EmptyBookPath);
        }
        if self
            .registry
            .all_bookpaths()
            .iter()
            .any(|p| p == new_bookpath)
        {
            return Err(ValidationError::DuplicateBookPath(new_bookpath.to_string()));
        }
        Ok(())
    }

    pub fn rename_member(
        &self,
        tree: &mut ResourceTree,
        id: MemberId,
        new_filename: &str,
    ) -> FolioResult<BatchReport> {
        self.rename_members(tree, &[(id, new_filename.to_string())])
    }

    /// Apply a batch of renames. See the module docs for the transaction
    /// semantics.
    pub fn rename_members(
        &self,
        tree: &mut ResourceTree,
        pairs: &[(MemberId, String)],
    ) -> FolioResult<BatchReport> {
        let mut not_processed = Vec::new();
        let mut mapping = HashMap::new();

        for (id, new_filename) in pairs {
            let member = self.registry.require(*id)?;
            let old_bookpath = member.bookpath();
            // Infrastructure, not user content.
            if old_bookpath.starts_with(PROTECTED_FOLDER) {
                debug!(path = %old_bookpath, "protected member skipped");
                continue;
            }

            let old_filename = member.filename();
            let mut proposed = new_filename.clone();
            if !proposed.contains('.') {
                if let Some(ext) = bookpath::extension(&old_filename) {
                    proposed.push('.');
                    proposed.push_str(ext);
                }
            }
            if old_filename == proposed {
                continue;
            }

            if let Err(err) = self.validate_filename(&old_bookpath, &proposed) {
                debug!(%err, path = %old_bookpath, "rename rejected");
                not_processed.push(self.display_name(&member));
                continue;
            }
            if let Err(err) = self.apply_relocation(&member, Relocation::Rename(&proposed)) {
                warn!(%err, path = %old_bookpath, "rename failed");
                not_processed.push(self.display_name(&member));
                continue;
            }
            mapping.insert(old_bookpath, member.bookpath());
        }

        self.finish_batch(tree, mapping)?;
        Ok(BatchReport { not_processed })
    }

    /// Apply a batch of moves to new full book paths.
    pub fn move_members(
        &self,
        tree: &mut ResourceTree,
        pairs: &[(MemberId, String)],
    ) -> FolioResult<BatchReport> {
        let mut not_processed = Vec::new();
        let mut mapping = HashMap::new();

        for (id, new_bookpath) in pairs {
            let member = self.registry.require(*id)?;
            let old_bookpath = member.bookpath();
            if old_bookpath.starts_with(PROTECTED_FOLDER) {
                debug!(path = %old_bookpath, "protected member skipped");
                continue;
            }
            if old_bookpath == *new_bookpath {
                continue;
            }
            if let Err(err) = self.validate_bookpath(new_bookpath) {
                debug!(%err, path = %old_bookpath, "move rejected");
                not_processed.push(self.display_name(&member));
                continue;
            }
            if let Err(err) = self.apply_relocation(&member, Relocation::Move(new_bookpath)) {
                warn!(%err, path = %old_bookpath, "move failed");
                not_processed.push(self.display_name(&member));
                continue;
            }
            mapping.insert(old_bookpath, member.bookpath());
        }

        self.finish_batch(tree, mapping)?;
        Ok(BatchReport { not_processed })
    }

    /// Commit an in-place edit of a member's displayed name. Only the
    /// final path segment of the edited text counts as the new filename.
    /// The `RenameAttempted` notification is always raised, even when the
    /// edit was rejected.
    pub fn rename_edited(
        &self,
        tree: &mut ResourceTree,
        id: MemberId,
        edited_text: &str,
    ) -> FolioResult<BatchReport> {
        let member = self.registry.require(id)?;
        let new_filename = bookpath::filename(edited_text).to_string();
        let report = if !new_filename.is_empty() && new_filename != member.filename() {
            self.rename_members(tree, &[(id, new_filename)])?
        } else {
            BatchReport::default()
        };
        self.registry
            .events()
            .emit(&ResourceEvent::RenameAttempted { id });
        Ok(report)
    }

    /// One member's physical relocation. The manifest descriptor and the
    /// navigation descriptor additionally update their self-referential
    /// manifest metadata; the set of kinds needing the specialized path is
    /// closed.
    fn apply_relocation(
        &self,
        member: &Arc<PackageMember>,
        relocation: Relocation<'_>,
    ) -> FolioResult<()> {
        let old_bookpath = member.bookpath();
        match relocation {
            Relocation::Rename(filename) => member.rename_to(filename)?,
            Relocation::Move(path) => member.move_to(path)?,
        }
        if member.kind().is_descriptor() {
            self.manifest
                .descriptor_relocated(member.kind(), &old_bookpath, &member.bookpath());
        }
        Ok(())
    }

    /// Tail of the transaction: one reference-rewriting pass over the
    /// whole member set, a single "book modified" notification iff
    /// anything changed, then the unconditional refresh and reading-order
    /// recomputation.
    fn finish_batch(
        &self,
        tree: &mut ResourceTree,
        mapping: HashMap<String, String>,
    ) -> FolioResult<()> {
        if !mapping.is_empty() {
            self.manifest.paths_relocated(&mapping);
            let members = self.registry.all_members();
            self.rewriter.rewrite_references(&members, &mapping)?;
            self.registry
                .events()
                .emit(&ResourceEvent::BookContentModified);
        }
        self.registry.update_short_names();
        tree.refresh(self.registry, self.manifest, self.settings);
        recompute_reading_order(tree, self.manifest);
        Ok(())
    }

    fn display_name(&self, member: &PackageMember) -> String {
        if self.settings.show_full_paths {
            member.bookpath()
        } else {
            member.short_name()
        }
    }
}

enum Relocation<'a> {
    Rename(&'a str),
    Move(&'a str),
}
