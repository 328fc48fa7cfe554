//! Folio: resource-tree synchronization engine for EPUB packages.
//!
//! The engine keeps four representations of a book's file package
//! consistent: the physical files on disk, the manifest describing each
//! member and the linear reading order, the hierarchical presentation tree
//! grouped by content type, and the cross-references embedded inside the
//! documents themselves. Structural mutations funnel through
//! [`rename::RenamePlanner`] and always end with a full tree refresh.

pub use folio_core::{FolioError, FolioResult, ValidationError};

/// Book-level state: the manifest/spine owner and the folder loader.
pub mod book;

/// Settings persistence.
pub mod config;

/// Synchronous structural-change notifications.
pub mod events;

/// Cross-reference rewriting.
pub mod refs;

/// Filename/path validation and the batch rename/move transaction.
pub mod rename;

/// Package members, the canonical registry and the disk-change watcher.
pub mod resource;

/// The grouped presentation tree and reading-order maintenance.
pub mod tree;

pub use book::{load_book, LoadedBook, PackageManifest};
pub use config::Settings;
pub use events::{EventBus, ResourceEvent};
pub use refs::{ReferenceRewriter, RegexRewriter};
pub use rename::{BatchReport, RenamePlanner};
pub use resource::{Category, MemberId, MemberRegistry, PackageMember, ResourceKind};
pub use tree::{IndexChoice, ResourceTree, TreeLocation, TreeNode};
