use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use tracing::debug;
use uuid::Uuid;

use folio_core::core::path as bookpath;
use folio_core::{FolioError, FolioResult};

use crate::events::{EventBus, ResourceEvent};
use crate::resource::kind::{media_type, ResourceKind};

/// Opaque member identifier, assigned at creation and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(Uuid);

impl MemberId {
    pub(crate) fn new() -> Self {
        MemberId(Uuid::new_v4())
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Modification stamps used to debounce external writes.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct FileStamps {
    /// Modification time of the file as last written by this session.
    pub last_saved: Option<SystemTime>,
    /// Modification time observed at the previous watcher sample.
    pub last_written_to: Option<SystemTime>,
    /// Size observed at the previous watcher sample.
    pub last_written_size: u64,
}

/// One file inside the package: identity, current book path, generated
/// short display name, type tag.
///
/// The path is held behind a reader/writer lock so a foreground
/// rename/move and a background-triggered reload can never interleave a
/// torn read. The lock is taken for write for the duration of the physical
/// file operation plus the path-field update; the in-memory path changes
/// only after the file operation succeeds.
pub struct PackageMember {
    id: MemberId,
    book_root: PathBuf,
    kind: ResourceKind,
    media_type: &'static str,
    path: RwLock<String>,
    short_name: RwLock<String>,
    deleted: AtomicBool,
    stamps: Mutex<FileStamps>,
    events: Arc<EventBus>,
}

impl PackageMember {
    pub fn new(
        book_root: impl Into<PathBuf>,
        path: impl Into<String>,
        kind: ResourceKind,
        events: Arc<EventBus>,
    ) -> Self {
        let path = path.into();
        let name = bookpath::filename(&path).to_string();
        Self {
            id: MemberId::new(),
            book_root: book_root.into(),
            kind,
            media_type: media_type(&name),
            path: RwLock::new(path),
            short_name: RwLock::new(name),
            deleted: AtomicBool::new(false),
            stamps: Mutex::new(FileStamps::default()),
            events,
        }
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn media_type(&self) -> &'static str {
        self.media_type
    }

    pub fn book_root(&self) -> &Path {
        &self.book_root
    }

    /// Current book path (location relative to the package root).
    pub fn bookpath(&self) -> String {
        self.read_path().clone()
    }

    /// Final segment of the book path.
    pub fn filename(&self) -> String {
        bookpath::filename(&self.read_path()).to_string()
    }

    /// Directory part of the book path.
    pub fn folder(&self) -> String {
        bookpath::folder(&self.read_path()).to_string()
    }

    /// Absolute path of the member's file on disk.
    pub fn full_path(&self) -> PathBuf {
        self.book_root.join(self.read_path().as_str())
    }

    /// Generated, possibly-deduplicated short display name.
    pub fn short_name(&self) -> String {
        self.short_name
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set_short_name(&self, name: impl Into<String>) {
        let mut short = self
            .short_name
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *short = name.into();
    }

    /// Relative reference from this member's folder to `other`.
    pub fn relative_path_to(&self, other: &PackageMember) -> String {
        bookpath::relative_to(&other.bookpath(), &self.folder())
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted.load(Ordering::SeqCst)
    }

    /// Rename the file within its folder. The physical rename happens
    /// first; the in-memory path is updated only if it succeeds, and the
    /// `Renamed` notification is delivered synchronously before returning.
    pub fn rename_to(&self, new_filename: &str) -> FolioResult<()> {
        self.ensure_live()?;
        let old_path;
        {
            let mut path = self.write_path();
            let new_bookpath = bookpath::join(bookpath::folder(&path), new_filename);
            let from = self.book_root.join(path.as_str());
            let to = self.book_root.join(&new_bookpath);
            fs::rename(&from, &to).map_err(|source| FolioError::FileOperation {
                path: path.clone(),
                source,
            })?;
            old_path = path.clone();
            *path = new_bookpath;
        }
        self.set_short_name(new_filename);
        debug!(%old_path, new_path = %self.bookpath(), "member renamed");
        self.events.emit(&ResourceEvent::Renamed {
            id: self.id,
            old_path,
        });
        Ok(())
    }

    /// Move the file to a new book path anywhere in the package, creating
    /// the destination folder if needed.
    pub fn move_to(&self, new_bookpath: &str) -> FolioResult<()> {
        self.ensure_live()?;
        let old_path;
        {
            let mut path = self.write_path();
            let from = self.book_root.join(path.as_str());
            let to = self.book_root.join(new_bookpath);
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent).map_err(|source| FolioError::FileOperation {
                    path: path.clone(),
                    source,
                })?;
            }
            fs::rename(&from, &to).map_err(|source| FolioError::FileOperation {
                path: path.clone(),
                source,
            })?;
            old_path = path.clone();
            *path = new_bookpath.to_string();
        }
        debug!(%old_path, new_path = %new_bookpath, "member moved");
        self.events.emit(&ResourceEvent::Moved {
            id: self.id,
            old_path,
        });
        Ok(())
    }

    /// Delete the file. After a successful delete no further mutation of
    /// this member is permitted.
    pub fn delete(&self) -> FolioResult<()> {
        self.ensure_live()?;
        let old_path;
        {
            let path = self.write_path();
            fs::remove_file(self.book_root.join(path.as_str())).map_err(|source| {
                FolioError::FileOperation {
                    path: path.clone(),
                    source,
                }
            })?;
            old_path = path.clone();
        }
        self.deleted.store(true, Ordering::SeqCst);
        self.events.emit(&ResourceEvent::Deleted {
            id: self.id,
            old_path,
        });
        Ok(())
    }

    /// Record the file's modification time after this session wrote it, so
    /// the watcher can tell its own writes from external ones.
    pub fn save_stamp(&self) {
        let modified = fs::metadata(self.full_path())
            .ok()
            .and_then(|md| md.modified().ok());
        let mut stamps = self.stamps();
        stamps.last_saved = modified;
    }

    pub(crate) fn stamps(&self) -> MutexGuard<'_, FileStamps> {
        self.stamps.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn notify_updated_from_disk(&self) {
        self.events
            .emit(&ResourceEvent::UpdatedFromDisk { id: self.id });
    }

    fn ensure_live(&self) -> FolioResult<()> {
        if self.is_deleted() {
            return Err(FolioError::MemberDeleted(self.bookpath()));
        }
        Ok(())
    }

    fn read_path(&self) -> RwLockReadGuard<'_, String> {
        self.path.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_path(&self) -> RwLockWriteGuard<'_, String> {
        self.path.write().unwrap_or_else(PoisonError::into_inner)
    }
}
