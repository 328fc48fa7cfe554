//! External-change detection.
//!
//! A background watcher reports "changed on disk" for a member's file. The
//! member then samples the file's modification time and size, waits a
//! short interval and re-samples: a sample matching the session's own last
//! save is a false echo and is suppressed; samples that keep changing mean
//! another process is still writing and the check is re-armed; two
//! identical consecutive samples mean the write settled and a reload
//! notification fires.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

use folio_core::{FolioError, FolioResult};

use crate::resource::member::PackageMember;
use crate::resource::registry::MemberRegistry;

/// Delay between samples while waiting for an external write to settle.
pub const WAIT_FOR_WRITE_DELAY: Duration = Duration::from_millis(100);

/// One observation of a file's modification time and size. A missing file
/// samples as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub modified: Option<SystemTime>,
    pub size: u64,
}

impl Sample {
    pub fn of(path: &Path) -> Sample {
        match fs::metadata(path) {
            Ok(md) => Sample {
                modified: md.modified().ok(),
                size: md.len(),
            },
            Err(_) => Sample {
                modified: None,
                size: 0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceVerdict {
    /// The change matches what this session itself last wrote; the
    /// notification is a false echo.
    Suppressed,
    /// The file is still being written to; sample again after the delay.
    StillChanging,
    /// Two consecutive samples agree; the file was modified externally.
    Settled,
}

impl PackageMember {
    /// A watcher reported a change for this member's file: capture the
    /// current stamp and arm the debounce.
    pub fn file_changed_on_disk(&self) {
        let sample = Sample::of(&self.full_path());
        let mut stamps = self.stamps();
        stamps.last_written_to = sample.modified;
        stamps.last_written_size = sample.size;
    }

    /// Judge a fresh sample against the armed stamps.
    pub fn judge_sample(&self, sample: Sample) -> DebounceVerdict {
        let mut stamps = self.stamps();
        if sample.modified.is_some() && sample.modified == stamps.last_saved {
            // The watcher fired for a write this session performed itself;
            // the in-memory state may be newer than the file.
            return DebounceVerdict::Suppressed;
        }
        if sample.modified != stamps.last_written_to || sample.size != stamps.last_written_size {
            stamps.last_written_to = sample.modified;
            stamps.last_written_size = sample.size;
            return DebounceVerdict::StillChanging;
        }
        DebounceVerdict::Settled
    }

    /// Re-sample the file on disk and judge it.
    pub fn resample_after_change(&self) -> DebounceVerdict {
        self.judge_sample(Sample::of(&self.full_path()))
    }
}

/// Drive one member's debounce to completion on a background thread. The
/// re-arm loop is capped: a file that never stops changing is dropped with
/// a warning instead of being polled forever.
pub fn schedule_reload(member: Arc<PackageMember>, interval: Duration, max_resamples: u32) {
    member.file_changed_on_disk();
    thread::spawn(move || {
        for _ in 0..max_resamples {
            thread::sleep(interval);
            if member.is_deleted() {
                return;
            }
            match member.resample_after_change() {
                DebounceVerdict::Suppressed => return,
                DebounceVerdict::StillChanging => continue,
                DebounceVerdict::Settled => {
                    debug!(path = %member.bookpath(), "externally modified, signaling reload");
                    member.notify_updated_from_disk();
                    return;
                }
            }
        }
        warn!(
            path = %member.bookpath(),
            "file kept changing on disk after {max_resamples} samples, giving up on reload"
        );
    });
}

/// Watches the book folder and routes change reports to the owning
/// members. Dropping the watcher stops it.
pub struct PackageWatcher {
    _watcher: RecommendedWatcher,
}

impl PackageWatcher {
    pub fn start(
        registry: Arc<MemberRegistry>,
        interval: Duration,
        max_resamples: u32,
    ) -> FolioResult<Self> {
        let root = registry.book_root().to_path_buf();
        let mut watcher = notify::recommended_watcher(
            move |result: Result<notify::Event, notify::Error>| match result {
                Ok(event) => {
                    for path in event.paths {
                        if let Some(member) = registry.member_by_full_path(&path) {
                            debug!(path = %member.bookpath(), "change reported on disk");
                            schedule_reload(member, interval, max_resamples);
                        }
                    }
                }
                Err(err) => warn!("file watcher error: {err}"),
            },
        )
        .map_err(|e| FolioError::Watch(e.to_string()))?;
        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| FolioError::Watch(e.to_string()))?;
        Ok(Self { _watcher: watcher })
    }
}
