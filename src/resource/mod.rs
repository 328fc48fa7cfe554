pub mod kind;
pub mod member;
pub mod registry;
pub mod watcher;

pub use kind::{media_type, Category, ResourceKind};
pub use member::{MemberId, PackageMember};
pub use registry::MemberRegistry;
pub use watcher::{schedule_reload, DebounceVerdict, PackageWatcher, Sample};
