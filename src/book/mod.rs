pub mod loader;
pub mod manifest;

pub use loader::{load_book, LoadedBook};
pub use manifest::PackageManifest;
