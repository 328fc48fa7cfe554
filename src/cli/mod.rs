pub mod mv;
pub mod order;
pub mod rename;
pub mod tree;

use std::path::Path;
use std::sync::Arc;

use folio::{
    load_book, EventBus, FolioError, FolioResult, LoadedBook, ResourceTree, Settings,
};

/// A loaded book plus the presentation state the commands operate on.
pub struct OpenBook {
    pub book: LoadedBook,
    pub tree: ResourceTree,
    pub settings: Settings,
}

/// Load the package under `book_dir` and build its resource tree.
pub fn open_book(book_dir: &str, full_paths: bool) -> FolioResult<OpenBook> {
    let root = Path::new(book_dir);
    if !root.is_dir() {
        return Err(FolioError::Path(format!(
            "not a directory: {}",
            root.display()
        )));
    }

    let mut settings = Settings::load()?;
    if full_paths {
        settings.show_full_paths = true;
    }

    let events = Arc::new(EventBus::new());
    let book = load_book(root, events)?;
    let mut tree = ResourceTree::new();
    tree.refresh(&book.registry, &book.manifest, &settings);

    Ok(OpenBook {
        book,
        tree,
        settings,
    })
}
