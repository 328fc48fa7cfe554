//! End-to-end rename/move flows against a real on-disk book folder.

use std::fs;
use std::sync::{Arc, Mutex};

use folio::{
    load_book, EventBus, LoadedBook, RegexRewriter, RenamePlanner, ResourceEvent, ResourceTree,
    Settings,
};

use super::common::fixture_book;

struct Session {
    book: LoadedBook,
    tree: ResourceTree,
    settings: Settings,
    modified: Arc<Mutex<usize>>,
}

fn open(root: &std::path::Path) -> Session {
    let events = Arc::new(EventBus::new());
    let modified = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&modified);
    events.subscribe(move |e| {
        if matches!(e, ResourceEvent::BookContentModified) {
            *counter.lock().unwrap() += 1;
        }
    });
    let book = load_book(root, events).unwrap();
    let settings = Settings::default();
    let mut tree = ResourceTree::new();
    tree.refresh(&book.registry, &book.manifest, &settings);
    Session {
        book,
        tree,
        settings,
        modified,
    }
}

#[test]
fn test_stylesheet_rename_updates_documents_on_disk() {
    let dir = fixture_book();
    let mut session = open(dir.path());
    let rewriter = RegexRewriter::new().unwrap();
    let planner = RenamePlanner::new(
        &session.book.registry,
        &session.book.manifest,
        &rewriter,
        &session.settings,
    );

    let css = session
        .book
        .registry
        .member_by_bookpath("Styles/main.css")
        .unwrap();
    let report = planner
        .rename_member(&mut session.tree, css.id(), "book.css")
        .unwrap();
    assert!(report.is_complete());

    assert!(dir.path().join("Styles/book.css").exists());
    assert!(!dir.path().join("Styles/main.css").exists());
    for chapter in ["Text/chapter1.xhtml", "Text/chapter2.xhtml"] {
        let text = fs::read_to_string(dir.path().join(chapter)).unwrap();
        assert!(text.contains(r#"href="../Styles/book.css""#), "{text}");
    }
    assert_eq!(*session.modified.lock().unwrap(), 1);
}

#[test]
fn test_partial_batch_applies_valid_entries() {
    let dir = fixture_book();
    let mut session = open(dir.path());
    let rewriter = RegexRewriter::new().unwrap();
    let planner = RenamePlanner::new(
        &session.book.registry,
        &session.book.manifest,
        &rewriter,
        &session.settings,
    );

    let ch1 = session
        .book
        .registry
        .member_by_bookpath("Text/chapter1.xhtml")
        .unwrap();
    let ch2 = session
        .book
        .registry
        .member_by_bookpath("Text/chapter2.xhtml")
        .unwrap();
    let pairs = vec![
        (ch1.id(), "intro.xhtml".to_string()),
        (ch2.id(), "intro.xhtml".to_string()),
    ];
    let report = planner.rename_members(&mut session.tree, &pairs).unwrap();

    assert_eq!(report.not_processed, vec!["chapter2.xhtml".to_string()]);
    assert!(dir.path().join("Text/intro.xhtml").exists());
    assert!(dir.path().join("Text/chapter2.xhtml").exists());
    assert_eq!(*session.modified.lock().unwrap(), 1);

    // The refreshed spine still covers both documents contiguously.
    assert_eq!(session.book.manifest.reading_order().len(), 2);
}

#[test]
fn test_move_image_updates_stylesheet_reference() {
    let dir = fixture_book();
    let mut session = open(dir.path());
    let rewriter = RegexRewriter::new().unwrap();
    let planner = RenamePlanner::new(
        &session.book.registry,
        &session.book.manifest,
        &rewriter,
        &session.settings,
    );

    let image = session
        .book
        .registry
        .member_by_bookpath("Images/cover.png")
        .unwrap();
    let report = planner
        .move_members(
            &mut session.tree,
            &[(image.id(), "Images/art/cover.png".to_string())],
        )
        .unwrap();
    assert!(report.is_complete());

    assert!(dir.path().join("Images/art/cover.png").exists());
    let css = fs::read_to_string(dir.path().join("Styles/main.css")).unwrap();
    assert!(css.contains("url(../Images/art/cover.png)"), "{css}");
}

#[test]
fn test_protected_folder_is_never_renamed() {
    let dir = fixture_book();
    let mut session = open(dir.path());
    let rewriter = RegexRewriter::new().unwrap();
    let planner = RenamePlanner::new(
        &session.book.registry,
        &session.book.manifest,
        &rewriter,
        &session.settings,
    );

    let container = session
        .book
        .registry
        .member_by_bookpath("META-INF/container.xml")
        .unwrap();
    let report = planner
        .rename_member(&mut session.tree, container.id(), "renamed.xml")
        .unwrap();

    assert!(report.is_complete());
    assert!(dir.path().join("META-INF/container.xml").exists());
    assert_eq!(*session.modified.lock().unwrap(), 0);
}

#[test]
fn test_descriptor_rename_tracks_manifest_path() {
    let dir = fixture_book();
    let mut session = open(dir.path());
    assert_eq!(
        session.book.manifest.opf_path(),
        Some("content.opf".to_string())
    );

    let rewriter = RegexRewriter::new().unwrap();
    let planner = RenamePlanner::new(
        &session.book.registry,
        &session.book.manifest,
        &rewriter,
        &session.settings,
    );
    let opf = session
        .book
        .registry
        .member_by_bookpath("content.opf")
        .unwrap();
    let report = planner
        .rename_member(&mut session.tree, opf.id(), "package.opf")
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(
        session.book.manifest.opf_path(),
        Some("package.opf".to_string())
    );
}
