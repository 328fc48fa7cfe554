//! Reading-order maintenance across drag/drop style reordering.

use std::sync::{Arc, Mutex};

use folio::tree::{documents_repositioned, sort_documents};
use folio::{load_book, Category, EventBus, ResourceEvent, ResourceTree, Settings};

use super::common::fixture_book;

#[test]
fn test_relocate_document_renumbers_and_pushes_spine() {
    let dir = fixture_book();
    let events = Arc::new(EventBus::new());
    let modified = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&modified);
    events.subscribe(move |e| {
        if matches!(e, ResourceEvent::BookContentModified) {
            *counter.lock().unwrap() += 1;
        }
    });

    let book = load_book(dir.path(), events.clone()).unwrap();
    let settings = Settings::default();
    let mut tree = ResourceTree::new();
    tree.refresh(&book.registry, &book.manifest, &settings);

    let before: Vec<String> = tree
        .category_nodes(Category::Text)
        .iter()
        .map(|n| n.display_name.clone())
        .collect();
    assert_eq!(before, vec!["chapter1.xhtml", "chapter2.xhtml"]);

    tree.relocate_document(1, 0).unwrap();
    documents_repositioned(&mut tree, &book.manifest, &events);

    let after: Vec<String> = tree
        .category_nodes(Category::Text)
        .iter()
        .map(|n| n.display_name.clone())
        .collect();
    assert_eq!(after, vec!["chapter2.xhtml", "chapter1.xhtml"]);
    assert_eq!(*modified.lock().unwrap(), 1);

    // The spine now leads with chapter2 and a fresh refresh keeps that order.
    let spine = book.manifest.reading_order();
    let ch2 = book
        .registry
        .member_by_bookpath("Text/chapter2.xhtml")
        .unwrap();
    assert_eq!(spine.first(), Some(&ch2.id()));

    tree.refresh(&book.registry, &book.manifest, &settings);
    let refreshed: Vec<String> = tree
        .category_nodes(Category::Text)
        .iter()
        .map(|n| n.display_name.clone())
        .collect();
    assert_eq!(refreshed, after);
}

#[test]
fn test_subset_sort_reorders_only_selection() {
    let dir = fixture_book();
    let extra = dir.path().join("Text/appendix.xhtml");
    std::fs::write(&extra, "<html/>").unwrap();

    let events = Arc::new(EventBus::new());
    let book = load_book(dir.path(), Arc::clone(&events)).unwrap();
    let settings = Settings::default();
    let mut tree = ResourceTree::new();
    tree.refresh(&book.registry, &book.manifest, &settings);

    // Natural order on load: appendix, chapter1, chapter2. Reverse it, then
    // sort only the last two rows back.
    tree.relocate_document(0, 2).unwrap();
    tree.relocate_document(0, 1).unwrap();
    documents_repositioned(&mut tree, &book.manifest, &events);
    let reversed: Vec<String> = tree
        .category_nodes(Category::Text)
        .iter()
        .map(|n| n.display_name.clone())
        .collect();
    assert_eq!(
        reversed,
        vec!["chapter2.xhtml", "chapter1.xhtml", "appendix.xhtml"]
    );

    sort_documents(&mut tree, &book.manifest, &events, &[1, 2]);
    let sorted: Vec<String> = tree
        .category_nodes(Category::Text)
        .iter()
        .map(|n| n.display_name.clone())
        .collect();
    assert_eq!(
        sorted,
        vec!["chapter2.xhtml", "appendix.xhtml", "chapter1.xhtml"]
    );

    // Orders follow the new positions.
    let orders: Vec<Option<usize>> = tree
        .category_nodes(Category::Text)
        .iter()
        .map(|n| n.order_key)
        .collect();
    assert_eq!(orders, vec![Some(0), Some(1), Some(2)]);
}
