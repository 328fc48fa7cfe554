//! Tests for the `folio` CLI commands

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;

use super::common::{fixture_book, folio_command};

#[test]
fn test_tree_lists_groups_and_members() {
    let dir = fixture_book();

    folio_command()
        .arg("tree")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Text/"))
        .stdout(predicate::str::contains("chapter1.xhtml"))
        .stdout(predicate::str::contains("content.opf"));
}

#[test]
fn test_tree_rejects_missing_folder() {
    folio_command()
        .arg("tree")
        .arg("/no/such/book")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn test_order_prints_documents_in_spine_order() {
    let dir = fixture_book();

    let output = folio_command()
        .arg("order")
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let ch1 = stdout.find("chapter1.xhtml").unwrap();
    let ch2 = stdout.find("chapter2.xhtml").unwrap();
    assert!(ch1 < ch2, "{stdout}");
}

#[test]
fn test_rename_updates_references_and_reports_success() {
    let dir = fixture_book();

    folio_command()
        .arg("rename")
        .arg(dir.path())
        .arg("Styles/main.css=book.css")
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed 1 file(s)."));

    assert!(dir.path().join("Styles/book.css").exists());
    let chapter = fs::read_to_string(dir.path().join("Text/chapter1.xhtml")).unwrap();
    assert!(chapter.contains("../Styles/book.css"));
}

#[test]
fn test_rename_duplicate_exits_nonzero_and_lists_failures() {
    let dir = fixture_book();

    folio_command()
        .arg("rename")
        .arg(dir.path())
        .arg("Text/chapter1.xhtml=chapter2.xhtml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be renamed"))
        .stderr(predicate::str::contains("chapter1.xhtml"));

    assert!(dir.path().join("Text/chapter1.xhtml").exists());
}

#[test]
fn test_move_relocates_file() {
    let dir = fixture_book();

    folio_command()
        .arg("move")
        .arg(dir.path())
        .arg("Images/cover.png")
        .arg("Images/art/cover.png")
        .assert()
        .success();

    assert!(dir.path().join("Images/art/cover.png").exists());
    let css = fs::read_to_string(dir.path().join("Styles/main.css")).unwrap();
    assert!(css.contains("../Images/art/cover.png"));
}
