//! Common utilities for integration tests

use std::fs;
use std::process::Command;
use tempfile::TempDir;

pub fn folio_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_folio"))
}

/// Unpacked EPUB folder with two chapters, a stylesheet, an image and a
/// font, wired together by real cross-references.
pub fn fixture_book() -> TempDir {
    let dir = TempDir::new().unwrap();
    let chapter = |title: &str| {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
  <title>{title}</title>
  <link href="../Styles/main.css" rel="stylesheet" type="text/css"/>
</head>
<body><h1>{title}</h1></body>
</html>
"#
        )
    };
    let files: &[(&str, String)] = &[
        ("mimetype", "application/epub+zip".to_string()),
        (
            "META-INF/container.xml",
            r#"<?xml version="1.0"?><container version="1.0"/>"#.to_string(),
        ),
        (
            "content.opf",
            r#"<?xml version="1.0"?><package version="2.0"></package>"#.to_string(),
        ),
        (
            "toc.ncx",
            r#"<?xml version="1.0"?><ncx version="2005-1"/>"#.to_string(),
        ),
        ("Text/chapter1.xhtml", chapter("Chapter 1")),
        ("Text/chapter2.xhtml", chapter("Chapter 2")),
        (
            "Styles/main.css",
            "body { background: url(../Images/cover.png); }\n".to_string(),
        ),
        ("Images/cover.png", "png-bytes".to_string()),
        ("Fonts/serif.ttf", "ttf-bytes".to_string()),
    ];
    for (path, content) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full, content).unwrap();
    }
    dir
}
