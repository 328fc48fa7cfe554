use folio::{FolioError, FolioResult, MemberId, RegexRewriter, RenamePlanner};

use crate::cli::open_book;

/// Apply a batch of renames given as `book/path.ext=new-name.ext` pairs.
pub fn run(book_dir: String, pairs: Vec<String>, full_paths: bool) -> FolioResult<()> {
    let mut opened = open_book(&book_dir, full_paths)?;
    let registry = &opened.book.registry;

    let mut batch: Vec<(MemberId, String)> = Vec::with_capacity(pairs.len());
    for pair in &pairs {
        let Some((path, new_name)) = pair.split_once('=') else {
            return Err(FolioError::Path(format!(
                "expected OLD-PATH=NEW-NAME, got \"{pair}\""
            )));
        };
        let member = registry
            .member_by_bookpath(path)
            .ok_or_else(|| FolioError::UnknownIdentifier(path.to_string()))?;
        batch.push((member.id(), new_name.to_string()));
    }

    let rewriter = RegexRewriter::new()?;
    let planner = RenamePlanner::new(
        registry,
        &opened.book.manifest,
        &rewriter,
        &opened.settings,
    );
    let report = planner.rename_members(&mut opened.tree, &batch)?;

    if !report.is_complete() {
        eprintln!("The following file(s) could not be renamed:");
        for name in &report.not_processed {
            eprintln!("  {name}");
        }
        return Err(FolioError::BatchIncomplete(report.not_processed.len()));
    }

    println!("Renamed {} file(s).", batch.len());
    Ok(())
}
