use folio::{FolioError, FolioResult, RegexRewriter, RenamePlanner};

use crate::cli::open_book;

/// Move one member to a new full book path.
pub fn run(book_dir: String, from: String, to: String) -> FolioResult<()> {
    let mut opened = open_book(&book_dir, false)?;
    let registry = &opened.book.registry;

    let member = registry
        .member_by_bookpath(&from)
        .ok_or_else(|| FolioError::UnknownIdentifier(from.clone()))?;

    let rewriter = RegexRewriter::new()?;
    let planner = RenamePlanner::new(
        registry,
        &opened.book.manifest,
        &rewriter,
        &opened.settings,
    );
    let report = planner.move_members(&mut opened.tree, &[(member.id(), to.clone())])?;

    if !report.is_complete() {
        eprintln!("The following file(s) could not be moved:");
        for name in &report.not_processed {
            eprintln!("  {name}");
        }
        return Err(FolioError::BatchIncomplete(report.not_processed.len()));
    }

    println!("Moved {from} to {to}.");
    Ok(())
}
