use folio::{Category, FolioResult};

use crate::cli::open_book;

/// Print the linear reading order of the book's content documents.
pub fn run(book_dir: String) -> FolioResult<()> {
    let opened = open_book(&book_dir, false)?;

    let documents = opened.tree.category_nodes(Category::Text);
    if documents.is_empty() {
        println!("No content documents.");
        return Ok(());
    }
    for (position, node) in documents.iter().enumerate() {
        println!("{:>3}  {}", position + 1, node.display_name);
    }

    Ok(())
}
