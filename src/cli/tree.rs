use folio::{Category, FolioResult};

use crate::cli::open_book;

pub fn run(book_dir: String, full_paths: bool) -> FolioResult<()> {
    let opened = open_book(&book_dir, full_paths)?;

    for node in opened.tree.descriptor_nodes() {
        println!("{}", node.display_name);
    }
    for category in Category::ALL {
        println!("{}/", category.label());
        for node in opened.tree.category_nodes(category) {
            match node.order_key {
                Some(order) => println!("  {:>3}  {}", order + 1, node.display_name),
                None => println!("       {}", node.display_name),
            }
        }
    }

    Ok(())
}
