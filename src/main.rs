use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Resource-tree synchronization for EPUB packages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the grouped resource tree of a book folder
    Tree {
        /// Path to the unpacked book folder
        book_dir: String,
        /// Show full book paths instead of shortened names
        #[arg(long)]
        full_paths: bool,
    },
    /// Show the linear reading order of the content documents
    Order {
        /// Path to the unpacked book folder
        book_dir: String,
    },
    /// Rename files, updating every reference to them
    Rename {
        /// Path to the unpacked book folder
        book_dir: String,
        /// One or more OLD-PATH=NEW-NAME pairs
        #[arg(required = true)]
        pairs: Vec<String>,
        /// Report failures with full book paths
        #[arg(long)]
        full_paths: bool,
    },
    /// Move a file to a new path inside the book, updating references
    #[command(name = "move")]
    Move {
        /// Path to the unpacked book folder
        book_dir: String,
        /// Current book path of the file
        from: String,
        /// New book path
        to: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Tree {
            book_dir,
            full_paths,
        } => cli::tree::run(book_dir, full_paths),
        Commands::Order { book_dir } => cli::order::run(book_dir),
        Commands::Rename {
            book_dir,
            pairs,
            full_paths,
        } => cli::rename::run(book_dir, pairs, full_paths),
        Commands::Move { book_dir, from, to } => cli::mv::run(book_dir, from, to),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
