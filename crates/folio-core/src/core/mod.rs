pub mod error;
pub mod path;

pub use error::{FolioError, FolioResult, ValidationError};
