//! Core utilities for Folio.
//!
//! This crate provides the primitives shared by the Folio engine and its
//! tools: the error taxonomy and book-path string handling.

pub mod core;

pub use core::error::{FolioError, FolioResult, ValidationError};
