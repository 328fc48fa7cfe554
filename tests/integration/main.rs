//! Integration tests for the folio library and CLI.

mod cli_smoke;
mod common;
mod rename_flow;
mod reorder_flow;
