//! Storage Module
//!
//! Persists one record collection per file as a JSON array.
//!
//! ## Responsibilities
//! - Load the whole collection for a record type
//! - Tell a missing store apart from a corrupt one
//! - Rewrite the whole collection on every mutation
//!
//! ## File Format
//! ```text
//! {data_dir}/Contacts.json
//! ┌──────────────────────────────────────────────┐
//! │ [                                            │
//! │   {"Id": 1, "Name": "Alice", ...},           │
//! │   {"Id": 2, "Name": "bob", ...}              │
//! │ ]                                            │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! There is no append path and no cross-process locking: the last writer
//! wins.

mod file_store;

pub use file_store::{FileStore, LoadOutcome};
