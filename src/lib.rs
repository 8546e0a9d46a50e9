//! # jsonrepo
//!
//! A file-backed record repository with:
//! - One JSON file per record type, rewritten in full on every change
//! - Identifier allocation (max `Id` + 1)
//! - Validation and key-uniqueness checks before add/update
//! - A small query language: wildcard field filters and single-field sort
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Repository<M>                          │
//! │        add / update / remove / get / get_all / find         │
//! └──────┬──────────────────┬──────────────────┬────────────────┘
//!        │                  │                  │
//!        ▼                  ▼                  ▼
//!  ┌───────────┐     ┌─────────────┐    ┌─────────────┐
//!  │   Model   │     │  Allocator  │    │    Query    │
//!  │ (validate,│     │ (next Id)   │    │ (filter +   │
//!  │  key)     │     └─────────────┘    │  sort)      │
//!  └───────────┘                        └─────────────┘
//!        │
//!        ▼
//!  ┌─────────────┐
//!  │  FileStore  │
//!  │   (JSON)    │
//!  └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use jsonrepo::{Config, Record, Repository, SchemaModel, QueryParams};
//!
//! let model = SchemaModel::builder("Contact")
//!     .required("Name")
//!     .key("Email")
//!     .build();
//! let mut contacts = Repository::new(model, &Config::default())?;
//!
//! let alice: Record = r#"{"Name": "Alice", "Email": "alice@example.com"}"#.parse()?;
//! contacts.add(alice)?;
//!
//! let params = QueryParams::parse("Name=a*&sort=Id,desc")?;
//! let found = contacts.get_all(Some(&params))?;
//! # Ok::<(), jsonrepo::RepoError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod model;
pub mod storage;
pub mod allocator;
pub mod query;
pub mod repository;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RepoError, Result};
pub use config::Config;
pub use model::{Model, SchemaModel};
pub use query::{QueryParams, QueryPlan};
pub use record::Record;
pub use repository::{AddOutcome, Repository, UpdateOutcome};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of jsonrepo
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
