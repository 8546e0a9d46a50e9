//! Query Module
//!
//! A small query language over an in-memory collection.
//!
//! ## Parameters
//! - `sort=<field>` or `sort=<field>,desc` orders the result (the name
//!   `sort` is matched case-insensitively)
//! - `<field>=<pattern>` keeps records whose field matches the whole
//!   pattern, case-insensitively; `*` matches any run of characters
//!
//! Parameters naming fields the model does not expose are ignored.
//! Several filters narrow the result one after another (logical AND).
//!
//! ## Flow
//! ```text
//! QueryParams ──plan──▶ QueryPlan { filters, sort } ──apply──▶ Vec<Record>
//! ```

mod params;
mod pattern;
mod plan;

pub use params::QueryParams;
pub use pattern::WildcardPattern;
pub use plan::{filter_and_sort, Filter, QueryPlan, SortDirective, SORT_PARAM};
