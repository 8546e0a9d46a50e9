//! Query planning and execution
//!
//! Raw parameters are parsed once against the model's queryable fields
//! into a `QueryPlan`, which is then applied to a working copy of the
//! collection.

use std::cmp::Ordering;

use crate::error::Result;
use crate::model::Model;
use crate::record::Record;

use super::{QueryParams, WildcardPattern};

/// Reserved parameter name for sorting (matched case-insensitively)
pub const SORT_PARAM: &str = "sort";

/// Suffix selecting descending order
const DESC_SUFFIX: &str = "desc";

/// Keep records whose field matches a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub pattern: WildcardPattern,
}

impl Filter {
    /// Whether a record passes this filter (missing fields never do)
    pub fn accepts(&self, record: &Record) -> bool {
        record
            .field_text(&self.field)
            .map(|text| self.pattern.matches(&text))
            .unwrap_or(false)
    }
}

/// Order records by one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub field: String,
    pub descending: bool,
}

impl SortDirective {
    /// Parse `<field>` or `<field>,desc` (suffix case-insensitive)
    pub fn parse(value: &str) -> Self {
        match value.rsplit_once(',') {
            Some((field, suffix)) if suffix.eq_ignore_ascii_case(DESC_SUFFIX) => Self {
                field: field.to_string(),
                descending: true,
            },
            _ => Self {
                field: value.to_string(),
                descending: false,
            },
        }
    }

    /// Stable sort in place
    pub fn apply(&self, records: &mut Vec<Record>) {
        let mut keyed: Vec<(SortKey, Record)> = records
            .drain(..)
            .map(|r| (SortKey::of(&r, &self.field), r))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| {
            let ord = a.cmp(b);
            if self.descending {
                ord.reverse()
            } else {
                ord
            }
        });

        records.extend(keyed.into_iter().map(|(_, r)| r));
    }
}

/// Comparison key for one field value
///
/// Numbers order before text, text before missing values. Numbers compare
/// numerically, text byte-wise (case-sensitive).
///
/// A number never compares against text lexicographically, so `"#1"` sorts
/// after `"5"` rather than before it; this keeps the order total. The empty
/// string is text, not the number 0.
#[derive(Debug, Clone)]
enum SortKey {
    Number(f64),
    Text(String),
    Missing,
}

impl SortKey {
    fn of(record: &Record, field: &str) -> Self {
        match record.field_text(field) {
            Some(text) => match text.trim().parse::<f64>() {
                Ok(n) if n.is_finite() && !text.trim().is_empty() => SortKey::Number(n),
                _ => SortKey::Text(text),
            },
            None => SortKey::Missing,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Text(_) => 1,
            SortKey::Missing => 2,
        }
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

/// Parsed form of a request's parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPlan {
    /// Filters in the order supplied
    pub filters: Vec<Filter>,

    /// The last sort directive naming a queryable field
    pub sort: Option<SortDirective>,
}

impl QueryPlan {
    /// Build a plan, dropping parameters that name unknown fields
    ///
    /// Fails only if a filter value cannot be compiled into a pattern.
    pub fn build(params: &QueryParams, queryable: &[String]) -> Result<Self> {
        let is_queryable = |field: &str| queryable.iter().any(|f| f == field);
        let mut plan = Self::default();

        for (name, value) in params.iter() {
            if name.eq_ignore_ascii_case(SORT_PARAM) {
                let directive = SortDirective::parse(value);
                if is_queryable(&directive.field) {
                    plan.sort = Some(directive);
                } else {
                    tracing::debug!("Ignoring sort on unknown field {:?}", directive.field);
                }
            } else if is_queryable(name) {
                plan.filters.push(Filter {
                    field: name.to_string(),
                    pattern: WildcardPattern::new(value)?,
                });
            } else {
                tracing::debug!("Ignoring filter on unknown field {:?}", name);
            }
        }

        Ok(plan)
    }

    /// Whether the plan leaves a collection unchanged
    pub fn is_noop(&self) -> bool {
        self.filters.is_empty() && self.sort.is_none()
    }

    /// Apply filters (AND) then the sort
    pub fn apply(&self, mut records: Vec<Record>) -> Vec<Record> {
        for filter in &self.filters {
            tracing::trace!(
                "Filtering {} on {:?} with pattern {:?}",
                records.len(),
                filter.field,
                filter.pattern.as_str()
            );
            records.retain(|r| filter.accepts(r));
        }

        if let Some(sort) = &self.sort {
            sort.apply(&mut records);
        }

        records
    }
}

/// Filter and sort a working copy of a collection
pub fn filter_and_sort<M: Model + ?Sized>(
    records: Vec<Record>,
    params: &QueryParams,
    model: &M,
) -> Result<Vec<Record>> {
    let plan = QueryPlan::build(params, &model.queryable_fields())?;
    tracing::debug!(
        "Query on {}: {} filters, sort={:?}",
        model.type_name(),
        plan.filters.len(),
        plan.sort
    );
    Ok(plan.apply(records))
}
