//! Repository Module
//!
//! CRUD over one record collection, backed by a single JSON file.
//!
//! ## Responsibilities
//! - Load the collection lazily on first access
//! - Validate and conflict-check records before add/update
//! - Allocate identifiers for new records
//! - Rewrite the store after every successful mutation
//! - Enrich and query records on read
//!
//! ## Concurrency Model
//! One repository owns its collection and every operation takes `&mut self`
//! or `&self`, so calls within a process are serialized by the borrow
//! checker. There is no coordination between processes sharing a store:
//! each rewrites the whole file and the last writer wins.

use std::path::Path;

use serde_json::Value;

use crate::allocator;
use crate::config::Config;
use crate::error::{RepoError, Result};
use crate::model::Model;
use crate::query::{filter_and_sort, QueryParams};
use crate::record::Record;
use crate::storage::{FileStore, LoadOutcome};

/// Transform applied to every record returned by `get` and `get_all`
pub type Enrichment = Box<dyn Fn(Record) -> Record + Send + Sync>;

/// Result of `Repository::add`
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// Stored with its newly assigned `Id`
    Added(Record),

    /// Not stored: another record holds the same key value.
    /// The candidate is returned marked with `conflict: true`.
    Conflict(Record),

    /// Not stored: the model rejected the candidate
    Invalid,
}

impl AddOutcome {
    /// The stored record, if any
    pub fn added(self) -> Option<Record> {
        match self {
            AddOutcome::Added(record) => Some(record),
            _ => None,
        }
    }
}

/// Result of `Repository::update`
///
/// Checked in the order `Invalid`, `Conflict`, `NotFound`, `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Ok,
    Conflict,
    NotFound,
    Invalid,
}

/// File-backed repository for one record type
pub struct Repository<M: Model> {
    /// Model contract for this record type
    model: M,

    /// Collection name used in logs ("Contacts")
    name: String,

    /// Backing JSON file
    store: FileStore,

    /// In-memory collection, `None` until first loaded
    records: Option<Vec<Record>>,

    /// Optional read-side transform
    enrichment: Option<Enrichment>,
}

impl<M: Model> Repository<M> {
    /// Create a repository for `model`, storing under `config.data_dir`
    ///
    /// Nothing is read until the collection is first accessed.
    pub fn new(model: M, config: &Config) -> Result<Self> {
        let type_name = model.type_name();
        if type_name.is_empty()
            || type_name.contains(['/', '\\'])
            || type_name.starts_with('.')
        {
            return Err(RepoError::Config(format!(
                "type name {:?} cannot name a store file",
                type_name
            )));
        }

        let name = config.collection_name(type_name);
        let store = FileStore::new(config.store_path(type_name), config.pretty);

        Ok(Self {
            model,
            name,
            store,
            records: None,
            enrichment: None,
        })
    }

    /// Install an enrichment function (builder style)
    pub fn with_enrichment<F>(mut self, enrich: F) -> Self
    where
        F: Fn(Record) -> Record + Send + Sync + 'static,
    {
        self.set_enrichment(enrich);
        self
    }

    /// Install or replace the enrichment function
    pub fn set_enrichment<F>(&mut self, enrich: F)
    where
        F: Fn(Record) -> Record + Send + Sync + 'static,
    {
        self.enrichment = Some(Box::new(enrich));
    }

    /// Remove the enrichment function
    pub fn clear_enrichment(&mut self) {
        self.enrichment = None;
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The raw collection, loading it on first access
    pub fn objects(&mut self) -> Result<&[Record]> {
        Ok(self.records_mut()?.as_slice())
    }

    /// All records, enriched, then filtered and sorted by `params`
    pub fn get_all(&mut self, params: Option<&QueryParams>) -> Result<Vec<Record>> {
        let records = self.records_mut()?.clone();
        let records = match &self.enrichment {
            Some(enrich) => records.into_iter().map(enrich).collect(),
            None => records,
        };

        match params {
            Some(params) if !params.is_empty() => filter_and_sort(records, params, &self.model),
            _ => Ok(records),
        }
    }

    /// The record with this `Id`, enriched
    pub fn get(&mut self, id: u64) -> Result<Option<Record>> {
        let found = self
            .records_mut()?
            .iter()
            .find(|r| r.id() == Some(id))
            .cloned();

        Ok(match (found, &self.enrichment) {
            (Some(record), Some(enrich)) => Some(enrich(record)),
            (found, _) => found,
        })
    }

    /// First record whose `field` equals `value` exactly, skipping `excluded_id`
    pub fn find_by_field(
        &mut self,
        field: &str,
        value: &Value,
        excluded_id: Option<u64>,
    ) -> Result<Option<Record>> {
        Ok(self
            .records_mut()?
            .iter()
            .filter(|r| excluded_id.is_none() || r.id() != excluded_id)
            .find(|r| r.get(field) == Some(value))
            .cloned())
    }

    /// Number of records
    pub fn len(&mut self) -> Result<usize> {
        Ok(self.records_mut()?.len())
    }

    /// Whether the collection is empty
    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.records_mut()?.is_empty())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Validate, conflict-check, assign an `Id`, store and persist
    ///
    /// Any client-supplied `Id` is overwritten.
    pub fn add(&mut self, mut candidate: Record) -> Result<AddOutcome> {
        if !self.model.validate(&candidate) {
            tracing::debug!("Rejected invalid {} record", self.name);
            return Ok(AddOutcome::Invalid);
        }

        if self.key_conflict(&candidate, None)? {
            candidate.mark_conflict();
            return Ok(AddOutcome::Conflict(candidate));
        }

        let records = self.records_mut()?;
        candidate.set_id(allocator::next_id(records));
        records.push(candidate.clone());

        if let Err(e) = self.persist() {
            tracing::error!("Error adding new item in {} repository: {}", self.name, e);
            if let Some(records) = self.records.as_mut() {
                records.pop();
            }
            return Err(e);
        }

        Ok(AddOutcome::Added(candidate))
    }

    /// Replace the record carrying the candidate's `Id`
    pub fn update(&mut self, candidate: Record) -> Result<UpdateOutcome> {
        if !self.model.validate(&candidate) {
            return Ok(UpdateOutcome::Invalid);
        }

        let id = candidate.id();
        if self.key_conflict(&candidate, id)? {
            return Ok(UpdateOutcome::Conflict);
        }

        let Some(id) = id else {
            return Ok(UpdateOutcome::NotFound);
        };
        let records = self.records_mut()?;
        let Some(index) = records.iter().position(|r| r.id() == Some(id)) else {
            return Ok(UpdateOutcome::NotFound);
        };

        let previous = std::mem::replace(&mut records[index], candidate);
        if let Err(e) = self.persist() {
            tracing::error!("Error updating item {} in {} repository: {}", id, self.name, e);
            if let Some(records) = self.records.as_mut() {
                records[index] = previous;
            }
            return Err(e);
        }

        Ok(UpdateOutcome::Ok)
    }

    /// Delete the record with this `Id`; `false` if there was none
    pub fn remove(&mut self, id: u64) -> Result<bool> {
        let records = self.records_mut()?;
        let Some(index) = records.iter().position(|r| r.id() == Some(id)) else {
            return Ok(false);
        };

        let removed = records.remove(index);
        if let Err(e) = self.persist() {
            tracing::error!("Error removing item {} from {} repository: {}", id, self.name, e);
            if let Some(records) = self.records.as_mut() {
                records.insert(index, removed);
            }
            return Err(e);
        }

        Ok(true)
    }

    /// Delete the records at these in-memory positions, persisting once
    ///
    /// Out-of-range and repeated indices are ignored. Returns how many
    /// records were deleted; nothing is written when that is zero.
    pub fn remove_by_index(&mut self, indices: &[usize]) -> Result<usize> {
        if indices.is_empty() {
            return Ok(0);
        }

        let records = self.records_mut()?;
        let mut doomed: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < records.len())
            .collect();
        doomed.sort_unstable_by(|a, b| b.cmp(a));
        doomed.dedup();

        if doomed.is_empty() {
            return Ok(0);
        }

        let snapshot = records.clone();
        for index in &doomed {
            records.remove(*index);
        }

        if let Err(e) = self.persist() {
            tracing::error!("Error removing items from {} repository: {}", self.name, e);
            self.records = Some(snapshot);
            return Err(e);
        }

        Ok(doomed.len())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Drop the in-memory collection; the next access reloads the store
    pub fn reload(&mut self) {
        self.records = None;
    }

    /// Whether the collection has been loaded
    pub fn is_loaded(&self) -> bool {
        self.records.is_some()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Collection name ("Contacts")
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The model contract
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Path of the backing store file
    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Loaded collection; a corrupt store is reported and not cached
    fn records_mut(&mut self) -> Result<&mut Vec<Record>> {
        if self.records.is_none() {
            let records = match self.store.load() {
                LoadOutcome::Empty => {
                    tracing::warn!(
                        "{} repository does not exist. It will be created on demand",
                        self.name
                    );
                    Vec::new()
                }
                LoadOutcome::Loaded(records) => {
                    tracing::debug!("Loaded {} records into {}", records.len(), self.name);
                    records
                }
                LoadOutcome::Corrupt(e) => {
                    tracing::error!("Error while reading {} repository: {}", self.name, e);
                    return Err(e);
                }
            };
            self.records = Some(records);
        }

        Ok(self.records.get_or_insert_with(Vec::new))
    }

    /// Whether another record already holds the candidate's key value
    ///
    /// Candidates without the key field never conflict.
    fn key_conflict(&mut self, candidate: &Record, excluded_id: Option<u64>) -> Result<bool> {
        let Some(key) = self.model.key_field().map(str::to_owned) else {
            return Ok(false);
        };
        let Some(value) = candidate.get(&key) else {
            return Ok(false);
        };

        let existing = self.find_by_field(&key, value, excluded_id)?;
        if let Some(existing) = &existing {
            tracing::debug!(
                "Key conflict on {}.{} with record {:?}",
                self.name,
                key,
                existing.id()
            );
        }
        Ok(existing.is_some())
    }

    /// Rewrite the store from the in-memory collection
    fn persist(&self) -> Result<()> {
        self.store.persist(self.records.as_deref().unwrap_or(&[]))
    }
}
