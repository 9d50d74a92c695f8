//! Generic CRUD use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD and batch entry points for any entity.
//! - Delegate persistence to a `Repository` implementation.
//! - Assemble paged results from criteria queries.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::entity::{Entity, EntityId};
use crate::model::page::{PageRequest, SimplePage};
use crate::query::{Criteria, Value};
use crate::repo::base_repo::{RepoResult, Repository};
use std::marker::PhantomData;

/// Use-case service wrapper for CRUD operations on `E`.
pub struct BaseService<E, R> {
    repo: R,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, R: Repository<E>> BaseService<E, R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            _entity: PhantomData,
        }
    }

    /// Borrows the underlying repository for calls the service does not wrap.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn find_all(&self) -> RepoResult<Vec<E>> {
        self.repo.find_all()
    }

    /// Gets one record by id. A missing id is `Ok(None)`.
    pub fn find_by_id(&self, id: EntityId) -> RepoResult<Option<E>> {
        self.repo.find_by_id(id)
    }

    /// Persists a new or existing record and returns it with its id set.
    pub fn save(&self, record: E) -> RepoResult<E> {
        self.repo.save(record)
    }

    /// Persists a record and flushes it immediately.
    pub fn update(&self, record: E) -> RepoResult<E> {
        self.repo.save_and_flush(record)
    }

    pub fn batch_save(&self, records: Vec<E>) -> RepoResult<Vec<E>> {
        self.repo.save_all(records)
    }

    pub fn batch_update(&self, records: Vec<E>) -> RepoResult<Vec<E>> {
        self.repo.save_all(records)
    }

    /// Deletes by id. Returns repository-level not-found errors unchanged.
    pub fn delete_by_id(&self, id: EntityId) -> RepoResult<()> {
        self.repo.delete_by_id(id)
    }

    pub fn batch_delete(&self, records: &[E]) -> RepoResult<()> {
        self.repo.delete_all(records)
    }

    /// Evaluates the selectors recorded on `criteria`, one value each.
    pub fn select(&self, criteria: &Criteria) -> RepoResult<Vec<Value>> {
        self.repo.select(criteria)
    }

    /// Lists one page of records matching `criteria`.
    pub fn find_all_by(&self, criteria: &Criteria, request: &PageRequest) -> RepoResult<Vec<E>> {
        self.repo.find_by_criteria(criteria, Some(request))
    }

    /// Lists one page of records matching `criteria` plus the total count.
    ///
    /// # Contract
    /// - `total` counts every match, not only the returned page.
    /// - Requests past the last page return an empty `items` list.
    pub fn find_page(
        &self,
        criteria: &Criteria,
        request: &PageRequest,
    ) -> RepoResult<SimplePage<E>> {
        let total = self.repo.count(criteria)?;
        let items = if total == 0 {
            Vec::new()
        } else {
            self.repo.find_by_criteria(criteria, Some(request))?
        };
        Ok(SimplePage::new(items, total, request))
    }
}
