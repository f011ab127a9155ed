//! Async repositories: every call is handed to the database pool and awaited,
//! so callers on the runtime never touch a connection directly.

use crate::db::ids::TimestampIds;
use crate::db::pool::DbPool;
use crate::db::queries::{self, Mutation};
use crate::errors::AppResult;
use crate::models::entry::{Entry, EntryData};
use crate::models::page::{Page, PageQuery};
use crate::models::reference::{OptionSet, ReferenceKind};
use std::sync::Arc;

#[derive(Clone)]
pub struct EntryRepository {
    pool: Arc<DbPool>,
    ids: Arc<TimestampIds>,
}

impl EntryRepository {
    /// Seeds the id generator from the highest stored id.
    pub async fn new(pool: Arc<DbPool>) -> AppResult<Self> {
        let floor = pool.run(|conn| queries::max_entry_id(conn)).await?;
        Ok(Self {
            pool,
            ids: Arc::new(TimestampIds::starting_after(floor)),
        })
    }

    /// Return a paged list of entries.
    pub async fn page(&self, query: PageQuery) -> AppResult<Page<Entry>> {
        self.pool
            .run(move |conn| queries::page_entries(conn, &query))
            .await
    }

    pub async fn lookup(&self, id: i64) -> AppResult<Option<Entry>> {
        self.pool.run(move |conn| queries::find_entry(conn, id)).await
    }

    /// Insert under a freshly generated id and return it.
    pub async fn insert(&self, data: EntryData) -> AppResult<i64> {
        let id = self.ids.next();
        self.pool
            .run(move |conn| queries::insert_entry(conn, id, &data))
            .await
    }

    pub async fn update(&self, id: i64, data: EntryData) -> AppResult<Mutation> {
        self.pool
            .run(move |conn| queries::update_entry(conn, id, &data))
            .await
    }

    pub async fn delete(&self, id: i64) -> AppResult<Mutation> {
        self.pool.run(move |conn| queries::delete_entry(conn, id)).await
    }
}

#[derive(Clone)]
pub struct ReferenceRepository {
    pool: Arc<DbPool>,
}

impl ReferenceRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    pub async fn options(&self, kind: ReferenceKind) -> AppResult<OptionSet> {
        self.pool
            .run(move |conn| queries::load_options(conn, kind))
            .await
    }

    pub async fn add(&self, kind: ReferenceKind, name: impl Into<String>) -> AppResult<i64> {
        let name = name.into();
        self.pool
            .run(move |conn| queries::insert_reference(conn, kind, &name))
            .await
    }
}
