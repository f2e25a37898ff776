//! Record store interface.
//!
//! The shop's data lives in an external document database exposing
//! per-collection CRUD plus filtered/ordered queries. This module defines
//! the query interface the repositories are written against; the real
//! backend is provided by the host application. [`memory::MemoryStore`] is
//! the bundled backend for tests and local development.
//!
//! # Collections
//!
//! - `shops` - one document per tenant, point lookups only
//! - `users` - keyed by auth UID, point lookups only
//! - `customers` - filtered by `shopId`, ordered by `createdAt` descending
//! - `orders` - filtered by `shopId` (optionally plus `status`), ordered by
//!   `createdAt` descending, with `limit(n)` for recent-order queries

pub mod memory;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Collection names used by the repositories.
pub mod collections {
    /// Shop records, one per tenant.
    pub const SHOPS: &str = "shops";
    /// Staff accounts, keyed by auth UID.
    pub const USERS: &str = "users";
    /// Customer records.
    pub const CUSTOMERS: &str = "customers";
    /// Stitching orders.
    pub const ORDERS: &str = "orders";
}

/// Errors surfaced by a record store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or the call failed mid-flight.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the call (e.g. security rules).
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The caller passed a patch that is not a JSON object.
    #[error("malformed patch: {0}")]
    MalformedPatch(String),
}

/// A document fetched from the store: its ID plus the stored fields.
///
/// The ID lives outside the field map, mirroring document databases where
/// the key is not part of the document body.
#[derive(Debug, Clone)]
pub struct Document {
    /// Store-assigned (or caller-chosen) document ID.
    pub id: String,
    /// The document fields as a JSON object.
    pub data: JsonValue,
}

/// Sort direction for [`Query::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A filtered, ordered, optionally limited collection query.
///
/// Built fluently the way the screens compose their fetches:
///
/// ```
/// use tailordesk_shop::store::{Direction, Query};
///
/// let q = Query::new()
///     .filter("shopId", "shop-1")
///     .filter("status", "pending")
///     .order_by("createdAt", Direction::Descending)
///     .limit(5);
/// # let _ = q;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<(String, JsonValue)>,
    order_by: Option<(String, Direction)>,
    limit: Option<usize>,
}

impl Query {
    /// Start an unfiltered query over a whole collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value` (equality only; that is all the target
    /// store family indexes).
    #[must_use]
    pub fn filter(mut self, field: &str, value: impl Into<JsonValue>) -> Self {
        self.filters.push((field.to_owned(), value.into()));
        self
    }

    /// Order results by a single field.
    #[must_use]
    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some((field.to_owned(), direction));
        self
    }

    /// Keep at most `n` results, applied after filtering and ordering.
    #[must_use]
    pub const fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// The equality filters, in the order they were added.
    #[must_use]
    pub fn filters(&self) -> &[(String, JsonValue)] {
        &self.filters
    }

    /// The ordering field and direction, if any.
    #[must_use]
    pub fn ordering(&self) -> Option<(&str, Direction)> {
        self.order_by.as_ref().map(|(f, d)| (f.as_str(), *d))
    }

    /// The result cap, if any.
    #[must_use]
    pub const fn result_limit(&self) -> Option<usize> {
        self.limit
    }
}

/// Async interface to the external document database.
///
/// All calls are non-blocking and may be issued concurrently for independent
/// reads. A write to a single document is atomic at the store, but there are
/// no multi-document transactions: callers must not assume a pair of writes
/// lands together.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a document, letting the store assign its ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend call fails.
    async fn insert(&self, collection: &str, value: JsonValue) -> Result<String, StoreError>;

    /// Write a document at a caller-chosen ID, replacing any existing body.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend call fails.
    async fn put(&self, collection: &str, id: &str, value: JsonValue) -> Result<(), StoreError>;

    /// Fetch a single document, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend call fails.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Merge the fields of `patch` (a JSON object) into an existing
    /// document, top-level field by field. Returns whether the document
    /// existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedPatch`] if `patch` is not an object,
    /// or another [`StoreError`] if the backend call fails.
    async fn update(&self, collection: &str, id: &str, patch: JsonValue)
    -> Result<bool, StoreError>;

    /// Hard-delete a document. Returns whether it existed; deleting an
    /// already-deleted ID reports `false` rather than failing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend call fails.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Run a filtered, ordered, optionally limited query.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend call fails.
    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>, StoreError>;
}
