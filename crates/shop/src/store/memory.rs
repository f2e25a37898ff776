//! In-memory record store backend.
//!
//! Used by the test suites and for local development without the managed
//! database. Query results are deterministic: ties on the order-by field
//! break by insertion sequence, so the same writes always produce the same
//! read order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::{Direction, Document, Query, RecordStore, StoreError};

#[derive(Debug)]
struct StoredDoc {
    /// Monotonic insertion sequence, the query-order tiebreaker.
    seq: u64,
    data: JsonValue,
}

/// An in-memory [`RecordStore`].
///
/// Cheap to create per test; interior mutability makes it shareable behind
/// a plain reference or an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, StoredDoc>>>,
    seq: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, AtomicOrdering::Relaxed)
    }

    fn lock_poisoned() -> StoreError {
        StoreError::Unavailable("store lock poisoned".to_owned())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, collection: &str, value: JsonValue) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        self.put(collection, &id, value).await?;
        Ok(id)
    }

    async fn put(&self, collection: &str, id: &str, value: JsonValue) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(|_| Self::lock_poisoned())?;
        collections.entry(collection.to_owned()).or_default().insert(
            id.to_owned(),
            StoredDoc {
                seq: self.next_seq(),
                data: value,
            },
        );
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::lock_poisoned())?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|doc| Document {
                id: id.to_owned(),
                data: doc.data.clone(),
            }))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: JsonValue,
    ) -> Result<bool, StoreError> {
        let JsonValue::Object(patch) = patch else {
            return Err(StoreError::MalformedPatch(
                "patch must be a JSON object".to_owned(),
            ));
        };

        let mut collections = self.collections.write().map_err(|_| Self::lock_poisoned())?;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
        else {
            return Ok(false);
        };

        let JsonValue::Object(fields) = &mut doc.data else {
            return Err(StoreError::MalformedPatch(format!(
                "document {collection}/{id} is not an object"
            )));
        };

        for (key, value) in patch {
            fields.insert(key, value);
        }
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().map_err(|_| Self::lock_poisoned())?;
        Ok(collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some())
    }

    async fn query(&self, collection: &str, query: Query) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::lock_poisoned())?;

        let mut matches: Vec<(u64, Document)> = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| {
                        query
                            .filters()
                            .iter()
                            .all(|(field, expected)| doc.data.get(field) == Some(expected))
                    })
                    .map(|(id, doc)| {
                        (
                            doc.seq,
                            Document {
                                id: id.clone(),
                                data: doc.data.clone(),
                            },
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        if let Some((field, direction)) = query.ordering() {
            matches.sort_by(|(seq_a, a), (seq_b, b)| {
                let ord = compare_values(
                    a.data.get(field).unwrap_or(&JsonValue::Null),
                    b.data.get(field).unwrap_or(&JsonValue::Null),
                );
                let ord = match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                };
                ord.then_with(|| seq_a.cmp(seq_b))
            });
        } else {
            matches.sort_by_key(|(seq, _)| *seq);
        }

        let mut results: Vec<Document> = matches.into_iter().map(|(_, doc)| doc).collect();
        if let Some(n) = query.result_limit() {
            results.truncate(n);
        }
        Ok(results)
    }
}

/// Compare two field values for ordering.
///
/// Strings that both parse as RFC 3339 timestamps compare chronologically
/// (plain lexicographic order would mis-sort mixed-precision timestamps);
/// everything else falls back to a stable type-then-value order.
fn compare_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::String(x), JsonValue::String(y)) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(dx), Ok(dy)) => dx.cmp(&dy),
                _ => x.cmp(y),
            }
        }
        (JsonValue::Number(x), JsonValue::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => x.cmp(y),
        (a, b) => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &JsonValue) -> u8 {
    match value {
        JsonValue::Null => 0,
        JsonValue::Bool(_) => 1,
        JsonValue::Number(_) => 2,
        JsonValue::String(_) => 3,
        JsonValue::Array(_) => 4,
        JsonValue::Object(_) => 5,
    }
}
