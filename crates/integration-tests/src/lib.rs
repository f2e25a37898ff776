//! Integration tests for TailorDesk.
//!
//! All flows run against the bundled in-memory record store - no external
//! database, no credentials. Run with `cargo test -p
//! tailordesk-integration-tests`.
//!
//! # Test Categories
//!
//! - `tenancy` - provisioning, context resolution, tenant isolation
//! - `customers` - customer CRUD, validation, search
//! - `orders` - order CRUD, status filters, image revisions
//! - `dashboard` - aggregation over seeded shops

use std::sync::Once;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use tailordesk_core::UserId;
use tailordesk_shop::models::NewShop;
use tailordesk_shop::store::memory::MemoryStore;
use tailordesk_shop::store::{Document, Query, RecordStore, StoreError};
use tailordesk_shop::tenant::{SignupSession, TenantContext, provision_shop};

static INIT_TRACING: Once = Once::new();

/// Install a test subscriber once so `RUST_LOG=debug cargo test` shows the
/// repositories' spans.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Provision a fresh shop with a random owner UID and return its context.
///
/// # Panics
///
/// Panics if provisioning fails; tests treat that as a setup error.
pub async fn seed_tenant(store: &MemoryStore, shop_name: &str) -> TenantContext {
    init_tracing();

    let uid = UserId::new(Uuid::new_v4().to_string());
    let session = SignupSession {
        uid,
        email: format!("{}@example.com", shop_name.to_lowercase().replace(' ', ".")),
        id_token: "test-token".to_owned().into(),
    };
    let new_shop = NewShop {
        shop_name: shop_name.to_owned(),
        owner_name: "Owner".to_owned(),
        phone: "9876543210".to_owned(),
    };

    provision_shop(store, &session, new_shop)
        .await
        .expect("provisioning must succeed against the memory store")
}

/// A store whose every call fails, for exercising error propagation.
#[derive(Debug, Default)]
pub struct FailingStore;

impl FailingStore {
    fn unavailable() -> StoreError {
        StoreError::Unavailable("injected outage".to_owned())
    }
}

#[async_trait]
impl RecordStore for FailingStore {
    async fn insert(&self, _collection: &str, _value: JsonValue) -> Result<String, StoreError> {
        Err(Self::unavailable())
    }

    async fn put(&self, _collection: &str, _id: &str, _value: JsonValue) -> Result<(), StoreError> {
        Err(Self::unavailable())
    }

    async fn get(&self, _collection: &str, _id: &str) -> Result<Option<Document>, StoreError> {
        Err(Self::unavailable())
    }

    async fn update(
        &self,
        _collection: &str,
        _id: &str,
        _patch: JsonValue,
    ) -> Result<bool, StoreError> {
        Err(Self::unavailable())
    }

    async fn delete(&self, _collection: &str, _id: &str) -> Result<bool, StoreError> {
        Err(Self::unavailable())
    }

    async fn query(&self, _collection: &str, _query: Query) -> Result<Vec<Document>, StoreError> {
        Err(Self::unavailable())
    }
}
