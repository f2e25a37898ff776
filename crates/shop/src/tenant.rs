//! Tenant resolution and shop provisioning.
//!
//! Every repository call is scoped to a shop. The [`TenantContext`] is the
//! explicit, read-only projection of the authenticated session that carries
//! that scope; callers resolve it once per session (or per request) and
//! pass it into every repository call. Nothing in this crate reads ambient
//! session state.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::future::Cache;
use secrecy::SecretString;
use serde::Serialize;
use tracing::{debug, instrument};

use tailordesk_core::{Phone, ShopId, StaffRole, UserId};

use crate::error::{RepositoryError, ValidationError};
use crate::models::{NewShop, ProfilePatch, Shop, User};
use crate::store::{RecordStore, collections};

/// How long a resolved context may be served from cache.
const CONTEXT_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Maximum number of cached contexts.
const CONTEXT_CAPACITY: u64 = 1024;

/// The authenticated actor, resolved to a shop.
///
/// A non-empty `shop_id` is a precondition for every repository operation;
/// a session without one must not reach the repositories at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub uid: UserId,
    pub shop_id: ShopId,
    pub role: StaffRole,
}

impl TenantContext {
    /// Resolve an auth UID to its shop by reading `users/{uid}`.
    ///
    /// # Errors
    ///
    /// - [`RepositoryError::NotFound`] if no user document exists for the UID
    /// - [`RepositoryError::DataCorruption`] if the user document has no
    ///   shop assignment
    /// - [`RepositoryError::Store`] if the store call fails
    pub async fn load<S: RecordStore + ?Sized>(
        store: &S,
        uid: &UserId,
    ) -> Result<Self, RepositoryError> {
        let doc = store
            .get(collections::USERS, uid.as_str())
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let user = User::from_document(doc)?;

        if user.shop_id.is_empty() {
            return Err(RepositoryError::DataCorruption(format!(
                "user {uid} has no shop assignment"
            )));
        }

        Ok(Self {
            uid: user.uid,
            shop_id: user.shop_id,
            role: user.role,
        })
    }
}

/// Session credential handed to [`provision_shop`] by the auth layer.
///
/// `Debug` redacts nothing here because the UID and email are not secrets,
/// but the ID token stays wrapped so it never lands in logs.
#[derive(Debug, Clone)]
pub struct SignupSession {
    pub uid: UserId,
    pub email: String,
    /// Auth provider ID token; held only so the caller can persist its
    /// cookie after provisioning succeeds.
    pub id_token: SecretString,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShopDoc<'a> {
    shop_name: &'a str,
    owner_name: &'a str,
    phone: &'a Phone,
    created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserDoc<'a> {
    name: &'a str,
    email: &'a str,
    shop_id: &'a ShopId,
    role: StaffRole,
    created_at: chrono::DateTime<Utc>,
}

/// Provision a new shop at signup: create the shop record, then the owner's
/// user record pointing at it.
///
/// The two writes are not transactional; if the second fails the shop
/// document is left behind without any user, and signup must be retried by
/// the caller.
///
/// # Errors
///
/// - [`RepositoryError::Validation`] if the shop name, owner name, or phone
///   is missing or malformed (raised before any store call)
/// - [`RepositoryError::Store`] if either write fails
#[instrument(skip_all, fields(uid = %session.uid))]
pub async fn provision_shop<S: RecordStore + ?Sized>(
    store: &S,
    session: &SignupSession,
    new_shop: NewShop,
) -> Result<TenantContext, RepositoryError> {
    if new_shop.shop_name.trim().is_empty() {
        return Err(ValidationError::MissingField("shopName").into());
    }
    if new_shop.owner_name.trim().is_empty() {
        return Err(ValidationError::MissingField("ownerName").into());
    }
    let phone = Phone::parse(&new_shop.phone).map_err(ValidationError::from)?;

    let now = Utc::now();
    let shop_doc = serde_json::to_value(ShopDoc {
        shop_name: new_shop.shop_name.trim(),
        owner_name: new_shop.owner_name.trim(),
        phone: &phone,
        created_at: now,
    })
    .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

    let shop_id = ShopId::new(store.insert(collections::SHOPS, shop_doc).await?);

    let user_doc = serde_json::to_value(UserDoc {
        name: new_shop.owner_name.trim(),
        email: &session.email,
        shop_id: &shop_id,
        role: StaffRole::Owner,
        created_at: now,
    })
    .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

    store
        .put(collections::USERS, session.uid.as_str(), user_doc)
        .await?;

    debug!(shop = %shop_id, "provisioned shop");

    Ok(TenantContext {
        uid: session.uid.clone(),
        shop_id,
        role: StaffRole::Owner,
    })
}

/// Fetch a shop record by ID (profile header, settings screen).
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if no such shop exists, or a store
/// or corruption error.
pub async fn shop<S: RecordStore + ?Sized>(
    store: &S,
    shop_id: &ShopId,
) -> Result<Shop, RepositoryError> {
    let doc = store
        .get(collections::SHOPS, shop_id.as_str())
        .await?
        .ok_or(RepositoryError::NotFound)?;
    Shop::from_document(doc)
}

/// Fetch a user record by UID (profile screen).
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if no such user exists, or a store
/// or corruption error.
pub async fn user<S: RecordStore + ?Sized>(
    store: &S,
    uid: &UserId,
) -> Result<User, RepositoryError> {
    let doc = store
        .get(collections::USERS, uid.as_str())
        .await?
        .ok_or(RepositoryError::NotFound)?;
    User::from_document(doc)
}

/// Apply a partial profile update to `users/{uid}`.
///
/// Tenancy fields (`shopId`, `role`) are not part of [`ProfilePatch`] and
/// therefore can never be rewritten from here. An empty patch is a no-op
/// that still verifies the user exists.
///
/// # Errors
///
/// Returns [`RepositoryError::NotFound`] if no such user exists, or a store
/// error.
#[instrument(skip_all, fields(uid = %uid))]
pub async fn update_profile<S: RecordStore + ?Sized>(
    store: &S,
    uid: &UserId,
    patch: ProfilePatch,
) -> Result<(), RepositoryError> {
    if patch.is_empty() {
        return match store.get(collections::USERS, uid.as_str()).await? {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound),
        };
    }

    let value =
        serde_json::to_value(&patch).map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;
    let existed = store
        .update(collections::USERS, uid.as_str(), value)
        .await?;
    if existed { Ok(()) } else { Err(RepositoryError::NotFound) }
}

/// Cached tenant resolver.
///
/// Screens resolve the context on every navigation; the 5-minute cache
/// keeps that from hammering the `users` collection. Call
/// [`TenantDirectory::invalidate`] after a profile write so the next
/// resolve sees fresh data.
pub struct TenantDirectory<S> {
    store: Arc<S>,
    cache: Cache<UserId, TenantContext>,
}

impl<S: RecordStore + 'static> TenantDirectory<S> {
    /// Create a directory over a shared store handle.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        let cache = Cache::builder()
            .max_capacity(CONTEXT_CAPACITY)
            .time_to_live(CONTEXT_TTL)
            .build();
        Self { store, cache }
    }

    /// Resolve a UID, serving from cache when fresh.
    ///
    /// # Errors
    ///
    /// Same as [`TenantContext::load`]; failures are never cached.
    pub async fn resolve(&self, uid: &UserId) -> Result<TenantContext, RepositoryError> {
        if let Some(ctx) = self.cache.get(uid).await {
            return Ok(ctx);
        }

        let ctx = TenantContext::load(self.store.as_ref(), uid).await?;
        self.cache.insert(uid.clone(), ctx.clone()).await;
        Ok(ctx)
    }

    /// Drop any cached context for `uid`.
    pub async fn invalidate(&self, uid: &UserId) {
        self.cache.invalidate(uid).await;
    }
}
