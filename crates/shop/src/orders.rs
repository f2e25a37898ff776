//! Order repository: CRUD, status-filtered listings, and in-memory search.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use tailordesk_core::{CustomerId, OrderId, OrderStatus};

use crate::customers::CustomerRepository;
use crate::error::{RepositoryError, ValidationError};
use crate::models::order::{ImageRevision, Order, OrderDoc, OrderDraft, OrderPatch, OrderPatchDoc};
use crate::store::{Direction, Query, RecordStore, collections};
use crate::tenant::TenantContext;

/// Repository for stitching orders.
///
/// Scoping mirrors [`CustomerRepository`]: all operations take the
/// [`TenantContext`], and another shop's order reads as
/// [`RepositoryError::NotFound`].
pub struct OrderRepository<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> OrderRepository<'a, S> {
    /// Create a new order repository over a store handle.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create an order for a customer. Returns the store-assigned ID.
    ///
    /// Defaults: `status = pending`, `advance_paid = 0` when the field is
    /// left blank. The customer must exist and belong to the tenant; their
    /// name is snapshotted onto the order (cached copy - later renames do
    /// not propagate).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Validation`] before any store write if a
    /// required field is missing, an amount does not parse as a number, the
    /// delivery date is malformed, or the advance exceeds the price;
    /// [`RepositoryError::NotFound`] if the customer is absent or foreign;
    /// or a store error.
    #[instrument(skip_all, fields(shop = %ctx.shop_id, customer = %customer_id))]
    pub async fn create(
        &self,
        ctx: &TenantContext,
        customer_id: &CustomerId,
        draft: OrderDraft,
    ) -> Result<OrderId, RepositoryError> {
        if draft.cloth_type.trim().is_empty() {
            return Err(ValidationError::MissingField("clothType").into());
        }

        let price = parse_amount("price", &draft.price)?;
        let advance_paid = if draft.advance_paid.trim().is_empty() {
            Decimal::ZERO
        } else {
            parse_amount("advancePaid", &draft.advance_paid)?
        };
        if advance_paid > price {
            return Err(ValidationError::AdvanceExceedsPrice.into());
        }

        let delivery_date = parse_delivery_date(&draft.delivery_date)?;

        // Snapshot the customer name; also proves the customer belongs to
        // this tenant before anything is written.
        let customer = CustomerRepository::new(self.store)
            .get(ctx, customer_id)
            .await?;

        let now = Utc::now();
        let doc = OrderDoc {
            shop_id: &ctx.shop_id,
            customer_id,
            customer_name: &customer.name,
            cloth_type: draft.cloth_type.trim(),
            price,
            advance_paid,
            delivery_date,
            status: OrderStatus::Pending,
            measurements: &draft.measurements,
            images: &draft.images,
            notes: &draft.notes,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(doc)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        let id = self.store.insert(collections::ORDERS, value).await?;
        debug!(order = %id, "created order");
        Ok(OrderId::new(id))
    }

    /// Fetch one order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the record is absent or
    /// belongs to another shop, or a store or corruption error.
    pub async fn get(&self, ctx: &TenantContext, id: &OrderId) -> Result<Order, RepositoryError> {
        let doc = self
            .store
            .get(collections::ORDERS, id.as_str())
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let order = Order::from_document(doc)?;

        if order.shop_id != ctx.shop_id {
            return Err(RepositoryError::NotFound);
        }
        Ok(order)
    }

    /// Apply a partial update; `updated_at` is restamped unconditionally.
    ///
    /// The image list is revised, never replaced wholesale: the stored list
    /// becomes the caller's retained subset followed by newly appended
    /// upload URLs (see [`crate::models::ImageRevision`]).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Validation`] if the merged amounts would
    /// leave the advance above the price, [`RepositoryError::NotFound`] if
    /// the record is absent or foreign, or a store error.
    #[instrument(skip_all, fields(shop = %ctx.shop_id, order = %id))]
    pub async fn update(
        &self,
        ctx: &TenantContext,
        id: &OrderId,
        patch: OrderPatch,
    ) -> Result<(), RepositoryError> {
        // Tenancy check; also the prior values for the cross-field rule.
        let current = self.get(ctx, id).await?;

        let merged_price = patch.price.unwrap_or(current.price);
        let merged_advance = patch.advance_paid.unwrap_or(current.advance_paid);
        if merged_advance > merged_price {
            return Err(ValidationError::AdvanceExceedsPrice.into());
        }

        let doc = OrderPatchDoc {
            cloth_type: patch.cloth_type.as_deref(),
            price: patch.price,
            advance_paid: patch.advance_paid,
            delivery_date: patch.delivery_date,
            status: patch.status,
            measurements: patch.measurements.as_ref(),
            images: patch.images.map(ImageRevision::into_images),
            notes: patch.notes.as_deref(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(doc)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        let existed = self
            .store
            .update(collections::ORDERS, id.as_str(), value)
            .await?;
        if existed {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    /// Hard-delete an order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the record is already gone
    /// or belongs to another shop, or a store error.
    #[instrument(skip_all, fields(shop = %ctx.shop_id, order = %id))]
    pub async fn delete(&self, ctx: &TenantContext, id: &OrderId) -> Result<(), RepositoryError> {
        self.get(ctx, id).await?;

        let existed = self.store.delete(collections::ORDERS, id.as_str()).await?;
        if existed {
            debug!("deleted order");
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    /// List the shop's orders, newest first, optionally filtered to one
    /// status. `None` means no filter (the screen's "all" tab); records
    /// with statuses this build does not recognize still appear in the
    /// unfiltered listing.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails, or a corruption error for
    /// a malformed document.
    pub async fn list_by_shop(
        &self,
        ctx: &TenantContext,
        status_filter: Option<OrderStatus>,
    ) -> Result<Vec<Order>, RepositoryError> {
        let mut query = Query::new()
            .filter("shopId", ctx.shop_id.as_str())
            .order_by("createdAt", Direction::Descending);
        if let Some(status) = status_filter {
            query = query.filter("status", status.to_string());
        }

        let docs = self.store.query(collections::ORDERS, query).await?;
        docs.into_iter().map(Order::from_document).collect()
    }

    /// List one customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails, or a corruption error for
    /// a malformed document.
    pub async fn list_by_customer(
        &self,
        ctx: &TenantContext,
        customer_id: &CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let docs = self
            .store
            .query(
                collections::ORDERS,
                Query::new()
                    .filter("shopId", ctx.shop_id.as_str())
                    .filter("customerId", customer_id.as_str())
                    .order_by("createdAt", Direction::Descending),
            )
            .await?;

        docs.into_iter().map(Order::from_document).collect()
    }

    /// The `n` newest orders, for the dashboard's recent-orders panel.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails, or a corruption error for
    /// a malformed document.
    pub async fn list_recent(
        &self,
        ctx: &TenantContext,
        n: usize,
    ) -> Result<Vec<Order>, RepositoryError> {
        let docs = self
            .store
            .query(
                collections::ORDERS,
                Query::new()
                    .filter("shopId", ctx.shop_id.as_str())
                    .order_by("createdAt", Direction::Descending)
                    .limit(n),
            )
            .await?;

        docs.into_iter().map(Order::from_document).collect()
    }
}

fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    trimmed
        .parse::<Decimal>()
        .map_err(|_| ValidationError::InvalidAmount {
            field,
            value: raw.to_owned(),
        })
}

fn parse_delivery_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField("deliveryDate"));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_owned()))
}

/// Filter an already-fetched order list by a search box value.
///
/// Case-insensitive substring match across cloth type, customer name, and
/// status; an empty query matches everything, preserving input order.
#[must_use]
pub fn search<'o>(orders: &'o [Order], text: &str) -> Vec<&'o Order> {
    let text = text.trim().to_lowercase();

    orders
        .iter()
        .filter(|o| {
            o.cloth_type.to_lowercase().contains(&text)
                || o.customer_name.to_lowercase().contains(&text)
                || o.status.to_string().contains(&text)
        })
        .collect()
}
