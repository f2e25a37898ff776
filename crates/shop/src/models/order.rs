//! Stitching order records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tailordesk_core::{CustomerId, Measurements, OrderId, OrderStatus, ShopId};

use crate::error::RepositoryError;
use crate::store::Document;

/// A stitching job tied to one customer and one shop.
///
/// `customer_name` is a cached copy of the customer's name at order
/// creation; it goes stale if the customer is later renamed and is never
/// synced automatically. `customer_id` and `shop_id` are immutable after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(skip, default)]
    pub id: OrderId,
    pub shop_id: ShopId,
    pub customer_id: CustomerId,
    #[serde(default)]
    pub customer_name: String,
    pub cloth_type: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub advance_paid: Decimal,
    pub delivery_date: NaiveDate,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub measurements: Measurements,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Amount still owed: `price - advance_paid`. Always derived, never
    /// stored.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        self.price - self.advance_paid
    }

    /// Rebuild an `Order` from a fetched document.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DataCorruption`] if the document no longer
    /// matches the record shape.
    pub fn from_document(doc: Document) -> Result<Self, RepositoryError> {
        let mut order: Self = serde_json::from_value(doc.data)
            .map_err(|e| RepositoryError::DataCorruption(format!("order {}: {e}", doc.id)))?;
        order.id = OrderId::new(doc.id);
        Ok(order)
    }
}

/// Input for creating an order, as submitted by the order form.
///
/// `price` and `advance_paid` arrive as form text and are coerced to
/// numbers at the repository boundary; `images` are URLs already returned
/// by the image host.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub cloth_type: String,
    pub price: String,
    /// Empty means no advance taken.
    pub advance_paid: String,
    /// `YYYY-MM-DD` as produced by a date input.
    pub delivery_date: String,
    pub measurements: Measurements,
    pub images: Vec<String>,
    pub notes: String,
}

/// The caller's revision of an order's image list.
///
/// Editing never replaces the list wholesale: the caller first chooses
/// which existing URLs survive (`retained`), then new upload URLs are
/// appended after them (`appended`).
#[derive(Debug, Clone, Default)]
pub struct ImageRevision {
    /// Existing URLs the caller kept, in their original order.
    pub retained: Vec<String>,
    /// Freshly uploaded URLs, appended at the tail.
    pub appended: Vec<String>,
}

impl ImageRevision {
    /// The stored list: retained images followed by appended uploads.
    #[must_use]
    pub fn into_images(self) -> Vec<String> {
        let mut images = self.retained;
        images.extend(self.appended);
        images
    }
}

/// Partial update of an order.
///
/// Absent fields keep their stored values; `updated_at` is restamped on
/// every update regardless.
#[derive(Debug, Clone, Default)]
pub struct OrderPatch {
    pub cloth_type: Option<String>,
    pub price: Option<Decimal>,
    pub advance_paid: Option<Decimal>,
    pub delivery_date: Option<NaiveDate>,
    pub status: Option<OrderStatus>,
    pub measurements: Option<Measurements>,
    pub images: Option<ImageRevision>,
    pub notes: Option<String>,
}

/// Stored form of an order write.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderDoc<'a> {
    pub shop_id: &'a ShopId,
    pub customer_id: &'a CustomerId,
    pub customer_name: &'a str,
    pub cloth_type: &'a str,
    pub price: Decimal,
    pub advance_paid: Decimal,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
    pub measurements: &'a Measurements,
    pub images: &'a [String],
    pub notes: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored form of an order patch; only present fields are written, plus
/// the unconditional `updatedAt` restamp.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderPatchDoc<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloth_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advance_paid: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurements: Option<&'a Measurements>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
