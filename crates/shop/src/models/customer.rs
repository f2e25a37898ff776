//! Customer records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tailordesk_core::{CustomerId, Measurements, Phone, ShopId};

use crate::error::RepositoryError;
use crate::store::Document;

/// A tailoring client with a stored measurement profile.
///
/// `shop_id` always equals the creating tenant's shop and is never mutated
/// after creation. `last_measurements` is a cached copy used to pre-fill new
/// orders; it changes only on explicit customer edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(skip, default)]
    pub id: CustomerId,
    pub shop_id: ShopId,
    pub name: String,
    pub phone: Phone,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub last_measurements: Measurements,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Rebuild a `Customer` from a fetched document.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DataCorruption`] if the document no longer
    /// matches the record shape.
    pub fn from_document(doc: Document) -> Result<Self, RepositoryError> {
        let mut customer: Self = serde_json::from_value(doc.data).map_err(|e| {
            RepositoryError::DataCorruption(format!("customer {}: {e}", doc.id))
        })?;
        customer.id = CustomerId::new(doc.id);
        Ok(customer)
    }
}

/// Input for creating a customer.
///
/// `name` and `phone` are required; everything else defaults to the empty
/// string when left blank on the form.
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub name: String,
    /// Raw form input; validated at the repository boundary.
    pub phone: String,
    pub address: String,
    pub country: String,
    pub country_code: String,
    pub state: String,
    pub city: String,
    pub last_measurements: Measurements,
    pub notes: String,
}

/// Partial update of a customer.
///
/// Absent fields keep their stored values. `last_measurements`, when
/// present, replaces the whole profile - a customer edit is the only path
/// that changes the cached measurement copy.
#[derive(Debug, Clone, Default)]
pub struct CustomerPatch {
    pub name: Option<String>,
    /// Raw form input; validated at the repository boundary when present.
    pub phone: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub last_measurements: Option<Measurements>,
    pub notes: Option<String>,
}

/// Stored form of a customer write.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerDoc<'a> {
    pub shop_id: &'a ShopId,
    pub name: &'a str,
    pub phone: &'a Phone,
    pub address: &'a str,
    pub country: &'a str,
    pub country_code: &'a str,
    pub state: &'a str,
    pub city: &'a str,
    pub last_measurements: &'a Measurements,
    pub notes: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Stored form of a customer patch; only present fields are written.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerPatchDoc<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a Phone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_measurements: Option<&'a Measurements>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
}
