//! Customer repository: CRUD and in-memory search, scoped to a shop.

use chrono::Utc;
use tracing::{debug, instrument};

use tailordesk_core::{CustomerId, Phone};

use crate::error::{RepositoryError, ValidationError};
use crate::models::customer::{Customer, CustomerDoc, CustomerPatch, CustomerPatchDoc, NewCustomer};
use crate::store::{Direction, Query, RecordStore, collections};
use crate::tenant::TenantContext;

/// Repository for customer records.
///
/// Every operation takes the [`TenantContext`] explicitly; records of other
/// shops are invisible, and a lookup that lands on another shop's record
/// reports [`RepositoryError::NotFound`] rather than leaking it.
pub struct CustomerRepository<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> CustomerRepository<'a, S> {
    /// Create a new customer repository over a store handle.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a customer. Returns the store-assigned ID.
    ///
    /// `name` and `phone` are required; optional fields are stored as empty
    /// strings, never null.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Validation`] before any store call if
    /// required fields are missing or the phone is malformed, or a store
    /// error if the write fails.
    #[instrument(skip_all, fields(shop = %ctx.shop_id))]
    pub async fn create(
        &self,
        ctx: &TenantContext,
        new: NewCustomer,
    ) -> Result<CustomerId, RepositoryError> {
        if new.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name").into());
        }
        let phone = Phone::parse(&new.phone).map_err(|e| match e {
            tailordesk_core::PhoneError::Empty => ValidationError::MissingField("phone"),
            other => ValidationError::Phone(other),
        })?;

        let doc = CustomerDoc {
            shop_id: &ctx.shop_id,
            name: new.name.trim(),
            phone: &phone,
            address: &new.address,
            country: &new.country,
            country_code: &new.country_code,
            state: &new.state,
            city: &new.city,
            last_measurements: &new.last_measurements,
            notes: &new.notes,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(doc)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        let id = self.store.insert(collections::CUSTOMERS, value).await?;
        debug!(customer = %id, "created customer");
        Ok(CustomerId::new(id))
    }

    /// Fetch one customer.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the record is absent or
    /// belongs to another shop, or a store or corruption error.
    pub async fn get(
        &self,
        ctx: &TenantContext,
        id: &CustomerId,
    ) -> Result<Customer, RepositoryError> {
        let doc = self
            .store
            .get(collections::CUSTOMERS, id.as_str())
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let customer = Customer::from_document(doc)?;

        if customer.shop_id != ctx.shop_id {
            return Err(RepositoryError::NotFound);
        }
        Ok(customer)
    }

    /// List the shop's customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns a store error if the query fails, or
    /// [`RepositoryError::DataCorruption`] if any returned document is
    /// malformed.
    pub async fn list(&self, ctx: &TenantContext) -> Result<Vec<Customer>, RepositoryError> {
        let docs = self
            .store
            .query(
                collections::CUSTOMERS,
                Query::new()
                    .filter("shopId", ctx.shop_id.as_str())
                    .order_by("createdAt", Direction::Descending),
            )
            .await?;

        docs.into_iter().map(Customer::from_document).collect()
    }

    /// Apply a partial update. Unspecified fields keep their stored values.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Validation`] if a patched phone is
    /// malformed, [`RepositoryError::NotFound`] if the record is absent or
    /// belongs to another shop, or a store error.
    #[instrument(skip_all, fields(shop = %ctx.shop_id, customer = %id))]
    pub async fn update(
        &self,
        ctx: &TenantContext,
        id: &CustomerId,
        patch: CustomerPatch,
    ) -> Result<(), RepositoryError> {
        let phone = patch
            .phone
            .as_deref()
            .map(Phone::parse)
            .transpose()
            .map_err(ValidationError::from)?;

        // Tenancy check before touching the record.
        self.get(ctx, id).await?;

        let doc = CustomerPatchDoc {
            name: patch.name.as_deref(),
            phone: phone.as_ref(),
            address: patch.address.as_deref(),
            country: patch.country.as_deref(),
            country_code: patch.country_code.as_deref(),
            state: patch.state.as_deref(),
            city: patch.city.as_deref(),
            last_measurements: patch.last_measurements.as_ref(),
            notes: patch.notes.as_deref(),
        };
        let value = serde_json::to_value(doc)
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        let existed = self
            .store
            .update(collections::CUSTOMERS, id.as_str(), value)
            .await?;
        if existed {
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    /// Hard-delete a customer.
    ///
    /// Dependent orders are NOT removed or checked; the customer's orders
    /// survive with a dangling `customerId` (no cascade in the store).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the record is already gone
    /// (so a double delete is signalled, not silent) or belongs to another
    /// shop, or a store error.
    #[instrument(skip_all, fields(shop = %ctx.shop_id, customer = %id))]
    pub async fn delete(
        &self,
        ctx: &TenantContext,
        id: &CustomerId,
    ) -> Result<(), RepositoryError> {
        self.get(ctx, id).await?;

        let existed = self
            .store
            .delete(collections::CUSTOMERS, id.as_str())
            .await?;
        if existed {
            debug!("deleted customer");
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }
}

/// Filter an already-fetched customer list by a search box value.
///
/// Case-insensitive substring match against name OR phone; an empty query
/// matches everything, preserving input order. This is a client-side
/// filter, not a store query: substring search over phone numbers is not
/// natively indexable in the target store family.
#[must_use]
pub fn search<'c>(customers: &'c [Customer], text: &str) -> Vec<&'c Customer> {
    let text = text.trim().to_lowercase();

    customers
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&text)
                || c.phone.as_str().to_lowercase().contains(&text)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use tailordesk_core::{Measurements, ShopId};

    use super::*;

    fn customer(name: &str, phone: &str) -> Customer {
        Customer {
            id: CustomerId::new(name),
            shop_id: ShopId::new("shop-1"),
            name: name.to_owned(),
            phone: Phone::parse(phone).unwrap(),
            address: String::new(),
            country: String::new(),
            country_code: String::new(),
            state: String::new(),
            city: String::new(),
            last_measurements: Measurements::default(),
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_search_empty_query_returns_all_in_order() {
        let list = vec![customer("John", "111110"), customer("Asha", "222220")];
        let hits = search(&list, "");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits.first().map(|c| c.name.as_str()), Some("John"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let list = vec![customer("John Smith", "111110"), customer("Asha", "222220")];

        let upper: Vec<&str> = search(&list, "JOHN").iter().map(|c| c.name.as_str()).collect();
        let lower: Vec<&str> = search(&list, "john").iter().map(|c| c.name.as_str()).collect();

        assert_eq!(upper, ["John Smith"]);
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_search_matches_phone_substring() {
        let list = vec![customer("John", "987654321"), customer("Asha", "555000111")];
        let hits = search(&list, "54321");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.first().map(|c| c.name.as_str()), Some("John"));
    }

    #[test]
    fn test_search_no_match() {
        let list = vec![customer("John", "987654321")];
        assert!(search(&list, "zzz").is_empty());
    }
}
