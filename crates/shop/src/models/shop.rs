//! Shop and staff account records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tailordesk_core::{Phone, ShopId, StaffRole, UserId};

use crate::error::RepositoryError;
use crate::store::Document;

/// A tenant: one tailoring business.
///
/// Created once at signup and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    /// Store-assigned document ID; the `shopId` every record carries.
    #[serde(skip, default)]
    pub id: ShopId,
    pub shop_name: String,
    pub owner_name: String,
    pub phone: Phone,
    pub created_at: DateTime<Utc>,
}

impl Shop {
    /// Rebuild a `Shop` from a fetched document.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DataCorruption`] if the document no longer
    /// matches the record shape.
    pub fn from_document(doc: Document) -> Result<Self, RepositoryError> {
        let mut shop: Self = serde_json::from_value(doc.data).map_err(|e| {
            RepositoryError::DataCorruption(format!("shop {}: {e}", doc.id))
        })?;
        shop.id = ShopId::new(doc.id);
        Ok(shop)
    }
}

/// Signup input for provisioning a new shop.
#[derive(Debug, Clone)]
pub struct NewShop {
    pub shop_name: String,
    pub owner_name: String,
    /// Raw form input; validated at the repository boundary.
    pub phone: String,
}

/// A staff account, keyed by the auth provider's UID.
///
/// `shop_id` is assigned once at account creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip, default)]
    pub uid: UserId,
    pub name: String,
    pub email: String,
    pub shop_id: ShopId,
    pub role: StaffRole,
    #[serde(rename = "photoURL", default)]
    pub photo_url: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Rebuild a `User` from a fetched document.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DataCorruption`] if the document no longer
    /// matches the record shape.
    pub fn from_document(doc: Document) -> Result<Self, RepositoryError> {
        let mut user: Self = serde_json::from_value(doc.data).map_err(|e| {
            RepositoryError::DataCorruption(format!("user {}: {e}", doc.id))
        })?;
        user.uid = UserId::new(doc.id);
        Ok(user)
    }
}

/// Partial update of a staff profile.
///
/// `shop_id` and `role` are deliberately absent: tenancy and permissions are
/// not editable from the profile screen.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl ProfilePatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.photo_url.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.country.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_user_from_document_defaults_optional_fields() {
        let doc = Document {
            id: "uid-1".to_owned(),
            data: json!({
                "name": "Asha",
                "email": "asha@example.com",
                "shopId": "shop-1",
                "role": "owner",
                "createdAt": "2026-01-05T08:00:00Z",
            }),
        };

        let user = User::from_document(doc).unwrap();
        assert_eq!(user.uid.as_str(), "uid-1");
        assert_eq!(user.shop_id.as_str(), "shop-1");
        assert_eq!(user.photo_url, "");
        assert_eq!(user.country, "");
    }

    #[test]
    fn test_user_missing_shop_id_is_corruption() {
        let doc = Document {
            id: "uid-2".to_owned(),
            data: json!({
                "name": "Asha",
                "email": "asha@example.com",
                "role": "owner",
                "createdAt": "2026-01-05T08:00:00Z",
            }),
        };

        assert!(matches!(
            User::from_document(doc),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_profile_patch_serializes_only_present_fields() {
        let patch = ProfilePatch {
            city: Some("Mumbai".to_owned()),
            ..ProfilePatch::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({"city": "Mumbai"}));
    }
}
