//! Body measurement profile.

use serde::{Deserialize, Serialize};

/// The five body dimensions taken for a stitching order.
///
/// Values are free text as entered at the counter (e.g. `"42"` or
/// `"42.5 in"`); missing dimensions are the empty string, never null, so
/// downstream string handling needs no fallback chains.
///
/// A customer's `last_measurements` is a cached copy used to pre-fill new
/// orders. It changes only on an explicit customer edit - it is never synced
/// back from an order whose measurements differ.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Measurements {
    #[serde(default)]
    pub chest: String,
    #[serde(default)]
    pub waist: String,
    #[serde(default)]
    pub shoulder: String,
    #[serde(default)]
    pub sleeve: String,
    #[serde(default)]
    pub length: String,
}

impl Measurements {
    /// Whether no dimension has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chest.is_empty()
            && self.waist.is_empty()
            && self.shoulder.is_empty()
            && self.sleeve.is_empty()
            && self.length.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty_string() {
        let m: Measurements = serde_json::from_str(r#"{"chest": "40"}"#).unwrap();
        assert_eq!(m.chest, "40");
        assert_eq!(m.waist, "");
        assert_eq!(m.length, "");
    }

    #[test]
    fn test_is_empty() {
        assert!(Measurements::default().is_empty());
        let m = Measurements {
            sleeve: "24".to_owned(),
            ..Measurements::default()
        };
        assert!(!m.is_empty());
    }
}
