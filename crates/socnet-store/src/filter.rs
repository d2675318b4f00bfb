//! Equality filters for `count` and `delete_many`

use crate::error::{Result, StoreError};
use serde_json::Value;

/// A conjunction of `field == value` conditions
///
/// An empty filter matches every document.
///
/// ```
/// use socnet_store::Filter;
///
/// let owned_by = Filter::eq("user_id", "dave03");
/// assert_eq!(owned_by.conditions().len(), 1);
/// assert!(Filter::all().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Match every document
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(field, value)
    }

    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Reject field names that are not plain identifiers
    pub fn validate(&self) -> Result<()> {
        for (field, _) in &self.conditions {
            let valid = !field.is_empty()
                && field
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !valid {
                return Err(StoreError::InvalidField(field.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_identifiers() {
        let filter = Filter::eq("user_id", "dave03").and("_id", "dave03_00001");
        assert!(filter.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_path_injection() {
        let filter = Filter::eq("user_id') OR 1=1 --", "x");
        assert!(matches!(
            filter.validate(),
            Err(StoreError::InvalidField(_))
        ));
        assert!(Filter::eq("", "x").validate().is_err());
    }
}
