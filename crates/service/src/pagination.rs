//! Batch-read parameters
//!
//! `BatchQuery` carries the caller's page size and 1-based page index. It is
//! never clamped: out-of-range values are rejected by [`BatchQuery::validate`].

use serde::{Deserialize, Serialize};

use crate::errors::GatewayError;

pub const INVALID_BATCH_MESSAGE: &str = "page and count fields are required & must be greater than 0";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchQuery {
    /// items per page
    pub count: i32,
    /// 1-based page index
    pub page: i32,
}

impl BatchQuery {
    pub fn new(count: i32, page: i32) -> Self { Self { count, page } }

    pub fn validate(self) -> Result<Self, GatewayError> {
        if self.count <= 0 || self.page <= 0 {
            return Err(GatewayError::validation(INVALID_BATCH_MESSAGE));
        }
        Ok(self)
    }

    /// Page size as `u64`; zero for unvalidated non-positive counts.
    pub fn limit(self) -> u64 {
        self.count.max(0) as u64
    }

    /// 0-based page index.
    pub fn page_index(self) -> u64 {
        (self.page.max(1) - 1) as u64
    }

    /// Number of records preceding this page.
    pub fn offset(self) -> u64 {
        self.page_index() * self.limit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_zero_and_negative() {
        for (count, page) in [(0, 1), (3, 0), (-1, 1), (3, -2), (0, 0)] {
            let err = BatchQuery::new(count, page).validate().unwrap_err();
            assert!(matches!(err, GatewayError::Validation(ref m) if m == INVALID_BATCH_MESSAGE));
        }
    }

    #[test]
    fn offsets_follow_one_based_pages() {
        let q = BatchQuery::new(3, 1).validate().unwrap();
        assert_eq!((q.page_index(), q.offset(), q.limit()), (0, 0, 3));
        let q = BatchQuery::new(3, 3).validate().unwrap();
        assert_eq!((q.page_index(), q.offset(), q.limit()), (2, 6, 3));
    }

    #[test]
    fn missing_json_fields_default_to_zero() {
        let q: BatchQuery = serde_json::from_str(r#"{"count":3}"#).unwrap();
        assert_eq!(q, BatchQuery::new(3, 0));
        assert!(q.validate().is_err());
    }
}
