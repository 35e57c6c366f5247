use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Standard pagination query parameters for list endpoints
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    /// Calculate SQL OFFSET from page number
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    /// Get clamped page_size (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based() {
        let params = PaginationParams {
            page: 3,
            page_size: 20,
        };
        assert_eq!(params.offset(), 40);
        assert_eq!(params.limit(), 20);
    }

    #[test]
    fn page_size_is_clamped() {
        let params = PaginationParams {
            page: 1,
            page_size: 10_000,
        };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);

        let params = PaginationParams {
            page: 0,
            page_size: 0,
        };
        assert_eq!(params.limit(), 1);
        assert_eq!(params.offset(), 0);
    }
}
