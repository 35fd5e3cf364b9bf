//! Query parameter types and clamping helpers for list endpoints.

use serde::Deserialize;

pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// `GET /catalog?limit=&offset=&category=`.
#[derive(Debug, Deserialize)]
pub struct CatalogParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Category label, e.g. `Board Game`.
    pub category: Option<String>,
}

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
