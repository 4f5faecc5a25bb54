//! Pagination envelope and limit/offset normalization (§4.3.1, §8).

use serde::Serialize;

pub const DEFAULT_LIMIT: i32 = 50;

/// `limit <= 0` (or absent) normalizes to [`DEFAULT_LIMIT`].
pub fn normalize_limit(limit: Option<i32>) -> i32 {
    match limit {
        Some(l) if l > 0 => l,
        _ => DEFAULT_LIMIT,
    }
}

/// `offset < 0` (or absent) normalizes to zero.
pub fn normalize_offset(offset: Option<i32>) -> i32 {
    offset.filter(|o| *o >= 0).unwrap_or(0)
}

/// The `{data, total, limit, offset}` envelope returned by every list
/// endpoint. `total` counts the items in this page: the storage layer
/// does not track an unbounded row count separate from the limited query
/// it ran, so a full cross-page total is not available here (DESIGN.md).
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub limit: i32,
    pub offset: i32,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, limit: i32, offset: i32) -> Self {
        let total = data.len() as i64;
        Self { data, total, limit, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_on_non_positive() {
        assert_eq!(normalize_limit(None), DEFAULT_LIMIT);
        assert_eq!(normalize_limit(Some(0)), DEFAULT_LIMIT);
        assert_eq!(normalize_limit(Some(-5)), DEFAULT_LIMIT);
        assert_eq!(normalize_limit(Some(10)), 10);
    }

    #[test]
    fn offset_clamps_to_zero() {
        assert_eq!(normalize_offset(None), 0);
        assert_eq!(normalize_offset(Some(-1)), 0);
        assert_eq!(normalize_offset(Some(7)), 7);
    }
}
