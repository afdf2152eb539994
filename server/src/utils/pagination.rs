use crate::config::PageLimits;
use std::collections::HashMap;

/// A resolved `LIMIT`/`OFFSET` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    /// Reads `limit` and `offset` from raw query parameters.
    ///
    /// Never fails. A missing, unparsable or non-positive `limit` falls back
    /// to the default, and anything above the ceiling is clamped to it. A
    /// missing, unparsable or negative `offset` becomes 0.
    pub fn from_query(params: &HashMap<String, String>, limits: PageLimits) -> Self {
        let limit = params
            .get("limit")
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|l| *l > 0)
            .unwrap_or(limits.default_limit)
            .min(limits.max_limit);

        let offset = params
            .get("offset")
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|o| *o >= 0)
            .unwrap_or(0);

        Self { limit, offset }
    }
}
