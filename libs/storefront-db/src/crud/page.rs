use serde::{Deserialize, Serialize};

/// Page size bounds applied to every list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// Raw list parameters as they arrive in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
}

/// List parameters after defaults and clamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// 1-based page number.
    pub page: u64,
    pub limit: u64,
    /// Trimmed, never empty.
    pub search: Option<String>,
}

impl ListQuery {
    /// Apply defaults: page 0 or absent becomes 1, limit 0 or absent becomes
    /// the default, anything above the maximum is clamped.
    #[must_use]
    pub fn normalize(self, limits: PageLimits) -> ListParams {
        let max_limit = limits.max_limit.max(1);
        let limit = match self.limit {
            None | Some(0) => limits.default_limit,
            Some(n) => n,
        }
        .clamp(1, max_limit);

        ListParams {
            page: self.page.filter(|p| *p >= 1).unwrap_or(1),
            limit,
            search: self
                .search
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Largest offset the SQL drivers accept; they bind LIMIT/OFFSET as `i64`.
const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();

impl ListParams {
    /// Rows to skip, capped at [`MAX_OFFSET`]. A page past the end yields no rows.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(MAX_OFFSET)
    }
}

/// The list response envelope: `{ data, total, page, limit }`.
///
/// `total` counts every row matching scope and search, independent of paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_empty_query() {
        let p = ListQuery::default().normalize(PageLimits::default());
        assert_eq!(
            p,
            ListParams {
                page: 1,
                limit: 10,
                search: None
            }
        );
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn page_zero_and_limit_zero_fall_back() {
        let q = ListQuery {
            page: Some(0),
            limit: Some(0),
            search: None,
        };
        let p = q.normalize(PageLimits::default());
        assert_eq!((p.page, p.limit), (1, 10));
    }

    #[test]
    fn limit_is_clamped_to_maximum() {
        let q = ListQuery {
            page: Some(3),
            limit: Some(1_000),
            search: None,
        };
        let p = q.normalize(PageLimits {
            default_limit: 20,
            max_limit: 50,
        });
        assert_eq!(p.limit, 50);
        assert_eq!(p.offset(), 100);
    }

    #[test]
    fn huge_page_keeps_offset_bindable() {
        let q = ListQuery {
            page: Some(u64::MAX),
            limit: Some(10),
            search: None,
        };
        let p = q.normalize(PageLimits::default());
        assert_eq!(p.page, u64::MAX);
        assert_eq!(p.offset(), MAX_OFFSET);
        assert!(i64::try_from(p.offset()).is_ok());

        let q = ListQuery {
            page: Some(1 << 62),
            limit: Some(100),
            search: None,
        };
        assert!(i64::try_from(q.normalize(PageLimits::default()).offset()).is_ok());
    }

    #[test]
    fn blank_search_is_dropped() {
        let q = ListQuery {
            search: Some("   ".to_owned()),
            ..Default::default()
        };
        assert!(q.normalize(PageLimits::default()).search.is_none());

        let q = ListQuery {
            search: Some(" tea ".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            q.normalize(PageLimits::default()).search.as_deref(),
            Some("tea")
        );
    }

    #[test]
    fn query_string_shape() {
        let q: ListQuery = serde_json::from_str(r#"{"page":2,"search":"x"}"#).unwrap();
        assert_eq!(q.page, Some(2));
        assert!(q.limit.is_none());

        let page = Page {
            data: vec![1, 2],
            total: 7,
            page: 2,
            limit: 2,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"data": [1, 2], "total": 7, "page": 2, "limit": 2})
        );
    }
}
