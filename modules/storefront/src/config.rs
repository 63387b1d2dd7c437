use serde::{Deserialize, Serialize};
use storefront_db::crud::PageLimits;

/// Module configuration (`storefront` section of the server config).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct StorefrontConfig {
    /// Page size used when a list request does not name one.
    pub default_page_size: u64,
    /// Upper bound for the `limit` list parameter.
    pub max_page_size: u64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        let limits = PageLimits::default();
        Self {
            default_page_size: limits.default_limit,
            max_page_size: limits.max_limit,
        }
    }
}

impl StorefrontConfig {
    #[must_use]
    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_limit: self.default_page_size,
            max_limit: self.max_page_size,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_limits() {
        let cfg = StorefrontConfig::default();
        assert_eq!(cfg.page_limits(), PageLimits::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = serde_json::from_str::<StorefrontConfig>(r#"{"page_size": 5}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"));

        let cfg: StorefrontConfig = serde_json::from_str(r#"{"max_page_size": 20}"#).unwrap();
        assert_eq!(cfg.page_limits().max_limit, 20);
        assert_eq!(cfg.page_limits().default_limit, 10);
    }
}
