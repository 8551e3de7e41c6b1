//! Configuration for warden authorization.

use serde::Deserialize;

/// Configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthzConfig {
    /// Keep permission token case instead of lower-casing it.
    pub case_sensitive: bool,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_case_insensitive() {
        let cfg: AuthzConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(!cfg.case_sensitive);
    }

    #[test]
    fn rejects_unknown_fields() {
        let res: Result<AuthzConfig, _> =
            serde_json::from_value(serde_json::json!({ "case_sensitive": true, "mode": "x" }));
        assert!(res.is_err());
    }
}
