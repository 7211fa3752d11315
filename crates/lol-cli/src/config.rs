//! CLI configuration via environment variables
//!
//! Every setting has a command-line flag that takes precedence; the
//! environment only supplies defaults.

use std::env;
use tracing::warn;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Default to JSON diagnostic output (LOL_DIAGNOSTICS=json)
    pub default_json: bool,
    /// Disable colored output (LOL_NO_COLOR=1 or NO_COLOR=1)
    pub no_color: bool,
    /// Default call-depth limit (LOL_MAX_CALL_DEPTH=<n>)
    pub max_call_depth: Option<usize>,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let max_call_depth = lookup("LOL_MAX_CALL_DEPTH").and_then(|raw| match raw.trim().parse() {
            Ok(depth) => Some(depth),
            Err(_) => {
                warn!(value = %raw, "ignoring invalid LOL_MAX_CALL_DEPTH");
                None
            }
        });

        Self {
            default_json: lookup("LOL_DIAGNOSTICS")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            no_color: lookup("LOL_NO_COLOR").is_some() || lookup("NO_COLOR").is_some(),
            max_call_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_defaults() {
        assert_eq!(config_with(&[]), Config::default());
    }

    #[test]
    fn test_config_json_diagnostics() {
        assert!(config_with(&[("LOL_DIAGNOSTICS", "json")]).default_json);
        assert!(config_with(&[("LOL_DIAGNOSTICS", "JSON")]).default_json);
        assert!(!config_with(&[("LOL_DIAGNOSTICS", "human")]).default_json);
    }

    #[test]
    fn test_config_no_color() {
        assert!(config_with(&[("LOL_NO_COLOR", "1")]).no_color);
        assert!(config_with(&[("NO_COLOR", "")]).no_color);
    }

    #[test]
    fn test_config_max_call_depth() {
        assert_eq!(
            config_with(&[("LOL_MAX_CALL_DEPTH", " 64 ")]).max_call_depth,
            Some(64)
        );
        assert_eq!(
            config_with(&[("LOL_MAX_CALL_DEPTH", "lots")]).max_call_depth,
            None
        );
    }
}
