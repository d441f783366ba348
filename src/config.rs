//! Configuration for graphs and evaluators.
//!
//! `Config` is plain serde data so it can be loaded from JSON or, with the
//! `toml` feature, TOML files.
use crate::error::{GraphError, Result};
use serde::de::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What `add_edge` does when an edge with the same `(from, to, activated_at)`
/// already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateEdgePolicy {
    /// Keep both edges; the newer one gets the next sequence number.
    #[default]
    Disambiguate,
    /// Fail with `GraphError::DuplicateEdge`.
    Reject,
}

/// Eviction policy of the per-node evaluation cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Never evict. Memory grows with every distinct (node, time) evaluated.
    #[default]
    Unbounded,
    /// Keep at most `max_entries_per_node` timestamps per node, evicting the
    /// oldest-inserted one first.
    Bounded { max_entries_per_node: usize },
}

impl CachePolicy {
    pub fn capacity(&self) -> Option<usize> {
        match self {
            CachePolicy::Unbounded => None,
            CachePolicy::Bounded {
                max_entries_per_node,
            } => Some(*max_entries_per_node),
        }
    }
}

/// Graph and evaluator configuration
///
/// # Example
///
/// ```rust
/// use tempograph::{CachePolicy, Config, DuplicateEdgePolicy};
///
/// let json = r#"{
///     "duplicate_edges": "reject",
///     "cache_policy": { "bounded": { "max_entries_per_node": 64 } },
///     "max_eval_depth": 512
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.duplicate_edges, DuplicateEdgePolicy::Reject);
/// assert_eq!(config.cache_policy.capacity(), Some(64));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub duplicate_edges: DuplicateEdgePolicy,

    #[serde(default)]
    pub cache_policy: CachePolicy,

    /// Maximum dependency depth followed by a single evaluation.
    ///
    /// Evaluation keeps its own work stack, so this bounds memory per call
    /// rather than thread stack use.
    #[serde(default = "Config::default_max_eval_depth")]
    pub max_eval_depth: usize,
}

impl Config {
    const fn default_max_eval_depth() -> usize {
        4096
    }

    pub fn with_duplicate_edges(mut self, policy: DuplicateEdgePolicy) -> Self {
        self.duplicate_edges = policy;
        self
    }

    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        if let CachePolicy::Bounded {
            max_entries_per_node,
        } = policy
        {
            assert!(
                max_entries_per_node > 0,
                "Cache capacity must be greater than zero"
            );
        }
        self.cache_policy = policy;
        self
    }

    pub fn with_max_eval_depth(mut self, depth: usize) -> Self {
        assert!(depth > 0, "Evaluation depth must be greater than zero");
        self.max_eval_depth = depth;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.cache_policy.capacity() == Some(0) {
            return Err("Cache capacity must be greater than zero".to_string());
        }

        if self.max_eval_depth == 0 {
            return Err("Evaluation depth must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a configuration file, picking the format from its extension.
    ///
    /// `.json` is always accepted; `.toml` requires the `toml` feature.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                Self::from_json(&contents).map_err(|e| GraphError::InvalidConfig(e.to_string()))
            }
            #[cfg(feature = "toml")]
            Some("toml") => {
                Self::from_toml(&contents).map_err(|e| GraphError::InvalidConfig(e.to_string()))
            }
            other => Err(GraphError::InvalidConfig(format!(
                "unsupported config format: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duplicate_edges: DuplicateEdgePolicy::default(),
            cache_policy: CachePolicy::default(),
            max_eval_depth: Self::default_max_eval_depth(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.duplicate_edges, DuplicateEdgePolicy::Disambiguate);
        assert_eq!(config.cache_policy, CachePolicy::Unbounded);
        assert_eq!(config.max_eval_depth, 4096);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_duplicate_edges(DuplicateEdgePolicy::Reject)
            .with_cache_policy(CachePolicy::Bounded {
                max_entries_per_node: 3,
            })
            .with_max_eval_depth(16);

        let json = config.to_json().unwrap();
        let deserialized = Config::from_json(&json).unwrap();

        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(Config::from_json(r#"{"sync_policy": "always"}"#).is_err());
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let json = r#"{"cache_policy": {"bounded": {"max_entries_per_node": 0}}}"#;
        assert!(Config::from_json(json).is_err());
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"max_eval_depth": 32}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.max_eval_depth, 32);
    }

    #[test]
    fn test_load_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, GraphError::InvalidConfig(_)));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_roundtrip() {
        let toml_str = r#"
            duplicate_edges = "reject"
            max_eval_depth = 100
        "#;
        let config = Config::from_toml(toml_str).unwrap();
        assert_eq!(config.duplicate_edges, DuplicateEdgePolicy::Reject);
        assert_eq!(config.max_eval_depth, 100);
    }
}
