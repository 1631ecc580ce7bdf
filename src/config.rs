use crate::filter::Clause;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}'")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid key pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Free-form label for the loaded profile.
    pub profile_name: String,
    pub keys: KeyRules,
    pub service_graph: ServiceGraphRules,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            profile_name: "base".to_string(),
            keys: KeyRules::default(),
            service_graph: ServiceGraphRules::default(),
        }
    }
}

impl QueryConfig {
    /// Series whose label names are offered as filter keys
    pub fn tag_key_series(&self, apm_table: bool) -> Vec<&str> {
        let mut series: Vec<&str> = self
            .service_graph
            .tag_key_series
            .iter()
            .map(String::as_str)
            .collect();
        if apm_table {
            series.extend(self.service_graph.apm_tag_key_series.iter().map(String::as_str));
        }
        series
    }
}

/// Label keys expected to appear in filter queries
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeyRules {
    pub known_keys: Vec<String>,
    /// Regexes; a key matching any of them counts as known.
    pub key_patterns: Vec<String>,
}

/// Metric series backing the service-graph filter control
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceGraphRules {
    pub tag_key_series: Vec<String>,
    /// Extra series used when the APM table is enabled.
    pub apm_tag_key_series: Vec<String>,
    /// Series whose presence shows that service-graph metrics are collected.
    pub health_series: Vec<String>,
}

impl Default for ServiceGraphRules {
    fn default() -> Self {
        Self {
            tag_key_series: vec!["traces_service_graph_request_total".to_string()],
            apm_tag_key_series: vec!["traces_spanmetrics_calls_total".to_string()],
            health_series: vec![
                "traces_service_graph_request_server_seconds_sum".to_string(),
                "traces_service_graph_request_total".to_string(),
                "traces_service_graph_request_failed_total".to_string(),
            ],
        }
    }
}

/// Compiled form of [`KeyRules`]
#[derive(Debug, Default)]
pub struct KeyChecker {
    known: HashSet<String>,
    patterns: Vec<Regex>,
}

impl KeyChecker {
    pub fn new(rules: &KeyRules) -> Result<Self, ConfigError> {
        let patterns = rules
            .key_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            known: rules.known_keys.iter().cloned().collect(),
            patterns,
        })
    }

    /// Whether any rule is configured; without rules every key is accepted.
    pub fn is_active(&self) -> bool {
        !self.known.is_empty() || !self.patterns.is_empty()
    }

    pub fn is_known(&self, key: &str) -> bool {
        !self.is_active()
            || self.known.contains(key)
            || self.patterns.iter().any(|re| re.is_match(key))
    }

    /// Keys used by `clauses` that no rule accepts
    pub fn unknown_keys(&self, clauses: &[Clause]) -> BTreeSet<String> {
        clauses
            .iter()
            .filter(|clause| !self.is_known(&clause.key))
            .map(|clause| clause.key.clone())
            .collect()
    }
}

pub fn load_config(path: Option<&Path>) -> Result<QueryConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<QueryConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    let config = toml::from_str::<QueryConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })?;
    tracing::debug!(profile = %config.profile_name, path = %path.display(), "loaded config");
    Ok(config)
}

pub fn default_config() -> &'static QueryConfig {
    static DEFAULT_CONFIG: LazyLock<QueryConfig> = LazyLock::new(QueryConfig::default);
    &DEFAULT_CONFIG
}
