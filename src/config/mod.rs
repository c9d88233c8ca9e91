//! Agent configuration: YAML document loading and the validated views
//! the poller consumes.
//!
//! The raw document is kept as a loose `serde_yaml::Value`; each read
//! operation filters and assembles its result fresh from the document,
//! so results always reflect what is in memory. Malformed entries are
//! dropped silently, never surfaced as errors: an empty result means
//! "nothing configured", not failure.

mod auth;
mod points;
mod types;

pub use types::{IpTargetPollingPoints, SnmpAuth, SnmpVariable};

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use thiserror::Error;

/// Event code logged when the document has no `polling_groups` section.
const EVENT_NO_POLLING_GROUPS: u32 = 55000;

/// Event code logged when the document has no `auth_groups` section.
const EVENT_NO_AUTH_GROUPS: u32 = 55001;

/// Seconds between poll cycles when the document does not set one.
const DEFAULT_POLLING_INTERVAL: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// The agent flavors this binary can run as. Identical configuration
/// contract, different configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AgentKind {
    /// General OID polling agent.
    Snmpd,
    /// Interface MIB polling agent.
    IfMibd,
}

impl AgentKind {
    /// File stem of this agent's YAML file inside the config directory.
    pub fn config_file_stem(self) -> &'static str {
        match self {
            Self::Snmpd => "snmpd",
            Self::IfMibd => "snmp_ifmibd",
        }
    }
}

/// In-memory configuration for one agent.
///
/// Owns the raw YAML document for the life of the process. The document
/// is immutable after construction, so concurrent readers need no
/// locking.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    kind: AgentKind,
    document: Value,
}

impl AgentConfig {
    /// Read and parse the agent's YAML file from the config directory.
    pub fn load(config_dir: &Path, kind: AgentKind) -> Result<Self, ConfigError> {
        let path = config_dir.join(format!("{}.yaml", kind.config_file_stem()));

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let document =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })?;

        Ok(Self::new(kind, document))
    }

    /// Wrap an already-parsed document.
    pub fn new(kind: AgentKind, document: Value) -> Self {
        Self { kind, document }
    }

    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    /// One SNMP variable per (auth group, target address) pair found in
    /// `auth_groups`. An absent section is expected operational state
    /// and yields an empty list after an informational notice.
    pub fn snmpvariables(&self) -> Vec<SnmpVariable> {
        let Some(raw) = self.document.get("auth_groups") else {
            tracing::info!(
                code = EVENT_NO_AUTH_GROUPS,
                "\"auth_groups\" parameter not found in configuration file. Will not poll."
            );
            return Vec::new();
        };
        auth::snmp_variables(&auth::filter_auth_groups(raw))
    }

    /// Per-target polling points assembled from `polling_groups`; same
    /// absent-section behavior as [`Self::snmpvariables`].
    pub fn target_polling_points(&self) -> Vec<IpTargetPollingPoints> {
        let Some(raw) = self.document.get("polling_groups") else {
            tracing::info!(
                code = EVENT_NO_POLLING_GROUPS,
                "\"polling_groups\" parameter not found in configuration file. Will not poll."
            );
            return Vec::new();
        };
        points::target_polling_points(&points::filter_polling_groups(raw))
    }

    /// Seconds between poll cycles. Negative configured values count as
    /// their magnitude; non-integer scalars fall back to the default.
    pub fn polling_interval(&self) -> u64 {
        self.document
            .get("polling_interval")
            .and_then(Value::as_i64)
            .map(i64::unsigned_abs)
            .unwrap_or(DEFAULT_POLLING_INTERVAL)
    }
}

/// String scalar, or None for any other value shape.
fn scalar_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_owned)
}

/// String items of a sequence value. None when the value is not a
/// sequence; non-string items are dropped silently.
fn string_sequence(value: &Value) -> Option<Vec<String>> {
    let items = value.as_sequence()?;
    Some(
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_owned))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(yaml: &str) -> AgentConfig {
        AgentConfig::new(AgentKind::Snmpd, serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_polling_interval_default() {
        assert_eq!(config("{}").polling_interval(), 300);
    }

    #[test]
    fn test_polling_interval_explicit() {
        assert_eq!(config("polling_interval: 20").polling_interval(), 20);
    }

    #[test]
    fn test_polling_interval_negative_becomes_magnitude() {
        assert_eq!(config("polling_interval: -50").polling_interval(), 50);
    }

    #[test]
    fn test_polling_interval_garbage_falls_back() {
        assert_eq!(config("polling_interval: soon").polling_interval(), 300);
    }

    #[test]
    fn test_absent_auth_section_yields_empty() {
        assert!(config("polling_interval: 10").snmpvariables().is_empty());
    }

    #[test]
    fn test_absent_polling_section_yields_empty() {
        assert!(config("polling_interval: 10")
            .target_polling_points()
            .is_empty());
    }

    #[test]
    fn test_two_targets_one_group() {
        let config = config(
            r#"
auth_groups:
  - snmp_version: 2
    ip_targets: ["10.0.0.1", "10.0.0.2"]
"#,
        );
        let variables = config.snmpvariables();

        assert_eq!(variables.len(), 2);
        for variable in &variables {
            assert_eq!(variable.auth.version, 2);
            assert_eq!(variable.auth.community.reveal(), "public");
            assert_eq!(variable.auth.port, 161);
        }
    }

    #[test]
    fn test_invalid_version_group_excluded() {
        let config = config(
            r#"
auth_groups:
  - snmp_version: 4
    ip_targets: ["10.0.0.1"]
"#,
        );
        assert!(config.snmpvariables().is_empty());
    }

    #[test]
    fn test_oids_unioned_across_groups() {
        let config = config(
            r#"
polling_groups:
  - ip_targets: ["10.0.0.1"]
    oids: ["1.3.6.1"]
  - ip_targets: ["10.0.0.1"]
    oids: ["1.3.6.2"]
"#,
        );
        let points = config.target_polling_points();

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].ip_target, "10.0.0.1");
        assert_eq!(points[0].oids, vec!["1.3.6.1", "1.3.6.2"]);
    }

    #[test]
    fn test_read_operations_are_idempotent() {
        let config = config(
            r#"
polling_interval: 60
auth_groups:
  - snmp_version: 3
    snmp_secname: operator
    ip_targets: ["10.0.0.1"]
polling_groups:
  - ip_targets: ["10.0.0.1"]
    oids: ["1.3.6.1", "1.3.6.2"]
"#,
        );

        assert_eq!(config.snmpvariables(), config.snmpvariables());
        assert_eq!(
            config.target_polling_points(),
            config.target_polling_points()
        );
        assert_eq!(config.polling_interval(), config.polling_interval());
    }

    #[test]
    fn test_agent_kind_file_stems_differ() {
        assert_eq!(AgentKind::Snmpd.config_file_stem(), "snmpd");
        assert_eq!(AgentKind::IfMibd.config_file_stem(), "snmp_ifmibd");
    }
}
