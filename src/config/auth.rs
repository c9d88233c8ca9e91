//! Filtering of `auth_groups` entries and assembly of per-target SNMP
//! variables.

use std::sync::Arc;

use serde_yaml::Value;

use super::types::{SnmpAuth, SnmpVariable, DEFAULT_COMMUNITY, DEFAULT_SNMP_PORT};
use super::{scalar_string, string_sequence};
use crate::secret::Secret;

/// Credentials of one well-formed `auth_groups` entry.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AuthGroup {
    pub version: u8,
    pub ip_targets: Vec<String>,
    pub community: Option<Secret>,
    pub port: Option<u16>,
    pub secname: Option<String>,
    pub authprotocol: Option<String>,
    pub authpassword: Option<Secret>,
    pub privprotocol: Option<String>,
    pub privpassword: Option<Secret>,
}

/// Filter a raw `auth_groups` sequence down to well-formed records,
/// preserving input order.
///
/// Entries are dropped silently when they are not mappings, when
/// `snmp_version` is anything but a literal 2 or 3 (there is no version
/// default), or when a present `ip_targets` is not a sequence. A missing
/// `ip_targets` falls back to the empty list rather than dropping the
/// entry.
pub(crate) fn filter_auth_groups(raw: &Value) -> Vec<AuthGroup> {
    let Some(entries) = raw.as_sequence() else {
        return Vec::new();
    };

    let mut groups = Vec::new();
    for entry in entries {
        if !entry.is_mapping() {
            continue;
        }

        let version = match entry.get("snmp_version").and_then(Value::as_u64) {
            Some(version @ (2 | 3)) => version as u8,
            _ => continue,
        };

        let ip_targets = match entry.get("ip_targets") {
            None => Vec::new(),
            Some(value) => match string_sequence(value) {
                Some(targets) => targets,
                None => continue,
            },
        };

        groups.push(AuthGroup {
            version,
            ip_targets,
            community: entry
                .get("snmp_community")
                .and_then(scalar_string)
                .map(Secret::new),
            port: entry
                .get("snmp_port")
                .and_then(Value::as_u64)
                .and_then(|port| u16::try_from(port).ok()),
            secname: entry.get("snmp_secname").and_then(scalar_string),
            authprotocol: entry.get("snmp_authprotocol").and_then(scalar_string),
            authpassword: entry
                .get("snmp_authpassword")
                .and_then(scalar_string)
                .map(Secret::new),
            privprotocol: entry.get("snmp_privprotocol").and_then(scalar_string),
            privpassword: entry
                .get("snmp_privpassword")
                .and_then(scalar_string)
                .map(Secret::new),
        });
    }
    groups
}

/// Expand validated auth groups into one variable per (group, target)
/// pair, group order then target order. The descriptor is built once per
/// group and shared by all of its targets; no deduplication across
/// groups.
pub(crate) fn snmp_variables(groups: &[AuthGroup]) -> Vec<SnmpVariable> {
    let mut variables = Vec::new();
    for group in groups {
        let auth = Arc::new(SnmpAuth {
            version: group.version,
            community: group
                .community
                .clone()
                .unwrap_or_else(|| Secret::new(DEFAULT_COMMUNITY)),
            port: group.port.unwrap_or(DEFAULT_SNMP_PORT),
            secname: group.secname.clone(),
            authprotocol: group.authprotocol.clone(),
            authpassword: group.authpassword.clone(),
            privprotocol: group.privprotocol.clone(),
            privpassword: group.privpassword.clone(),
        });

        for ip_target in &group.ip_targets {
            variables.push(SnmpVariable {
                ip_target: ip_target.clone(),
                auth: Arc::clone(&auth),
            });
        }
    }
    variables
}
