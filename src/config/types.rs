use std::sync::Arc;

use crate::secret::Secret;

/// Community string used when an auth group does not set one.
pub const DEFAULT_COMMUNITY: &str = "public";

/// UDP port used when an auth group does not set one.
pub const DEFAULT_SNMP_PORT: u16 = 161;

/// SNMP authentication parameters for one auth group.
///
/// Built once per group and shared (via `Arc`) by every target address
/// the group lists. Read-only after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SnmpAuth {
    /// SNMP version, 2 or 3.
    pub version: u8,
    pub community: Secret,
    pub port: u16,
    /// SNMPv3 security name.
    pub secname: Option<String>,
    pub authprotocol: Option<String>,
    pub authpassword: Option<Secret>,
    pub privprotocol: Option<String>,
    pub privpassword: Option<Secret>,
}

impl Default for SnmpAuth {
    fn default() -> Self {
        Self {
            version: 2,
            community: Secret::new(DEFAULT_COMMUNITY),
            port: DEFAULT_SNMP_PORT,
            secname: None,
            authprotocol: None,
            authpassword: None,
            privprotocol: None,
            privpassword: None,
        }
    }
}

/// One poll target paired with the credentials of the auth group that
/// listed it. The same address appearing in two groups yields two
/// variables with two distinct descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct SnmpVariable {
    pub ip_target: String,
    pub auth: Arc<SnmpAuth>,
}

/// A target address plus the set of OIDs to poll on it, accumulated
/// across every polling group that lists the address.
#[derive(Debug, Clone, PartialEq)]
pub struct IpTargetPollingPoints {
    pub ip_target: String,
    pub oids: Vec<String>,
}

impl IpTargetPollingPoints {
    pub fn new(ip_target: impl Into<String>) -> Self {
        Self {
            ip_target: ip_target.into(),
            oids: Vec::new(),
        }
    }

    /// Merge OIDs into the set, keeping first-seen order and dropping
    /// duplicates.
    pub fn add<I>(&mut self, oids: I)
    where
        I: IntoIterator<Item = String>,
    {
        for oid in oids {
            if !self.oids.contains(&oid) {
                self.oids.push(oid);
            }
        }
    }

    /// A target is pollable only with a non-empty address and at least
    /// one OID.
    pub fn valid(&self) -> bool {
        !self.ip_target.is_empty() && !self.oids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snmp_auth_defaults() {
        let auth = SnmpAuth::default();
        assert_eq!(auth.version, 2);
        assert_eq!(auth.community.reveal(), "public");
        assert_eq!(auth.port, 161);
        assert!(auth.secname.is_none());
        assert!(auth.authprotocol.is_none());
        assert!(auth.authpassword.is_none());
        assert!(auth.privprotocol.is_none());
        assert!(auth.privpassword.is_none());
    }

    #[test]
    fn test_polling_points_add_deduplicates() {
        let mut points = IpTargetPollingPoints::new("10.0.0.1");
        points.add(["1.3.6.1".to_string(), "1.3.6.2".to_string()]);
        points.add(["1.3.6.2".to_string(), "1.3.6.3".to_string()]);
        assert_eq!(points.oids, vec!["1.3.6.1", "1.3.6.2", "1.3.6.3"]);
    }

    #[test]
    fn test_polling_points_validity() {
        let mut points = IpTargetPollingPoints::new("10.0.0.1");
        assert!(!points.valid());
        points.add(["1.3.6.1".to_string()]);
        assert!(points.valid());

        let mut anonymous = IpTargetPollingPoints::new("");
        anonymous.add(["1.3.6.1".to_string()]);
        assert!(!anonymous.valid());
    }

    #[test]
    fn test_variables_share_descriptor() {
        let auth = Arc::new(SnmpAuth::default());
        let first = SnmpVariable {
            ip_target: "10.0.0.1".to_string(),
            auth: Arc::clone(&auth),
        };
        let second = SnmpVariable {
            ip_target: "10.0.0.2".to_string(),
            auth: Arc::clone(&auth),
        };
        assert!(Arc::ptr_eq(&first.auth, &second.auth));
    }
}
