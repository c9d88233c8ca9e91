//! Filtering of `polling_groups` entries and per-target polling point
//! assembly.

use serde_yaml::Value;

use super::string_sequence;
use super::types::IpTargetPollingPoints;

/// One well-formed `polling_groups` entry. Only the two recognized keys
/// survive filtering; everything else in the raw entry is discarded.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PollingGroup {
    pub ip_targets: Vec<String>,
    pub oids: Vec<String>,
}

/// Filter a raw `polling_groups` value down to records of the two
/// recognized keys.
///
/// A section that is not a sequence yields nothing. Entries that are not
/// mappings are skipped. Within an entry, a recognized key is copied
/// only when its raw value is a sequence; anything else leaves the empty
/// default in place. Every surviving mapping yields a record, even an
/// all-empty one: validity is decided downstream, once per assembled
/// target.
pub(crate) fn filter_polling_groups(raw: &Value) -> Vec<PollingGroup> {
    let Some(entries) = raw.as_sequence() else {
        return Vec::new();
    };

    let mut groups = Vec::new();
    for entry in entries {
        if !entry.is_mapping() {
            continue;
        }

        let mut group = PollingGroup::default();
        if let Some(targets) = entry.get("ip_targets").and_then(string_sequence) {
            group.ip_targets = targets;
        }
        if let Some(oids) = entry.get("oids").and_then(string_sequence) {
            group.oids = oids;
        }
        groups.push(group);
    }
    groups
}

/// Normalize a group's OID list before it is assigned to targets: trim
/// surrounding whitespace, strip one leading dot, drop entries left
/// empty. Applied once per group.
pub(crate) fn normalize_oids(oids: &[String]) -> Vec<String> {
    oids.iter()
        .map(|oid| {
            let trimmed = oid.trim();
            trimmed.strip_prefix('.').unwrap_or(trimmed).to_owned()
        })
        .filter(|oid| !oid.is_empty())
        .collect()
}

/// Fold validated groups into one polling-points entity per target.
///
/// Groups missing either targets or OIDs contribute nothing. A target
/// listed by several groups accumulates the union of their OID sets;
/// output preserves first-seen target order and only valid entities are
/// emitted.
pub(crate) fn target_polling_points(groups: &[PollingGroup]) -> Vec<IpTargetPollingPoints> {
    let mut points: Vec<IpTargetPollingPoints> = Vec::new();
    for group in groups {
        if group.ip_targets.is_empty() || group.oids.is_empty() {
            continue;
        }

        let oids = normalize_oids(&group.oids);
        for ip_target in &group.ip_targets {
            match points.iter_mut().find(|p| p.ip_target == *ip_target) {
                Some(existing) => existing.add(oids.iter().cloned()),
                None => {
                    let mut entry = IpTargetPollingPoints::new(ip_target.clone());
                    entry.add(oids.iter().cloned());
                    points.push(entry);
                }
            }
        }
    }

    points.retain(IpTargetPollingPoints::valid);
    points
}
