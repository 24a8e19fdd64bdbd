//! Catalog data model: data objects and their physical replicas.

use serde::{Deserialize, Serialize};

use crate::hierarchy::ResolvedHierarchy;

/// State of a single replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicaStatus {
    /// No operation holds the replica open for writing.
    AtRest,
    /// An open write is in progress; contents are not authoritative.
    Intermediate,
    /// Contents are known to lag a sibling replica.
    Stale,
}

/// One physical copy of a data object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replica {
    /// Stable per-object replica number.
    pub number: i32,

    /// Resource hierarchy the replica lives under, e.g. `"root;mid;leaf"`.
    pub hierarchy: String,

    /// Physical path within the leaf resource's vault.
    pub physical_path: String,

    /// Current size in bytes as recorded by the catalog.
    pub size: i64,

    /// Replica state.
    pub status: ReplicaStatus,

    /// Content checksum, cleared whenever the content changes.
    #[serde(default)]
    pub checksum: Option<String>,
}

impl Replica {
    /// Root resource name of this replica's hierarchy.
    pub fn root_resource(&self) -> &str {
        self.hierarchy
            .split_once(';')
            .map_or(self.hierarchy.as_str(), |(root, _)| root)
    }
}

/// Logical representation of a catalog entry.
///
/// This is a transient, read-mostly view fetched per request; the catalog
/// owns the durable record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataObject {
    /// Namespace-visible identifier, independent of physical location.
    pub logical_path: String,

    /// Known physical copies. Hierarchy strings are unique within the set.
    pub replicas: Vec<Replica>,

    /// True when an open write (e.g. an open file descriptor) holds the
    /// object; used as the concurrency guard.
    #[serde(default)]
    pub locked: bool,

    /// Set when the object belongs to a virtual or externally mapped subtree
    /// exempt from catalog size reconciliation.
    #[serde(default)]
    pub special_collection: Option<String>,
}

impl DataObject {
    /// Find the replica whose hierarchy matches `hierarchy` exactly.
    pub fn replica_by_hierarchy(&self, hierarchy: &ResolvedHierarchy) -> Option<&Replica> {
        let wanted = hierarchy.to_string();
        self.replicas.iter().find(|r| r.hierarchy == wanted)
    }

    /// Find the replica carrying `number`.
    pub fn replica_by_number(&self, number: i32) -> Option<&Replica> {
        self.replicas.iter().find(|r| r.number == number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replica(number: i32, hierarchy: &str) -> Replica {
        Replica {
            number,
            hierarchy: hierarchy.to_string(),
            physical_path: format!("/vault/obj.{}", number),
            size: 8,
            status: ReplicaStatus::AtRest,
            checksum: None,
        }
    }

    #[test]
    fn test_root_resource() {
        assert_eq!(replica(0, "demo;ufs0").root_resource(), "demo");
        assert_eq!(replica(0, "ufs0").root_resource(), "ufs0");
    }

    #[test]
    fn test_replica_lookup_by_hierarchy() {
        let object = DataObject {
            logical_path: "/tempZone/home/alice/data".to_string(),
            replicas: vec![replica(0, "demo;ufs0"), replica(1, "archive;ufs1")],
            locked: false,
            special_collection: None,
        };

        let hier: ResolvedHierarchy = "archive;ufs1".parse().unwrap();
        assert_eq!(object.replica_by_hierarchy(&hier).unwrap().number, 1);

        let missing: ResolvedHierarchy = "archive;ufs9".parse().unwrap();
        assert!(object.replica_by_hierarchy(&missing).is_none());
    }

    #[test]
    fn test_replica_lookup_by_number() {
        let object = DataObject {
            logical_path: "/tempZone/home/alice/data".to_string(),
            replicas: vec![replica(0, "demo;ufs0"), replica(1, "archive;ufs1")],
            locked: false,
            special_collection: None,
        };

        assert!(object.replica_by_number(1).is_some());
        assert!(object.replica_by_number(7).is_none());
    }
}
