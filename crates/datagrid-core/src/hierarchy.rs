//! Resource hierarchy resolution.
//!
//! A resource hierarchy is an ordered chain of resource names, written as a
//! semicolon-delimited string (`"root;mid;leaf"`). Write-intent resolution
//! picks the hierarchy whose replica is the most suitable target for a
//! write, subject to any caller-supplied targeting constraint.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::debug;

use crate::object::{DataObject, ReplicaStatus};
use crate::{Error, Result};

/// An ordered chain of resource names ending at the leaf that holds the
/// physical data. Derived transiently per request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHierarchy {
    chain: Vec<String>,
}

impl ResolvedHierarchy {
    /// Root (coordinating) resource of the chain.
    pub fn root(&self) -> &str {
        &self.chain[0]
    }

    /// Leaf (storage) resource of the chain.
    pub fn leaf(&self) -> &str {
        &self.chain[self.chain.len() - 1]
    }
}

impl fmt::Display for ResolvedHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.chain.join(";"))
    }
}

impl FromStr for ResolvedHierarchy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let chain: Vec<String> = s
            .split(';')
            .map(|part| part.trim().to_string())
            .collect();

        if chain.iter().any(String::is_empty) {
            return Err(Error::InvalidInput(format!(
                "Malformed resource hierarchy: [{}]",
                s
            )));
        }

        Ok(Self { chain })
    }
}

/// Caller-supplied replica targeting, from the request's optional
/// `target_resource` / `replica_number` fields. The two are mutually
/// exclusive; the request validator enforces that before resolution runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TargetConstraint {
    /// No constraint; resolution policy picks freely.
    #[default]
    None,
    /// Constrain to hierarchies rooted at this resource.
    Resource(String),
    /// Constrain to the replica carrying this number.
    ReplicaNumber(i32),
}

/// Trait for hierarchy resolution policies.
#[async_trait]
pub trait HierarchyResolver: Send + Sync {
    /// Resolve the hierarchy a write should target for `object`, subject to
    /// `constraint`. Fails with [`Error::ReplicaNotFound`] when no replica
    /// satisfies the constraint.
    async fn resolve_write(
        &self,
        object: &DataObject,
        constraint: &TargetConstraint,
    ) -> Result<ResolvedHierarchy>;
}

/// Standard write-intent resolver.
///
/// Each replica votes based on its status: an at-rest replica is the best
/// write target, a stale one is acceptable, and an intermediate one votes
/// lowest but is still resolvable so that lock conflicts surface as
/// `LockedAccess` downstream instead of masquerading as `ReplicaNotFound`.
/// Ties break toward the lowest replica number.
#[derive(Debug, Clone, Default)]
pub struct VoteResolver;

impl VoteResolver {
    pub fn new() -> Self {
        Self
    }

    fn vote(status: ReplicaStatus) -> f64 {
        match status {
            ReplicaStatus::AtRest => 1.0,
            ReplicaStatus::Stale => 0.5,
            ReplicaStatus::Intermediate => 0.25,
        }
    }
}

#[async_trait]
impl HierarchyResolver for VoteResolver {
    async fn resolve_write(
        &self,
        object: &DataObject,
        constraint: &TargetConstraint,
    ) -> Result<ResolvedHierarchy> {
        let mut best: Option<(f64, i32, &str)> = None;

        for replica in &object.replicas {
            match constraint {
                TargetConstraint::Resource(name) if replica.root_resource() != name => continue,
                TargetConstraint::ReplicaNumber(number) if replica.number != *number => continue,
                _ => {}
            }

            let vote = Self::vote(replica.status);
            debug!(
                "Replica {} of [{}] on [{}] votes {}",
                replica.number, object.logical_path, replica.hierarchy, vote
            );

            let better = match best {
                None => true,
                Some((best_vote, best_number, _)) => {
                    vote > best_vote || (vote == best_vote && replica.number < best_number)
                }
            };
            if better {
                best = Some((vote, replica.number, replica.hierarchy.as_str()));
            }
        }

        match best {
            Some((_, _, hierarchy)) => hierarchy.parse(),
            None => Err(Error::ReplicaNotFound(match constraint {
                TargetConstraint::None => {
                    format!("No replica of [{}] is available for write.", object.logical_path)
                }
                TargetConstraint::Resource(name) => format!(
                    "No replica of [{}] found on resource [{}].",
                    object.logical_path, name
                ),
                TargetConstraint::ReplicaNumber(number) => format!(
                    "No replica of [{}] carries number [{}].",
                    object.logical_path, number
                ),
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Replica;

    fn replica(number: i32, hierarchy: &str, status: ReplicaStatus) -> Replica {
        Replica {
            number,
            hierarchy: hierarchy.to_string(),
            physical_path: format!("obj.{}", number),
            size: 8,
            status,
            checksum: None,
        }
    }

    fn object(replicas: Vec<Replica>) -> DataObject {
        DataObject {
            logical_path: "/tempZone/home/alice/data".to_string(),
            replicas,
            locked: false,
            special_collection: None,
        }
    }

    #[test]
    fn test_hierarchy_parse_and_display() {
        let hier: ResolvedHierarchy = "demo;mid;ufs0".parse().unwrap();
        assert_eq!(hier.root(), "demo");
        assert_eq!(hier.leaf(), "ufs0");
        assert_eq!(hier.to_string(), "demo;mid;ufs0");

        assert!("demo;;ufs0".parse::<ResolvedHierarchy>().is_err());
        assert!("".parse::<ResolvedHierarchy>().is_err());
    }

    #[tokio::test]
    async fn test_at_rest_replica_wins_over_stale() {
        let obj = object(vec![
            replica(0, "demo;ufs0", ReplicaStatus::Stale),
            replica(1, "archive;ufs1", ReplicaStatus::AtRest),
        ]);

        let resolver = VoteResolver::new();
        let hier = resolver
            .resolve_write(&obj, &TargetConstraint::None)
            .await
            .unwrap();
        assert_eq!(hier.to_string(), "archive;ufs1");
    }

    #[tokio::test]
    async fn test_tie_breaks_to_lowest_replica_number() {
        let obj = object(vec![
            replica(1, "archive;ufs1", ReplicaStatus::AtRest),
            replica(0, "demo;ufs0", ReplicaStatus::AtRest),
        ]);

        let resolver = VoteResolver::new();
        let hier = resolver
            .resolve_write(&obj, &TargetConstraint::None)
            .await
            .unwrap();
        assert_eq!(hier.to_string(), "demo;ufs0");
    }

    #[tokio::test]
    async fn test_resource_constraint_filters_candidates() {
        let obj = object(vec![
            replica(0, "demo;ufs0", ReplicaStatus::AtRest),
            replica(1, "archive;ufs1", ReplicaStatus::Stale),
        ]);

        let resolver = VoteResolver::new();
        let hier = resolver
            .resolve_write(&obj, &TargetConstraint::Resource("archive".to_string()))
            .await
            .unwrap();
        assert_eq!(hier.to_string(), "archive;ufs1");

        let err = resolver
            .resolve_write(&obj, &TargetConstraint::Resource("nope".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ReplicaNotFound(_)));
    }

    #[tokio::test]
    async fn test_replica_number_constraint() {
        let obj = object(vec![
            replica(0, "demo;ufs0", ReplicaStatus::AtRest),
            replica(1, "archive;ufs1", ReplicaStatus::Stale),
        ]);

        let resolver = VoteResolver::new();
        let hier = resolver
            .resolve_write(&obj, &TargetConstraint::ReplicaNumber(1))
            .await
            .unwrap();
        assert_eq!(hier.to_string(), "archive;ufs1");

        let err = resolver
            .resolve_write(&obj, &TargetConstraint::ReplicaNumber(9))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ReplicaNotFound(_)));
    }

    #[tokio::test]
    async fn test_intermediate_replica_still_resolves() {
        let obj = object(vec![replica(0, "demo;ufs0", ReplicaStatus::Intermediate)]);

        let resolver = VoteResolver::new();
        let hier = resolver
            .resolve_write(&obj, &TargetConstraint::None)
            .await
            .unwrap();
        assert_eq!(hier.to_string(), "demo;ufs0");
    }

    #[tokio::test]
    async fn test_no_replicas_is_replica_not_found() {
        let obj = object(vec![]);
        let resolver = VoteResolver::new();
        let err = resolver
            .resolve_write(&obj, &TargetConstraint::None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ReplicaNotFound(_)));
    }
}
