//! Truncate request and its validation.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::hierarchy::TargetConstraint;
use crate::{Error, Result};

/// The caller on whose behalf a request runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientUser {
    /// User name.
    pub name: String,
    /// Zone the user is authenticated in.
    pub zone: String,
    /// Whether the user holds administrative privilege.
    #[serde(default)]
    pub privileged: bool,
}

impl ClientUser {
    /// `user#zone` form used in log and error messages.
    pub fn qualified_name(&self) -> String {
        format!("{}#{}", self.name, self.zone)
    }
}

/// A truncate request as received from a client, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruncateRequest {
    /// Absolute logical path of the data object.
    pub path: String,

    /// Requested length in bytes. Valid domain is `[0, 2^63)`.
    pub length: i64,

    /// Root resource of the hierarchy to target. Incompatible with
    /// `replica_number`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_resource: Option<String>,

    /// Number of the replica to target. Incompatible with `target_resource`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replica_number: Option<i32>,

    /// Full hierarchy to act on, bypassing policy-driven resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_hierarchy: Option<String>,

    /// Execute with elevated privileges. Honored only for privileged users.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub admin_mode: bool,
}

/// A request that passed validation. Only this type enters the pipeline.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub path: String,
    pub length: i64,
    pub constraint: TargetConstraint,
    pub hierarchy_hint: Option<String>,
    pub admin_mode: bool,
}

impl TruncateRequest {
    /// Validate the raw request against `caller`, producing a
    /// [`ValidatedRequest`].
    ///
    /// Rejects an empty, relative, or zone-less path, a negative length, both targeting
    /// options at once, and admin mode from an unprivileged caller. The
    /// privilege violation is logged so administrators can see who attempted
    /// it.
    pub fn validate(&self, caller: &ClientUser) -> Result<ValidatedRequest> {
        if self.path.is_empty() {
            return Err(Error::InvalidInput("Logical path is empty.".to_string()));
        }

        if !self.path.starts_with('/') {
            return Err(Error::InvalidInput(format!(
                "Logical path [{}] is not absolute.",
                self.path
            )));
        }

        // An absolute logical path names its zone in the first segment;
        // "/" and "//x" resolve to nothing.
        match self.path.split('/').nth(1) {
            Some(zone) if !zone.is_empty() => {}
            _ => {
                return Err(Error::InvalidInput(format!(
                    "Logical path [{}] does not name a zone.",
                    self.path
                )));
            }
        }

        if self.length < 0 {
            return Err(Error::InvalidInput(format!(
                "Requested length [{}] is negative.",
                self.length
            )));
        }

        if self.target_resource.is_some() && self.replica_number.is_some() {
            return Err(Error::IncompatibleParameters);
        }

        if self.admin_mode && !caller.privileged {
            let msg = format!(
                "User [{}] is not authorized to use the admin keyword.",
                caller.qualified_name()
            );
            warn!("{}", msg);
            return Err(Error::InsufficientPrivilege(msg));
        }

        let constraint = match (&self.target_resource, self.replica_number) {
            (Some(resource), None) => TargetConstraint::Resource(resource.clone()),
            (None, Some(number)) => TargetConstraint::ReplicaNumber(number),
            _ => TargetConstraint::None,
        };

        Ok(ValidatedRequest {
            path: self.path.clone(),
            length: self.length,
            constraint,
            hierarchy_hint: self.resource_hierarchy.clone(),
            admin_mode: self.admin_mode,
        })
    }
}
