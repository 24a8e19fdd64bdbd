//! Terminal outcomes of a truncate request.

use serde::{Deserialize, Serialize};

/// Successful terminal states. Failures are carried by [`crate::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncateOutcome {
    /// The replica was resized and the catalog reconciled.
    Truncated {
        replica_number: i32,
        new_size: i64,
    },
    /// The replica already had the requested size; nothing was changed.
    AlreadyAtSize { replica_number: i32, size: i64 },
    /// The object belongs to a special collection and was skipped.
    SpecialCollectionSkipped,
}

/// Outcome plus the human-readable message handed back to the caller.
/// Constructed once per request; immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncateReply {
    pub outcome: TruncateOutcome,
    pub message: String,
}

impl TruncateReply {
    pub fn truncated(logical_path: &str, replica_number: i32, new_size: i64) -> Self {
        Self {
            outcome: TruncateOutcome::Truncated {
                replica_number,
                new_size,
            },
            message: format!(
                "Truncated replica {} of [{}] to {} bytes.",
                replica_number, logical_path, new_size
            ),
        }
    }

    pub fn already_at_size(logical_path: &str, replica_number: i32, size: i64) -> Self {
        Self {
            outcome: TruncateOutcome::AlreadyAtSize {
                replica_number,
                size,
            },
            message: format!(
                "Replica {} of [{}] already has size {}.",
                replica_number, logical_path, size
            ),
        }
    }

    pub fn special_collection_skipped(logical_path: &str, collection: &str) -> Self {
        Self {
            outcome: TruncateOutcome::SpecialCollectionSkipped,
            message: format!(
                "[{}] belongs to special collection [{}]; skipped.",
                logical_path, collection
            ),
        }
    }

    /// Status code for the wire boundary. Success and no-op outcomes are
    /// both 0; only failures carry non-zero codes.
    pub fn code(&self) -> i32 {
        0
    }
}
