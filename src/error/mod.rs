//! Error handling for the family graph.

use crate::models::types::RelationshipType;

/// Errors that can occur while mutating or rehydrating a family graph
///
/// Layout and tree serialization never return these: they degrade
/// gracefully on inconsistent snapshots instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum KinGraphError {
    /// Referenced member or family does not exist or is inactive
    #[error("not found: {0}")]
    NotFound(String),

    /// Relationship precondition violated: the slot is already occupied
    #[error("cannot add {relationship} to member {member_id}: {slot} already set")]
    InvalidRelationship {
        /// Member the relationship was to be attached to
        member_id: String,
        /// Relationship that was requested
        relationship: RelationshipType,
        /// Name of the occupied slot
        slot: &'static str,
    },

    /// Parent edges form a cycle; only reachable through rehydrating a
    /// corrupt snapshot, never through the mutation API
    #[error("cycle detected through member {0}")]
    CycleDetected(String),

    /// Input payload failed validation
    #[error("validation failed: {0}")]
    Validation(String),

    /// Snapshot JSON could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias for Result with `KinGraphError`
pub type Result<T> = std::result::Result<T, KinGraphError>;
