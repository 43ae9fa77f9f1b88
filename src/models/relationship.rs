//! Relationship record model
//!
//! Snapshots carry relationship edges in a flat record list alongside
//! the member records, matching the shape the persistence collaborator
//! stores and returns. Parent edges point from parent to child; spouse
//! edges are emitted once per direction.

use crate::models::types::RelationshipType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One directed relationship edge in wire form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipRecord {
    /// Record identifier
    pub id: String,
    /// Source member id (the parent for parent/child kinds)
    pub from_id: String,
    /// Target member id
    pub to_id: String,
    /// Edge kind
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    /// Creation timestamp, absent on freshly derived records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl RelationshipRecord {
    /// Create a record without a timestamp
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        kind: RelationshipType,
    ) -> Self {
        Self {
            id: id.into(),
            from_id: from_id.into(),
            to_id: to_id.into(),
            kind,
            created_at: None,
        }
    }
}
