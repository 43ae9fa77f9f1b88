//! Domain models for the family graph
//!
//! This module contains the entity models used throughout the crate:
//! the member node, the creation payload, the relationship record wire
//! shape and the shared enum types.

pub mod member;
pub mod relationship;
pub mod types;

// Re-export commonly used types
pub use member::{Member, MemberDraft};
pub use relationship::RelationshipRecord;
pub use types::{Gender, RelationshipType};
