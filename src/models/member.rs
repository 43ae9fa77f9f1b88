//! Member entity model
//!
//! This module contains the core Member entity, the single node type of
//! the family graph. A member carries its descriptive attributes, the
//! derived generation number and the relationship fields that make up
//! the graph's invariant surface: at most one father, one mother and
//! one spouse, plus an insertion-ordered list of children.

use crate::models::types::Gender;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A person node in the family graph
///
/// Relationship fields are back-references, not ownership: the graph
/// manager keeps both sides of every edge consistent, and no caller
/// should edit them directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique member identifier, stable for the member's lifetime
    pub id: String,
    /// Display name
    pub name: String,
    /// Gender, used to pick the parent slot when attaching children
    pub gender: Gender,
    /// Birth date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    /// Death date, if applicable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<NaiveDate>,
    /// Opaque photo reference, not validated by the core
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Father's member id, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father_id: Option<String>,
    /// Mother's member id, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother_id: Option<String>,
    /// Spouse's member id; symmetric with the spouse's own field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse_id: Option<String>,
    /// Children ids, insertion-ordered for stable rendering
    #[serde(default)]
    pub children_ids: Vec<String>,
    /// Derived generation number, 0 for roots
    #[serde(default)]
    pub generation: u32,
    /// Soft-deletion flag; inactive members keep their record but are
    /// excluded from layout and serialization
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl Member {
    /// Create an active member with no relationships from a draft
    #[must_use]
    pub fn from_draft(id: String, draft: MemberDraft) -> Self {
        Self {
            id,
            name: draft.name,
            gender: draft.gender,
            birth_date: draft.birth_date,
            death_date: draft.death_date,
            photo: draft.photo,
            father_id: None,
            mother_id: None,
            spouse_id: None,
            children_ids: Vec::new(),
            generation: 0,
            is_active: true,
        }
    }

    /// Whether this member has no parent references at all
    #[must_use]
    pub fn is_parentless(&self) -> bool {
        self.father_id.is_none() && self.mother_id.is_none()
    }

    /// Whether `other` is recorded as a child of this member
    #[must_use]
    pub fn has_child(&self, other: &str) -> bool {
        self.children_ids.iter().any(|id| id == other)
    }

    /// Drop every reference this member holds to `other`
    pub(crate) fn clear_references_to(&mut self, other: &str) {
        if self.father_id.as_deref() == Some(other) {
            self.father_id = None;
        }
        if self.mother_id.as_deref() == Some(other) {
            self.mother_id = None;
        }
        if self.spouse_id.as_deref() == Some(other) {
            self.spouse_id = None;
        }
        self.children_ids.retain(|id| id != other);
    }
}

/// Input payload for creating a member
///
/// Only descriptive fields: identifiers and relationship wiring are
/// assigned by the graph manager at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDraft {
    /// Display name; must be non-empty
    pub name: String,
    /// Gender of the new member
    pub gender: Gender,
    /// Birth date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    /// Death date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<NaiveDate>,
    /// Opaque photo reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl MemberDraft {
    /// Create a draft with the required fields
    #[must_use]
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            name: name.into(),
            gender,
            birth_date: None,
            death_date: None,
            photo: None,
        }
    }

    /// Set the birth date
    #[must_use]
    pub fn with_birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    /// Set the death date
    #[must_use]
    pub fn with_death_date(mut self, date: NaiveDate) -> Self {
        self.death_date = Some(date);
        self
    }

    /// Set the photo reference
    #[must_use]
    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }
}
