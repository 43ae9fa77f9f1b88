//! Common domain type definitions
//!
//! This module contains the enum types shared across the family graph
//! models: the gender of a member and the tagged relationship variants
//! used when attaching a new member to an existing one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gender of a family member
///
/// Gender is not display-only: when a child is attached to a member,
/// the member's gender decides whether the father or the mother slot
/// of the child is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    /// Male gender
    Male,
    /// Female gender
    Female,
    /// Unknown or not specified
    Unknown,
}

impl From<&str> for Gender {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" | "1" => Self::Male,
            "f" | "female" | "2" => Self::Female,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// The relationship a new member has to the member it is attached to
///
/// Every member after the first joins the graph through exactly one of
/// these variants. The same enum doubles as the edge kind on exported
/// relationship records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// New member becomes the father of the related member
    Father,
    /// New member becomes the mother of the related member
    Mother,
    /// New member becomes the spouse of the related member
    Spouse,
    /// New member becomes a child of the related member
    Child,
}

impl RelationshipType {
    /// Wire name of the relationship, as used in relationship records
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Father => "FATHER",
            Self::Mother => "MOTHER",
            Self::Spouse => "SPOUSE",
            Self::Child => "CHILD",
        }
    }

    /// Parse a relationship name, case-insensitively
    ///
    /// Returns `None` for unrecognised names. The ambiguous `"parent"`
    /// form used by some clients is not accepted here; callers must
    /// resolve it to `Father` or `Mother` from the new member's gender.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "father" => Some(Self::Father),
            "mother" => Some(Self::Mother),
            "spouse" => Some(Self::Spouse),
            "child" => Some(Self::Child),
            _ => None,
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Father => write!(f, "father"),
            Self::Mother => write!(f, "mother"),
            Self::Spouse => write!(f, "spouse"),
            Self::Child => write!(f, "child"),
        }
    }
}
