//! A Rust library for building, validating and laying out family
//! genealogy graphs.
//!
//! The graph manager enforces the relationship invariants (one father,
//! one mother, one spouse, many children) across every mutation, the
//! generation resolver derives depth numbers from the graph structure,
//! the layout engine computes non-overlapping 2-D positions for nodes
//! and couples, and the tree serializer produces a rooted, cycle-free
//! hierarchy for renderers that cannot consume a graph.

pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod models;
pub mod service;
pub mod snapshot;
pub mod tree;

// Re-export the most common types for easier use
// Core types
pub use config::GraphConfig;
pub use error::{KinGraphError, Result};
pub use graph::FamilyGraph;
pub use models::{Gender, Member, MemberDraft, RelationshipRecord, RelationshipType};

// Layout output
pub use layout::{Connector, LayoutConfig, NodePosition, TreeLayout};

// Hierarchical view and persistence shapes
pub use service::{FamilyDirectory, FamilyRecord};
pub use snapshot::FamilySnapshot;
pub use tree::{TreeNode, serialize_forest, serialize_tree};
