//! Family directory: the in-process mirror of the persistence boundary
//!
//! The directory owns one graph per family and exposes the same
//! operations the REST collaborator does, so application code can run
//! against it in tests and offline sessions. It is an explicit object
//! constructed per session; nothing in this crate holds process-wide
//! mutable state.

use crate::config::GraphConfig;
use crate::error::{KinGraphError, Result};
use crate::graph::FamilyGraph;
use crate::models::{MemberDraft, RelationshipType};
use crate::snapshot::FamilySnapshot;
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use rustc_hash::FxHashMap;

/// One family held by the directory
#[derive(Debug, Clone)]
pub struct FamilyRecord {
    /// Directory-internal identifier
    pub id: String,
    /// Display name of the family
    pub name: String,
    /// Lookup key, unique within the directory
    pub family_key: String,
    graph: FamilyGraph,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation
    pub updated_at: DateTime<Utc>,
}

impl FamilyRecord {
    /// The family's graph
    #[must_use]
    pub const fn graph(&self) -> &FamilyGraph {
        &self.graph
    }

    /// Snapshot of the family's current state
    #[must_use]
    pub fn snapshot(&self) -> FamilySnapshot {
        FamilySnapshot::capture(&self.graph)
    }
}

/// In-memory store of families keyed by family key
#[derive(Debug, Default)]
pub struct FamilyDirectory {
    families: FxHashMap<String, FamilyRecord>,
    next_family: u64,
    config: GraphConfig,
}

impl FamilyDirectory {
    /// Create an empty directory with the default graph configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty directory with an explicit graph configuration
    #[must_use]
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            families: FxHashMap::default(),
            next_family: 0,
            config,
        }
    }

    /// Create a new empty family and return its record
    pub fn create_family(&mut self, name: &str) -> Result<&FamilyRecord> {
        if name.trim().is_empty() {
            return Err(KinGraphError::Validation(
                "family name must not be empty".to_string(),
            ));
        }
        let family_key = self.mint_family_key();
        self.next_family += 1;
        let now = Utc::now();
        let record = FamilyRecord {
            id: format!("fam-{}", self.next_family),
            name: name.to_string(),
            family_key: family_key.clone(),
            graph: FamilyGraph::with_config(self.config),
            created_at: now,
            updated_at: now,
        };
        log::info!("created family {family_key} ({name})");
        self.families.insert(family_key.clone(), record);
        self.families
            .get(&family_key)
            .ok_or_else(|| KinGraphError::NotFound(format!("family {family_key}")))
    }

    /// Look up a family by key
    pub fn get_family(&self, family_key: &str) -> Result<&FamilyRecord> {
        self.families
            .get(family_key)
            .ok_or_else(|| KinGraphError::NotFound(format!("family {family_key}")))
    }

    /// Add a member to a family
    ///
    /// With a relation the member is attached through the graph
    /// manager; without one it becomes a new root. Returns the new
    /// member's id.
    pub fn add_member(
        &mut self,
        family_key: &str,
        draft: MemberDraft,
        relation: Option<(&str, RelationshipType)>,
    ) -> Result<String> {
        let record = self.family_mut(family_key)?;
        let member_id = match relation {
            Some((related_to, relationship)) => {
                record.graph.add_member(draft, related_to, relationship)?
            }
            None => record.graph.add_root(draft)?,
        };
        record.updated_at = Utc::now();
        Ok(member_id)
    }

    /// Soft-delete a member of a family
    pub fn remove_member(&mut self, family_key: &str, member_id: &str) -> Result<()> {
        let record = self.family_mut(family_key)?;
        record.graph.remove_member(member_id)?;
        record.updated_at = Utc::now();
        Ok(())
    }

    /// Rename a family
    pub fn update_family_name(&mut self, family_key: &str, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(KinGraphError::Validation(
                "family name must not be empty".to_string(),
            ));
        }
        let record = self.family_mut(family_key)?;
        record.name = name.to_string();
        record.updated_at = Utc::now();
        Ok(())
    }

    /// Snapshot one family's graph
    pub fn snapshot(&self, family_key: &str) -> Result<FamilySnapshot> {
        Ok(self.get_family(family_key)?.snapshot())
    }

    /// Rehydrate a snapshot into a new family and return its record
    pub fn restore(&mut self, name: &str, snapshot: &FamilySnapshot) -> Result<&FamilyRecord> {
        let graph = snapshot.restore(self.config)?;
        let family_key = {
            let record = self.create_family(name)?;
            record.family_key.clone()
        };
        let record = self.family_mut(&family_key)?;
        record.graph = graph;
        record.updated_at = Utc::now();
        self.get_family(&family_key)
    }

    /// Number of families held
    #[must_use]
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// Whether the directory holds no families
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    fn family_mut(&mut self, family_key: &str) -> Result<&mut FamilyRecord> {
        self.families
            .get_mut(family_key)
            .ok_or_else(|| KinGraphError::NotFound(format!("family {family_key}")))
    }

    /// Random short key, retried on the unlikely collision
    fn mint_family_key(&self) -> String {
        loop {
            let suffix: String = rand::rng()
                .sample_iter(Alphanumeric)
                .take(8)
                .map(char::from)
                .collect();
            let key = format!("family-{}", suffix.to_lowercase());
            if !self.families.contains_key(&key) {
                return key;
            }
        }
    }
}
