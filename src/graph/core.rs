//! Graph manager: mutation operations over the member store
//!
//! The manager owns the member store and is the only writer to it.
//! Every mutation validates its preconditions up front and applies its
//! relationship updates atomically, so a failed operation leaves the
//! graph untouched. Relationship edges are kept consistent on both
//! sides: a child's parent slot and the parent's children list always
//! agree, and spouse references are always symmetric.

use crate::config::GraphConfig;
use crate::error::{KinGraphError, Result};
use crate::graph::generation;
use crate::models::{Gender, Member, MemberDraft, RelationshipType};
use rustc_hash::{FxHashMap, FxHashSet};

/// In-memory mapping from member id to member record
///
/// Pure storage with a stable insertion order; behavior lives on the
/// graph manager.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemberStore {
    members: FxHashMap<String, Member>,
    order: Vec<String>,
    next_id: u64,
}

impl MemberStore {
    fn mint_id(&mut self) -> String {
        self.next_id += 1;
        format!("member-{}", self.next_id)
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Member> {
        self.members.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Member> {
        self.members.get_mut(id)
    }

    /// Insert a member under its own id, keeping the id counter ahead
    /// of any `member-N` id seen so a later mint cannot collide.
    pub(crate) fn insert(&mut self, member: Member) {
        if let Some(n) = member
            .id
            .strip_prefix("member-")
            .and_then(|n| n.parse::<u64>().ok())
        {
            self.next_id = self.next_id.max(n);
        }
        if !self.members.contains_key(&member.id) {
            self.order.push(member.id.clone());
        }
        self.members.insert(member.id.clone(), member);
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Member> {
        self.order.iter().filter_map(|id| self.members.get(id))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Member> {
        self.members.values_mut()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}

/// The family graph: member store plus the mutation operations that
/// enforce the relationship invariants
#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
    store: MemberStore,
    config: GraphConfig,
}

impl FamilyGraph {
    /// Create an empty graph with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with an explicit configuration
    #[must_use]
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            store: MemberStore::default(),
            config,
        }
    }

    /// The configuration this graph was built with
    #[must_use]
    pub const fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Create a member with no relationships
    ///
    /// The first member of a fresh graph starts a tree as its root;
    /// later parentless members become additional roots.
    pub fn add_root(&mut self, draft: MemberDraft) -> Result<String> {
        validate_draft(&draft)?;
        let id = self.store.mint_id();
        log::debug!("adding root member {id} ({})", draft.name);
        self.store.insert(Member::from_draft(id.clone(), draft));
        self.recalculate_generations();
        Ok(id)
    }

    /// Create a member attached to an existing member through one
    /// relationship edge
    ///
    /// Fails with `NotFound` when `related_to` is unknown or inactive,
    /// `InvalidRelationship` when the target slot is occupied, and
    /// `Validation` on an empty name. On failure the graph is left
    /// unmodified. Returns the new member's id.
    pub fn add_member(
        &mut self,
        draft: MemberDraft,
        related_to: &str,
        relationship: RelationshipType,
    ) -> Result<String> {
        validate_draft(&draft)?;
        let related = self
            .active_member(related_to)
            .ok_or_else(|| KinGraphError::NotFound(format!("member {related_to}")))?;
        if let Some(slot) = occupied_slot(related, relationship) {
            return Err(KinGraphError::InvalidRelationship {
                member_id: related_to.to_string(),
                relationship,
                slot,
            });
        }
        let related_gender = related.gender;
        let spouse_id = related
            .spouse_id
            .clone()
            .filter(|id| self.is_active_id(id));

        let id = self.store.mint_id();
        log::debug!(
            "adding member {id} ({}) as {relationship} of {related_to}",
            draft.name
        );
        let mut member = Member::from_draft(id.clone(), draft);

        match relationship {
            RelationshipType::Father | RelationshipType::Mother => {
                member.children_ids.push(related_to.to_string());
                if let Some(related) = self.store.get_mut(related_to) {
                    if relationship == RelationshipType::Father {
                        related.father_id = Some(id.clone());
                    } else {
                        related.mother_id = Some(id.clone());
                    }
                }
            }
            RelationshipType::Spouse => {
                member.spouse_id = Some(related_to.to_string());
                if let Some(related) = self.store.get_mut(related_to) {
                    related.spouse_id = Some(id.clone());
                }
            }
            RelationshipType::Child => {
                assign_parent_slot(&mut member, related_to, related_gender);
                if let Some(related) = self.store.get_mut(related_to) {
                    related.children_ids.push(id.clone());
                }
                // Dual-parent backfill: a child added to one member of a
                // couple is parented to both.
                if let Some(spouse_id) = spouse_id {
                    let spouse_gender = self
                        .store
                        .get(&spouse_id)
                        .map_or(Gender::Unknown, |s| s.gender);
                    assign_parent_slot(&mut member, &spouse_id, spouse_gender);
                    if let Some(spouse) = self.store.get_mut(&spouse_id) {
                        spouse.children_ids.push(id.clone());
                    }
                }
            }
        }

        self.store.insert(member);
        self.recalculate_generations();
        Ok(id)
    }

    /// Whether a relationship of the given kind can be attached to the
    /// member right now
    ///
    /// Pure predicate over the same preconditions `add_member` checks;
    /// false for unknown or inactive ids.
    #[must_use]
    pub fn can_add_relationship(&self, id: &str, relationship: RelationshipType) -> bool {
        self.active_member(id)
            .is_some_and(|member| occupied_slot(member, relationship).is_none())
    }

    /// Soft-delete a member
    ///
    /// The record stays in the store flagged inactive, and every
    /// reference to it is cleared from the remaining active members.
    /// Removing an already-inactive member is a no-op success; an
    /// unknown id is `NotFound`.
    pub fn remove_member(&mut self, id: &str) -> Result<()> {
        let Some(member) = self.store.get_mut(id) else {
            return Err(KinGraphError::NotFound(format!("member {id}")));
        };
        if !member.is_active {
            log::debug!("remove of already-inactive member {id} ignored");
            return Ok(());
        }
        member.is_active = false;
        log::debug!("removing member {id}");

        for other in self.store.iter_mut() {
            if other.id != id && other.is_active {
                other.clear_references_to(id);
            }
        }

        if self.config.orphan_cleanup {
            self.cleanup_orphans();
        }
        self.recalculate_generations();
        Ok(())
    }

    /// All active members with no active parent, in insertion order
    #[must_use]
    pub fn find_roots(&self) -> Vec<&Member> {
        self.active_members()
            .filter(|member| !self.has_active_parent(member))
            .collect()
    }

    /// The first created still-active root, the conventional anchor
    /// for single-tree rendering
    #[must_use]
    pub fn default_root(&self) -> Option<&Member> {
        self.find_roots().into_iter().next()
    }

    /// Look up a member by id, active or not
    #[must_use]
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.store.get(id)
    }

    /// Look up an active member by id
    #[must_use]
    pub fn active_member(&self, id: &str) -> Option<&Member> {
        self.store.get(id).filter(|m| m.is_active)
    }

    /// All members in insertion order, including inactive ones
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.store.iter()
    }

    /// Active members in insertion order
    pub fn active_members(&self) -> impl Iterator<Item = &Member> {
        self.store.iter().filter(|m| m.is_active)
    }

    /// Total number of member records, including inactive ones
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the store holds no member records at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Number of active members
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_members().count()
    }

    /// The member's active spouse, if any
    #[must_use]
    pub fn active_spouse(&self, member: &Member) -> Option<&Member> {
        member
            .spouse_id
            .as_deref()
            .and_then(|id| self.active_member(id))
    }

    pub(crate) fn is_active_id(&self, id: &str) -> bool {
        self.active_member(id).is_some()
    }

    pub(crate) fn has_active_parent(&self, member: &Member) -> bool {
        member
            .father_id
            .as_deref()
            .is_some_and(|id| self.is_active_id(id))
            || member
                .mother_id
                .as_deref()
                .is_some_and(|id| self.is_active_id(id))
    }

    pub(crate) fn recalculate_generations(&mut self) {
        generation::recalculate(&mut self.store);
    }

    /// Insert a pre-built member record verbatim; rehydration only.
    pub(crate) fn insert_unchecked(&mut self, member: Member) {
        self.store.insert(member);
    }

    pub(crate) fn store(&self) -> &MemberStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut MemberStore {
        &mut self.store
    }

    /// One-pass cascade: deactivate active members left with no active
    /// spouse, parent or child, unless the graph is down to one member.
    fn cleanup_orphans(&mut self) {
        let active: FxHashSet<String> = self
            .active_members()
            .map(|m| m.id.clone())
            .collect();
        if active.len() <= 1 {
            return;
        }
        let orphaned: Vec<String> = self
            .active_members()
            .filter(|m| !has_active_link(m, &active))
            .map(|m| m.id.clone())
            .collect();
        for id in orphaned {
            if let Some(member) = self.store.get_mut(&id) {
                log::info!("orphan cleanup deactivating member {id}");
                member.is_active = false;
            }
        }
    }
}

fn validate_draft(draft: &MemberDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(KinGraphError::Validation(
            "member name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// The slot that blocks the relationship, if any
fn occupied_slot(member: &Member, relationship: RelationshipType) -> Option<&'static str> {
    match relationship {
        RelationshipType::Father => member.father_id.as_ref().map(|_| "father"),
        RelationshipType::Mother => member.mother_id.as_ref().map(|_| "mother"),
        RelationshipType::Spouse => member.spouse_id.as_ref().map(|_| "spouse"),
        RelationshipType::Child => None,
    }
}

/// Fill the parent slot the gender prefers, falling back to the other
/// slot when the preferred one is taken. Unknown gender prefers the
/// father slot.
pub(crate) fn assign_parent_slot(child: &mut Member, parent_id: &str, parent_gender: Gender) {
    let (preferred, fallback) = match parent_gender {
        Gender::Female => (&mut child.mother_id, &mut child.father_id),
        Gender::Male | Gender::Unknown => (&mut child.father_id, &mut child.mother_id),
    };
    if preferred.is_none() {
        *preferred = Some(parent_id.to_string());
    } else if fallback.is_none() {
        *fallback = Some(parent_id.to_string());
    }
}

fn has_active_link(member: &Member, active: &FxHashSet<String>) -> bool {
    member
        .spouse_id
        .as_ref()
        .is_some_and(|id| active.contains(id))
        || member
            .father_id
            .as_ref()
            .is_some_and(|id| active.contains(id))
        || member
            .mother_id
            .as_ref()
            .is_some_and(|id| active.contains(id))
        || member.children_ids.iter().any(|id| active.contains(id))
}
