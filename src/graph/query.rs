//! Traversal queries over the family graph
//!
//! Read-only helpers used by callers deciding which actions to offer
//! and by snapshot validation: ancestor and descendant closures,
//! blood-relation checks and parent-edge cycle detection.

use crate::graph::FamilyGraph;
use rustc_hash::FxHashSet;

impl FamilyGraph {
    /// Every ancestor of the member reachable through father/mother
    /// edges, deduplicated
    ///
    /// Inactive ancestors are not traversed. The visited set also makes
    /// the walk terminate on a corrupt graph with a parent cycle.
    #[must_use]
    pub fn ancestors(&self, id: &str) -> Vec<String> {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut out = Vec::new();
        let mut frontier = vec![id.to_string()];
        while let Some(current) = frontier.pop() {
            let Some(member) = self.active_member(&current) else {
                continue;
            };
            for parent in [member.father_id.as_deref(), member.mother_id.as_deref()]
                .into_iter()
                .flatten()
            {
                if seen.insert(parent.to_string()) {
                    out.push(parent.to_string());
                    frontier.push(parent.to_string());
                }
            }
        }
        out
    }

    /// Every descendant of the member reachable through child edges,
    /// deduplicated
    #[must_use]
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut out = Vec::new();
        let mut frontier = vec![id.to_string()];
        while let Some(current) = frontier.pop() {
            let Some(member) = self.active_member(&current) else {
                continue;
            };
            for child in &member.children_ids {
                if seen.insert(child.clone()) {
                    out.push(child.clone());
                    frontier.push(child.clone());
                }
            }
        }
        out
    }

    /// Whether two members are blood-related: the same person, one an
    /// ancestor of the other, or sharing a common ancestor
    #[must_use]
    pub fn is_blood_related(&self, a: &str, b: &str) -> bool {
        if self.active_member(a).is_none() || self.active_member(b).is_none() {
            return false;
        }
        if a == b {
            return true;
        }
        let ancestors_a: FxHashSet<String> = self.ancestors(a).into_iter().collect();
        if ancestors_a.contains(b) {
            return true;
        }
        let ancestors_b = self.ancestors(b);
        ancestors_b.iter().any(|id| id == a)
            || ancestors_b.iter().any(|id| ancestors_a.contains(id))
    }

    /// First member found to be its own ancestor, if the parent edges
    /// contain a cycle
    ///
    /// The mutation API cannot create one; this exists to reject
    /// corrupt snapshots during rehydration.
    #[must_use]
    pub(crate) fn detect_parent_cycle(&self) -> Option<String> {
        for member in self.active_members() {
            if self.ancestors(&member.id).contains(&member.id) {
                return Some(member.id.clone());
            }
        }
        None
    }
}
