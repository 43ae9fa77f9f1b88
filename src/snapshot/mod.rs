//! Snapshot export and rehydration
//!
//! A snapshot is the JSON-facing form of a whole family graph: every
//! member record (inactive ones included, since soft deletion keeps
//! history) plus a flat relationship record list in the shape the
//! persistence collaborator stores. Exporting and re-hydrating a graph
//! through this module is lossless for every relationship invariant.

use crate::config::GraphConfig;
use crate::error::{KinGraphError, Result};
use crate::graph::FamilyGraph;
use crate::graph::core::assign_parent_slot;
use crate::models::{Member, RelationshipRecord, RelationshipType};
use serde::{Deserialize, Serialize};

/// Serializable snapshot of one family graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilySnapshot {
    /// Default root at capture time, if the graph had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_id: Option<String>,
    /// Member records in insertion order
    pub members: Vec<Member>,
    /// Relationship records derived from the active members
    #[serde(default)]
    pub relationships: Vec<RelationshipRecord>,
}

impl FamilySnapshot {
    /// Capture the current state of a graph
    #[must_use]
    pub fn capture(graph: &FamilyGraph) -> Self {
        let mut relationships = Vec::new();
        let mut sequence = 0_u32;
        let mut record = |from: &str, to: &str, kind: RelationshipType| {
            sequence += 1;
            relationships.push(RelationshipRecord::new(
                format!("rel-{sequence}"),
                from,
                to,
                kind,
            ));
        };
        for member in graph.active_members() {
            for child_id in &member.children_ids {
                if graph.active_member(child_id).is_some() {
                    record(&member.id, child_id, RelationshipType::Child);
                }
            }
            if let Some(spouse) = graph.active_spouse(member) {
                record(&member.id, &spouse.id, RelationshipType::Spouse);
            }
        }
        Self {
            root_id: graph.default_root().map(|root| root.id.clone()),
            members: graph.members().cloned().collect(),
            relationships,
        }
    }

    /// Rebuild an in-memory graph from this snapshot
    ///
    /// Member relationship fields are authoritative; the relationship
    /// record list is replayed on top for snapshots that arrive in the
    /// bare-member REST shape. Dangling or asymmetric references are
    /// repaired from the surviving side with a warning. A parent-edge
    /// cycle is the one condition that cannot be repaired and fails
    /// with `CycleDetected`.
    pub fn restore(&self, config: GraphConfig) -> Result<FamilyGraph> {
        let mut graph = FamilyGraph::with_config(config);
        for member in &self.members {
            if member.id.trim().is_empty() {
                return Err(KinGraphError::Validation(
                    "snapshot member with empty id".to_string(),
                ));
            }
            graph.insert_unchecked(member.clone());
        }
        apply_relationship_records(&mut graph, &self.relationships);
        repair_references(&mut graph);
        if let Some(id) = graph.detect_parent_cycle() {
            return Err(KinGraphError::CycleDetected(id));
        }
        graph.recalculate_generations();
        Ok(graph)
    }

    /// Encode as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Replay relationship records onto members whose own fields do not
/// already carry the edge. Records against unknown or inactive members
/// are skipped.
fn apply_relationship_records(graph: &mut FamilyGraph, records: &[RelationshipRecord]) {
    for record in records {
        if graph.active_member(&record.from_id).is_none()
            || graph.active_member(&record.to_id).is_none()
        {
            log::warn!(
                "skipping relationship record {} against missing member",
                record.id
            );
            continue;
        }
        match record.kind {
            RelationshipType::Spouse => {
                let claims_ok = |member_id: &str, partner: &str| {
                    graph
                        .active_member(member_id)
                        .is_some_and(|m| match m.spouse_id.as_deref() {
                            None => true,
                            Some(existing) => existing == partner,
                        })
                };
                if claims_ok(&record.from_id, &record.to_id)
                    && claims_ok(&record.to_id, &record.from_id)
                {
                    set_spouse(graph, &record.from_id, &record.to_id);
                    set_spouse(graph, &record.to_id, &record.from_id);
                }
            }
            RelationshipType::Father | RelationshipType::Mother | RelationshipType::Child => {
                apply_parent_record(graph, record);
            }
        }
    }
}

fn set_spouse(graph: &mut FamilyGraph, member_id: &str, partner_id: &str) {
    if let Some(member) = graph.store_mut().get_mut(member_id) {
        member.spouse_id = Some(partner_id.to_string());
    }
}

/// Parent-edge records all point from parent to child; `CHILD` records
/// resolve the slot from the parent's gender.
fn apply_parent_record(graph: &mut FamilyGraph, record: &RelationshipRecord) {
    let parent_gender = graph
        .active_member(&record.from_id)
        .map(|parent| parent.gender);
    let Some(parent_gender) = parent_gender else {
        return;
    };

    if let Some(child) = graph.store_mut().get_mut(&record.to_id) {
        let already_linked = child.father_id.as_deref() == Some(record.from_id.as_str())
            || child.mother_id.as_deref() == Some(record.from_id.as_str());
        if !already_linked {
            match record.kind {
                RelationshipType::Father if child.father_id.is_none() => {
                    child.father_id = Some(record.from_id.clone());
                }
                RelationshipType::Mother if child.mother_id.is_none() => {
                    child.mother_id = Some(record.from_id.clone());
                }
                RelationshipType::Child => {
                    assign_parent_slot(child, &record.from_id, parent_gender);
                }
                _ => return,
            }
        }
    }
    if let Some(parent) = graph.store_mut().get_mut(&record.from_id) {
        if !parent.has_child(&record.to_id) {
            parent.children_ids.push(record.to_id.clone());
        }
    }
}

/// Make the member fields mutually consistent again: drop references
/// to missing or inactive members, re-establish parent/child duality
/// and spouse symmetry from whichever side survived.
fn repair_references(graph: &mut FamilyGraph) {
    let ids: Vec<String> = graph
        .active_members()
        .map(|member| member.id.clone())
        .collect();

    // dangling references
    for id in &ids {
        let member = match graph.member(id) {
            Some(m) => m.clone(),
            None => continue,
        };
        let father_ok = member
            .father_id
            .as_deref()
            .is_none_or(|p| graph.is_active_id(p));
        let mother_ok = member
            .mother_id
            .as_deref()
            .is_none_or(|p| graph.is_active_id(p));
        let spouse_ok = member
            .spouse_id
            .as_deref()
            .is_none_or(|p| graph.is_active_id(p));
        let live_children: Vec<String> = member
            .children_ids
            .iter()
            .filter(|c| graph.is_active_id(c))
            .cloned()
            .collect();
        if let Some(member) = graph.store_mut().get_mut(id) {
            if !father_ok {
                log::warn!("clearing dangling father reference on {id}");
                member.father_id = None;
            }
            if !mother_ok {
                log::warn!("clearing dangling mother reference on {id}");
                member.mother_id = None;
            }
            if !spouse_ok {
                log::warn!("clearing dangling spouse reference on {id}");
                member.spouse_id = None;
            }
            if live_children.len() != member.children_ids.len() {
                log::warn!("dropping dangling child references on {id}");
                member.children_ids = live_children;
            }
        }
    }

    // parent/child duality, child side -> parent side
    for id in &ids {
        let parents: Vec<String> = graph
            .member(id)
            .into_iter()
            .flat_map(|m| {
                [m.father_id.clone(), m.mother_id.clone()]
                    .into_iter()
                    .flatten()
            })
            .collect();
        for parent_id in parents {
            if let Some(parent) = graph.store_mut().get_mut(&parent_id) {
                if !parent.has_child(id) {
                    parent.children_ids.push(id.clone());
                }
            }
        }
    }

    // parent/child duality, parent side -> child side
    for id in &ids {
        let (gender, children) = match graph.member(id) {
            Some(m) => (m.gender, m.children_ids.clone()),
            None => continue,
        };
        let mut kept = Vec::with_capacity(children.len());
        for child_id in children {
            let linked = {
                let Some(child) = graph.store_mut().get_mut(&child_id) else {
                    continue;
                };
                if child.father_id.as_deref() == Some(id.as_str())
                    || child.mother_id.as_deref() == Some(id.as_str())
                {
                    true
                } else {
                    assign_parent_slot(child, id, gender);
                    child.father_id.as_deref() == Some(id.as_str())
                        || child.mother_id.as_deref() == Some(id.as_str())
                }
            };
            if linked {
                kept.push(child_id);
            } else {
                log::warn!("dropping child {child_id} of {id}: both parent slots taken");
            }
        }
        if let Some(member) = graph.store_mut().get_mut(id) {
            member.children_ids = kept;
        }
    }

    // spouse symmetry
    for id in &ids {
        let claimed = graph.member(id).and_then(|m| m.spouse_id.clone());
        let Some(spouse_id) = claimed else { continue };
        let partner_claim = graph
            .member(&spouse_id)
            .and_then(|spouse| spouse.spouse_id.clone());
        match partner_claim {
            Some(existing) if existing == *id => {}
            None => set_spouse(graph, &spouse_id, id),
            Some(_) => {
                log::warn!("clearing asymmetric spouse claim of {id} on {spouse_id}");
                if let Some(member) = graph.store_mut().get_mut(id) {
                    member.spouse_id = None;
                }
            }
        }
    }
}
