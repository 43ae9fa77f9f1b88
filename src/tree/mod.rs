//! Hierarchical tree serializer
//!
//! Some renderers want a strict rooted tree, not a graph. The family
//! graph is not a tree: spouse edges link across branches and a
//! couple's shared children are reachable through both parents. The
//! serializer walks the graph from a root and emits a finite node
//! hierarchy anyway, by tracking the set of members on the current
//! root-to-node path. The set is cloned per branch, so a member
//! legitimately reachable through two different branches is expanded
//! in each, while a revisit within one path becomes a terminal
//! reference stub instead of a cycle.

use crate::error::{KinGraphError, Result};
use crate::graph::FamilyGraph;
use crate::models::{Gender, Member};
use chrono::NaiveDate;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Display attributes carried on every tree node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAttributes {
    /// Id of the member this node displays
    pub member_id: String,
    /// Gender
    pub gender: Gender,
    /// Birth date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
    /// Death date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<NaiveDate>,
    /// Photo reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Derived generation
    pub generation: u32,
}

/// One node of the rooted hierarchical view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Node id; `ref_`-prefixed for reference stubs
    pub id: String,
    /// Display name
    pub name: String,
    /// Display attributes
    pub attributes: NodeAttributes,
    /// Child nodes; empty for leaves, stubs and spouse entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Whether this node is a cycle-breaking reference stub
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.id.starts_with("ref_")
    }

    /// Total node count of this subtree, the node itself included
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// Serialize the subtree rooted at one member
///
/// Fails with `NotFound` when the root is unknown or inactive.
pub fn serialize_tree(graph: &FamilyGraph, root_id: &str) -> Result<TreeNode> {
    let root = graph
        .active_member(root_id)
        .ok_or_else(|| KinGraphError::NotFound(format!("member {root_id}")))?;
    Ok(build_node(graph, root, FxHashSet::default()))
}

/// Serialize every root tree of the graph, in insertion order
///
/// A root already shown inside an earlier tree does not anchor one of
/// its own: a married root couple are both parentless, and the partner
/// reached second would otherwise duplicate the whole family.
#[must_use]
pub fn serialize_forest(graph: &FamilyGraph) -> Vec<TreeNode> {
    let mut shown: FxHashSet<String> = FxHashSet::default();
    let mut forest = Vec::new();
    // Shallowest roots first, so a married-in parentless spouse is
    // covered by the tree of the generation-0 ancestor before their
    // own turn comes up.
    let mut roots = graph.find_roots();
    roots.sort_by_key(|m| m.generation);
    for root in roots {
        if shown.contains(&root.id) {
            continue;
        }
        let tree = build_node(graph, root, FxHashSet::default());
        collect_member_ids(&tree, &mut shown);
        forest.push(tree);
    }
    forest
}

fn collect_member_ids(node: &TreeNode, shown: &mut FxHashSet<String>) {
    if !node.is_reference() {
        shown.insert(node.attributes.member_id.clone());
    }
    for child in &node.children {
        collect_member_ids(child, shown);
    }
}

fn build_node(graph: &FamilyGraph, member: &Member, mut path: FxHashSet<String>) -> TreeNode {
    path.insert(member.id.clone());
    let mut node = display_node(member);

    // Spouse rides along as a child-like entry with no recursion of
    // its own; its independent children appear only through its own
    // position in the graph.
    if let Some(spouse) = graph.active_spouse(member) {
        if !path.contains(&spouse.id) {
            node.children.push(display_node(spouse));
        }
    }

    for child_id in &member.children_ids {
        let Some(child) = graph.active_member(child_id) else {
            continue;
        };
        if path.contains(child_id) {
            node.children.push(reference_stub(child));
        } else {
            node.children.push(build_node(graph, child, path.clone()));
        }
    }
    node
}

fn display_node(member: &Member) -> TreeNode {
    TreeNode {
        id: member.id.clone(),
        name: member.name.clone(),
        attributes: NodeAttributes {
            member_id: member.id.clone(),
            gender: member.gender,
            birth_date: member.birth_date,
            death_date: member.death_date,
            photo: member.photo.clone(),
            generation: member.generation,
        },
        children: Vec::new(),
    }
}

/// Terminal placeholder emitted instead of revisiting a member that is
/// already on the current path
fn reference_stub(member: &Member) -> TreeNode {
    TreeNode {
        id: format!("ref_{}", member.id),
        name: member.name.clone(),
        attributes: NodeAttributes {
            member_id: member.id.clone(),
            gender: member.gender,
            birth_date: None,
            death_date: None,
            photo: None,
            generation: member.generation,
        },
        children: Vec::new(),
    }
}
