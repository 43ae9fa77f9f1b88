//! Tidy-tree position computation
//!
//! Two-phase layout over the active graph: a bottom-up pass computes
//! the horizontal extent each member needs for itself, its spouse and
//! all descendants, then a top-down pass centers every couple over its
//! children's combined extent. Spouses share a row separated by a
//! fixed gap, levels map to fixed-height rows, and sibling subtrees
//! can never overlap because each child is granted its full extent
//! before the next one starts.

use crate::graph::FamilyGraph;
use crate::layout::config::LayoutConfig;
use crate::layout::connectors::{self, Connector};
use crate::models::Member;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

/// Computed position of one member card
///
/// `x`/`y` address the card's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePosition {
    /// Horizontal position of the card's left edge
    pub x: f64,
    /// Vertical position of the card's top edge
    pub y: f64,
    /// Tree level the card sits on, 0 for roots
    pub level: u32,
}

/// Result of a layout run: per-member positions, overall bounds and
/// connector geometry for the rendering collaborator
#[derive(Debug, Clone)]
pub struct TreeLayout {
    positions: FxHashMap<String, NodePosition>,
    order: Vec<String>,
    width: f64,
    height: f64,
    connectors: Vec<Connector>,
}

impl TreeLayout {
    /// Lay out every active member of the graph
    ///
    /// Never fails: dangling references in a slightly inconsistent
    /// snapshot are treated as absent, and members unreachable from
    /// any root are laid out as standalone trees.
    #[must_use]
    pub fn compute(graph: &FamilyGraph, config: &LayoutConfig) -> Self {
        let mut pass = LayoutPass {
            graph,
            config,
            widths: FxHashMap::default(),
            positioned: FxHashSet::default(),
            positions: FxHashMap::default(),
            order: Vec::new(),
        };

        // A married-in spouse with no recorded parents is also a root
        // but sits on a deeper generation; anchoring each tree at its
        // shallowest root lets the walk reach the spouse through the
        // tree instead of starting a second one around them.
        let mut roots = graph.find_roots();
        roots.sort_by_key(|m| m.generation);
        let roots: Vec<String> = roots.iter().map(|m| m.id.clone()).collect();
        let mut cursor = 0.0;
        for root in &roots {
            if pass.positioned.contains(root) {
                continue;
            }
            let width = pass.subtree_width(root, &mut FxHashSet::default());
            pass.place(root, cursor, 0);
            cursor += width + config.tree_margin;
        }

        // A consistent graph is fully covered by its roots; anything
        // left over had a dangling parent reference.
        let leftovers: Vec<String> = graph
            .active_members()
            .map(|m| m.id.clone())
            .filter(|id| !pass.positioned.contains(id))
            .collect();
        for id in leftovers {
            if pass.positioned.contains(&id) {
                continue;
            }
            log::warn!("member {id} unreachable from any root, laying out standalone");
            let width = pass.subtree_width(&id, &mut FxHashSet::default());
            pass.place(&id, cursor, 0);
            cursor += width + config.tree_margin;
        }

        let width = pass
            .positions
            .values()
            .map(|p| p.x + config.node_width)
            .fold(0.0, f64::max);
        let height = pass
            .positions
            .values()
            .map(|p| p.y + config.node_height)
            .fold(0.0, f64::max);

        let connectors = connectors::build(graph, config, &pass.positions, &pass.order);
        Self {
            positions: pass.positions,
            order: pass.order,
            width,
            height,
            connectors,
        }
    }

    /// Position of one member, if it was laid out
    #[must_use]
    pub fn position(&self, id: &str) -> Option<&NodePosition> {
        self.positions.get(id)
    }

    /// All positions in the order members were placed
    pub fn positions(&self) -> impl Iterator<Item = (&str, &NodePosition)> {
        self.order
            .iter()
            .filter_map(|id| self.positions.get(id).map(|p| (id.as_str(), p)))
    }

    /// Connector line geometry derived from the positions
    #[must_use]
    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Overall width of the laid-out forest
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Overall height of the laid-out forest
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Number of positioned members
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing was laid out
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// The active children a couple presents as one family unit: the
/// member's own children merged with the spouse's, deduplicated in
/// insertion order
pub(crate) fn couple_children<'a>(
    graph: &'a FamilyGraph,
    member: &'a Member,
) -> SmallVec<[&'a Member; 4]> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut out: SmallVec<[&'a Member; 4]> = SmallVec::new();
    let spouse_children = graph
        .active_spouse(member)
        .map(|s| s.children_ids.as_slice())
        .unwrap_or_default();
    for child_id in member.children_ids.iter().chain(spouse_children) {
        if let Some(child) = graph.active_member(child_id) {
            if seen.insert(&child.id) {
                out.push(child);
            }
        }
    }
    out
}

struct LayoutPass<'a> {
    graph: &'a FamilyGraph,
    config: &'a LayoutConfig,
    widths: FxHashMap<String, f64>,
    positioned: FxHashSet<String>,
    positions: FxHashMap<String, NodePosition>,
    order: Vec<String>,
}

impl LayoutPass<'_> {
    /// Width of the member's own card row: one card, or two plus the
    /// spouse gap when an active spouse exists
    fn couple_width(&self, member: &Member) -> f64 {
        if self.graph.active_spouse(member).is_some() {
            self.config.node_width * 2.0 + self.config.spouse_gap
        } else {
            self.config.node_width
        }
    }

    /// Horizontal extent needed by the member, spouse and descendants
    ///
    /// Memoised per run. The on-path set only matters for corrupt
    /// graphs whose parent edges loop; such an edge contributes zero
    /// width instead of recursing forever.
    fn subtree_width(&mut self, id: &str, path: &mut FxHashSet<String>) -> f64 {
        if let Some(width) = self.widths.get(id) {
            return *width;
        }
        if !path.insert(id.to_string()) {
            log::warn!("parent cycle through member {id} during layout, ignoring edge");
            return 0.0;
        }
        let graph = self.graph;
        let Some(member) = graph.active_member(id) else {
            path.remove(id);
            return 0.0;
        };

        let child_ids: Vec<String> = couple_children(graph, member)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        let couple = self.couple_width(member);
        let mut children = 0.0;
        for (index, child) in child_ids.iter().enumerate() {
            if index > 0 {
                children += self.config.sibling_gap;
            }
            children += self.subtree_width(child, path);
        }

        let width = couple.max(children);
        path.remove(id);
        self.widths.insert(id.to_string(), width);
        width
    }

    /// Assign positions top-down: children centered within the
    /// member's extent, the couple centered above them
    ///
    /// A member is placed at most once; a spouse is placed together
    /// with whichever partner the traversal reaches first.
    fn place(&mut self, id: &str, x: f64, level: u32) {
        if self.positioned.contains(id) {
            return;
        }
        let graph = self.graph;
        let Some(member) = graph.active_member(id) else {
            return;
        };

        let total = self.subtree_width(id, &mut FxHashSet::default());
        let couple = self.couple_width(member);
        let child_ids: Vec<String> = couple_children(graph, member)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        let spouse_id = graph.active_spouse(member).map(|s| s.id.clone());

        let mut children_width = 0.0;
        for (index, child) in child_ids.iter().enumerate() {
            if index > 0 {
                children_width += self.config.sibling_gap;
            }
            children_width += self.subtree_width(child, &mut FxHashSet::default());
        }

        let y = f64::from(level) * self.config.level_height;
        let mut child_x = x + (total - children_width) / 2.0;
        for child in &child_ids {
            let child_width = self.subtree_width(child, &mut FxHashSet::default());
            self.place(child, child_x, level + 1);
            child_x += child_width + self.config.sibling_gap;
        }

        let self_x = x + (total - couple) / 2.0;
        self.set_position(id, NodePosition { x: self_x, y, level });
        if let Some(spouse_id) = spouse_id {
            if !self.positioned.contains(&spouse_id) {
                let spouse_x = self_x + self.config.node_width + self.config.spouse_gap;
                self.set_position(&spouse_id, NodePosition { x: spouse_x, y, level });
            }
        }
    }

    fn set_position(&mut self, id: &str, position: NodePosition) {
        self.positioned.insert(id.to_string());
        self.positions.insert(id.to_string(), position);
        self.order.push(id.to_string());
    }
}
