//! Connector line geometry
//!
//! Derives the line segments a renderer needs to draw relationship
//! edges between positioned cards: a horizontal spouse segment with a
//! marker at its midpoint, and elbow sets from each family unit down
//! to its children (one drop from the couple, one rail spanning the
//! children, one drop per child).

use crate::graph::FamilyGraph;
use crate::layout::config::LayoutConfig;
use crate::layout::engine::{self, NodePosition};
use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

/// A point in layout space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

/// A straight line segment in layout space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    /// Segment start
    pub from: Point,
    /// Segment end
    pub to: Point,
}

/// One drawable connector element
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Connector {
    /// Horizontal segment between the two cards of a couple, with a
    /// marker point at its midpoint
    Spouse {
        /// Member whose card sits on the left
        left_id: String,
        /// Member whose card sits on the right
        right_id: String,
        /// Card-center to card-center segment
        segment: Segment,
        /// Midpoint marker position
        marker: Point,
    },
    /// Vertical drop from a family unit's center to the sibling rail
    FamilyDrop {
        /// Member anchoring the family unit
        anchor_id: String,
        /// Drop segment
        segment: Segment,
    },
    /// Horizontal rail spanning the children of one family unit
    SiblingRail {
        /// Member anchoring the family unit
        anchor_id: String,
        /// Rail segment
        segment: Segment,
    },
    /// Vertical drop from the sibling rail to one child's card
    ChildDrop {
        /// Member anchoring the family unit
        anchor_id: String,
        /// Child the drop leads to
        child_id: String,
        /// Drop segment
        segment: Segment,
    },
}

/// Build the connector list for a set of computed positions
///
/// `order` is the placement order, which keeps the output
/// deterministic. Members without a position (never the case on a
/// consistent graph) are skipped.
pub(crate) fn build(
    graph: &FamilyGraph,
    config: &LayoutConfig,
    positions: &FxHashMap<String, NodePosition>,
    order: &[String],
) -> Vec<Connector> {
    let mut out = Vec::new();
    let mut coupled: FxHashSet<String> = FxHashSet::default();

    for id in order {
        let Some(member) = graph.active_member(id) else {
            continue;
        };
        let Some(position) = positions.get(id) else {
            continue;
        };

        if let Some(spouse) = graph.active_spouse(member) {
            if !coupled.contains(id) {
                if let Some(spouse_position) = positions.get(&spouse.id) {
                    out.push(spouse_connector(
                        config,
                        member.id.clone(),
                        position,
                        spouse.id.clone(),
                        spouse_position,
                    ));
                    coupled.insert(member.id.clone());
                    coupled.insert(spouse.id.clone());
                }
            }
        }

        if family_anchor(graph, member, order) {
            family_connectors(graph, config, positions, member, position, &mut out);
        }
    }
    out
}

/// Whether this member anchors its family unit's child connectors.
/// Couples share children, so only the partner placed first emits.
fn family_anchor(graph: &FamilyGraph, member: &crate::models::Member, order: &[String]) -> bool {
    let Some(spouse) = graph.active_spouse(member) else {
        return true;
    };
    let member_rank = order.iter().position(|id| *id == member.id);
    let spouse_rank = order.iter().position(|id| *id == spouse.id);
    match (member_rank, spouse_rank) {
        (Some(m), Some(s)) => m < s,
        (Some(_), None) => true,
        _ => false,
    }
}

fn spouse_connector(
    config: &LayoutConfig,
    a_id: String,
    a: &NodePosition,
    b_id: String,
    b: &NodePosition,
) -> Connector {
    let (left_id, left, right_id, right) = if a.x <= b.x {
        (a_id, a, b_id, b)
    } else {
        (b_id, b, a_id, a)
    };
    let y = left.y + config.node_height / 2.0;
    let from = Point {
        x: left.x + config.node_width / 2.0,
        y,
    };
    let to = Point {
        x: right.x + config.node_width / 2.0,
        y,
    };
    Connector::Spouse {
        left_id,
        right_id,
        segment: Segment { from, to },
        marker: Point {
            x: (from.x + to.x) / 2.0,
            y,
        },
    }
}

fn family_connectors(
    graph: &FamilyGraph,
    config: &LayoutConfig,
    positions: &FxHashMap<String, NodePosition>,
    member: &crate::models::Member,
    position: &NodePosition,
    out: &mut Vec<Connector>,
) {
    let children: Vec<(&str, &NodePosition)> = engine::couple_children(graph, member)
        .iter()
        .filter_map(|child| positions.get(&child.id).map(|p| (child.id.as_str(), p)))
        .collect();
    if children.is_empty() {
        return;
    }

    // Horizontal span of the family unit: one card, or both cards of
    // the couple when the spouse is positioned.
    let mut span_left = position.x;
    let mut span_right = position.x + config.node_width;
    if let Some(spouse_position) = graph
        .active_spouse(member)
        .and_then(|s| positions.get(&s.id))
    {
        span_left = span_left.min(spouse_position.x);
        span_right = span_right.max(spouse_position.x + config.node_width);
    }
    let center_x = (span_left + span_right) / 2.0;
    let parent_bottom = position.y + config.node_height;
    let child_top = children
        .iter()
        .map(|(_, p)| p.y)
        .fold(f64::INFINITY, f64::min);
    let mid_y = (parent_bottom + child_top) / 2.0;

    out.push(Connector::FamilyDrop {
        anchor_id: member.id.to_string(),
        segment: Segment {
            from: Point {
                x: center_x,
                y: parent_bottom,
            },
            to: Point {
                x: center_x,
                y: mid_y,
            },
        },
    });

    let centers = children
        .iter()
        .map(|(_, p)| p.x + config.node_width / 2.0)
        .minmax();
    if let Some((first, last)) = centers.into_option() {
        out.push(Connector::SiblingRail {
            anchor_id: member.id.to_string(),
            segment: Segment {
                from: Point { x: first, y: mid_y },
                to: Point { x: last, y: mid_y },
            },
        });
    }

    for (child_id, child_position) in children {
        let x = child_position.x + config.node_width / 2.0;
        out.push(Connector::ChildDrop {
            anchor_id: member.id.to_string(),
            child_id: child_id.to_string(),
            segment: Segment {
                from: Point { x, y: mid_y },
                to: Point {
                    x,
                    y: child_position.y,
                },
            },
        });
    }
}
