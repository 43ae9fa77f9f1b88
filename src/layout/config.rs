//! Configuration for the layout engine.

use std::fmt;

/// Metrics driving the tidy-tree layout
///
/// Distances are in abstract canvas units; the defaults match a
/// 200x120 member card. Renderers scale as they see fit.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Width of one member card
    pub node_width: f64,
    /// Height of one member card
    pub node_height: f64,
    /// Vertical distance between generation levels
    pub level_height: f64,
    /// Horizontal gap between sibling subtrees
    pub sibling_gap: f64,
    /// Horizontal gap between the two cards of a couple
    pub spouse_gap: f64,
    /// Horizontal margin between disconnected root trees
    pub tree_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            node_height: 120.0,
            level_height: 200.0,
            sibling_gap: 40.0,
            spouse_gap: 30.0,
            tree_margin: 80.0,
        }
    }
}

impl fmt::Display for LayoutConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Layout Configuration:")?;
        writeln!(f, "  Node: {}x{}", self.node_width, self.node_height)?;
        writeln!(f, "  Level Height: {}", self.level_height)?;
        writeln!(f, "  Sibling Gap: {}", self.sibling_gap)?;
        writeln!(f, "  Spouse Gap: {}", self.spouse_gap)?;
        writeln!(f, "  Tree Margin: {}", self.tree_margin)?;
        Ok(())
    }
}
