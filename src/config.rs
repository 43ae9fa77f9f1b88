//! Configuration for the family graph manager.

use std::fmt;

/// Policy switches for the graph manager
///
/// Every switch has a conservative default; the defaults match the
/// behavior a user of an interactive tree builder is least likely to
/// find surprising.
#[derive(Debug, Clone, Copy)]
pub struct GraphConfig {
    /// Deactivate members left without any active relationship after a
    /// removal. Off by default: an isolated member is often a freshly
    /// added ancestor whose subtree has not been built out yet.
    pub orphan_cleanup: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            orphan_cleanup: false,
        }
    }
}

impl fmt::Display for GraphConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Graph Configuration:")?;
        writeln!(f, "  Orphan Cleanup: {}", self.orphan_cleanup)?;
        Ok(())
    }
}
