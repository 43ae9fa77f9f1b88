//! Layout engine: 2-D positions and connector geometry
//!
//! Turns the family graph into drawable output: per-member card
//! positions from the tidy-tree pass in [`engine`], and the connector
//! segments in [`connectors`] a renderer needs to join them up.

pub mod config;
pub mod connectors;
pub mod engine;

pub use config::LayoutConfig;
pub use connectors::{Connector, Point, Segment};
pub use engine::{NodePosition, TreeLayout};
