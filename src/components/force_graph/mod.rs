mod component;
mod config;
mod frame;
mod geometry;
mod graph;
mod render;
pub mod scale;
mod simulation;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use types::{GraphData, GraphLink, GraphNode, LinkSelection, NodeKind, ReferenceIndex};
