//! Step replay of an analysis reachability graph (ARG).
//!
//! [`ReplayEngine`] turns a step index into a [`VisualState`] and pushes it
//! into whatever implements the [`view`] traits.

mod config;
mod dataset;
mod engine;
mod types;
pub mod view;

pub use config::{FullGraphMode, LogLevel, ReplayConfig};
pub use dataset::{Dataset, Diagnostic};
pub use engine::{EdgeLiveness, ReplayEngine, VisualState};
pub use types::{EdgeId, GraphData, GraphEdge, GraphNode, NodeId, NodeKind};
pub use view::{GraphRenderer, ReplayView, SliderControl, SourceView};
