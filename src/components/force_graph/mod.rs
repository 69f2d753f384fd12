//! Interactive security data-flow graph.
//!
//! Renders an analysis payload on an HTML canvas with:
//! - Link sanitization and a precomputed [`GraphModel`]
//! - A d3-style force layout with dragging, panning and zooming
//! - Attack-path tracing back from vulnerable nodes and sinks
//! - Hover/selection highlighting with eased opacity transitions
//! - Detail, findings, legend and summary overlays
//!
//! # Example
//!
//! ```ignore
//! use flowcode_graph::{FlowGraph, GraphData, GraphLink, GraphNode, NodeType};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode { id: "q".into(), label: "query".into(), kind: NodeType::Input, ..Default::default() },
//!         GraphNode { id: "out".into(), label: "output".into(), kind: NodeType::Sink, ..Default::default() },
//!     ],
//!     links: vec![GraphLink::new("q", "out")],
//!     ..Default::default()
//! };
//!
//! view! { <FlowGraph data=Signal::derive(move || data.clone()) fullscreen=true /> }
//! ```

pub mod attack_path;
mod component;
pub mod config;
pub mod geometry;
pub mod interaction;
pub mod model;
pub mod panels;
mod render;
pub mod sanitize;
pub mod scale;
pub mod simulation;
pub mod state;
pub mod theme;
pub mod types;

pub use attack_path::{AttackPath, attack_path};
pub use component::{FlowGraph, ForceGraphCanvas};
pub use config::{GraphConfig, LayoutConfig, ThemeName, ZoomBounds};
pub use interaction::{Focus, Interaction, InteractionEvent};
pub use model::{GraphModel, GraphSummary};
pub use sanitize::{SanitizedGraph, sanitize};
pub use simulation::Simulation;
pub use theme::Theme;
pub use types::{GraphData, GraphLink, GraphNode, NodeType, SecurityFinding, TrustBoundary};
