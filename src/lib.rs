//! flowcode-graph: Interactive security data-flow graph for code analysis results.
//!
//! This crate provides a WASM-based visualization that renders the data flow of
//! analyzed code with a physics-based layout, attack-path highlighting, and
//! panels describing the hovered or selected node.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::force_graph::{
	FlowGraph, ForceGraphCanvas, GraphConfig, GraphData, GraphLink, GraphNode, NodeType,
	SecurityFinding,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("flowcode-graph: logging initialized");
}

/// Text of the script element with the given id, if present.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Parse embedded JSON, logging and discarding it when malformed.
pub fn parse_embedded<T: DeserializeOwned>(what: &str, json_text: &str) -> Option<T> {
	match serde_json::from_str::<T>(json_text) {
		Ok(value) => Some(value),
		Err(e) => {
			warn!("flowcode-graph: failed to parse {}: {}", what, e);
			None
		}
	}
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...], security_findings: [...], ... }
fn load_graph_data() -> Option<GraphData> {
	let data: GraphData = parse_embedded("graph data", &script_text("graph-data")?)?;
	info!(
		"flowcode-graph: loaded {} nodes, {} links, {} findings",
		data.nodes.len(),
		data.links.len(),
		data.security_findings.len()
	);
	Some(data)
}

/// Load optional tunables from a script element with id="graph-config".
fn load_config() -> Option<GraphConfig> {
	parse_embedded("graph config", &script_text("graph-config")?)
}

/// Main application component.
/// Loads the analysis payload from the DOM and renders the flow graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let config = load_config().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Code Flow Security Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<FlowGraph data=graph_signal config=config fullscreen=true />
			<div class="graph-overlay">
				<h1>"Data Flow"</h1>
				<p class="subtitle">"Hover a node to trace it. Click to pin. Drag nodes to reposition. Scroll to zoom."</p>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn malformed_payload_is_discarded() {
		assert_eq!(parse_embedded::<GraphData>("graph data", "{nodes: oops"), None);
		assert_eq!(parse_embedded::<GraphConfig>("graph config", r#"{"zoom": "wide"}"#), None);
	}

	#[test]
	fn embedded_payload_parses() {
		let data: GraphData =
			parse_embedded("graph data", r#"{"nodes": [{"id": "a"}], "links": []}"#).unwrap();
		assert_eq!(data.nodes.len(), 1);
	}
}
