//! Graph data structures for input to the force graph component.
//!
//! These mirror the JSON payload handed over by the analysis collaborator. Every
//! field except a node's `id` is optional on the wire.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Kind of code element a node stands for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
	/// Function or method.
	Function,
	/// Variable or property.
	Variable,
	/// DOM element.
	Dom,
	/// Event handler or listener.
	Event,
	/// Browser or library API call.
	Api,
	/// Attacker-reachable input.
	Input,
	/// Dangerous output such as `innerHTML` or `eval`.
	Sink,
	/// Escaping or validation step.
	Sanitizer,
	/// Any type string outside the known set.
	#[default]
	#[serde(other)]
	Other,
}

impl NodeType {
	/// Every known type, in legend order.
	pub const ALL: [NodeType; 8] = [
		NodeType::Function,
		NodeType::Variable,
		NodeType::Dom,
		NodeType::Event,
		NodeType::Api,
		NodeType::Input,
		NodeType::Sink,
		NodeType::Sanitizer,
	];

	/// Lowercase wire name.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeType::Function => "function",
			NodeType::Variable => "variable",
			NodeType::Dom => "dom",
			NodeType::Event => "event",
			NodeType::Api => "api",
			NodeType::Input => "input",
			NodeType::Sink => "sink",
			NodeType::Sanitizer => "sanitizer",
			NodeType::Other => "other",
		}
	}
}

/// A node in the data-flow graph.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links and findings.
	pub id: String,
	/// Human-readable name; decorated by type for display.
	#[serde(default)]
	pub label: String,
	/// Node type; unknown strings become `Other`.
	#[serde(default, rename = "type")]
	pub kind: NodeType,
	/// Free-form grouping from the analysis.
	#[serde(default)]
	pub category: Option<String>,
	/// Explanation shown in the detail panel.
	#[serde(default)]
	pub description: Option<String>,
	/// File the node was extracted from.
	#[serde(default)]
	pub file: Option<String>,
	/// Code snippet or function body backing the node.
	#[serde(default)]
	pub snippet: Option<String>,
}

impl GraphNode {
	/// Label decorated according to the node type: `name()` for functions,
	/// `var name` for variables and `<name>` for DOM elements.
	pub fn display_label(&self) -> String {
		let label = if self.label.is_empty() {
			self.id.as_str()
		} else {
			self.label.as_str()
		};
		match self.kind {
			NodeType::Function => format!("{label}()"),
			NodeType::Variable => format!("var {}", strip_suffix_ci(label, "variable")),
			NodeType::Dom => {
				let stripped = strip_suffix_ci(label, "element");
				let stripped = if stripped.len() < label.trim_end().len() {
					strip_suffix_ci(stripped, "dom")
				} else {
					stripped
				};
				format!("<{stripped}>")
			}
			_ => label.to_string(),
		}
	}
}

/// Removes a trailing word (ASCII case-insensitive) along with surrounding whitespace.
fn strip_suffix_ci<'a>(label: &'a str, suffix: &str) -> &'a str {
	let trimmed = label.trim_end();
	let Some(split) = trimmed.len().checked_sub(suffix.len()) else {
		return trimmed;
	};
	match trimmed.get(split..) {
		Some(tail) if tail.eq_ignore_ascii_case(suffix) => trimmed[..split].trim_end(),
		_ => trimmed,
	}
}

/// A directed data-flow edge between two nodes.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphLink {
	/// Source node ID.
	#[serde(default, deserialize_with = "endpoint_id")]
	pub source: String,
	/// Target node ID.
	#[serde(default, deserialize_with = "endpoint_id")]
	pub target: String,
	/// Kind of flow, e.g. "data" or "call".
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	/// Free-text description of the relationship.
	#[serde(default)]
	pub relationship: Option<String>,
}

impl GraphLink {
	/// Link from `source` to `target` with no annotations.
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			..Self::default()
		}
	}
}

/// Link endpoints arrive either as a bare id or as an already-resolved node object.
#[derive(Deserialize)]
#[serde(untagged)]
enum Endpoint {
	Id(String),
	Node { id: String },
	/// Anything else resolves to an empty id, which never matches a node.
	Malformed(IgnoredAny),
}

fn endpoint_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Endpoint::deserialize(deserializer)? {
		Endpoint::Id(id) | Endpoint::Node { id } => id,
		Endpoint::Malformed(_) => String::new(),
	})
}

/// A vulnerability reported by the analysis, associated with zero or more nodes.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "FindingRepr")]
pub struct SecurityFinding {
	/// Short name of the weakness, when the analysis gave one.
	pub title: Option<String>,
	/// What was found.
	pub description: String,
	/// Ids of the nodes the finding refers to. May name nodes missing from the graph.
	pub nodes: Vec<String>,
	/// Suggested payload for testing the vulnerability.
	pub payload_suggestion: Option<String>,
	/// Step-by-step instructions to verify the risk.
	pub test_strategy: Option<String>,
	/// Reported as a bare sentence rather than a structured object.
	pub observation: bool,
}

impl SecurityFinding {
	/// Heading for report listings: the title, else a generic name by shape.
	pub fn heading(&self) -> &str {
		match &self.title {
			Some(title) if !title.trim().is_empty() => title.as_str(),
			_ if self.observation => "Observation",
			_ => "Finding",
		}
	}
}

/// Findings are sometimes reported as plain sentences.
#[derive(Deserialize)]
#[serde(untagged)]
enum FindingRepr {
	Text(String),
	Full {
		#[serde(default)]
		title: Option<String>,
		#[serde(default)]
		description: String,
		#[serde(default)]
		nodes: Option<Vec<String>>,
		#[serde(default)]
		payload_suggestion: Option<String>,
		#[serde(default)]
		test_strategy: Option<String>,
	},
}

impl From<FindingRepr> for SecurityFinding {
	fn from(repr: FindingRepr) -> Self {
		match repr {
			FindingRepr::Text(description) => Self {
				description,
				observation: true,
				..Self::default()
			},
			FindingRepr::Full {
				title,
				description,
				nodes,
				payload_suggestion,
				test_strategy,
			} => Self {
				title,
				description,
				nodes: nodes.unwrap_or_default(),
				payload_suggestion,
				test_strategy,
				observation: false,
			},
		}
	}
}

/// A point where data crosses from one trust domain into another.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrustBoundary {
	/// Node id on the trusted side.
	pub source: String,
	/// Node id on the untrusted side.
	pub target: String,
	/// Why the crossing matters.
	pub reason: String,
}

/// Complete analysis payload: topology, findings and summary sets.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphData {
	/// Graph nodes; duplicates and dangling links are cleaned up later.
	pub nodes: Vec<GraphNode>,
	/// Directed links between node ids.
	pub links: Vec<GraphLink>,
	/// Findings as objects or bare sentences.
	pub security_findings: Vec<SecurityFinding>,
	/// Function names worth reviewing.
	pub critical_functions: Vec<String>,
	/// Ids of attacker-reachable entry points.
	pub input_sources: Vec<String>,
	/// Ids of dangerous outputs.
	pub sinks: Vec<String>,
	/// Trust domain crossings.
	pub trust_boundaries: Vec<TrustBoundary>,
	/// Free-text summary of the analysis.
	pub summary: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(label: &str, kind: NodeType) -> GraphNode {
		GraphNode {
			id: "n".into(),
			label: label.into(),
			kind,
			..GraphNode::default()
		}
	}

	#[test]
	fn labels_are_decorated_by_type() {
		assert_eq!(node("submitForm", NodeType::Function).display_label(), "submitForm()");
		assert_eq!(node("userInput variable", NodeType::Variable).display_label(), "var userInput");
		assert_eq!(node("userInput", NodeType::Variable).display_label(), "var userInput");
		assert_eq!(node("results DOM element", NodeType::Dom).display_label(), "<results>");
		assert_eq!(node("search-box Element", NodeType::Dom).display_label(), "<search-box>");
		assert_eq!(node("innerHTML", NodeType::Sink).display_label(), "innerHTML");
	}

	#[test]
	fn dom_suffix_only_stripped_together_with_element() {
		assert_eq!(node("random", NodeType::Dom).display_label(), "<random>");
	}

	#[test]
	fn empty_label_falls_back_to_id() {
		let mut n = node("", NodeType::Function);
		n.id = "handler".into();
		assert_eq!(n.display_label(), "handler()");
	}

	#[test]
	fn link_endpoints_accept_ids_and_objects() {
		let links: Vec<GraphLink> = serde_json::from_str(
			r#"[{"source": "a", "target": {"id": "b", "x": 3.0}, "relationship": "flows"}]"#,
		)
		.unwrap();
		assert_eq!(links[0].source, "a");
		assert_eq!(links[0].target, "b");
		assert_eq!(links[0].relationship.as_deref(), Some("flows"));
	}

	#[test]
	fn malformed_endpoints_become_empty_ids() {
		let links: Vec<GraphLink> =
			serde_json::from_str(r#"[{"source": 4, "target": null}, {"target": "b"}]"#).unwrap();
		assert_eq!(links[0].source, "");
		assert_eq!(links[0].target, "");
		assert_eq!(links[1].source, "");
		assert_eq!(links[1].target, "b");
	}

	#[test]
	fn missing_optional_fields_default() {
		let data: GraphData =
			serde_json::from_str(r#"{"nodes": [{"id": "x", "type": "teleporter"}]}"#).unwrap();
		assert_eq!(data.nodes[0].kind, NodeType::Other);
		assert!(data.links.is_empty());
		assert!(data.sinks.is_empty());
		assert!(data.summary.is_empty());
	}

	#[test]
	fn findings_accept_plain_strings() {
		let data: GraphData = serde_json::from_str(
			r#"{"security_findings": ["raw sentence", {"description": "xss", "nodes": ["a"]}]}"#,
		)
		.unwrap();
		assert_eq!(data.security_findings[0].description, "raw sentence");
		assert!(data.security_findings[0].nodes.is_empty());
		assert_eq!(data.security_findings[1].nodes, vec!["a".to_string()]);
	}

	#[test]
	fn finding_headings_fall_back_by_shape() {
		let data: GraphData = serde_json::from_str(
			r#"{"security_findings": [
				"raw sentence",
				{"description": "untitled"},
				{"title": "  ", "description": "blank title"},
				{"title": "Reflected XSS", "description": "titled"}
			]}"#,
		)
		.unwrap();
		let headings: Vec<&str> = data.security_findings.iter().map(SecurityFinding::heading).collect();
		assert_eq!(headings, ["Observation", "Finding", "Finding", "Reflected XSS"]);
		assert!(data.security_findings[0].observation);
		assert!(!data.security_findings[1].observation);
	}
}
