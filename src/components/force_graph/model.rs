//! Immutable state derived from one graph payload.
//!
//! Built once per data load: the sanitized topology, id → index resolution, the
//! vulnerable set and the finding index. Everything downstream reads it through
//! an `Arc` and never mutates it.

use std::collections::{HashMap, HashSet};

use super::attack_path::{AttackPath, attack_path};
use super::sanitize::sanitize;
use super::types::{GraphData, GraphLink, GraphNode, NodeType, SecurityFinding};

/// Headline counts shown next to the graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphSummary {
	/// Free-text summary from the analysis.
	pub text: String,
	/// Number of reported findings.
	pub findings: usize,
	/// Number of listed entry points.
	pub input_sources: usize,
	/// Number of listed sinks.
	pub sinks: usize,
	/// Number of trust boundary crossings.
	pub trust_boundaries: usize,
	/// Number of critical functions.
	pub critical_functions: usize,
}

/// Read-only view of one analysis payload, shared by the canvas and the panels.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphModel {
	/// Sanitized nodes; positions in this vector are the node indices used everywhere.
	pub nodes: Vec<GraphNode>,
	/// Links whose endpoints both exist.
	pub links: Vec<GraphLink>,
	/// Links resolved to `(source, target)` node indices, parallel to `links`.
	pub edges: Vec<(usize, usize)>,
	/// Headline counts and text.
	pub summary: GraphSummary,
	/// Every reported finding in payload order, including ones tied to no node.
	pub findings: Vec<SecurityFinding>,
	/// Sink ids as reported, whether or not they resolve to a node.
	pub sinks: Vec<String>,
	/// Entry point ids as reported.
	pub input_sources: Vec<String>,
	index: HashMap<String, usize>,
	vulnerable: HashSet<String>,
	findings_by_node: HashMap<String, Vec<SecurityFinding>>,
}

impl GraphModel {
	/// Sanitize `data` and index it.
	pub fn new(data: &GraphData) -> Self {
		let clean = sanitize(&data.nodes, &data.links);

		let index: HashMap<String, usize> = clean
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.clone(), i))
			.collect();

		// Sanitized links always resolve.
		let edges = clean
			.links
			.iter()
			.filter_map(|link| Some((*index.get(&link.source)?, *index.get(&link.target)?)))
			.collect();

		let mut vulnerable: HashSet<String> = HashSet::new();
		let mut findings_by_node: HashMap<String, Vec<SecurityFinding>> = HashMap::new();
		for finding in &data.security_findings {
			for id in &finding.nodes {
				vulnerable.insert(id.clone());
				findings_by_node
					.entry(id.clone())
					.or_default()
					.push(finding.clone());
			}
		}
		vulnerable.extend(data.sinks.iter().cloned());

		Self {
			nodes: clean.nodes,
			links: clean.links,
			edges,
			summary: GraphSummary {
				text: data.summary.clone(),
				findings: data.security_findings.len(),
				input_sources: data.input_sources.len(),
				sinks: data.sinks.len(),
				trust_boundaries: data.trust_boundaries.len(),
				critical_functions: data.critical_functions.len(),
			},
			findings: data.security_findings.clone(),
			sinks: data.sinks.clone(),
			input_sources: data.input_sources.clone(),
			index,
			vulnerable,
			findings_by_node,
		}
	}

	/// Whether there is nothing to lay out.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Index of the node with `id`.
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	/// Node with `id`.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.index_of(id).map(|i| &self.nodes[i])
	}

	/// Whether any finding references `id` or it is listed as a sink.
	pub fn is_vulnerable(&self, id: &str) -> bool {
		self.vulnerable.contains(id)
	}

	/// Findings that list `id` among their nodes.
	pub fn findings_for(&self, id: &str) -> &[SecurityFinding] {
		self.findings_by_node
			.get(id)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	/// Attack path for `id` when it is worth explaining: the node is vulnerable or
	/// typed as a sink. Benign nodes get `None`.
	pub fn attack_path_for(&self, id: &str) -> Option<AttackPath> {
		let node = self.node(id)?;
		if self.is_vulnerable(id) || node.kind == NodeType::Sink {
			Some(attack_path(id, &self.links))
		} else {
			None
		}
	}

	/// Indices of `idx` and every node one hop away in either direction.
	pub fn neighborhood(&self, idx: usize) -> HashSet<usize> {
		let mut set = HashSet::from([idx]);
		for &(src, tgt) in &self.edges {
			if src == idx {
				set.insert(tgt);
			} else if tgt == idx {
				set.insert(src);
			}
		}
		set
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, kind: NodeType) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.into(),
			kind,
			..GraphNode::default()
		}
	}

	fn finding(nodes: &[&str]) -> SecurityFinding {
		SecurityFinding {
			description: "dom xss".into(),
			nodes: nodes.iter().map(|s| s.to_string()).collect(),
			..SecurityFinding::default()
		}
	}

	fn sample() -> GraphData {
		GraphData {
			nodes: vec![
				node("input", NodeType::Input),
				node("handler", NodeType::Function),
				node("html", NodeType::Sink),
				node("log", NodeType::Api),
			],
			links: vec![
				GraphLink::new("input", "handler"),
				GraphLink::new("handler", "html"),
				GraphLink::new("handler", "log"),
				GraphLink::new("handler", "missing"),
			],
			security_findings: vec![finding(&["html", "handler"]), finding(&["html"])],
			sinks: vec!["html".into(), "log".into()],
			input_sources: vec!["input".into()],
			summary: "one flow".into(),
			..GraphData::default()
		}
	}

	#[test]
	fn vulnerable_set_unions_findings_and_sinks() {
		let model = GraphModel::new(&sample());
		assert!(model.is_vulnerable("html"));
		assert!(model.is_vulnerable("handler"));
		assert!(model.is_vulnerable("log"));
		assert!(!model.is_vulnerable("input"));
	}

	#[test]
	fn finding_index_is_many_to_many() {
		let model = GraphModel::new(&sample());
		assert_eq!(model.findings_for("html").len(), 2);
		assert_eq!(model.findings_for("handler").len(), 1);
		assert!(model.findings_for("input").is_empty());
	}

	#[test]
	fn edges_resolve_sanitized_links() {
		let model = GraphModel::new(&sample());
		assert_eq!(model.links.len(), 3);
		assert_eq!(model.edges, vec![(0, 1), (1, 2), (1, 3)]);
	}

	#[test]
	fn attack_path_only_for_risky_nodes() {
		let model = GraphModel::new(&sample());
		assert!(model.attack_path_for("input").is_none());
		let path = model.attack_path_for("html").expect("sink has a path");
		assert!(path.contains_node("input"));
		assert!(path.contains_node("handler"));
		assert!(!path.contains_node("log"));
		assert!(model.attack_path_for("unknown").is_none());
	}

	#[test]
	fn sink_typed_nodes_get_a_path_without_findings() {
		let data = GraphData {
			nodes: vec![node("a", NodeType::Variable), node("eval", NodeType::Sink)],
			links: vec![GraphLink::new("a", "eval")],
			..GraphData::default()
		};
		let model = GraphModel::new(&data);
		assert!(!model.is_vulnerable("eval"));
		assert_eq!(model.attack_path_for("eval").map(|p| p.nodes.len()), Some(2));
	}

	#[test]
	fn neighborhood_spans_both_directions() {
		let model = GraphModel::new(&sample());
		assert_eq!(model.neighborhood(1), HashSet::from([0, 1, 2, 3]));
		assert_eq!(model.neighborhood(3), HashSet::from([1, 3]));
	}

	#[test]
	fn summary_counts() {
		let model = GraphModel::new(&sample());
		assert_eq!(model.summary.findings, 2);
		assert_eq!(model.summary.sinks, 2);
		assert_eq!(model.summary.input_sources, 1);
		assert_eq!(model.summary.text, "one flow");
	}

	#[test]
	fn report_lists_are_kept_verbatim() {
		let mut data = sample();
		data.security_findings.push(finding(&[]));
		data.sinks.push("ghost".into());
		let model = GraphModel::new(&data);
		assert_eq!(model.findings.len(), 3);
		assert!(model.findings[2].nodes.is_empty());
		assert_eq!(model.sinks, ["html", "log", "ghost"]);
		assert_eq!(model.input_sources, ["input"]);
	}
}
