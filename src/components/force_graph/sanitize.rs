//! Topology cleanup ahead of layout.
//!
//! Produces a working copy of the payload in which every link references an
//! existing node. Nothing here fails: broken links are dropped and logged.

use std::collections::{HashMap, HashSet};

use log::debug;

use super::types::{GraphLink, GraphNode};

/// Working copy of the graph with dangling links removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SanitizedGraph {
	/// Nodes with unique ids, in first-seen order.
	pub nodes: Vec<GraphNode>,
	/// Links whose endpoints both name a kept node.
	pub links: Vec<GraphLink>,
}

/// Copy `nodes` and keep only the links whose endpoints both exist.
///
/// Nodes sharing an id collapse into one entry that keeps the position of the first
/// occurrence and the contents of the last.
pub fn sanitize(nodes: &[GraphNode], links: &[GraphLink]) -> SanitizedGraph {
	let mut slots: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
	let mut kept: Vec<GraphNode> = Vec::with_capacity(nodes.len());

	for node in nodes {
		match slots.get(node.id.as_str()) {
			Some(&slot) => {
				debug!("flowcode-graph: duplicate node id {:?}, keeping last", node.id);
				kept[slot] = node.clone();
			}
			None => {
				slots.insert(node.id.as_str(), kept.len());
				kept.push(node.clone());
			}
		}
	}

	let ids: HashSet<&str> = slots.into_keys().collect();
	let mut dropped = 0usize;
	let links = links
		.iter()
		.filter(|link| {
			let valid = ids.contains(link.source.as_str()) && ids.contains(link.target.as_str());
			if !valid {
				dropped += 1;
				debug!(
					"flowcode-graph: dropping link {:?} -> {:?} (unknown endpoint)",
					link.source, link.target
				);
			}
			valid
		})
		.cloned()
		.collect();

	if dropped > 0 {
		debug!("flowcode-graph: dropped {} dangling links", dropped);
	}

	SanitizedGraph { nodes: kept, links }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.into(),
			..GraphNode::default()
		}
	}

	#[test]
	fn drops_links_with_missing_endpoints() {
		let nodes = vec![node("X"), node("Y")];
		let links = vec![GraphLink::new("X", "Z")];
		let clean = sanitize(&nodes, &links);
		assert!(clean.links.is_empty());
		assert_eq!(clean.nodes.len(), 2);
	}

	#[test]
	fn surviving_links_reference_known_nodes() {
		let nodes = vec![node("a"), node("b"), node("c")];
		let links = vec![
			GraphLink::new("a", "b"),
			GraphLink::new("b", "ghost"),
			GraphLink::new("ghost", "c"),
			GraphLink::new("", "a"),
			GraphLink::new("c", "a"),
		];
		let clean = sanitize(&nodes, &links);
		let ids: HashSet<&str> = clean.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(clean.links.len(), 2);
		for link in &clean.links {
			assert!(ids.contains(link.source.as_str()));
			assert!(ids.contains(link.target.as_str()));
		}
		for link in links.iter().filter(|l| !clean.links.contains(l)) {
			assert!(!ids.contains(link.source.as_str()) || !ids.contains(link.target.as_str()));
		}
	}

	#[test]
	fn duplicate_links_are_kept() {
		let nodes = vec![node("a"), node("b")];
		let links = vec![GraphLink::new("a", "b"), GraphLink::new("a", "b")];
		assert_eq!(sanitize(&nodes, &links).links.len(), 2);
	}

	#[test]
	fn duplicate_node_ids_last_write_wins() {
		let mut second = node("a");
		second.label = "second".into();
		let nodes = vec![node("a"), node("b"), second];
		let clean = sanitize(&nodes, &[]);
		assert_eq!(clean.nodes.len(), 2);
		assert_eq!(clean.nodes[0].id, "a");
		assert_eq!(clean.nodes[0].label, "second");
		assert_eq!(clean.nodes[1].id, "b");
	}

	#[test]
	fn is_deterministic() {
		let nodes = vec![node("a"), node("b")];
		let links = vec![GraphLink::new("b", "a"), GraphLink::new("a", "q")];
		assert_eq!(sanitize(&nodes, &links), sanitize(&nodes, &links));
	}
}
