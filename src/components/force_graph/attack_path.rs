//! Backward reachability from a risky node.
//!
//! An attack path is every node that can feed data into the target, found by
//! walking links from target to source until nothing new is reached.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use super::types::GraphLink;

/// Upstream contributors of a target node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttackPath {
	/// Node ids on the path, always including the target.
	pub nodes: HashSet<String>,
	/// Indices into the link slice the path was computed from.
	pub links: BTreeSet<usize>,
}

impl AttackPath {
	/// Whether `id` is on the path.
	pub fn contains_node(&self, id: &str) -> bool {
		self.nodes.contains(id)
	}

	/// Whether link `idx` is on the path.
	pub fn contains_link(&self, idx: usize) -> bool {
		self.links.contains(&idx)
	}
}

/// Breadth-first walk against link direction starting at `target`.
///
/// A link joins the path only when it discovers its source for the first time, so
/// each node is expanded once and cycles terminate.
pub fn attack_path(target: &str, links: &[GraphLink]) -> AttackPath {
	let mut incoming: HashMap<&str, Vec<usize>> = HashMap::new();
	for (idx, link) in links.iter().enumerate() {
		incoming.entry(link.target.as_str()).or_default().push(idx);
	}

	let mut nodes: HashSet<String> = HashSet::from([target.to_string()]);
	let mut path_links = BTreeSet::new();
	let mut queue: VecDeque<&str> = VecDeque::from([target]);

	while let Some(current) = queue.pop_front() {
		let Some(feeding) = incoming.get(current) else {
			continue;
		};
		for &idx in feeding {
			let source = links[idx].source.as_str();
			if nodes.contains(source) {
				continue;
			}
			nodes.insert(source.to_string());
			path_links.insert(idx);
			queue.push_back(source);
		}
	}

	AttackPath {
		nodes,
		links: path_links,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ids(path: &AttackPath) -> BTreeSet<&str> {
		path.nodes.iter().map(String::as_str).collect()
	}

	#[test]
	fn follows_links_backwards_transitively() {
		let links = vec![GraphLink::new("C", "B"), GraphLink::new("B", "A")];
		let path = attack_path("A", &links);
		assert_eq!(ids(&path), BTreeSet::from(["A", "B", "C"]));
		assert_eq!(path.links, BTreeSet::from([0, 1]));
	}

	#[test]
	fn ignores_downstream_nodes() {
		let links = vec![GraphLink::new("A", "B"), GraphLink::new("B", "C")];
		let path = attack_path("B", &links);
		assert_eq!(ids(&path), BTreeSet::from(["A", "B"]));
		assert_eq!(path.links, BTreeSet::from([0]));
	}

	#[test]
	fn terminates_on_cycles() {
		let links = vec![
			GraphLink::new("a", "b"),
			GraphLink::new("b", "c"),
			GraphLink::new("c", "a"),
			GraphLink::new("c", "c"),
		];
		let path = attack_path("a", &links);
		assert_eq!(ids(&path), BTreeSet::from(["a", "b", "c"]));
		// c -> a discovers c, b -> c discovers b; a -> b leads back to the visited target.
		assert_eq!(path.links, BTreeSet::from([1, 2]));
	}

	#[test]
	fn isolated_target_is_its_own_path() {
		let path = attack_path("lonely", &[GraphLink::new("x", "y")]);
		assert_eq!(ids(&path), BTreeSet::from(["lonely"]));
		assert!(path.links.is_empty());
	}

	#[test]
	fn parallel_links_only_record_the_first_discovery() {
		let links = vec![GraphLink::new("s", "t"), GraphLink::new("s", "t")];
		let path = attack_path("t", &links);
		assert_eq!(path.links, BTreeSet::from([0]));
	}

	#[test]
	fn repeated_calls_agree() {
		let links = vec![
			GraphLink::new("in", "f"),
			GraphLink::new("f", "sink"),
			GraphLink::new("g", "sink"),
			GraphLink::new("in", "g"),
		];
		assert_eq!(attack_path("sink", &links), attack_path("sink", &links));
	}
}
