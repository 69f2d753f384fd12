//! Hover/selection state machine and highlight derivation.
//!
//! [`Interaction`] only records which node the pointer is over and which node
//! was clicked. Everything visual is derived from it by [`Focus::derive`], a
//! pure function of the interaction and the graph model.

use super::attack_path::AttackPath;
use super::model::GraphModel;

/// Opacity of nodes outside the highlighted set.
pub const DIMMED_NODE_OPACITY: f64 = 0.1;
/// Opacity of links outside the highlighted set.
pub const DIMMED_LINK_OPACITY: f64 = 0.05;

/// Pointer input relevant to highlighting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InteractionEvent {
	/// Pointer moved over a node.
	PointerEnter(String),
	/// Pointer left every node or the canvas.
	PointerLeave,
	/// Click on a node: toggles its selection.
	Click(String),
	/// Click that reached the background: clears the selection.
	BackgroundClick,
}

/// Which node is hovered and which is selected, by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Interaction {
	/// Node under the pointer.
	pub hovered: Option<String>,
	/// Node pinned by a click; survives hover changes.
	pub selected: Option<String>,
}

impl Interaction {
	/// Apply `event`, returning whether anything changed.
	pub fn apply(&mut self, event: InteractionEvent) -> bool {
		let before = self.clone();
		match event {
			InteractionEvent::PointerEnter(id) => self.hovered = Some(id),
			InteractionEvent::PointerLeave => self.hovered = None,
			InteractionEvent::Click(id) => {
				self.selected = if self.selected.as_deref() == Some(id.as_str()) {
					None
				} else {
					Some(id)
				};
			}
			InteractionEvent::BackgroundClick => self.selected = None,
		}
		*self != before
	}

	/// Hover wins over selection.
	pub fn active_id(&self) -> Option<&str> {
		self.hovered.as_deref().or(self.selected.as_deref())
	}
}

/// Where the active node came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveSource {
	/// The pointer is over it.
	Hover,
	/// It was clicked and nothing is hovered.
	Selection,
}

/// The node details and highlighting are built around.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveNode {
	/// Position in `GraphModel::nodes`.
	pub index: usize,
	/// Id of the node.
	pub id: String,
	/// Whether hover or selection made it active.
	pub source: ActiveSource,
}

/// Node outline treatment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NodeStroke {
	/// Regular type-colored outline.
	#[default]
	Default,
	/// The active node outside attack-path mode.
	Active,
	/// Member of the displayed attack path.
	Danger,
}

/// Link color treatment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkStroke {
	/// Regular link color.
	#[default]
	Default,
	/// Incident to the active node.
	Adjacent,
	/// Member of the displayed attack path.
	Danger,
}

/// Arrowhead drawn at the target end of a link.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Marker {
	/// Regular arrowhead.
	#[default]
	Default,
	/// Larger red arrowhead on attack path links.
	Danger,
}

/// Target appearance of one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeHighlight {
	/// Target opacity, 1.0 or `DIMMED_NODE_OPACITY`.
	pub opacity: f64,
	/// Outline treatment.
	pub stroke: NodeStroke,
}

impl Default for NodeHighlight {
	fn default() -> Self {
		Self {
			opacity: 1.0,
			stroke: NodeStroke::Default,
		}
	}
}

/// Target appearance of one link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkHighlight {
	/// Target opacity, 1.0 or `DIMMED_LINK_OPACITY`.
	pub opacity: f64,
	/// Stroke color treatment.
	pub stroke: LinkStroke,
	/// Arrowhead treatment.
	pub marker: Marker,
}

impl Default for LinkHighlight {
	fn default() -> Self {
		Self {
			opacity: 1.0,
			stroke: LinkStroke::Default,
			marker: Marker::Default,
		}
	}
}

/// Per-node and per-link targets, indexed like `GraphModel::nodes` and `::links`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Highlight {
	/// One entry per model node.
	pub nodes: Vec<NodeHighlight>,
	/// One entry per model link.
	pub links: Vec<LinkHighlight>,
}

impl Highlight {
	/// Everything at full opacity with default colors.
	pub fn idle(model: &GraphModel) -> Self {
		Self {
			nodes: vec![NodeHighlight::default(); model.nodes.len()],
			links: vec![LinkHighlight::default(); model.links.len()],
		}
	}

	fn attack_path(model: &GraphModel, path: &AttackPath) -> Self {
		let nodes = model
			.nodes
			.iter()
			.map(|node| {
				if path.contains_node(&node.id) {
					NodeHighlight {
						opacity: 1.0,
						stroke: NodeStroke::Danger,
					}
				} else {
					NodeHighlight {
						opacity: DIMMED_NODE_OPACITY,
						stroke: NodeStroke::Default,
					}
				}
			})
			.collect();
		let links = (0..model.links.len())
			.map(|idx| {
				if path.contains_link(idx) {
					LinkHighlight {
						opacity: 1.0,
						stroke: LinkStroke::Danger,
						marker: Marker::Danger,
					}
				} else {
					LinkHighlight {
						opacity: DIMMED_LINK_OPACITY,
						..LinkHighlight::default()
					}
				}
			})
			.collect();
		Self { nodes, links }
	}

	fn neighborhood(model: &GraphModel, active: usize) -> Self {
		let near = model.neighborhood(active);
		let nodes = (0..model.nodes.len())
			.map(|idx| NodeHighlight {
				opacity: if near.contains(&idx) {
					1.0
				} else {
					DIMMED_NODE_OPACITY
				},
				stroke: if idx == active {
					NodeStroke::Active
				} else {
					NodeStroke::Default
				},
			})
			.collect();
		let links = model
			.edges
			.iter()
			.map(|&(src, tgt)| {
				if src == active || tgt == active {
					LinkHighlight {
						opacity: 1.0,
						stroke: LinkStroke::Adjacent,
						marker: Marker::Default,
					}
				} else {
					LinkHighlight {
						opacity: DIMMED_LINK_OPACITY,
						..LinkHighlight::default()
					}
				}
			})
			.collect();
		Self { nodes, links }
	}

	/// Indices of nodes drawn at full opacity.
	pub fn lit_nodes(&self) -> impl Iterator<Item = usize> + '_ {
		self.nodes
			.iter()
			.enumerate()
			.filter(|(_, h)| h.opacity >= 1.0)
			.map(|(i, _)| i)
	}
}

/// Everything derived from the current interaction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Focus {
	/// Resolved active node, if any id matched.
	pub active: Option<ActiveNode>,
	/// Set only when the active node is risky.
	pub attack_path: Option<AttackPath>,
	/// Per-element targets for the renderer.
	pub highlight: Highlight,
}

impl Focus {
	/// Resolve the active node, compute its attack path when it is risky, and
	/// derive highlight targets. Ids missing from the model count as no node.
	pub fn derive(model: &GraphModel, interaction: &Interaction) -> Self {
		let hovered = interaction
			.hovered
			.as_deref()
			.and_then(|id| Some((model.index_of(id)?, id, ActiveSource::Hover)));
		let selected = || {
			interaction
				.selected
				.as_deref()
				.and_then(|id| Some((model.index_of(id)?, id, ActiveSource::Selection)))
		};

		let Some((index, id, source)) = hovered.or_else(selected) else {
			return Self {
				active: None,
				attack_path: None,
				highlight: Highlight::idle(model),
			};
		};

		let attack_path = model.attack_path_for(id);
		let highlight = match &attack_path {
			Some(path) => Highlight::attack_path(model, path),
			None => Highlight::neighborhood(model, index),
		};

		Self {
			active: Some(ActiveNode {
				index,
				id: id.to_string(),
				source,
			}),
			attack_path,
			highlight,
		}
	}

	/// Index of the active node.
	pub fn active_index(&self) -> Option<usize> {
		self.active.as_ref().map(|a| a.index)
	}
}
