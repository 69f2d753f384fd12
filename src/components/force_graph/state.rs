//! Graph view state and gesture tracking.
//!
//! Wraps the force simulation with the pan/zoom transform, pointer gestures
//! (node drag, background pan, click detection) and per-element opacity fading
//! toward the current highlight targets.

use std::sync::Arc;

use super::config::{GraphConfig, ZoomBounds};
use super::interaction::Highlight;
use super::model::GraphModel;
use super::scale::{ScaleConfig, ScaledValues};
use super::simulation::Simulation;

/// Pointer travel (screen pixels) below which a press-release counts as a click.
const CLICK_TOLERANCE: f64 = 3.0;

/// A hovered node stays hovered until the pointer leaves this multiple of the
/// hit radius, so skimming a node's edge does not toggle hover every frame.
const HOVER_RELEASE_FACTOR: f64 = 1.25;

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	/// A node is being pressed or dragged.
	pub active: bool,
	/// Dragged node.
	pub node_idx: Option<usize>,
	/// Pointer x at press, in screen pixels.
	pub start_x: f64,
	/// Pointer y at press.
	pub start_y: f64,
	/// Node x at press, in graph units.
	pub node_start_x: f64,
	/// Node y at press.
	pub node_start_y: f64,
	/// Pointer travelled past the click tolerance.
	pub moved: bool,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	/// The background is being pressed or panned.
	pub active: bool,
	/// Pointer x at press, in screen pixels.
	pub start_x: f64,
	/// Pointer y at press.
	pub start_y: f64,
	/// Transform x at press.
	pub transform_start_x: f64,
	/// Transform y at press.
	pub transform_start_y: f64,
	/// Pointer travelled past the click tolerance; until then the view stays put.
	pub moved: bool,
}

/// How a press-release gesture ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
	/// Press and release on a node without moving it.
	NodeClick(usize),
	/// Press and release on empty canvas without panning.
	BackgroundClick,
	/// A node was dragged and released.
	Dragged,
	/// The view was panned.
	Panned,
	/// No gesture was in progress.
	Idle,
}

/// Displayed opacities easing toward the highlight targets.
///
/// Each element keeps its own value and moves toward its target with exponential
/// smoothing, which slows down as it approaches the target. Brightening is faster
/// than dimming so the newly focused elements appear first.
#[derive(Clone, Debug, Default)]
pub struct OpacityFade {
	nodes: Vec<f64>,
	links: Vec<f64>,
}

impl OpacityFade {
	/// All opacities start fully visible.
	pub fn new(node_count: usize, link_count: usize) -> Self {
		Self {
			nodes: vec![1.0; node_count],
			links: vec![1.0; link_count],
		}
	}

	/// Exponential smoothing: value += (target - value) * (1 - e^(-speed * dt)).
	pub fn tick(&mut self, dt: f64, target: &Highlight) {
		// At 60fps: ~95% of the way in ~0.3s (brighten) / ~0.4s (dim).
		const BRIGHTEN_SPEED: f64 = 10.0;
		const DIM_SPEED: f64 = 7.5;

		let brighten = 1.0 - (-BRIGHTEN_SPEED * dt).exp();
		let dim = 1.0 - (-DIM_SPEED * dt).exp();
		let step = |value: &mut f64, goal: f64| {
			let factor = if goal > *value { brighten } else { dim };
			*value += (goal - *value) * factor;
			if (goal - *value).abs() < 0.005 {
				*value = goal;
			}
		};

		for (value, h) in self.nodes.iter_mut().zip(&target.nodes) {
			step(value, h.opacity);
		}
		for (value, h) in self.links.iter_mut().zip(&target.links) {
			step(value, h.opacity);
		}
	}

	/// Displayed opacity of node `idx`.
	pub fn node(&self, idx: usize) -> f64 {
		self.nodes.get(idx).copied().unwrap_or(1.0)
	}

	/// Displayed opacity of link `idx`.
	pub fn link(&self, idx: usize) -> f64 {
		self.links.get(idx).copied().unwrap_or(1.0)
	}
}

/// Core view state combining the layout engine with gesture and fade tracking.
///
/// Created whenever a new graph payload is displayed, then mutated each frame by
/// the animation loop and by pointer handlers.
pub struct ForceGraphState {
	/// Graph being displayed.
	pub model: Arc<GraphModel>,
	/// Layout positions, indexed like `model.nodes`.
	pub simulation: Simulation,
	/// Pan and zoom.
	pub transform: ViewTransform,
	/// Node drag in progress.
	pub drag: DragState,
	/// Background pan in progress.
	pub pan: PanState,
	/// Displayed opacities.
	pub fade: OpacityFade,
	/// Allowed zoom range.
	pub zoom: ZoomBounds,
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	hovered: Option<usize>,
}

impl ForceGraphState {
	/// Start a layout for `model` centered in a `width` x `height` canvas.
	pub fn new(model: Arc<GraphModel>, width: f64, height: f64, config: &GraphConfig) -> Self {
		let simulation = Simulation::new(
			model.nodes.len(),
			&model.edges,
			config.layout.clone(),
			(width / 2.0, height / 2.0),
		);
		let fade = OpacityFade::new(model.nodes.len(), model.links.len());

		Self {
			model,
			simulation,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			fade,
			zoom: config.zoom,
			width,
			height,
			hovered: None,
		}
	}

	/// Convert canvas pixels to graph coordinates.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Convert graph coordinates to canvas pixels.
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	fn distance_to(&self, idx: usize, gx: f64, gy: f64) -> Option<f64> {
		let (x, y) = self.simulation.position(idx)?;
		Some(((x - gx).powi(2) + (y - gy).powi(2)).sqrt())
	}

	/// Nearest node whose hit circle contains the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		(0..self.simulation.nodes().len())
			.filter_map(|idx| Some((idx, self.distance_to(idx, gx, gy)?)))
			.filter(|&(_, dist)| dist < scale.hit_radius)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(idx, _)| idx)
	}

	/// Node the pointer should count as hovering, with release hysteresis.
	/// Frozen while a drag is in progress.
	pub fn hover_target(&mut self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<usize> {
		if self.drag.active {
			return self.hovered;
		}
		let hit = self.node_at_position(sx, sy, config);
		let kept = self.hovered.filter(|&idx| {
			let (gx, gy) = self.screen_to_graph(sx, sy);
			let release = ScaledValues::new(config, self.transform.k).hit_radius * HOVER_RELEASE_FACTOR;
			self.distance_to(idx, gx, gy).is_some_and(|d| d < release)
		});
		self.hovered = match (hit, kept) {
			(Some(idx), _) if Some(idx) == kept => Some(idx),
			(_, Some(idx)) => Some(idx),
			(hit, None) => hit,
		};
		self.hovered
	}

	/// Pointer pressed: start dragging the node under it, or panning otherwise.
	pub fn press(&mut self, sx: f64, sy: f64, config: &ScaleConfig) {
		match self.node_at_position(sx, sy, config) {
			Some(idx) => {
				let (nx, ny) = self.simulation.position(idx).unwrap_or_default();
				self.drag = DragState {
					active: true,
					node_idx: Some(idx),
					start_x: sx,
					start_y: sy,
					node_start_x: nx,
					node_start_y: ny,
					moved: false,
				};
				self.simulation.begin_drag(idx);
			}
			None => {
				self.pan = PanState {
					active: true,
					start_x: sx,
					start_y: sy,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
					moved: false,
				};
			}
		}
	}

	/// Pointer moved while pressed.
	pub fn move_pointer(&mut self, sx: f64, sy: f64) {
		if self.drag.active {
			let Some(idx) = self.drag.node_idx else {
				return;
			};
			let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
			if dx.hypot(dy) > CLICK_TOLERANCE {
				self.drag.moved = true;
			}
			if self.drag.moved {
				let k = self.transform.k;
				self.simulation.drag_to(
					idx,
					self.drag.node_start_x + dx / k,
					self.drag.node_start_y + dy / k,
				);
			}
		} else if self.pan.active {
			let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
			if dx.hypot(dy) > CLICK_TOLERANCE {
				self.pan.moved = true;
			}
			if self.pan.moved {
				self.transform.x = self.pan.transform_start_x + dx;
				self.transform.y = self.pan.transform_start_y + dy;
			}
		}
	}

	/// Pointer released: unpin any dragged node and classify the gesture.
	pub fn release(&mut self) -> Release {
		let outcome = if self.drag.active {
			match self.drag.node_idx {
				Some(idx) => {
					self.simulation.end_drag(idx);
					if self.drag.moved {
						Release::Dragged
					} else {
						Release::NodeClick(idx)
					}
				}
				None => Release::Idle,
			}
		} else if self.pan.active {
			if self.pan.moved {
				Release::Panned
			} else {
				Release::BackgroundClick
			}
		} else {
			Release::Idle
		};
		self.drag = DragState::default();
		self.pan = PanState::default();
		outcome
	}

	/// Pointer left the canvas: abandon gestures without producing clicks.
	pub fn cancel(&mut self) {
		if let Some(idx) = self.drag.node_idx.filter(|_| self.drag.active) {
			self.simulation.end_drag(idx);
		}
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hovered = None;
	}

	/// Zoom by `factor` keeping the screen point under the pointer fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = self.zoom.clamp(self.transform.k * factor);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Advance physics one step and ease opacities toward `highlight`.
	pub fn tick(&mut self, dt: f64, highlight: &Highlight) {
		self.simulation.tick();
		self.fade.tick(dt, highlight);
	}

	/// Follow a canvas resize: recenter and partially reheat.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.simulation.recenter(width / 2.0, height / 2.0);
	}

	/// Stop the simulation for good; the state is about to be discarded.
	pub fn teardown(&mut self) {
		self.simulation.stop();
	}
}
