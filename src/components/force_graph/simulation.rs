//! Iterative force layout.
//!
//! A velocity-based simulation in the style of d3-force. Every tick cools a global
//! `alpha` toward `alpha_target` and applies four forces in order:
//!
//! 1. link springs pulling endpoints toward `link_distance`
//! 2. pairwise many-body repulsion
//! 3. centering of the node cloud on the viewport center
//! 4. collision between node circles, on predicted positions
//!
//! Once alpha drops below `alpha_min` the simulation rests; dragging and resizing
//! reheat it. Pinned nodes (`fx`/`fy`) hold their coordinate and take no velocity.

use std::f64::consts::PI;

use super::config::LayoutConfig;

/// Position, velocity and optional pin of one node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimNode {
	/// Position x.
	pub x: f64,
	/// Position y.
	pub y: f64,
	/// Horizontal velocity, decayed every tick.
	pub vx: f64,
	/// Vertical velocity.
	pub vy: f64,
	/// Fixed x; overrides `x` while set.
	pub fx: Option<f64>,
	/// Fixed y; overrides `y` while set.
	pub fy: Option<f64>,
}

impl SimNode {
	/// Whether either coordinate is fixed.
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// Deterministic generator for the tiny offsets that break exact overlaps.
#[derive(Clone, Debug)]
struct Jiggle {
	state: u64,
}

impl Jiggle {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 1 << 32;

	fn new() -> Self {
		Self { state: 1 }
	}

	fn offset(&mut self) -> f64 {
		self.state = (Self::A * self.state + Self::C) % Self::M;
		(self.state as f64 / Self::M as f64 - 0.5) * 1e-6
	}
}

/// Force layout over a fixed set of nodes and links.
///
/// Nodes are addressed by index, matching `GraphModel::nodes`.
pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<(usize, usize)>,
	link_strength: Vec<f64>,
	link_bias: Vec<f64>,
	config: LayoutConfig,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	/// Ticking; false once at rest.
	active: bool,
	stopped: bool,
	jiggle: Jiggle,
}

impl Simulation {
	/// Lay out `node_count` nodes connected by `links` (pairs of node indices)
	/// around `center`. Self-loops and out-of-range pairs exert no force.
	pub fn new(
		node_count: usize,
		links: &[(usize, usize)],
		config: LayoutConfig,
		center: (f64, f64),
	) -> Self {
		let initial_angle = PI * (3.0 - 5f64.sqrt());
		let nodes: Vec<SimNode> = (0..node_count)
			.map(|i| {
				let radius = config.initial_radius * (0.5 + i as f64).sqrt();
				let angle = i as f64 * initial_angle;
				SimNode {
					x: center.0 + radius * angle.cos(),
					y: center.1 + radius * angle.sin(),
					..SimNode::default()
				}
			})
			.collect();

		let links: Vec<(usize, usize)> = links
			.iter()
			.copied()
			.filter(|&(s, t)| s != t && s < node_count && t < node_count)
			.collect();

		let mut degree = vec![0usize; node_count];
		for &(s, t) in &links {
			degree[s] += 1;
			degree[t] += 1;
		}
		let link_strength = links
			.iter()
			.map(|&(s, t)| 1.0 / degree[s].min(degree[t]) as f64)
			.collect();
		let link_bias = links
			.iter()
			.map(|&(s, t)| degree[s] as f64 / (degree[s] + degree[t]) as f64)
			.collect();

		Self {
			active: node_count > 0,
			nodes,
			links,
			link_strength,
			link_bias,
			config,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			stopped: false,
			jiggle: Jiggle::new(),
		}
	}

	/// All nodes, indexed like the model.
	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	/// Current position of node `idx`.
	pub fn position(&self, idx: usize) -> Option<(f64, f64)> {
		self.nodes.get(idx).map(|n| (n.x, n.y))
	}

	/// Current temperature; forces scale with it.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Temperature alpha settles toward; raised while dragging.
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Point the centering force pulls toward.
	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	/// Whether the next `tick` will move anything.
	pub fn is_running(&self) -> bool {
		self.active
	}

	/// Advance one step. Returns `false` without touching positions when the
	/// simulation is resting, stopped or empty.
	pub fn tick(&mut self) -> bool {
		if !self.active {
			return false;
		}

		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.apply_collision();

		let keep = 1.0 - self.config.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}

		if self.alpha < self.config.alpha_min {
			self.active = false;
		}
		true
	}

	/// Resume ticking unless torn down or empty.
	pub fn restart(&mut self) {
		if !self.stopped && !self.nodes.is_empty() {
			self.active = true;
		}
	}

	/// Set alpha directly and resume.
	pub fn reheat(&mut self, alpha: f64) {
		self.alpha = alpha;
		self.restart();
	}

	/// Permanently halt; used when the working copy is discarded.
	pub fn stop(&mut self) {
		self.stopped = true;
		self.active = false;
	}

	/// Fix node `idx` at `(x, y)`.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = Some(x);
			node.fy = Some(y);
		}
	}

	/// Release the pin on `idx`.
	pub fn unpin(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = None;
			node.fy = None;
		}
	}

	/// Pin `idx` where it currently is and keep the simulation warm while the
	/// gesture lasts so neighbors react to the motion.
	pub fn begin_drag(&mut self, idx: usize) {
		let Some((x, y)) = self.position(idx) else {
			return;
		};
		self.alpha_target = self.config.drag_alpha_target;
		self.restart();
		self.pin(idx, x, y);
	}

	/// Move the pinned node `idx` to `(x, y)`.
	pub fn drag_to(&mut self, idx: usize, x: f64, y: f64) {
		self.pin(idx, x, y);
	}

	/// Release the pin and let the simulation cool down again.
	pub fn end_drag(&mut self, idx: usize) {
		self.alpha_target = 0.0;
		self.unpin(idx);
	}

	/// Move the centering target and partially reheat, preserving the layout.
	pub fn recenter(&mut self, cx: f64, cy: f64) {
		self.center = (cx, cy);
		self.reheat(self.config.resize_alpha);
	}

	fn apply_links(&mut self) {
		let alpha = self.alpha;
		let distance = self.config.link_distance;
		for i in 0..self.links.len() {
			let (s, t) = self.links[i];
			let (src, tgt) = (&self.nodes[s], &self.nodes[t]);
			let mut dx = tgt.x + tgt.vx - src.x - src.vx;
			let mut dy = tgt.y + tgt.vy - src.y - src.vy;
			if dx == 0.0 {
				dx = self.jiggle.offset();
			}
			if dy == 0.0 {
				dy = self.jiggle.offset();
			}
			let len = (dx * dx + dy * dy).sqrt();
			let k = (len - distance) / len * alpha * self.link_strength[i];
			dx *= k;
			dy *= k;

			let bias = self.link_bias[i];
			let tgt = &mut self.nodes[t];
			tgt.vx -= dx * bias;
			tgt.vy -= dy * bias;
			let src = &mut self.nodes[s];
			src.vx += dx * (1.0 - bias);
			src.vy += dy * (1.0 - bias);
		}
	}

	fn apply_charge(&mut self) {
		let weight = self.config.charge_strength * self.alpha;
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let mut dx = self.nodes[j].x - self.nodes[i].x;
				let mut dy = self.nodes[j].y - self.nodes[i].y;
				let mut dist2 = dx * dx + dy * dy;
				if dx == 0.0 {
					dx = self.jiggle.offset();
					dist2 += dx * dx;
				}
				if dy == 0.0 {
					dy = self.jiggle.offset();
					dist2 += dy * dy;
				}
				// Soften the singularity below unit distance.
				if dist2 < 1.0 {
					dist2 = dist2.sqrt();
				}
				let (fx, fy) = (dx * weight / dist2, dy * weight / dist2);
				self.nodes[i].vx += fx;
				self.nodes[i].vy += fy;
				self.nodes[j].vx -= fx;
				self.nodes[j].vy -= fy;
			}
		}
	}

	fn apply_center(&mut self) {
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (shift_x, shift_y) = (sx / n - self.center.0, sy / n - self.center.1);
		for node in &mut self.nodes {
			node.x -= shift_x;
			node.y -= shift_y;
		}
	}

	fn apply_collision(&mut self) {
		let radius = self.config.collision_radius;
		let reach = radius * 2.0;
		// Equal radii split every correction evenly.
		let share = 0.5;
		let n = self.nodes.len();
		for i in 0..n {
			let (xi, yi) = {
				let node = &self.nodes[i];
				(node.x + node.vx, node.y + node.vy)
			};
			for j in (i + 1)..n {
				let other = &self.nodes[j];
				let mut dx = xi - other.x - other.vx;
				let mut dy = yi - other.y - other.vy;
				let mut dist2 = dx * dx + dy * dy;
				if dist2 >= reach * reach {
					continue;
				}
				if dx == 0.0 {
					dx = self.jiggle.offset();
					dist2 += dx * dx;
				}
				if dy == 0.0 {
					dy = self.jiggle.offset();
					dist2 += dy * dy;
				}
				let dist = dist2.sqrt();
				let k = (reach - dist) / dist;
				dx *= k;
				dy *= k;
				self.nodes[i].vx += dx * share;
				self.nodes[i].vy += dy * share;
				self.nodes[j].vx -= dx * (1.0 - share);
				self.nodes[j].vy -= dy * (1.0 - share);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const CENTER: (f64, f64) = (400.0, 300.0);

	fn sim(count: usize, links: &[(usize, usize)]) -> Simulation {
		Simulation::new(count, links, LayoutConfig::default(), CENTER)
	}

	fn settle(sim: &mut Simulation) -> usize {
		let mut ticks = 0;
		while sim.tick() {
			ticks += 1;
			assert!(ticks < 10_000, "simulation never came to rest");
		}
		ticks
	}

	fn distance(sim: &Simulation, a: usize, b: usize) -> f64 {
		let (ax, ay) = sim.position(a).unwrap();
		let (bx, by) = sim.position(b).unwrap();
		((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
	}

	#[test]
	fn jiggle_offsets_are_tiny_and_repeatable() {
		let (mut a, mut b) = (Jiggle::new(), Jiggle::new());
		for _ in 0..64 {
			let offset = a.offset();
			assert!(offset.abs() <= 0.5e-6);
			assert_eq!(offset, b.offset());
		}
	}

	#[test]
	fn empty_graph_never_starts() {
		let mut sim = sim(0, &[]);
		assert!(!sim.is_running());
		assert!(!sim.tick());
		sim.reheat(1.0);
		assert!(!sim.is_running());
	}

	#[test]
	fn cools_to_rest() {
		let mut sim = sim(4, &[(0, 1), (1, 2), (2, 3)]);
		let ticks = settle(&mut sim);
		assert!((250..400).contains(&ticks), "took {ticks} ticks");
		assert!(sim.alpha() < LayoutConfig::default().alpha_min);
		assert!(!sim.tick());
	}

	#[test]
	fn positions_stay_finite_with_degenerate_links() {
		let mut sim = sim(3, &[(0, 0), (0, 1), (0, 1), (1, 7)]);
		settle(&mut sim);
		for node in sim.nodes() {
			assert!(node.x.is_finite() && node.y.is_finite());
		}
	}

	#[test]
	fn layout_is_centered() {
		let mut sim = sim(5, &[(0, 1), (0, 2), (3, 4)]);
		settle(&mut sim);
		let n = sim.nodes().len() as f64;
		let mx = sim.nodes().iter().map(|p| p.x).sum::<f64>() / n;
		let my = sim.nodes().iter().map(|p| p.y).sum::<f64>() / n;
		assert!((mx - CENTER.0).abs() < 1.0, "mean x {mx}");
		assert!((my - CENTER.1).abs() < 1.0, "mean y {my}");
	}

	#[test]
	fn collision_keeps_nodes_apart() {
		let mut sim = sim(2, &[(0, 1)]);
		assert!(distance(&sim, 0, 1) < 20.0);
		settle(&mut sim);
		assert!(distance(&sim, 0, 1) > 150.0, "got {}", distance(&sim, 0, 1));
	}

	#[test]
	fn pinned_node_holds_its_coordinate() {
		let mut sim = sim(3, &[(0, 1), (1, 2)]);
		sim.pin(1, 10.0, -20.0);
		for _ in 0..50 {
			sim.tick();
		}
		assert_eq!(sim.position(1), Some((10.0, -20.0)));
		assert_eq!(sim.nodes()[1].vx, 0.0);
	}

	#[test]
	fn drag_cycle_unpins_and_cools() {
		let mut sim = sim(3, &[(0, 1), (1, 2)]);
		settle(&mut sim);
		assert!(!sim.is_running());

		sim.begin_drag(2);
		assert!(sim.is_running());
		assert!(sim.nodes()[2].is_pinned());
		assert_eq!(sim.alpha_target(), 0.3);

		sim.end_drag(2);
		assert!(!sim.nodes()[2].is_pinned());
		assert_eq!(sim.alpha_target(), 0.0);
		settle(&mut sim);
	}

	#[test]
	fn drag_keeps_simulation_warm() {
		let mut sim = sim(3, &[(0, 1), (1, 2)]);
		sim.begin_drag(0);
		for step in 0..600 {
			sim.drag_to(0, 100.0 + step as f64, 100.0);
			assert!(sim.tick());
		}
		assert!((sim.alpha() - 0.3).abs() < 0.01);
		assert_eq!(sim.position(0), Some((699.0, 100.0)));
	}

	#[test]
	fn resize_partially_reheats_around_new_center() {
		let mut sim = sim(4, &[(0, 1), (2, 3)]);
		settle(&mut sim);
		sim.recenter(800.0, 600.0);
		assert!(sim.is_running());
		assert_eq!(sim.alpha(), 0.3);
		assert_eq!(sim.center(), (800.0, 600.0));
		settle(&mut sim);
		let mx = sim.nodes().iter().map(|p| p.x).sum::<f64>() / 4.0;
		assert!((mx - 800.0).abs() < 1.0);
	}

	#[test]
	fn stopped_simulation_ignores_reheat() {
		let mut sim = sim(2, &[(0, 1)]);
		sim.stop();
		sim.reheat(1.0);
		sim.begin_drag(0);
		assert!(!sim.tick());
	}
}
