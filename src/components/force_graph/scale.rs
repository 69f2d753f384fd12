//! Zoom-dependent scaling configuration for graph visuals.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: The coordinate system of the layout. Values in world-space
//!   scale proportionally with zoom (appear larger when zoomed in).
//! - **Screen-space**: Pixel coordinates on the canvas. Values in screen-space
//!   remain constant regardless of zoom level.
//!
//! # Scaling Behaviors
//!
//! - [`ScaleBehavior::World`]: Scales with zoom.
//! - [`ScaleBehavior::Screen`]: Constant screen size; divides by `k` to counteract
//!   the canvas transform.
//! - [`ScaleBehavior::Clamped`]: World-space scaling with min/max screen-size bounds.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped {
		/// Smallest on-screen size in pixels.
		min_screen: f64,
		/// Largest on-screen size in pixels.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// Compute the world-space value for a given base value and zoom level.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Alpha multiplier as a function of zoom.
#[derive(Clone, Debug)]
#[allow(
	dead_code,
	reason = "Constant is available for users customizing ScaleConfig"
)]
/// Alpha multiplier as a function of zoom.
pub enum AlphaBehavior {
	/// Always fully visible.
	Constant,
	/// Fully visible at `full_alpha_k`, invisible at `zero_alpha_k`.
	Fade {
		/// Zoom level at which alpha reaches zero.
		zero_alpha_k: f64,
		/// Zoom level from which alpha is one.
		full_alpha_k: f64,
	},
}

impl AlphaBehavior {
	/// Alpha at zoom level `k`, in `0.0..=1.0`.
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::Constant => 1.0,
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				((k - zero_alpha_k) / (full_alpha_k - zero_alpha_k)).clamp(0.0, 1.0)
			}
		}
	}
}

/// Configuration for node visual scaling.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Node circle radius in world units.
	pub radius: f64,
	/// How `radius` scales with zoom.
	pub radius_behavior: ScaleBehavior,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	/// How `hit_radius` scales with zoom.
	pub hit_behavior: ScaleBehavior,
	/// Outline width for unhighlighted nodes.
	pub border_width: f64,
	/// Outline width for the active node and attack path members.
	pub emphasis_width: f64,
	/// Glyph font size in world units.
	pub icon_size: f64,
}

/// Configuration for label scaling.
#[derive(Clone, Debug)]
pub struct LabelScaleConfig {
	/// Font size in world units.
	pub size: f64,
	/// How `size` scales with zoom.
	pub size_behavior: ScaleBehavior,
	/// Horizontal offset from the node center in world units.
	pub offset: f64,
	/// Labels fade out when zoomed far out.
	pub alpha_behavior: AlphaBehavior,
}

/// Configuration for link and arrowhead scaling.
#[derive(Clone, Debug)]
pub struct LinkScaleConfig {
	/// Stroke width in world units.
	pub line_width: f64,
	/// How `line_width` scales with zoom.
	pub line_behavior: ScaleBehavior,
	/// Arrowhead length for regular links.
	pub arrow_size: f64,
	/// Arrowhead size for attack path links.
	pub danger_arrow_size: f64,
	/// How arrowheads scale with zoom.
	pub arrow_behavior: ScaleBehavior,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Node circles and hit testing.
	pub node: NodeScaleConfig,
	/// Node labels.
	pub label: LabelScaleConfig,
	/// Links and arrowheads.
	pub link: LinkScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius: 18.0,
				radius_behavior: ScaleBehavior::World,
				hit_radius: 18.0,
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 6.0,
					max_screen: f64::INFINITY,
				},
				border_width: 2.0,
				emphasis_width: 4.0,
				icon_size: 12.0,
			},
			label: LabelScaleConfig {
				size: 13.0,
				size_behavior: ScaleBehavior::Clamped {
					min_screen: 0.0,
					max_screen: 26.0,
				},
				offset: 24.0,
				alpha_behavior: AlphaBehavior::Fade {
					zero_alpha_k: 0.2,
					full_alpha_k: 0.45,
				},
			},
			link: LinkScaleConfig {
				line_width: 1.8,
				line_behavior: ScaleBehavior::Clamped {
					min_screen: 0.5,
					max_screen: f64::INFINITY,
				},
				arrow_size: 9.0,
				danger_arrow_size: 11.0,
				arrow_behavior: ScaleBehavior::World,
			},
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
/// All sizes are in world-space (ready to use after canvas transform).
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Zoom factor these values were computed for.
	pub k: f64,
	/// Node circle radius.
	pub node_radius: f64,
	/// Hit test radius.
	pub hit_radius: f64,
	/// Outline width of regular nodes.
	pub border_width: f64,
	/// Outline width of emphasized nodes.
	pub emphasis_width: f64,
	/// Glyph font string (e.g., "12px sans-serif").
	pub icon_font: String,
	/// Label font string.
	pub label_font: String,
	/// Label distance from the node center.
	pub label_offset: f64,
	/// Label opacity multiplier.
	pub label_alpha: f64,
	/// Link stroke width.
	pub line_width: f64,
	/// Regular arrowhead length.
	pub arrow_size: f64,
	/// Attack path arrowhead length.
	pub danger_arrow_size: f64,
}

impl ScaledValues {
	/// Resolve every size in `config` for zoom level `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let node = &config.node;
		let label = &config.label;
		let link = &config.link;
		// Outlines keep a constant on-screen weight.
		let outline = ScaleBehavior::Screen;

		Self {
			k,
			node_radius: node.radius_behavior.apply(node.radius, k),
			hit_radius: node.hit_behavior.apply(node.hit_radius, k),
			border_width: outline.apply(node.border_width, k),
			emphasis_width: outline.apply(node.emphasis_width, k),
			icon_font: format!("{}px sans-serif", node.icon_size),
			label_font: format!(
				"500 {}px Inter, sans-serif",
				label.size_behavior.apply(label.size, k)
			),
			label_offset: label.offset,
			label_alpha: label.alpha_behavior.apply(k),
			line_width: link.line_behavior.apply(link.line_width, k),
			arrow_size: link.arrow_behavior.apply(link.arrow_size, k),
			danger_arrow_size: link.arrow_behavior.apply(link.danger_arrow_size, k),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_respects_screen_bounds() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 6.0,
			max_screen: 20.0,
		};
		// At k = 0.1, 18 world units are 1.8px on screen: clamp up to 6px.
		assert!((behavior.apply(18.0, 0.1) - 60.0).abs() < 1e-9);
		// At k = 4, 18 world units are 72px: clamp down to 20px.
		assert!((behavior.apply(18.0, 4.0) - 5.0).abs() < 1e-9);
		assert_eq!(behavior.apply(18.0, 1.0), 18.0);
	}

	#[test]
	fn screen_behavior_counteracts_zoom() {
		assert_eq!(ScaleBehavior::Screen.apply(2.0, 4.0), 0.5);
		assert_eq!(ScaleBehavior::World.apply(2.0, 4.0), 2.0);
	}

	#[test]
	fn labels_fade_when_zoomed_out() {
		let scaled = ScaledValues::new(&ScaleConfig::default(), 0.1);
		assert_eq!(scaled.label_alpha, 0.0);
		let scaled = ScaledValues::new(&ScaleConfig::default(), 1.0);
		assert_eq!(scaled.label_alpha, 1.0);
		assert_eq!(AlphaBehavior::Constant.apply(0.01), 1.0);
	}
}
