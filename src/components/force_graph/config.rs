//! Tunables for the layout engine and viewport.
//!
//! All structs deserialize with per-field defaults, so a partial JSON override
//! such as `{"layout": {"link_distance": 240}}` is valid.

use serde::Deserialize;

/// Force simulation parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Rest length of the link spring.
	pub link_distance: f64,
	/// Many-body strength; negative values repel.
	pub charge_strength: f64,
	/// Radius of each node's collision circle.
	pub collision_radius: f64,
	/// Radius scale of the initial phyllotaxis placement.
	pub initial_radius: f64,
	/// Alpha below which the simulation is considered at rest.
	pub alpha_min: f64,
	/// Fraction of the remaining distance to `alpha_target` covered per tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Alpha set when the viewport is resized.
	pub resize_alpha: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 180.0,
			charge_strength: -500.0,
			collision_radius: 80.0,
			initial_radius: 10.0,
			alpha_min,
			// Reaches alpha_min from 1.0 in ~300 ticks.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
			resize_alpha: 0.3,
		}
	}
}

/// Allowed zoom factor range.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoomBounds {
	/// Furthest zoom out.
	pub min: f64,
	/// Furthest zoom in.
	pub max: f64,
}

impl Default for ZoomBounds {
	fn default() -> Self {
		Self { min: 0.1, max: 4.0 }
	}
}

impl ZoomBounds {
	/// Clamp `k` into range. An inverted range collapses to `min`.
	pub fn clamp(&self, k: f64) -> f64 {
		k.clamp(self.min, self.max.max(self.min))
	}
}

/// Built-in visual themes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
	/// Dark slate background with glow and gradients.
	#[default]
	Slate,
	/// Flat light background, no effects.
	Minimal,
}

/// Viewer configuration, read from the `graph-config` script element.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Force layout tunables.
	pub layout: LayoutConfig,
	/// Zoom factor bounds.
	pub zoom: ZoomBounds,
	/// Visual theme.
	pub theme: ThemeName,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_documented_constants() {
		let config = GraphConfig::default();
		assert_eq!(config.layout.link_distance, 180.0);
		assert_eq!(config.layout.charge_strength, -500.0);
		assert_eq!(config.layout.collision_radius, 80.0);
		assert_eq!(config.layout.resize_alpha, 0.3);
		assert_eq!(config.zoom, ZoomBounds { min: 0.1, max: 4.0 });
		assert!((config.layout.alpha_decay - 0.0228).abs() < 1e-3);
	}

	#[test]
	fn partial_override_keeps_other_defaults() {
		let config: GraphConfig =
			serde_json::from_str(r#"{"layout": {"link_distance": 240}, "zoom": {"max": 8}}"#)
				.unwrap();
		assert_eq!(config.layout.link_distance, 240.0);
		assert_eq!(config.layout.charge_strength, -500.0);
		assert_eq!(config.zoom.min, 0.1);
		assert_eq!(config.zoom.max, 8.0);
		assert_eq!(config.theme, ThemeName::Slate);
	}

	#[test]
	fn theme_by_name() {
		let config: GraphConfig = serde_json::from_str(r#"{"theme": "minimal"}"#).unwrap();
		assert_eq!(config.theme, ThemeName::Minimal);
	}

	#[test]
	fn zoom_clamps_to_bounds() {
		let zoom = ZoomBounds::default();
		assert_eq!(zoom.clamp(0.01), 0.1);
		assert_eq!(zoom.clamp(9.0), 4.0);
		assert_eq!(zoom.clamp(1.5), 1.5);
	}
}
