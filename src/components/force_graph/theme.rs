//! Visual theming for the force graph.
//!
//! Provides the static type → color/icon table, the highlight colors and the
//! background/link/node style configuration.

use super::config::ThemeName;
use super::interaction::{LinkStroke, NodeStroke};
use super::types::NodeType;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity, 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with opacity `a`.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Hex for opaque colors, `rgba()` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Legend entry for one node type.
#[derive(Clone, Copy, Debug)]
pub struct TypeStyle {
	/// Type the style applies to.
	pub kind: NodeType,
	/// Fill color on the canvas and in the legend.
	pub color: Color,
	/// Font Awesome class used by the HTML panels.
	pub icon: &'static str,
	/// Glyph drawn on the canvas node.
	pub glyph: &'static str,
}

/// Node type styles in legend order.
pub static TYPE_STYLES: [TypeStyle; 8] = [
	TypeStyle {
		kind: NodeType::Function,
		color: Color::rgb(0x60, 0xa5, 0xfa),
		icon: "fa-code",
		glyph: "ƒ",
	},
	TypeStyle {
		kind: NodeType::Variable,
		color: Color::rgb(0x4a, 0xde, 0x80),
		icon: "fa-cube",
		glyph: "x",
	},
	TypeStyle {
		kind: NodeType::Dom,
		color: Color::rgb(0xfb, 0x92, 0x3c),
		icon: "fa-desktop",
		glyph: "◻",
	},
	TypeStyle {
		kind: NodeType::Event,
		color: Color::rgb(0xf4, 0x72, 0xb6),
		icon: "fa-bolt",
		glyph: "⚡",
	},
	TypeStyle {
		kind: NodeType::Api,
		color: Color::rgb(0xa8, 0x55, 0xf7),
		icon: "fa-server",
		glyph: "⇄",
	},
	TypeStyle {
		kind: NodeType::Input,
		color: Color::rgb(0xea, 0xb3, 0x08),
		icon: "fa-keyboard",
		glyph: "⌨",
	},
	TypeStyle {
		kind: NodeType::Sink,
		color: Color::rgb(0xef, 0x44, 0x44),
		icon: "fa-skull-crossbones",
		glyph: "☠",
	},
	TypeStyle {
		kind: NodeType::Sanitizer,
		color: Color::rgb(0x10, 0xb9, 0x81),
		icon: "fa-broom",
		glyph: "✓",
	},
];

/// Style for types outside the table.
pub static FALLBACK_STYLE: TypeStyle = TypeStyle {
	kind: NodeType::Other,
	color: Color::rgb(0xff, 0xff, 0xff),
	icon: "fa-circle",
	glyph: "•",
};

/// Style for `kind`; unknown types get a white dot.
pub fn type_style(kind: NodeType) -> &'static TypeStyle {
	TYPE_STYLES
		.iter()
		.find(|style| style.kind == kind)
		.unwrap_or(&FALLBACK_STYLE)
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Link colors per highlight treatment.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	/// Regular link color.
	pub color: Color,
	/// Links touching the active node.
	pub adjacent_color: Color,
	/// Attack path links.
	pub danger_color: Color,
	/// Regular arrowhead fill.
	pub marker_color: Color,
}

impl LinkStyle {
	/// Color for a link drawn with `stroke`.
	pub fn stroke_color(&self, stroke: LinkStroke) -> Color {
		match stroke {
			LinkStroke::Default => self.color,
			LinkStroke::Adjacent => self.adjacent_color,
			LinkStroke::Danger => self.danger_color,
		}
	}
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Outline of regular nodes.
	pub border_color: Color,
	/// Outline of the active node.
	pub active_border_color: Color,
	/// Outline and glow of attack path members.
	pub danger_color: Color,
	/// Glyph color drawn over the node fill
	pub icon_color: Color,
	/// Label text color.
	pub label_color: Color,
	/// Blur radius of the glow around the active node / path members
	pub active_glow: f64,
	/// Glow blur for attack path members.
	pub danger_glow: f64,
}

impl NodeStyle {
	/// Outline color for `stroke`.
	pub fn border_color(&self, stroke: NodeStroke) -> Color {
		match stroke {
			NodeStroke::Default => self.border_color,
			NodeStroke::Active => self.active_border_color,
			NodeStroke::Danger => self.danger_color,
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Theme identifier.
	pub name: &'static str,
	/// Canvas background.
	pub background: BackgroundStyle,
	/// Link colors.
	pub link: LinkStyle,
	/// Node colors and effects.
	pub node: NodeStyle,
}

impl Theme {
	/// Dark slate theme with red danger accents (default)
	pub fn slate() -> Self {
		Self {
			name: "slate",
			background: BackgroundStyle {
				color: Color::rgb(2, 6, 23),
				color_secondary: Color::rgb(15, 23, 42),
				use_gradient: true,
				vignette: 0.15,
			},
			link: LinkStyle {
				color: Color::rgb(0x33, 0x41, 0x55),
				adjacent_color: Color::rgb(0x94, 0xa3, 0xb8),
				danger_color: Color::rgb(0xef, 0x44, 0x44),
				marker_color: Color::rgb(0x64, 0x74, 0x8b),
			},
			node: NodeStyle {
				use_gradient: true,
				border_color: Color::rgb(0x0f, 0x17, 0x2a),
				active_border_color: Color::rgb(255, 255, 255),
				danger_color: Color::rgb(0xef, 0x44, 0x44),
				icon_color: Color::rgb(0x0f, 0x17, 0x2a),
				label_color: Color::rgb(0xf1, 0xf5, 0xf9),
				active_glow: 15.0,
				danger_glow: 10.0,
			},
		}
	}

	/// Flat variant without gradients or vignette
	pub fn minimal() -> Self {
		let mut theme = Self::slate();
		theme.name = "minimal";
		theme.background.use_gradient = false;
		theme.background.vignette = 0.0;
		theme.node.use_gradient = false;
		theme.node.active_glow = 0.0;
		theme.node.danger_glow = 0.0;
		theme
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::slate()
	}
}

impl From<ThemeName> for Theme {
	fn from(name: ThemeName) -> Self {
		match name {
			ThemeName::Slate => Self::slate(),
			ThemeName::Minimal => Self::minimal(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_known_type_has_a_style() {
		for kind in NodeType::ALL {
			assert_eq!(type_style(kind).kind, kind);
		}
		assert_eq!(type_style(NodeType::Other).color, Color::rgb(255, 255, 255));
	}

	#[test]
	fn sink_is_red() {
		assert_eq!(type_style(NodeType::Sink).color.to_css(), "#ef4444");
	}

	#[test]
	fn css_includes_alpha_only_when_translucent() {
		assert_eq!(Color::rgb(1, 2, 3).to_css(), "#010203");
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}

	#[test]
	fn minimal_theme_drops_effects() {
		let theme = Theme::from(ThemeName::Minimal);
		assert_eq!(theme.name, "minimal");
		assert!(!theme.background.use_gradient);
		assert!(!theme.node.use_gradient);
	}
}
