//! Canvas rendering for the force graph.
//!
//! Handles all drawing operations: background, curved links with arrowheads,
//! nodes with type glyphs, and labels. Rendering uses multiple passes for
//! correct z-ordering:
//! 1. Background (screen space)
//! 2. Links, then arrowheads (world space)
//! 3. Dimmed nodes, then full-opacity nodes on top
//! 4. Vignette (screen space)

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::geometry::LinkArc;
use super::interaction::{Focus, LinkHighlight, Marker, NodeHighlight, NodeStroke};
use super::scale::{ScaleConfig, ScaledValues};
use super::state::ForceGraphState;
use super::theme::{Color, Theme, type_style};

/// Elements fainter than this are skipped entirely.
const MIN_VISIBLE_ALPHA: f64 = 0.01;

/// Renders the complete graph to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	focus: &Focus,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(scale.k, scale.k);

	draw_links(state, ctx, focus, &scale, theme);
	draw_nodes(state, ctx, focus, &scale, theme);

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(state, ctx, theme);
	}
}

fn draw_background(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let gradient = theme
		.background
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, state.width.max(state.height) * 0.8)
				.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_vignette(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	let Ok(gradient) = ctx.create_radial_gradient(
		cx,
		cy,
		state.width.min(state.height) * 0.3,
		cx,
		cy,
		state.width.max(state.height) * 0.7,
	) else {
		return;
	};

	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(
		1.0,
		&Color::rgba(0, 0, 0, theme.background.vignette).to_css(),
	);

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_links(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	focus: &Focus,
	scale: &ScaledValues,
	theme: &Theme,
) {
	// Danger links last so they stay on top of dimmed ones.
	let (danger, plain): (Vec<_>, Vec<_>) = (0..state.model.edges.len())
		.partition(|&idx| link_highlight(focus, idx).marker == Marker::Danger);

	for idx in plain.into_iter().chain(danger) {
		let (src, tgt) = state.model.edges[idx];
		let (Some((x1, y1)), Some((x2, y2))) =
			(state.simulation.position(src), state.simulation.position(tgt))
		else {
			continue;
		};
		let alpha = state.fade.link(idx);
		if alpha < MIN_VISIBLE_ALPHA {
			continue;
		}
		draw_link(ctx, scale, theme, link_highlight(focus, idx), alpha, (x1, y1), (x2, y2));
	}
}

fn link_highlight(focus: &Focus, idx: usize) -> LinkHighlight {
	focus.highlight.links.get(idx).copied().unwrap_or_default()
}

fn draw_link(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	highlight: LinkHighlight,
	alpha: f64,
	(x1, y1): (f64, f64),
	(x2, y2): (f64, f64),
) {
	let arc = LinkArc::between(x1, y1, x2, y2);
	let (arrow_size, marker_color) = match highlight.marker {
		Marker::Default => (scale.arrow_size, theme.link.marker_color),
		Marker::Danger => (scale.danger_arrow_size, theme.link.danger_color),
	};

	// Nodes closer than their radii: nothing visible between them.
	let start = arc.trimmed_start(scale.node_radius);
	let tip = arc.trimmed_end(scale.node_radius);
	if tip <= start {
		return;
	}
	let shaft_end = arc.trimmed_end(scale.node_radius + arrow_size).max(start);

	ctx.set_global_alpha(alpha);

	ctx.begin_path();
	let _ = ctx.arc(arc.cx, arc.cy, arc.radius, start, shaft_end);
	ctx.set_stroke_style_str(&theme.link.stroke_color(highlight.stroke).to_css());
	ctx.set_line_width(scale.line_width);
	ctx.stroke();

	let (tip_x, tip_y) = arc.point_at(tip);
	let (ux, uy) = arc.tangent_at(tip);
	let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
	let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);

	ctx.set_fill_style_str(&marker_color.to_css());
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();

	ctx.set_global_alpha(1.0);
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	focus: &Focus,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let highlight = |idx: usize| focus.highlight.nodes.get(idx).copied().unwrap_or_default();

	let (dimmed, lit): (Vec<_>, Vec<_>) =
		(0..state.model.nodes.len()).partition(|&idx| highlight(idx).opacity < 1.0);

	// Lit nodes drawn last so they sit on top
	for idx in dimmed.into_iter().chain(lit) {
		draw_node(state, ctx, scale, theme, idx, highlight(idx));
	}
}

fn draw_node(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	idx: usize,
	highlight: NodeHighlight,
) {
	let (Some(node), Some((x, y))) = (state.model.nodes.get(idx), state.simulation.position(idx))
	else {
		return;
	};
	let alpha = state.fade.node(idx);
	if alpha < MIN_VISIBLE_ALPHA {
		return;
	}

	let style = type_style(node.kind);
	let radius = scale.node_radius;

	ctx.set_global_alpha(alpha);

	// Glow behind the fill
	let (glow_color, glow_blur) = match highlight.stroke {
		NodeStroke::Default => (Color::rgba(0, 0, 0, 0.5), 5.0),
		NodeStroke::Active => (style.color, theme.node.active_glow),
		NodeStroke::Danger => (theme.node.danger_color, theme.node.danger_glow),
	};
	if glow_blur > 0.0 {
		ctx.set_shadow_color(&glow_color.to_css());
		// Shadow blur is in screen pixels, unaffected by the canvas transform.
		ctx.set_shadow_blur(glow_blur);
	}

	let gradient = theme
		.node
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
				.ok()
		})
		.flatten();

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, TAU);
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &style.color.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &style.color.to_css());
			let _ = gradient.add_color_stop(1.0, &style.color.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&style.color.to_css()),
	}
	ctx.fill();

	ctx.set_shadow_blur(0.0);
	ctx.set_shadow_color("rgba(0, 0, 0, 0)");

	ctx.set_stroke_style_str(&theme.node.border_color(highlight.stroke).to_css());
	ctx.set_line_width(match highlight.stroke {
		NodeStroke::Default => scale.border_width,
		NodeStroke::Active | NodeStroke::Danger => scale.emphasis_width,
	});
	ctx.stroke();

	ctx.set_fill_style_str(&theme.node.icon_color.to_css());
	ctx.set_font(&scale.icon_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(style.glyph, x, y);

	let label_alpha = alpha * scale.label_alpha;
	if label_alpha > MIN_VISIBLE_ALPHA {
		ctx.set_global_alpha(label_alpha);
		ctx.set_fill_style_str(&theme.node.label_color.to_css());
		ctx.set_font(&scale.label_font);
		ctx.set_text_align("left");
		let _ = ctx.fill_text(&node.display_label(), x + scale.label_offset, y);
	}

	ctx.set_global_alpha(1.0);
}
