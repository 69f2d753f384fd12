//! Leptos components wrapping the flow graph canvas.
//!
//! [`ForceGraphCanvas`] creates an HTML canvas element and wires up mouse/wheel
//! event handlers for hovering, selecting, node dragging, panning, and zooming.
//! An animation loop runs via `requestAnimationFrame`, advancing the layout and
//! fading highlights each frame before redrawing.
//!
//! [`FlowGraph`] owns the reactive graph: the derived model, the interaction
//! signal and the focus memo, and lays the panels over the canvas.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::GraphConfig;
use super::interaction::{Focus, Interaction, InteractionEvent};
use super::model::GraphModel;
use super::panels::{DetailPanel, FindingsPanel, FindingsReport, Legend, SummaryPanel};
use super::render;
use super::scale::ScaleConfig;
use super::state::{ForceGraphState, Release};
use super::theme::Theme;
use super::types::GraphData;

/// Longest frame step fed to the fades; covers tabs returning from background.
const MAX_FRAME_DT: f64 = 0.1;

/// Bundles view state with visual configuration and the liveness flag of the
/// animation loop that owns it.
struct GraphContext {
	state: ForceGraphState,
	scale: ScaleConfig,
	theme: Theme,
	alive: Arc<AtomicBool>,
}

type Slot<T> = Rc<RefCell<Option<T>>>;

fn viewport_size(
	window: &Window,
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	let dim = |value: Result<JsValue, JsValue>, fallback: f64| {
		value.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	if fullscreen {
		return (dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0));
	}
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| parent.as_ref().map_or(800.0, |p| p.client_width() as f64)),
		height.unwrap_or_else(|| parent.as_ref().map_or(600.0, |p| p.client_height() as f64)),
	)
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders the interactive flow graph on a canvas element.
///
/// The canvas restarts its layout whenever `model` changes; `focus` is read once
/// per frame without tracking. Pointer input is written to `interaction`.
#[component]
pub fn ForceGraphCanvas(
	/// Graph to lay out; a new value restarts the layout.
	model: Memo<Arc<GraphModel>>,
	/// Written on hover and click.
	interaction: RwSignal<Interaction>,
	/// Highlight targets for the current interaction.
	focus: Memo<Focus>,
	/// Layout, zoom and theme settings.
	#[prop(optional)]
	config: GraphConfig,
	/// Size the canvas to the window instead of its parent.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed width; defaults to the parent's width.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed height; defaults to the parent's height.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Slot<GraphContext> = Rc::new(RefCell::new(None));
	let context_init = context.clone();

	Effect::new(move |_| {
		let model = model.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		// Stale ids from the previous payload must not survive a reload.
		interaction.set(Interaction::default());

		if let Some(mut previous) = context_init.borrow_mut().take() {
			previous.state.teardown();
		}

		let (w, h) = viewport_size(&window, &canvas, fullscreen, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		if model.is_empty() {
			info!("flowcode-graph: empty graph, layout not started");
			return;
		}

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("flowcode-graph: canvas 2d context unavailable");
			return;
		};

		let alive = Arc::new(AtomicBool::new(true));
		on_cleanup({
			let alive = alive.clone();
			move || alive.store(false, Ordering::Relaxed)
		});

		info!(
			"flowcode-graph: starting layout for {} nodes, {} links",
			model.nodes.len(),
			model.links.len()
		);
		*context_init.borrow_mut() = Some(GraphContext {
			state: ForceGraphState::new(model, w, h, &config),
			scale: ScaleConfig::default(),
			theme: Theme::from(config.theme),
			alive: alive.clone(),
		});

		let resize_cb: Slot<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
		{
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = viewport_size(&win, &canvas_resize, fullscreen, width, height);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
		}
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let animate: Slot<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
		let (context_anim, animate_inner) = (context_init.clone(), animate.clone());
		let mut last_frame = js_sys::Date::now();
		*animate.borrow_mut() = Some(Closure::new(move || {
			if !alive.load(Ordering::Relaxed) {
				let mut slot = context_anim.borrow_mut();
				// A reload may already have swapped in the next payload's context.
				if slot.as_ref().is_some_and(|c| Arc::ptr_eq(&c.alive, &alive)) {
					if let Some(mut c) = slot.take() {
						c.state.teardown();
					}
				}
				if let (Some(win), Some(cb)) = (web_sys::window(), resize_cb.borrow_mut().take()) {
					let _ = win
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				debug!("flowcode-graph: animation loop stopped");
				drop(animate_inner.borrow_mut().take());
				return;
			}

			let now = js_sys::Date::now();
			let dt = ((now - last_frame) / 1000.0).clamp(0.0, MAX_FRAME_DT);
			last_frame = now;

			if let Some(ref mut c) = *context_anim.borrow_mut() {
				focus.with_untracked(|focus| {
					c.state.tick(dt, &focus.highlight);
					render::render(&c.state, &ctx, focus, &c.scale, &c.theme);
				});
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.press(x, y, &c.scale);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		let hovered = {
			let mut slot = context_mm.borrow_mut();
			let Some(c) = slot.as_mut() else {
				return;
			};
			c.state.move_pointer(x, y);
			c.state
				.hover_target(x, y, &c.scale)
				.and_then(|idx| c.state.model.nodes.get(idx))
				.map(|node| node.id.clone())
		};
		// Signal writes happen after the borrow ends; subscribers may re-enter.
		interaction.maybe_update(|i| {
			i.apply(match hovered {
				Some(id) => InteractionEvent::PointerEnter(id),
				None => InteractionEvent::PointerLeave,
			})
		});
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		let event = {
			let mut slot = context_mu.borrow_mut();
			let Some(c) = slot.as_mut() else {
				return;
			};
			match c.state.release() {
				Release::NodeClick(idx) => c
					.state
					.model
					.nodes
					.get(idx)
					.map(|node| InteractionEvent::Click(node.id.clone())),
				Release::BackgroundClick => Some(InteractionEvent::BackgroundClick),
				Release::Dragged | Release::Panned | Release::Idle => None,
			}
		};
		if let Some(event) = event {
			interaction.maybe_update(|i| i.apply(event));
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.cancel();
		}
		interaction.maybe_update(|i| i.apply(InteractionEvent::PointerLeave));
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.state.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

/// Flow graph with its detail, findings, report, legend and summary overlays.
///
/// Pass the analysis payload via the reactive `data` signal. The model is
/// rebuilt when the payload changes; hover and selection reset with it.
#[component]
pub fn FlowGraph(
	/// Analysis payload.
	#[prop(into)]
	data: Signal<GraphData>,
	/// Layout, zoom and theme settings.
	#[prop(optional)]
	config: GraphConfig,
	/// Fill the window.
	#[prop(default = false)]
	fullscreen: bool,
) -> impl IntoView {
	let model = Memo::new(move |_| data.with(|data| Arc::new(GraphModel::new(data))));
	let interaction = RwSignal::new(Interaction::default());
	let focus = Memo::new(move |_| {
		model.with(|model| interaction.with(|interaction| Focus::derive(model, interaction)))
	});
	let is_empty = move || model.with(|model| model.is_empty());

	view! {
		<div class="flow-graph">
			<ForceGraphCanvas
				model=model
				interaction=interaction
				focus=focus
				config=config
				fullscreen=fullscreen
			/>
			<Show when=is_empty>
				<div class="graph-empty">"No nodes to display."</div>
			</Show>
			<SummaryPanel model=model />
			<DetailPanel model=model focus=focus />
			<FindingsPanel model=model focus=focus />
			<FindingsReport model=model />
			<Legend />
		</div>
	}
}
