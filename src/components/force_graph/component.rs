use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, ResizeObserver, ResizeObserverEntry,
	WheelEvent,
};

use super::state::{Click, ForceGraphState};
use super::types::{Edge, Node, NodeType};

type SharedState = Rc<RefCell<Option<ForceGraphState>>>;
type SharedClosure<T> = Rc<RefCell<Option<Closure<T>>>>;

const FRAME_DT: f32 = 0.016;

/// Pointer position relative to the canvas.
fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn set_cursor(canvas_ref: NodeRef<leptos::html::Canvas>, cursor: &str) {
	if let Some(canvas) = canvas_ref.get_untracked() {
		let canvas: HtmlCanvasElement = canvas.into();
		let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
	}
}

/// Interactive knowledge-graph canvas.
///
/// `selected_node_id` is owned by the caller; clicks are reported back
/// through `on_node_select` and `on_background_click`.
#[component]
pub fn ForceGraphCanvas(
	/// Raw node records.
	#[prop(into)]
	nodes: Signal<Arc<Vec<Node>>>,
	/// Raw edge records; edges with unknown endpoints are skipped.
	#[prop(into)]
	edges: Signal<Arc<Vec<Edge>>>,
	/// Currently selected node, owned by the caller.
	#[prop(into)]
	selected_node_id: Signal<Option<String>>,
	/// Called with the id of a clicked node.
	#[prop(into)]
	on_node_select: Callback<String>,
	/// Called when the empty canvas is clicked.
	#[prop(optional, into)]
	on_background_click: Option<Callback<()>>,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: SharedClosure<dyn FnMut()> = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure<dyn FnMut(js_sys::Array)> = Rc::new(RefCell::new(None));
	let counts = RwSignal::new((0usize, 0usize));

	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let (Some(container), Some(canvas)) = (container_ref.get(), canvas_ref.get()) else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(mut ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("Canvas 2d context unavailable");
			return;
		};

		let (w, h) = (container.client_width() as f64, container.client_height() as f64);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let mut s = ForceGraphState::new(nodes.get_untracked(), edges.get_untracked(), w, h);
		s.select(selected_node_id.get_untracked());
		counts.set((s.graph().nodes.len(), s.graph().edges.len()));
		*state_init.borrow_mut() = Some(s);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move |entries: js_sys::Array| {
			for entry in entries.iter() {
				let rect = entry.unchecked_into::<ResizeObserverEntry>().content_rect();
				let (nw, nh) = (rect.width(), rect.height());
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}
		}));
		let observer = resize_cb_init
			.borrow()
			.as_ref()
			.and_then(|cb| ResizeObserver::new(cb.as_ref().unchecked_ref()).ok());
		if let Some(ref observer) = observer {
			observer.observe(&container);
		}

		let (state_anim, animate_inner, canvas_anim) =
			(state_init.clone(), animate_init.clone(), canvas.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			// The canvas was unmounted: stop the loop.
			if !canvas_anim.is_connected() {
				if let Some(ref observer) = observer {
					observer.disconnect();
				}
				debug!("Graph canvas detached, stopping animation");
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(FRAME_DT);
				s.draw(&mut ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_data = state.clone();
	Effect::new(move |_| {
		let (nodes, edges) = (nodes.get(), edges.get());
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.load(&nodes, &edges);
			counts.set((s.graph().nodes.len(), s.graph().edges.len()));
		}
	});

	let state_sel = state.clone();
	Effect::new(move |_| {
		let selected = selected_node_id.get();
		if let Some(ref mut s) = *state_sel.borrow_mut() {
			s.select(selected);
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_moved(x, y);
			let cursor = if s.drag.active || s.pan.active {
				"grabbing"
			} else if s.interaction.hovered_node().is_some() {
				"pointer"
			} else {
				"grab"
			};
			set_cursor(canvas_ref, cursor);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let click = state_mu
			.borrow_mut()
			.as_mut()
			.and_then(|s| {
				let click = s.pointer_up(x, y);
				if click == Some(Click::Background) {
					s.clear_hover_and_selection();
				}
				click
			});
		// State is released before handing control back to the app.
		match click {
			Some(Click::Node(id)) => on_node_select.run(id),
			Some(Click::Background) => {
				if let Some(cb) = on_background_click {
					cb.run(());
				}
			}
			None => {}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_left();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	let state_reset = state.clone();
	let on_reset = move |_| {
		if let Some(ref mut s) = *state_reset.borrow_mut() {
			s.reset_view();
		}
	};

	let legend = NodeType::ALL
		.iter()
		.map(|kind| {
			view! {
				<span>
					<span class="legend-dot" style:background-color=kind.color() />
					{kind.as_str()}
				</span>
			}
		})
		.collect_view();

	view! {
		<div class="graph-container" node_ref=container_ref>
			<div class="graph-overlay">
				<div class="graph-stats">
					<span>{move || format!("{} nodes", counts.get().0)}</span>
					<span>{move || format!("{} relations", counts.get().1)}</span>
				</div>
				<div class="graph-legend">{legend}</div>
				<button class="graph-reset" on:click=on_reset>
					"Reset View"
				</button>
			</div>
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
		</div>
	}
}
