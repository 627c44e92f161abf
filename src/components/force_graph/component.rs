use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::config::GraphConfig;
use super::render::{self, LogoCache};
use super::state::ForceGraphState;
use super::types::{GraphData, LinkSelection};

/// Pointer position in canvas pixels, corrected for CSS scaling.
fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	let (scale_x, scale_y) = (
		canvas.width() as f64 / rect.width().max(1.0),
		canvas.height() as f64 / rect.height().max(1.0),
	);
	Some((
		(ev.client_x() as f64 - rect.left()) * scale_x,
		(ev.client_y() as f64 - rect.top()) * scale_y,
	))
}

#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] config: GraphConfig,
	/// Each change unpins every node and eases the view back home.
	#[prop(into)]
	reset: Signal<u32>,
	#[prop(into)] on_select_link: Callback<Option<LinkSelection>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let logos: Rc<RefCell<Option<LogoCache>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, logos_init, animate_init) = (state.clone(), logos.clone(), animate.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		canvas.set_width(config.width as u32);
		canvas.set_height(config.height as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					error!("2d context has an unexpected type");
					return;
				}
			},
			_ => {
				error!("2d canvas context unavailable");
				return;
			}
		};

		let graph = ForceGraphState::new(&data.get(), config.clone());
		*logos_init.borrow_mut() = Some(LogoCache::new(&graph));
		*state_init.borrow_mut() = Some(graph);

		// New data reuses the running frame loop.
		if animate_init.borrow().is_some() {
			return;
		}

		let (state_anim, logos_anim, animate_inner) =
			(state_init.clone(), logos_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				if let Some(ref logos) = *logos_anim.borrow() {
					render::render(s, &ctx, logos);
				}
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let (Some(window), Some(cb)) = (web_sys::window(), animate_init.borrow().as_ref()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_reset = state.clone();
	Effect::new(move |prev: Option<u32>| {
		let count = reset.get();
		if prev.is_some() {
			if let Some(ref mut s) = *state_reset.borrow_mut() {
				s.reset();
			}
			on_select_link.run(None);
		}
		count
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			match s.node_at_position(x, y) {
				Some(idx) => s.begin_drag(idx, x, y),
				None => s.begin_pan(x, y),
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.drag.active {
				s.drag_to(x, y);
			} else if s.pan.active {
				s.pan_to(x, y);
			} else {
				let hovered = s.link_at_position(x, y);
				s.set_hover(hovered);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.end_drag();
			s.end_pan();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.end_drag();
			s.end_pan();
			s.set_hover(None);
		}
	};

	let state_click = state.clone();
	let on_click = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		let selection = match *state_click.borrow_mut() {
			Some(ref mut s) if !s.pointer_moved() && s.node_at_position(x, y).is_none() => {
				s.select_link_at(x, y)
			}
			_ => return,
		};
		on_select_link.run(selection);
	};

	let state_dbl = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_dbl.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.unpin_node(idx);
			}
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom_at(x, y, ev.delta_y());
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
			on:click=on_click
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
