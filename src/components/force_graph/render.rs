use std::collections::HashMap;
use std::f64::consts::PI;

use log::warn;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement, Path2d};

use super::geometry::point;
use super::state::ForceGraphState;
use super::types::NodeKind;

const ARROW_LENGTH: f64 = 12.0;
const ARROW_HALF_WIDTH: f64 = 6.0;
const LINK_WIDTH: f64 = 2.0;
const LINK_ALPHA: f64 = 0.6;
const LEGEND_WIDTH: f64 = 150.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

/// Logo images keyed by URL. Nodes fall back to their category color until
/// the image has loaded.
pub struct LogoCache {
	images: HashMap<String, HtmlImageElement>,
}

impl LogoCache {
	pub fn new(state: &ForceGraphState) -> Self {
		let mut images = HashMap::new();
		for url in state.nodes.iter().filter_map(|n| n.logo.as_ref()) {
			if images.contains_key(url) {
				continue;
			}
			match HtmlImageElement::new() {
				Ok(image) => {
					image.set_src(url);
					images.insert(url.clone(), image);
				}
				Err(err) => warn!("could not create image for {url}: {err:?}"),
			}
		}
		Self { images }
	}

	fn ready(&self, url: &str) -> Option<&HtmlImageElement> {
		self.images
			.get(url)
			.filter(|image| image.complete() && image.natural_width() > 0)
	}
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, logos: &LogoCache) {
	ctx.set_fill_style_str("#ffffff");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx, logos);
	ctx.restore();
	draw_legends(state, ctx);
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let t = ease_out_cubic(state.hover.highlight_t);

	for (i, path) in state.frame.paths.iter().enumerate() {
		let Some(path) = path else {
			continue;
		};
		let Ok(stroke) = Path2d::new_with_path_string(&path.to_svg()) else {
			continue;
		};
		let link = &state.links[i];

		// Selected links stay fully lit; hovered ones ease in.
		let (alpha, width) = if state.selected_link == Some(i) {
			(1.0, LINK_WIDTH * 2.0)
		} else if state.is_highlighted(i) {
			(LINK_ALPHA + 0.4 * t, LINK_WIDTH * (1.0 + t))
		} else {
			(LINK_ALPHA, LINK_WIDTH)
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(link.color);
		ctx.set_line_width(width);
		ctx.stroke_with_path(&stroke);

		ctx.set_global_alpha(1.0);
		let dir = path.end_tangent();
		let back = path.end - dir * ARROW_LENGTH;
		let side = point(-dir.y, dir.x) * ARROW_HALF_WIDTH;
		ctx.set_fill_style_str(link.color);
		ctx.begin_path();
		ctx.move_to(path.end.x, path.end.y);
		ctx.line_to(back.x + side.x, back.y + side.y);
		ctx.line_to(back.x - side.x, back.y - side.y);
		ctx.close_path();
		ctx.fill();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, logos: &LogoCache) {
	let k = state.transform.k;

	for (body, node) in state.sim.bodies().iter().zip(&state.nodes) {
		let (x, y, r) = (body.pos.x, body.pos.y, body.radius);

		ctx.begin_path();
		match node.kind {
			NodeKind::Company => {
				let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
			}
			NodeKind::Project => ctx.rect(x - r, y - r, 2.0 * r, 2.0 * r),
		}

		match node.logo.as_deref().and_then(|url| logos.ready(url)) {
			Some(image) => {
				ctx.save();
				ctx.clip();
				let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
					image,
					x - r,
					y - r,
					2.0 * r,
					2.0 * r,
				);
				ctx.restore();
			}
			None => {
				ctx.set_fill_style_str(node.color);
				ctx.fill();
			}
		}

		if body.pin.is_some() {
			ctx.set_stroke_style_str("rgba(0, 0, 0, 0.35)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_font("15px sans-serif");
		ctx.set_text_align("center");
		ctx.set_line_join("round");
		ctx.set_stroke_style_str("#fff");
		ctx.set_line_width(0.3);
		let _ = ctx.stroke_text(&node.name, x, y + 4.0);
		ctx.set_fill_style_str("#000");
		let _ = ctx.fill_text(&node.name, x, y + 4.0);
	}
}

/// Category and relationship-type keys, pinned to the top-right corner.
fn draw_legends(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let x = state.width - LEGEND_WIDTH;
	ctx.set_font("12px sans-serif");
	ctx.set_text_align("start");

	for (i, (label, color)) in state.category_legend.iter().enumerate() {
		let y = 20.0 + i as f64 * 20.0;
		ctx.set_fill_style_str(color);
		ctx.fill_rect(x, y, 15.0, 15.0);
		ctx.set_fill_style_str("#000");
		let _ = ctx.fill_text(label, x + 20.0, y + 12.0);
	}

	for (i, (label, color)) in state.link_legend.iter().enumerate() {
		let y = 150.0 + i as f64 * 20.0;
		ctx.set_fill_style_str(color);
		ctx.fill_rect(x, y, 15.0, 2.0);
		ctx.set_fill_style_str("#000");
		let _ = ctx.fill_text(label, x + 20.0, y + 4.0);
	}
}
