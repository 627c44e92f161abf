use log::{debug, info};

use super::config::GraphConfig;
use super::frame::Frame;
use super::geometry::{Point, point};
use super::graph::{resolve_edges, unique_nodes};
use super::scale::{CATEGORY10, OrdinalScale, SET2, SqrtScale};
use super::simulation::{Intent, Simulation};
use super::types::{GraphData, LinkSelection, NodeKind, ReferenceIndex};

/// Screen-space distance within which a pointer counts as on a link.
pub const LINK_HIT_TOLERANCE: f64 = 6.0;

#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub name: String,
	pub color: &'static str,
	pub logo: Option<String>,
	pub kind: NodeKind,
}

/// Display data for one resolved edge, indexed like `Simulation::edges`.
#[derive(Clone, Debug)]
pub struct LinkInfo {
	pub kind: String,
	pub color: &'static str,
	pub details: Option<String>,
	pub reference_id: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl ViewTransform {
	pub const IDENTITY: Self = Self {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	fn lerp(self, to: Self, t: f64) -> Self {
		Self {
			x: self.x + (to.x - self.x) * t,
			y: self.y + (to.y - self.y) * t,
			k: self.k + (to.k - self.k) * t,
		}
	}
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

#[derive(Clone, Copy, Debug)]
struct TransformTransition {
	from: ViewTransform,
	to: ViewTransform,
	elapsed: f64,
	duration: f64,
}

fn ease_cubic_in_out(t: f64) -> f64 {
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Point,
	/// Set once the pointer moved, so the trailing click is not a selection.
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub link: Option<usize>,
	pub highlight_t: f64,
	pub prev_link: Option<usize>,
	delay_t: f64,
}

pub struct ForceGraphState {
	pub sim: Simulation,
	pub frame: Frame,
	pub nodes: Vec<NodeInfo>,
	pub links: Vec<LinkInfo>,
	pub category_legend: Vec<(String, &'static str)>,
	pub link_legend: Vec<(String, &'static str)>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub selected_link: Option<usize>,
	pub width: f64,
	pub height: f64,
	config: GraphConfig,
	references: ReferenceIndex,
	transition: Option<TransformTransition>,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, config: GraphConfig) -> Self {
		let graph_nodes = unique_nodes(&data.nodes);
		let edges = resolve_edges(&graph_nodes, &data.links);

		let scale = SqrtScale::fit(
			graph_nodes.iter().map(|n| n.market_cap),
			config.min_radius,
			config.max_radius,
		);
		let mut categories = OrdinalScale::new(SET2);
		let mut link_types = OrdinalScale::new(CATEGORY10);

		let radii: Vec<f64> = graph_nodes
			.iter()
			.map(|node| match node.kind {
				NodeKind::Company => scale.apply(node.market_cap),
				NodeKind::Project => config.project_size / 2.0,
			})
			.collect();

		let nodes = graph_nodes
			.iter()
			.map(|node| NodeInfo {
				name: node.name.clone(),
				color: categories.color(&node.category),
				logo: node.logo.clone().filter(|url| !url.trim().is_empty()),
				kind: node.kind,
			})
			.collect();

		let links = edges
			.iter()
			.map(|edge| {
				let link = &data.links[edge.link];
				LinkInfo {
					kind: link.kind.clone(),
					color: link_types.color(&link.kind),
					details: link.details.clone(),
					reference_id: link.reference_id.clone(),
				}
			})
			.collect();

		info!(
			"graph built: {} nodes, {} of {} links kept",
			graph_nodes.len(),
			edges.len(),
			data.links.len()
		);

		Self {
			sim: Simulation::new(&radii, edges, &config),
			frame: Frame::default(),
			nodes,
			links,
			category_legend: categories.sorted_entries(),
			link_legend: link_types.sorted_entries(),
			transform: ViewTransform::IDENTITY,
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected_link: None,
			width: config.width,
			height: config.height,
			references: data.references.clone(),
			transition: None,
			config,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		point(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under the pointer; nodes drawn later win.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let p = self.screen_to_graph(sx, sy);
		self.sim
			.bodies()
			.iter()
			.enumerate()
			.rev()
			.find(|(i, body)| {
				let d = p - body.pos;
				match self.nodes[*i].kind {
					NodeKind::Company => d.length() <= body.radius,
					NodeKind::Project => d.x.abs() <= body.radius && d.y.abs() <= body.radius,
				}
			})
			.map(|(i, _)| i)
	}

	/// Closest link path within [`LINK_HIT_TOLERANCE`] screen pixels.
	pub fn link_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let p = self.screen_to_graph(sx, sy);
		let tolerance = LINK_HIT_TOLERANCE / self.transform.k;
		self.frame
			.paths
			.iter()
			.enumerate()
			.filter_map(|(i, path)| path.map(|path| (i, path.distance_to(p))))
			.filter(|&(_, d)| d <= tolerance)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| i)
	}

	/// Pins `idx` where it stands and keeps the layout warm while dragging.
	pub fn begin_drag(&mut self, idx: usize, sx: f64, sy: f64) {
		let Some(body) = self.sim.bodies().get(idx) else {
			return;
		};
		let at = body.pos;
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start: at,
			moved: false,
		};
		self.pan.moved = false;
		self.sim
			.enqueue(Intent::AlphaTarget(self.config.drag_alpha_target));
		self.sim.enqueue(Intent::Pin { node: idx, at });
	}

	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node_idx.filter(|_| self.drag.active) else {
			return;
		};
		let delta = point(
			(sx - self.drag.start_x) / self.transform.k,
			(sy - self.drag.start_y) / self.transform.k,
		);
		self.drag.moved = true;
		self.sim.enqueue(Intent::Pin {
			node: idx,
			at: self.drag.node_start + delta,
		});
	}

	/// Releases the drag energy. The node stays pinned.
	pub fn end_drag(&mut self) {
		if self.drag.active {
			self.sim.enqueue(Intent::AlphaTarget(0.0));
		}
		self.drag.active = false;
		self.drag.node_idx = None;
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.transition = None;
		self.drag.moved = false;
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.transform.x,
			transform_start_y: self.transform.y,
			moved: false,
		};
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		self.pan.moved = true;
		self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
		self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	/// Whether the last press turned into a drag or pan rather than a click.
	pub fn pointer_moved(&self) -> bool {
		self.drag.moved || self.pan.moved
	}

	/// Zooms around the pointer, within the configured scale extent. Purely
	/// horizontal wheel events leave the view alone.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		if delta_y == 0.0 || !delta_y.is_finite() {
			return;
		}
		self.transition = None;
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(self.config.zoom_min, self.config.zoom_max);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn unpin_node(&mut self, idx: usize) {
		debug!("unpinning node {idx}");
		self.sim.enqueue(Intent::Unpin(idx));
		self.sim.enqueue(Intent::Reheat);
	}

	/// Unpins everything, restarts the layout and eases the view home.
	pub fn reset(&mut self) {
		info!("resetting layout and view");
		self.sim.enqueue(Intent::UnpinAll);
		self.sim.enqueue(Intent::Reheat);
		self.selected_link = None;
		self.transition = Some(TransformTransition {
			from: self.transform,
			to: ViewTransform::IDENTITY,
			elapsed: 0.0,
			duration: self.config.reset_duration,
		});
	}

	pub fn set_hover(&mut self, link: Option<usize>) {
		if self.hover.link == link {
			return;
		}
		let was_hovering = self.hover.link.is_some();

		// Keep the previous link for the fade-out.
		if was_hovering && link.is_none() {
			self.hover.prev_link = self.hover.link.take();
		} else {
			self.hover.prev_link = None;
		}

		self.hover.link = link;
		if link.is_some() && !was_hovering {
			self.hover.delay_t = 0.0;
		}
	}

	pub fn is_highlighted(&self, link: usize) -> bool {
		self.hover.link == Some(link)
			|| self.hover.prev_link == Some(link)
			|| self.selected_link == Some(link)
	}

	/// Selects the link under the pointer, or clears the selection.
	pub fn select_link_at(&mut self, sx: f64, sy: f64) -> Option<LinkSelection> {
		self.selected_link = self.link_at_position(sx, sy);
		self.selected_link.map(|idx| self.selection(idx, (sx, sy)))
	}

	pub fn selection(&self, idx: usize, anchor: (f64, f64)) -> LinkSelection {
		let edge = self.sim.edges()[idx];
		let link = &self.links[idx];
		let references = link
			.reference_id
			.as_ref()
			.and_then(|id| self.references.get(id))
			.cloned()
			.unwrap_or_default();
		LinkSelection {
			kind: link.kind.clone(),
			color: link.color,
			source: self.nodes[edge.source].name.clone(),
			target: self.nodes[edge.target].name.clone(),
			details: link.details.clone(),
			references,
			anchor,
		}
	}

	/// Advances one animation frame: simulation step, clamping, routing and
	/// view animations.
	pub fn tick(&mut self, dt: f64) {
		let was_running = self.sim.is_running();
		self.sim.step();
		if was_running && !self.sim.is_running() {
			debug!("layout settled at alpha {:.5}", self.sim.alpha());
		}
		let (bodies, edges) = self.sim.layout_mut();
		self.frame = Frame::compute(bodies, edges, self.width, self.height);

		if let Some(mut transition) = self.transition.take() {
			transition.elapsed += dt;
			let t = transition.elapsed / transition.duration.max(f64::EPSILON);
			if t >= 1.0 {
				self.transform = transition.to;
			} else {
				self.transform = transition.from.lerp(transition.to, ease_cubic_in_out(t));
				self.transition = Some(transition);
			}
		}

		let (target, delay, speed) = if self.hover.link.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.link.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_link = None;
			}
		}
	}
}
