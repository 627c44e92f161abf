//! Per-frame geometry: boundary clamping and arc routing for links.

use std::f64::consts::{PI, TAU};

use super::geometry::{Point, point};
use super::graph::Edge;
use super::simulation::Body;

/// Parallel arcs tighten by this much per index.
const ARC_SCALE: f64 = 0.4;
const ARC_BASE: f64 = 2.5;

/// A circular arc from the source boundary to the target boundary, in the
/// same terms as an SVG `A` command with `large-arc = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkPath {
	pub start: Point,
	pub end: Point,
	pub radius: f64,
	/// `true` sweeps in the positive-angle direction (clockwise on screen).
	pub sweep: bool,
}

/// Canvas form of a [`LinkPath`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcGeometry {
	pub center: Point,
	pub radius: f64,
	pub start_angle: f64,
	pub end_angle: f64,
	pub anticlockwise: bool,
}

impl LinkPath {
	pub fn to_svg(&self) -> String {
		format!(
			"M {},{} A {},{} 0 0,{} {},{}",
			self.start.x,
			self.start.y,
			self.radius,
			self.radius,
			u8::from(self.sweep),
			self.end.x,
			self.end.y
		)
	}

	/// Endpoint → center conversion. The radius grows to half the chord when
	/// it is too small to span it.
	pub fn arc(&self) -> Option<ArcGeometry> {
		let half = (self.start - self.end) * 0.5;
		let half_sq = half.length_sq();
		if half_sq == 0.0 {
			return None;
		}
		let radius = self.radius.max(half_sq.sqrt());
		let k = ((radius * radius - half_sq) / half_sq).max(0.0).sqrt();
		// Small arc: center sits on the side opposite the sweep.
		let sign = if self.sweep { 1.0 } else { -1.0 };
		let mid = (self.start + self.end) * 0.5;
		let center = mid + point(half.y, -half.x) * (sign * k);

		let start_angle = (self.start.y - center.y).atan2(self.start.x - center.x);
		let end_angle = (self.end.y - center.y).atan2(self.end.x - center.x);
		Some(ArcGeometry {
			center,
			radius,
			start_angle,
			end_angle,
			anticlockwise: !self.sweep,
		})
	}

	/// Points along the arc, both ends included.
	pub fn sample(&self, segments: usize) -> Vec<Point> {
		let Some(arc) = self.arc() else {
			return vec![self.start, self.end];
		};
		let span = arc.span();
		(0..=segments)
			.map(|i| {
				let angle = arc.start_angle + span * (i as f64 / segments as f64);
				arc.center + point(angle.cos(), angle.sin()) * arc.radius
			})
			.collect()
	}

	pub fn distance_to(&self, p: Point) -> f64 {
		self.sample(24)
			.windows(2)
			.map(|w| p.distance_to_segment(w[0], w[1]))
			.fold(f64::INFINITY, f64::min)
	}

	/// Unit direction of travel at the end point, for arrowheads.
	pub fn end_tangent(&self) -> Point {
		match self.arc() {
			Some(arc) => {
				let (sin, cos) = arc.end_angle.sin_cos();
				if self.sweep {
					point(-sin, cos)
				} else {
					point(sin, -cos)
				}
			}
			None => Point::ZERO,
		}
	}
}

impl ArcGeometry {
	/// Signed angular extent, positive when sweeping clockwise.
	pub fn span(&self) -> f64 {
		let mut span = self.end_angle - self.start_angle;
		if self.anticlockwise {
			while span > 0.0 {
				span -= TAU;
			}
		} else {
			while span < 0.0 {
				span += TAU;
			}
		}
		// Small-arc paths never exceed half a turn.
		span.clamp(-PI, PI)
	}
}

/// Routes one link between two node centers. Returns `None` when the centers
/// coincide.
pub fn route_link(
	source: Point,
	source_radius: f64,
	target: Point,
	target_radius: f64,
	link_num: usize,
	group_size: usize,
) -> Option<LinkPath> {
	let delta = target - source;
	let distance = delta.length();
	if distance == 0.0 || !distance.is_finite() {
		return None;
	}

	let start = source + delta * (source_radius / distance);
	let end = target - delta * (target_radius / distance);

	let (radius, sweep) = if group_size > 1 {
		let radius = if link_num > 0 {
			distance / (ARC_BASE + link_num as f64 * ARC_SCALE)
		} else {
			distance
		};
		(radius, link_num % 2 == 1)
	} else {
		(distance, true)
	};

	Some(LinkPath {
		start,
		end,
		radius,
		sweep,
	})
}

/// Keeps every node fully inside `width × height`.
pub fn clamp_bodies(bodies: &mut [Body], width: f64, height: f64) {
	for body in bodies {
		let r = body.radius;
		body.pos.x = r.max((width - r).min(body.pos.x));
		body.pos.y = r.max((height - r).min(body.pos.y));
	}
}

/// Geometry produced for one animation frame, indexed like the edge list.
#[derive(Clone, Debug, Default)]
pub struct Frame {
	pub paths: Vec<Option<LinkPath>>,
}

impl Frame {
	pub fn compute(bodies: &mut [Body], edges: &[Edge], width: f64, height: f64) -> Self {
		clamp_bodies(bodies, width, height);
		let paths = edges
			.iter()
			.map(|edge| {
				let (source, target) = (&bodies[edge.source], &bodies[edge.target]);
				route_link(
					source.pos,
					source.radius,
					target.pos,
					target.radius,
					edge.link_num,
					edge.group_size,
				)
			})
			.collect();
		Self { paths }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::scale::SqrtScale;

	fn body(x: f64, y: f64, radius: f64) -> Body {
		Body {
			pos: point(x, y),
			vel: Point::ZERO,
			pin: None,
			radius,
		}
	}

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() < 1e-9
	}

	#[test]
	fn path_starts_on_source_boundary() {
		let scale = SqrtScale::fit([100.0, 400.0], 25.0, 120.0);
		let (ra, rb) = (scale.apply(100.0), scale.apply(400.0));
		assert!(rb > ra);

		let a = point(100.0, 100.0);
		let b = point(500.0, 400.0);
		let path = route_link(a, ra, b, rb, 0, 1).unwrap();
		assert!(close(path.start.distance(a), ra));
		assert!(close(path.end.distance(b), rb));

		// Start lies on the A→B ray.
		let dir = (b - a) * (1.0 / b.distance(a));
		let expected = a + dir * ra;
		assert!(close(path.start.x, expected.x) && close(path.start.y, expected.y));
		assert!(path.sweep);
		assert_eq!(path.radius, 500.0);
	}

	#[test]
	fn coincident_endpoints_produce_nothing() {
		let p = point(40.0, 40.0);
		assert_eq!(route_link(p, 10.0, p, 10.0, 0, 1), None);
		assert_eq!(route_link(p, 10.0, p, 10.0, 1, 2), None);
	}

	#[test]
	fn parallel_links_fan_out() {
		let (x, y) = (point(0.0, 0.0), point(290.0, 0.0));
		let first = route_link(x, 10.0, y, 10.0, 0, 2).unwrap();
		let second = route_link(x, 10.0, y, 10.0, 1, 2).unwrap();
		assert_eq!(first.radius, 290.0);
		assert!(close(second.radius, 100.0));
		assert!(!first.sweep);
		assert!(second.sweep);

		let third = route_link(x, 10.0, y, 10.0, 2, 3).unwrap();
		assert!(close(third.radius, 290.0 / 3.3));
		assert!(!third.sweep);
	}

	#[test]
	fn svg_path_data() {
		let path = route_link(point(0.0, 0.0), 10.0, point(100.0, 0.0), 10.0, 0, 1).unwrap();
		assert_eq!(path.to_svg(), "M 10,0 A 100,100 0 0,1 90,0");
	}

	#[test]
	fn arc_passes_through_both_ends() {
		let path = route_link(point(0.0, 0.0), 20.0, point(300.0, 120.0), 30.0, 1, 2).unwrap();
		let arc = path.arc().unwrap();
		assert!(close(arc.center.distance(path.start), arc.radius));
		assert!(close(arc.center.distance(path.end), arc.radius));
		let samples = path.sample(8);
		assert!(close(samples[0].distance(path.start), 0.0));
		assert!(samples[8].distance(path.end) < 1e-6);
	}

	#[test]
	fn sweep_decides_bulge_side() {
		// Horizontal chord left → right: clockwise sweep bulges upward (negative y).
		let cw = route_link(point(0.0, 0.0), 0.0, point(100.0, 0.0), 0.0, 0, 1).unwrap();
		let ccw = route_link(point(0.0, 0.0), 0.0, point(100.0, 0.0), 0.0, 0, 2).unwrap();
		assert!(cw.sample(2)[1].y < 0.0);
		assert!(ccw.sample(2)[1].y > 0.0);
	}

	#[test]
	fn end_tangent_points_into_target() {
		let path = route_link(point(0.0, 0.0), 0.0, point(100.0, 0.0), 0.0, 0, 1).unwrap();
		let t = path.end_tangent();
		assert!(close(t.length(), 1.0));
		assert!(t.x > 0.0);
	}

	#[test]
	fn distance_to_arc() {
		let path = route_link(point(0.0, 0.0), 0.0, point(100.0, 0.0), 0.0, 0, 1).unwrap();
		let mid = path.sample(2)[1];
		assert!(path.distance_to(mid) < 1e-6);
		assert!(path.distance_to(point(50.0, 200.0)) > 100.0);
	}

	#[test]
	fn clamp_keeps_nodes_inside() {
		let mut bodies = vec![
			body(-50.0, 900.0, 25.0),
			body(1300.0, -10.0, 40.0),
			body(600.0, 400.0, 30.0),
		];
		clamp_bodies(&mut bodies, 1200.0, 800.0);
		assert_eq!(bodies[0].pos, point(25.0, 775.0));
		assert_eq!(bodies[1].pos, point(1160.0, 40.0));
		assert_eq!(bodies[2].pos, point(600.0, 400.0));
	}

	#[test]
	fn frame_clamps_before_routing() {
		let mut bodies = vec![body(-100.0, 400.0, 25.0), body(600.0, 400.0, 25.0)];
		let edges = [Edge {
			source: 0,
			target: 1,
			link: 0,
			link_num: 0,
			group_size: 1,
		}];
		let frame = Frame::compute(&mut bodies, &edges, 1200.0, 800.0);
		let path = frame.paths[0].unwrap();
		assert_eq!(path.start, point(50.0, 400.0));
		assert_eq!(path.end, point(575.0, 400.0));
	}
}
