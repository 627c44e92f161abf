use super::quadtree::QuadNode;
use super::{Body, Lcg};
use crate::components::force_graph::geometry::Point;
use crate::components::force_graph::graph::{Edge, degrees};

/// Below this squared distance the charge force stops growing.
const DISTANCE_MIN_SQ: f64 = 1.0;

/// Spring toward a fixed rest length, weighted toward low-degree endpoints.
pub(super) struct LinkForce {
	distance: f64,
	strengths: Vec<f64>,
	biases: Vec<f64>,
}

impl LinkForce {
	pub(super) fn new(node_count: usize, edges: &[Edge], distance: f64) -> Self {
		let count = degrees(node_count, edges);
		let (strengths, biases) = edges
			.iter()
			.map(|edge| {
				let (s, t) = (count[edge.source] as f64, count[edge.target] as f64);
				(1.0 / s.min(t), s / (s + t))
			})
			.unzip();
		Self {
			distance,
			strengths,
			biases,
		}
	}

	pub(super) fn apply(&self, edges: &[Edge], bodies: &mut [Body], alpha: f64, rng: &mut Lcg) {
		for (i, edge) in edges.iter().enumerate() {
			let (source, target) = (&bodies[edge.source], &bodies[edge.target]);
			let mut delta = (target.pos + target.vel) - (source.pos + source.vel);
			if delta.x == 0.0 {
				delta.x = rng.jiggle();
			}
			if delta.y == 0.0 {
				delta.y = rng.jiggle();
			}
			let length = delta.length();
			let delta = delta * ((length - self.distance) / length * alpha * self.strengths[i]);
			let bias = self.biases[i];
			bodies[edge.target].vel -= delta * bias;
			bodies[edge.source].vel += delta * (1.0 - bias);
		}
	}
}

/// Barnes–Hut many-body force. Negative strength repels.
pub(super) fn apply_charge(
	bodies: &mut [Body],
	strength: f64,
	theta: f64,
	alpha: f64,
	rng: &mut Lcg,
) {
	let positions: Vec<Point> = bodies.iter().map(|b| b.pos).collect();
	let Some(tree) = QuadNode::build(&positions, &[]) else {
		return;
	};
	let theta_sq = theta * theta;
	for (i, body) in bodies.iter_mut().enumerate() {
		let mut force = Point::ZERO;
		accumulate_charge(
			&tree,
			i,
			&positions,
			strength * alpha,
			theta_sq,
			rng,
			&mut force,
		);
		body.vel += force;
	}
}

fn accumulate_charge(
	node: &QuadNode,
	index: usize,
	positions: &[Point],
	scaled_strength: f64,
	theta_sq: f64,
	rng: &mut Lcg,
	force: &mut Point,
) {
	if node.count == 0 {
		return;
	}
	let p = positions[index];

	if node.is_leaf() {
		for &other in &node.indices {
			if other == index {
				continue;
			}
			let mut delta = positions[other] - p;
			if delta.x == 0.0 {
				delta.x = rng.jiggle();
			}
			if delta.y == 0.0 {
				delta.y = rng.jiggle();
			}
			*force += delta * (scaled_strength / soften(delta.length_sq()));
		}
		return;
	}

	let delta = node.center_of_mass - p;
	let distance_sq = delta.length_sq();
	let width = node.bounds.width();
	if !node.bounds.contains(p) && width * width / theta_sq < distance_sq {
		*force += delta * (scaled_strength * node.count as f64 / soften(distance_sq));
		return;
	}

	for child in node.children() {
		accumulate_charge(
			child,
			index,
			positions,
			scaled_strength,
			theta_sq,
			rng,
			force,
		);
	}
}

fn soften(distance_sq: f64) -> f64 {
	if distance_sq < DISTANCE_MIN_SQ {
		(DISTANCE_MIN_SQ * distance_sq).sqrt()
	} else {
		distance_sq
	}
}

/// Pushes apart overlapping circles, predicted one step ahead. The lighter
/// node (smaller radius) takes the larger share of the correction.
pub(super) fn apply_collide(bodies: &mut [Body], radii: &[f64], strength: f64, rng: &mut Lcg) {
	let predicted: Vec<Point> = bodies.iter().map(|b| b.pos + b.vel).collect();
	let Some(tree) = QuadNode::build(&predicted, radii) else {
		return;
	};

	let mut stack = Vec::new();
	for i in 0..bodies.len() {
		let ri = radii[i];
		let ri_sq = ri * ri;
		let xi = bodies[i].pos + bodies[i].vel;

		stack.clear();
		stack.push(&tree);
		while let Some(node) = stack.pop() {
			let reach = ri + node.max_radius;
			if node.bounds.distance_sq_to(xi) > reach * reach {
				continue;
			}
			if !node.is_leaf() {
				stack.extend(node.children());
				continue;
			}
			for &j in &node.indices {
				if j <= i {
					continue;
				}
				let rj = radii[j];
				let r = ri + rj;
				let mut delta = xi - (bodies[j].pos + bodies[j].vel);
				if delta.length_sq() >= r * r {
					continue;
				}
				if delta.x == 0.0 {
					delta.x = rng.jiggle();
				}
				if delta.y == 0.0 {
					delta.y = rng.jiggle();
				}
				let length = delta.length();
				let delta = delta * ((r - length) / length * strength);
				let share = rj * rj / (ri_sq + rj * rj);
				bodies[i].vel += delta * share;
				bodies[j].vel -= delta * (1.0 - share);
			}
		}
	}
}

/// Translates every node so the centroid moves to `center`.
pub(super) fn apply_center(bodies: &mut [Body], center: Point) {
	if bodies.is_empty() {
		return;
	}
	let mut sum = Point::ZERO;
	for body in bodies.iter() {
		sum += body.pos;
	}
	let shift = center - sum * (1.0 / bodies.len() as f64);
	for body in bodies.iter_mut() {
		body.pos += shift;
	}
}
