//! Force-directed layout engine.
//!
//! [`Simulation`] owns every node's position, velocity and pin. Input handlers
//! never touch that state directly: they queue an [`Intent`] which is applied
//! at the start of the next [`Simulation::step`].

mod forces;
mod quadtree;

use std::collections::VecDeque;
use std::f64::consts::PI;

use log::debug;

use super::config::GraphConfig;
use super::geometry::{Point, point};
use super::graph::Edge;
use forces::{LinkForce, apply_center, apply_charge, apply_collide};

const INITIAL_RADIUS: f64 = 10.0;

/// Simulation state for one node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
	pub pos: Point,
	pub vel: Point,
	pub pin: Option<Point>,
	/// Visual radius, used for clipping, clamping and collisions.
	pub radius: f64,
}

/// A deferred mutation requested by user input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intent {
	Pin { node: usize, at: Point },
	Unpin(usize),
	UnpinAll,
	AlphaTarget(f64),
	/// Restore full energy and resume stepping.
	Reheat,
}

/// Linear congruential generator used for reproducible jiggle.
#[derive(Clone, Debug)]
pub(super) struct Lcg(u32);

impl Lcg {
	pub(super) fn new(seed: u32) -> Self {
		Self(seed)
	}

	fn next(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.0 as f64 / 4_294_967_296.0
	}

	/// Tiny non-zero offset for separating coincident points.
	pub(super) fn jiggle(&mut self) -> f64 {
		let j = (self.next() - 0.5) * 1e-6;
		if j == 0.0 { 1e-7 } else { j }
	}
}

pub struct Simulation {
	bodies: Vec<Body>,
	edges: Vec<Edge>,
	link_force: LinkForce,
	collide_radii: Vec<f64>,
	center: Point,
	charge_strength: f64,
	charge_theta: f64,
	collide_strength: f64,
	velocity_retention: f64,
	alpha: f64,
	alpha_min: f64,
	alpha_decay: f64,
	alpha_target: f64,
	running: bool,
	intents: VecDeque<Intent>,
	rng: Lcg,
}

impl Simulation {
	/// Places nodes on a phyllotaxis spiral around the canvas center.
	pub fn new(radii: &[f64], edges: Vec<Edge>, config: &GraphConfig) -> Self {
		let (cx, cy) = config.center();
		let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
		let bodies: Vec<Body> = radii
			.iter()
			.enumerate()
			.map(|(i, &radius)| {
				let r = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * golden_angle;
				Body {
					pos: point(cx + r * angle.cos(), cy + r * angle.sin()),
					vel: Point::ZERO,
					pin: None,
					radius,
				}
			})
			.collect();

		let link_force = LinkForce::new(bodies.len(), &edges, config.link_distance);
		debug!(
			"simulation created with {} nodes and {} links",
			bodies.len(),
			edges.len()
		);

		Self {
			collide_radii: radii.iter().map(|r| r + config.collide_padding).collect(),
			bodies,
			edges,
			link_force,
			center: point(cx, cy),
			charge_strength: config.charge_strength,
			charge_theta: config.charge_theta,
			collide_strength: config.collide_strength,
			velocity_retention: config.velocity_retention,
			alpha: 1.0,
			alpha_min: config.alpha_min,
			alpha_decay: config.alpha_decay,
			alpha_target: 0.0,
			running: true,
			intents: VecDeque::new(),
			rng: Lcg::new(config.seed),
		}
	}

	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	/// Mutable positions alongside the (immutable) edge list.
	pub fn layout_mut(&mut self) -> (&mut [Body], &[Edge]) {
		(&mut self.bodies, &self.edges)
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	#[cfg(test)]
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn enqueue(&mut self, intent: Intent) {
		self.intents.push_back(intent);
	}

	/// Applies queued intents, then advances one tick if the simulation still
	/// has energy. Returns whether a tick ran.
	pub fn step(&mut self) -> bool {
		self.apply_intents();
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < self.alpha_min {
			debug!("simulation cooled, alpha={:.5}", self.alpha);
			self.running = false;
		}
		true
	}

	fn apply_intents(&mut self) {
		while let Some(intent) = self.intents.pop_front() {
			match intent {
				Intent::Pin { node, at } => {
					if let Some(body) = self.bodies.get_mut(node) {
						body.pin = Some(at);
						body.pos = at;
						body.vel = Point::ZERO;
					}
				}
				Intent::Unpin(node) => {
					if let Some(body) = self.bodies.get_mut(node) {
						body.pin = None;
					}
				}
				Intent::UnpinAll => {
					for body in &mut self.bodies {
						body.pin = None;
					}
				}
				Intent::AlphaTarget(target) => {
					self.alpha_target = target;
					if target >= self.alpha_min {
						self.running = true;
					}
				}
				Intent::Reheat => {
					self.alpha = 1.0;
					self.running = true;
				}
			}
		}
	}

	fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		let alpha = self.alpha;

		self.link_force
			.apply(&self.edges, &mut self.bodies, alpha, &mut self.rng);
		apply_charge(
			&mut self.bodies,
			self.charge_strength,
			self.charge_theta,
			alpha,
			&mut self.rng,
		);
		apply_collide(
			&mut self.bodies,
			&self.collide_radii,
			self.collide_strength,
			&mut self.rng,
		);
		apply_center(&mut self.bodies, self.center);

		for body in &mut self.bodies {
			match body.pin {
				Some(pin) => {
					body.pos = pin;
					body.vel = Point::ZERO;
				}
				None => {
					body.vel = body.vel * self.velocity_retention;
					body.pos += body.vel;
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn edge(source: usize, target: usize) -> Edge {
		Edge {
			source,
			target,
			link: 0,
			link_num: 0,
			group_size: 1,
		}
	}

	fn chain(n: usize) -> Simulation {
		let edges = (1..n).map(|i| edge(i - 1, i)).collect();
		Simulation::new(&vec![30.0; n], edges, &GraphConfig::default())
	}

	#[test]
	fn alpha_decays_until_the_simulation_stops() {
		let mut sim = chain(4);
		let mut last = sim.alpha();
		let mut steps = 0;
		while sim.step() {
			assert!(sim.alpha() < last);
			last = sim.alpha();
			steps += 1;
			assert!(steps < 1000, "never cooled");
		}
		assert!(!sim.is_running());
		assert!(sim.alpha() < GraphConfig::default().alpha_min);
		assert!(!sim.step());
	}

	#[test]
	fn reheat_restores_full_energy() {
		let mut sim = chain(3);
		while sim.step() {}
		sim.enqueue(Intent::Reheat);
		assert!(sim.step());
		assert!(sim.alpha() > 0.97);
		assert!(sim.is_running());
	}

	#[test]
	fn drag_target_keeps_simulation_warm() {
		let mut sim = chain(3);
		while sim.step() {}
		sim.enqueue(Intent::AlphaTarget(0.3));
		for _ in 0..500 {
			assert!(sim.step());
		}
		assert!((sim.alpha() - 0.3).abs() < 0.01);
		sim.enqueue(Intent::AlphaTarget(0.0));
		let mut steps = 0;
		while sim.step() {
			steps += 1;
		}
		assert!(steps > 0 && steps < 1000);
	}

	#[test]
	fn pinned_node_holds_position_until_unpinned() {
		let mut sim = chain(5);
		let at = point(100.0, 120.0);
		sim.enqueue(Intent::Pin { node: 2, at });
		for _ in 0..50 {
			sim.step();
			assert_eq!(sim.bodies()[2].pos, at);
			assert_eq!(sim.bodies()[2].pin, Some(at));
		}

		sim.enqueue(Intent::Unpin(2));
		sim.enqueue(Intent::Reheat);
		sim.step();
		assert_ne!(sim.bodies()[2].pos, at);
		assert_eq!(sim.bodies()[2].pin, None);
	}

	#[test]
	fn pinned_node_survives_cooling() {
		let mut sim = chain(3);
		let at = point(50.0, 60.0);
		sim.enqueue(Intent::Pin { node: 0, at });
		while sim.step() {}
		assert_eq!(sim.bodies()[0].pos, at);
	}

	#[test]
	fn unpin_all_clears_every_pin() {
		let mut sim = chain(3);
		for node in 0..3 {
			sim.enqueue(Intent::Pin {
				node,
				at: point(10.0 * node as f64, 0.0),
			});
		}
		sim.step();
		assert!(sim.bodies().iter().all(|b| b.pin.is_some()));
		sim.enqueue(Intent::UnpinAll);
		sim.step();
		assert!(sim.bodies().iter().all(|b| b.pin.is_none()));
	}

	#[test]
	fn out_of_range_intents_are_ignored() {
		let mut sim = chain(2);
		sim.enqueue(Intent::Pin {
			node: 9,
			at: Point::ZERO,
		});
		sim.enqueue(Intent::Unpin(9));
		assert!(sim.step());
	}

	#[test]
	fn settled_layout_has_no_overlaps() {
		let radii: Vec<f64> = (0..12).map(|i| 25.0 + 5.0 * i as f64).collect();
		let mut sim = Simulation::new(&radii, Vec::new(), &GraphConfig::default());
		while sim.step() {}

		let bodies = sim.bodies();
		for i in 0..bodies.len() {
			for j in (i + 1)..bodies.len() {
				let gap = bodies[i].pos.distance(bodies[j].pos);
				assert!(
					gap > (bodies[i].radius + bodies[j].radius) * 0.95,
					"nodes {i} and {j} overlap"
				);
			}
		}
	}

	#[test]
	fn centroid_stays_near_canvas_center() {
		let mut sim = chain(6);
		while sim.step() {}
		let n = sim.bodies().len() as f64;
		let mut sum = Point::ZERO;
		for body in sim.bodies() {
			sum += body.pos;
		}
		let centroid = sum * (1.0 / n);
		assert!(centroid.distance(point(600.0, 400.0)) < 1.0);
	}

	#[test]
	fn positions_stay_finite_for_coincident_start() {
		let config = GraphConfig::default();
		let mut sim = Simulation::new(&[30.0, 30.0], vec![edge(0, 1)], &config);
		let at = point(300.0, 300.0);
		sim.enqueue(Intent::Pin { node: 0, at });
		sim.enqueue(Intent::Pin { node: 1, at });
		sim.step();
		sim.enqueue(Intent::Unpin(1));
		for _ in 0..20 {
			sim.step();
		}
		assert!(sim.bodies().iter().all(|b| b.pos.is_finite()));
		assert!(sim.bodies()[1].pos.distance(at) > 1.0);
	}

	#[test]
	fn same_seed_gives_same_layout() {
		let mut a = chain(8);
		let mut b = chain(8);
		for _ in 0..100 {
			a.step();
			b.step();
		}
		assert_eq!(a.bodies(), b.bodies());
	}
}
