/// Tunable parameters for layout, rendering and interaction.
///
/// Defaults reproduce the reference visualization: a 1200×800 canvas, 200 unit
/// link distance and a −600 charge.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	pub width: f64,
	pub height: f64,
	pub link_distance: f64,
	pub charge_strength: f64,
	/// Barnes–Hut accuracy; cells narrower than `distance * theta` are approximated.
	pub charge_theta: f64,
	pub collide_padding: f64,
	pub collide_strength: f64,
	pub min_radius: f64,
	pub max_radius: f64,
	/// Side length of the square drawn for project nodes.
	pub project_size: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Fraction of velocity kept after each tick.
	pub velocity_retention: f64,
	/// Energy the simulation is held at while a node is being dragged.
	pub drag_alpha_target: f64,
	pub zoom_min: f64,
	pub zoom_max: f64,
	/// Seconds the view takes to ease back to identity on reset.
	pub reset_duration: f64,
	pub seed: u32,
}

impl Default for GraphConfig {
	fn default() -> Self {
		let alpha_min = 0.001_f64;
		Self {
			width: 1200.0,
			height: 800.0,
			link_distance: 200.0,
			charge_strength: -600.0,
			charge_theta: 0.9,
			collide_padding: 5.0,
			collide_strength: 1.0,
			min_radius: 25.0,
			max_radius: 120.0,
			project_size: 60.0,
			alpha_min,
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_retention: 0.6,
			drag_alpha_target: 0.3,
			zoom_min: 0.1,
			zoom_max: 4.0,
			reset_duration: 0.75,
			seed: 1,
		}
	}
}

impl GraphConfig {
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_decay_reaches_alpha_min_in_about_300_ticks() {
		let config = GraphConfig::default();
		let mut alpha = 1.0;
		let mut ticks = 0;
		while alpha >= config.alpha_min {
			alpha += (0.0 - alpha) * config.alpha_decay;
			ticks += 1;
		}
		assert!((299..=301).contains(&ticks), "took {ticks} ticks");
	}

	#[test]
	fn center_is_half_the_canvas() {
		assert_eq!(GraphConfig::default().center(), (600.0, 400.0));
	}
}
