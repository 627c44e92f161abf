//! Value → visual mappings: square-root radius scale and ordinal color palettes.

use std::collections::HashMap;

/// Ten-color palette used for relationship types.
pub const CATEGORY10: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

/// Eight-color pastel palette used for node categories.
pub const SET2: &[&str] = &[
	"#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];

/// Maps `[0, domain_max]` onto `[range_min, range_max]` through a square root,
/// so the drawn area grows linearly with the value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SqrtScale {
	domain_max: f64,
	range: (f64, f64),
}

impl SqrtScale {
	pub fn new(domain_max: f64, range_min: f64, range_max: f64) -> Self {
		let domain_max = if domain_max.is_finite() {
			domain_max.max(0.0)
		} else {
			0.0
		};
		Self {
			domain_max,
			range: (range_min, range_max),
		}
	}

	/// Builds a scale whose domain ends at the largest of `values`.
	pub fn fit<I>(values: I, range_min: f64, range_max: f64) -> Self
	where
		I: IntoIterator<Item = f64>,
	{
		let max = values
			.into_iter()
			.filter(|v| v.is_finite())
			.fold(0.0_f64, f64::max);
		Self::new(max, range_min, range_max)
	}

	pub fn apply(&self, value: f64) -> f64 {
		let (lo, hi) = self.range;
		// Degenerate domain: everything lands on the midpoint.
		if self.domain_max == 0.0 {
			return lo + (hi - lo) * 0.5;
		}
		let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
		let t = value.sqrt() / self.domain_max.sqrt();
		lo + (hi - lo) * t
	}
}

/// Assigns palette colors to keys in first-seen order, wrapping around.
#[derive(Clone, Debug)]
pub struct OrdinalScale {
	palette: &'static [&'static str],
	assigned: HashMap<String, usize>,
	domain: Vec<String>,
}

impl OrdinalScale {
	pub fn new(palette: &'static [&'static str]) -> Self {
		Self {
			palette,
			assigned: HashMap::new(),
			domain: Vec::new(),
		}
	}

	pub fn color(&mut self, key: &str) -> &'static str {
		let next = self.domain.len();
		let slot = *self.assigned.entry(key.to_string()).or_insert_with(|| {
			self.domain.push(key.to_string());
			next
		});
		self.palette[slot % self.palette.len()]
	}

	/// Keys sorted alphabetically with their colors, for legends.
	pub fn sorted_entries(&self) -> Vec<(String, &'static str)> {
		let mut entries: Vec<_> = self
			.domain
			.iter()
			.enumerate()
			.map(|(i, key)| (key.clone(), self.palette[i % self.palette.len()]))
			.collect();
		entries.sort_by(|a, b| a.0.cmp(&b.0));
		entries
	}
}
