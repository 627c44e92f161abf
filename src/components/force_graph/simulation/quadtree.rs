use crate::components::force_graph::geometry::{Point, point};

const LEAF_CAPACITY: usize = 8;
const MAX_DEPTH: usize = 12;

#[derive(Clone, Copy, Debug)]
pub(super) struct QuadBounds {
	pub(super) center: Point,
	pub(super) half_extent: f64,
}

impl QuadBounds {
	fn from_points(points: &[Point]) -> Option<Self> {
		let mut min = point(f64::INFINITY, f64::INFINITY);
		let mut max = point(f64::NEG_INFINITY, f64::NEG_INFINITY);

		for p in points {
			min.x = min.x.min(p.x);
			min.y = min.y.min(p.y);
			max.x = max.x.max(p.x);
			max.y = max.y.max(p.y);
		}

		if !min.is_finite() || !max.is_finite() {
			return None;
		}

		let span = (max.x - min.x).max(max.y - min.y).max(1.0);
		Some(Self {
			center: (min + max) * 0.5,
			half_extent: span * 0.5 + 1.0,
		})
	}

	pub(super) fn contains(self, p: Point) -> bool {
		(p.x - self.center.x).abs() <= self.half_extent
			&& (p.y - self.center.y).abs() <= self.half_extent
	}

	pub(super) fn width(self) -> f64 {
		self.half_extent * 2.0
	}

	/// Squared distance from `p` to the nearest point of the cell, 0 inside.
	pub(super) fn distance_sq_to(self, p: Point) -> f64 {
		let dx = ((p.x - self.center.x).abs() - self.half_extent).max(0.0);
		let dy = ((p.y - self.center.y).abs() - self.half_extent).max(0.0);
		dx * dx + dy * dy
	}

	fn child(self, quadrant: usize) -> Self {
		let quarter = self.half_extent * 0.5;
		let offset = match quadrant {
			0 => point(-quarter, -quarter),
			1 => point(quarter, -quarter),
			2 => point(-quarter, quarter),
			_ => point(quarter, quarter),
		};
		Self {
			center: self.center + offset,
			half_extent: quarter,
		}
	}

	fn quadrant_for(self, p: Point) -> usize {
		match (p.x >= self.center.x, p.y >= self.center.y) {
			(false, false) => 0,
			(true, false) => 1,
			(false, true) => 2,
			(true, true) => 3,
		}
	}
}

/// Region quadtree over node positions, carrying the aggregates the
/// many-body and collision forces need.
pub(super) struct QuadNode {
	pub(super) bounds: QuadBounds,
	pub(super) center_of_mass: Point,
	pub(super) count: usize,
	pub(super) max_radius: f64,
	pub(super) indices: Vec<usize>,
	pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
	pub(super) fn build(positions: &[Point], radii: &[f64]) -> Option<Self> {
		let bounds = QuadBounds::from_points(positions)?;
		let indices = (0..positions.len()).collect();
		Some(Self::build_node(bounds, indices, positions, radii, 0))
	}

	fn build_node(
		bounds: QuadBounds,
		indices: Vec<usize>,
		positions: &[Point],
		radii: &[f64],
		depth: usize,
	) -> Self {
		let mut center_of_mass = Point::ZERO;
		let mut max_radius = 0.0_f64;
		for &i in &indices {
			center_of_mass += positions[i];
			max_radius = max_radius.max(radii.get(i).copied().unwrap_or(0.0));
		}
		if !indices.is_empty() {
			center_of_mass = center_of_mass * (1.0 / indices.len() as f64);
		}

		let mut node = Self {
			bounds,
			center_of_mass,
			count: indices.len(),
			max_radius,
			indices,
			children: std::array::from_fn(|_| None),
		};

		if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
			return node;
		}

		let mut buckets = std::array::from_fn::<_, 4, _>(|_| Vec::new());
		for &i in &node.indices {
			buckets[bounds.quadrant_for(positions[i])].push(i);
		}

		// All points in one quadrant (e.g. coincident): keep as a leaf.
		if buckets.iter().filter(|b| !b.is_empty()).count() <= 1 {
			return node;
		}

		for (quadrant, bucket) in buckets.into_iter().enumerate() {
			if bucket.is_empty() {
				continue;
			}
			node.children[quadrant] = Some(Box::new(Self::build_node(
				bounds.child(quadrant),
				bucket,
				positions,
				radii,
				depth + 1,
			)));
		}
		node.indices.clear();
		node
	}

	pub(super) fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}

	pub(super) fn children(&self) -> impl Iterator<Item = &QuadNode> {
		self.children.iter().filter_map(|c| c.as_deref())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn collect_leaves(node: &QuadNode, out: &mut Vec<usize>) {
		if node.is_leaf() {
			out.extend(&node.indices);
		}
		for child in node.children() {
			collect_leaves(child, out);
		}
	}

	#[test]
	fn every_point_lands_in_exactly_one_leaf() {
		let positions: Vec<_> = (0..100)
			.map(|i| point((i * 37 % 101) as f64, (i * 53 % 97) as f64))
			.collect();
		let radii = vec![1.0; positions.len()];
		let tree = QuadNode::build(&positions, &radii).unwrap();
		assert_eq!(tree.count, 100);
		assert!(!tree.is_leaf());

		let mut seen = Vec::new();
		collect_leaves(&tree, &mut seen);
		seen.sort_unstable();
		assert_eq!(seen, (0..100).collect::<Vec<_>>());
	}

	#[test]
	fn coincident_points_stay_in_one_leaf() {
		let positions = vec![point(5.0, 5.0); 20];
		let radii = vec![2.0; 20];
		let tree = QuadNode::build(&positions, &radii).unwrap();
		assert!(tree.is_leaf());
		assert_eq!(tree.indices.len(), 20);
		assert_eq!(tree.max_radius, 2.0);
		assert_eq!(tree.center_of_mass, point(5.0, 5.0));
	}

	#[test]
	fn empty_or_non_finite_input_has_no_tree() {
		assert!(QuadNode::build(&[], &[]).is_none());
		assert!(QuadNode::build(&[point(f64::NAN, 0.0)], &[1.0]).is_none());
	}

	#[test]
	fn bounds_distance_is_zero_inside() {
		let bounds = QuadBounds {
			center: point(0.0, 0.0),
			half_extent: 2.0,
		};
		assert!(bounds.contains(point(1.0, -2.0)));
		assert_eq!(bounds.distance_sq_to(point(1.0, 1.0)), 0.0);
		assert_eq!(bounds.distance_sq_to(point(5.0, 6.0)), 9.0 + 16.0);
	}
}
