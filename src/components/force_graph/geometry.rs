use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

pub const fn point(x: f64, y: f64) -> Point {
	Point { x, y }
}

impl Point {
	pub const ZERO: Point = point(0.0, 0.0);

	pub fn length_sq(self) -> f64 {
		self.x * self.x + self.y * self.y
	}

	pub fn length(self) -> f64 {
		self.length_sq().sqrt()
	}

	pub fn distance(self, other: Point) -> f64 {
		(other - self).length()
	}

	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}

	/// Shortest distance from `self` to the segment `a`–`b`.
	pub fn distance_to_segment(self, a: Point, b: Point) -> f64 {
		let ab = b - a;
		let len_sq = ab.length_sq();
		if len_sq == 0.0 {
			return self.distance(a);
		}
		let t = (((self - a).x * ab.x + (self - a).y * ab.y) / len_sq).clamp(0.0, 1.0);
		self.distance(a + ab * t)
	}
}

impl Add for Point {
	type Output = Point;
	fn add(self, rhs: Point) -> Point {
		point(self.x + rhs.x, self.y + rhs.y)
	}
}

impl AddAssign for Point {
	fn add_assign(&mut self, rhs: Point) {
		self.x += rhs.x;
		self.y += rhs.y;
	}
}

impl Sub for Point {
	type Output = Point;
	fn sub(self, rhs: Point) -> Point {
		point(self.x - rhs.x, self.y - rhs.y)
	}
}

impl SubAssign for Point {
	fn sub_assign(&mut self, rhs: Point) {
		self.x -= rhs.x;
		self.y -= rhs.y;
	}
}

impl Mul<f64> for Point {
	type Output = Point;
	fn mul(self, rhs: f64) -> Point {
		point(self.x * rhs, self.y * rhs)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn segment_distance() {
		let a = point(0.0, 0.0);
		let b = point(10.0, 0.0);
		assert_eq!(point(5.0, 3.0).distance_to_segment(a, b), 3.0);
		assert_eq!(point(-4.0, 3.0).distance_to_segment(a, b), 5.0);
		assert_eq!(point(1.0, 1.0).distance_to_segment(a, a), 2.0_f64.sqrt());
	}
}
