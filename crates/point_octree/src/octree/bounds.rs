//! Axis-aligned bounding box with double precision for large point clouds.

use glam::DVec3;

use super::Octant;

/// Double-precision axis-aligned bounding box.
///
/// Used as the bounding volume of every octree node. Child volumes are the
/// eight halves of their parent split at the center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DAabb3 {
	/// Minimum corner (inclusive).
	pub min: DVec3,
	/// Maximum corner (inclusive).
	pub max: DVec3,
}

impl DAabb3 {
	/// Create a new AABB from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on all axes.
	pub fn new(min: DVec3, max: DVec3) -> Self {
		debug_assert!(
			min.x <= max.x && min.y <= max.y && min.z <= max.z,
			"AABB min must be <= max on all axes"
		);
		Self { min, max }
	}

	/// Create a new AABB from center and half-extents.
	pub fn from_center_half_extents(center: DVec3, half_extents: DVec3) -> Self {
		Self {
			min: center - half_extents,
			max: center + half_extents,
		}
	}

	/// Smallest AABB enclosing all points. Returns None for an empty iterator.
	pub fn from_points<I>(points: I) -> Option<Self>
	where
		I: IntoIterator<Item = DVec3>,
	{
		let mut points = points.into_iter();
		let first = points.next()?;
		let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
		Some(Self { min, max })
	}

	/// Expand to a cube sharing the same center, sized by the longest axis.
	///
	/// Cubic roots keep every descendant cubic, which is what tilers expect.
	pub fn to_cube(&self) -> Self {
		let half = self.size().max_element() * 0.5;
		Self::from_center_half_extents(self.center(), DVec3::splat(half))
	}

	/// Check if this AABB overlaps with another.
	///
	/// Two AABBs overlap if they share any interior or boundary points.
	#[inline]
	pub fn overlaps(&self, other: &DAabb3) -> bool {
		self.min.x <= other.max.x
			&& self.max.x >= other.min.x
			&& self.min.y <= other.max.y
			&& self.max.y >= other.min.y
			&& self.min.z <= other.max.z
			&& self.max.z >= other.min.z
	}

	/// Check if this AABB contains a point.
	#[inline]
	pub fn contains_point(&self, point: DVec3) -> bool {
		point.x >= self.min.x
			&& point.x <= self.max.x
			&& point.y >= self.min.y
			&& point.y <= self.max.y
			&& point.z >= self.min.z
			&& point.z <= self.max.z
	}

	/// Get the size of the AABB (max - min).
	#[inline]
	pub fn size(&self) -> DVec3 {
		self.max - self.min
	}

	/// Get the center of the AABB.
	#[inline]
	pub fn center(&self) -> DVec3 {
		(self.min + self.max) * 0.5
	}

	/// Octant of this box containing `point`.
	///
	/// Points on a center plane belong to the upper half. Points outside the
	/// box map to the nearest octant, so the result is always defined.
	#[inline]
	pub fn octant_of_point(&self, point: DVec3) -> Octant {
		let center = self.center();
		Octant::from_offsets(point.x >= center.x, point.y >= center.y, point.z >= center.z)
	}

	/// Sub-volume covered by `octant`.
	pub fn octant_bounds(&self, octant: Octant) -> Self {
		let center = self.center();
		let (upper_x, upper_y, upper_z) = octant.offsets();
		let pick = |upper: bool, min: f64, mid: f64, max: f64| {
			if upper {
				(mid, max)
			} else {
				(min, mid)
			}
		};
		let (min_x, max_x) = pick(upper_x, self.min.x, center.x, self.max.x);
		let (min_y, max_y) = pick(upper_y, self.min.y, center.y, self.max.y);
		let (min_z, max_z) = pick(upper_z, self.min.z, center.z, self.max.z);
		Self {
			min: DVec3::new(min_x, min_y, min_z),
			max: DVec3::new(max_x, max_y, max_z),
		}
	}
}
