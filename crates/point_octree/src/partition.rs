//! Space partitioning - maps elements to octants and octants to volumes.

use crate::element::Positioned;
use crate::octree::{DAabb3, Octant};

/// Geometry collaborator of the octree.
///
/// Implementations must be deterministic: the same element against the same
/// volume always yields the same octant.
pub trait SpacePartitioner<E> {
  /// Bounding volume type stored on every node.
  type Volume;

  /// Octant of `volume` that `element` belongs to.
  fn octant_of(&self, volume: &Self::Volume, element: &E) -> Octant;

  /// Bounding volume of `octant` within `volume`.
  fn sub_volume(&self, volume: &Self::Volume, octant: Octant) -> Self::Volume;
}

/// Default partitioner: splits a [`DAabb3`] at its center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AabbPartitioner;

impl<E: Positioned> SpacePartitioner<E> for AabbPartitioner {
  type Volume = DAabb3;

  #[inline]
  fn octant_of(&self, volume: &DAabb3, element: &E) -> Octant {
    volume.octant_of_point(element.position())
  }

  #[inline]
  fn sub_volume(&self, volume: &DAabb3, octant: Octant) -> DAabb3 {
    volume.octant_bounds(octant)
  }
}

#[cfg(test)]
mod tests {
  use glam::DVec3;

  use super::*;
  use crate::element::PointElement;

  #[test]
  fn test_aabb_partitioner_matches_bounds() {
    let volume = DAabb3::new(DVec3::ZERO, DVec3::splat(2.0));
    let point = PointElement::new(DVec3::new(1.5, 0.5, 1.5));

    let octant = AabbPartitioner.octant_of(&volume, &point);
    assert_eq!(octant.raw(), 5);

    let child = <AabbPartitioner as SpacePartitioner<PointElement>>::sub_volume(
      &AabbPartitioner,
      &volume,
      octant,
    );
    assert!(child.contains_point(point.position));
    assert_eq!(child.min, DVec3::new(1.0, 0.0, 1.0));
    assert_eq!(child.max, DVec3::new(2.0, 1.0, 2.0));
  }
}
