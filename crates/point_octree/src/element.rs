//! Elements stored in the octree.
//!
//! The tree itself is generic over its element type. Anything with a
//! position can be indexed by the default [`AabbPartitioner`].
//!
//! [`AabbPartitioner`]: crate::partition::AabbPartitioner

use std::sync::Arc;

use glam::DVec3;

/// An element with a position in octree space.
pub trait Positioned {
  /// Position used to pick the element's octant.
  fn position(&self) -> DVec3;
}

impl Positioned for DVec3 {
  #[inline]
  fn position(&self) -> DVec3 {
    *self
  }
}

impl<T: Positioned + ?Sized> Positioned for &T {
  #[inline]
  fn position(&self) -> DVec3 {
    (**self).position()
  }
}

impl<T: Positioned + ?Sized> Positioned for Box<T> {
  #[inline]
  fn position(&self) -> DVec3 {
    (**self).position()
  }
}

impl<T: Positioned + ?Sized> Positioned for Arc<T> {
  #[inline]
  fn position(&self) -> DVec3 {
    (**self).position()
  }
}

/// A single point-cloud sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointElement {
  /// Position in world units
  pub position: DVec3,
  /// RGB colour
  pub color: [u8; 3],
  /// Return intensity
  pub intensity: u8,
  /// Classification code (ASPRS convention)
  pub classification: u8,
}

impl PointElement {
  /// Create an uncoloured point at `position`.
  pub fn new(position: DVec3) -> Self {
    Self {
      position,
      ..Default::default()
    }
  }

  pub fn with_color(mut self, color: [u8; 3]) -> Self {
    self.color = color;
    self
  }

  pub fn with_intensity(mut self, intensity: u8) -> Self {
    self.intensity = intensity;
    self
  }

  pub fn with_classification(mut self, classification: u8) -> Self {
    self.classification = classification;
    self
  }
}

impl Positioned for PointElement {
  #[inline]
  fn position(&self) -> DVec3 {
    self.position
  }
}
