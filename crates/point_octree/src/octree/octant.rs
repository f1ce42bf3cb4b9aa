//! Octant - one of the eight equal subdivisions of a node's volume.

use std::fmt;

/// Octant index in `0..8`.
///
/// Bits represent the upper half along each axis:
/// - bit 0: +X
/// - bit 1: +Y
/// - bit 2: +Z
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Octant(u8);

impl Octant {
  /// All eight octants in ascending order.
  pub const ALL: [Octant; 8] = [
    Octant(0),
    Octant(1),
    Octant(2),
    Octant(3),
    Octant(4),
    Octant(5),
    Octant(6),
    Octant(7),
  ];

  /// Create an octant from its raw index. Returns None outside `0..8`.
  pub fn new(index: u8) -> Option<Self> {
    (index < 8).then_some(Self(index))
  }

  /// Build an octant from per-axis "upper half" flags.
  #[inline]
  pub const fn from_offsets(upper_x: bool, upper_y: bool, upper_z: bool) -> Self {
    Self((upper_x as u8) | ((upper_y as u8) << 1) | ((upper_z as u8) << 2))
  }

  /// Per-axis "upper half" flags (x, y, z).
  #[inline]
  pub const fn offsets(self) -> (bool, bool, bool) {
    (self.0 & 1 != 0, self.0 & 2 != 0, self.0 & 4 != 0)
  }

  /// Slot index into a node's child array.
  #[inline]
  pub const fn index(self) -> usize {
    self.0 as usize
  }

  /// Raw octant id.
  #[inline]
  pub const fn raw(self) -> u8 {
    self.0
  }
}

impl fmt::Display for Octant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
