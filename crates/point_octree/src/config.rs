//! BuildOptions - per-node capacity and its TOML representation.

use std::num::NonZeroUsize;
use std::path::Path;

use serde::Deserialize;

use crate::error::OctreeError;

/// Default number of points a node stores before routing overflow to children.
pub const DEFAULT_MAX_POINTS_PER_NODE: usize = 50_000;

/// Options shared by every node of a tree.
///
/// Capacity is validated on construction, so a `BuildOptions` value always
/// carries a positive capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawBuildOptions")]
pub struct BuildOptions {
  capacity: NonZeroUsize,
}

/// On-disk shape of [`BuildOptions`].
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBuildOptions {
  #[serde(default = "default_max_points_per_node")]
  max_points_per_node: usize,
}

fn default_max_points_per_node() -> usize {
  DEFAULT_MAX_POINTS_PER_NODE
}

impl TryFrom<RawBuildOptions> for BuildOptions {
  type Error = OctreeError;

  fn try_from(raw: RawBuildOptions) -> Result<Self, Self::Error> {
    Self::new(raw.max_points_per_node)
  }
}

impl BuildOptions {
  /// Create options with the given per-node capacity.
  ///
  /// Returns [`OctreeError::ZeroCapacity`] for a capacity of zero.
  pub fn new(capacity: usize) -> Result<Self, OctreeError> {
    NonZeroUsize::new(capacity)
      .map(Self::with_capacity)
      .ok_or(OctreeError::ZeroCapacity)
  }

  /// Create options from an already validated capacity.
  pub const fn with_capacity(capacity: NonZeroUsize) -> Self {
    Self { capacity }
  }

  /// Maximum number of elements a node stores locally.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity.get()
  }

  /// Parse options from TOML text.
  pub fn from_toml_str(content: &str) -> Result<Self, OctreeError> {
    Ok(toml::from_str(content)?)
  }

  /// Load options from a TOML file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, OctreeError> {
    let content = std::fs::read_to_string(path)?;
    Self::from_toml_str(&content)
  }
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      capacity: NonZeroUsize::new(DEFAULT_MAX_POINTS_PER_NODE).unwrap_or(NonZeroUsize::MIN),
    }
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
