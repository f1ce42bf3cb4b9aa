//! Error type for octree configuration and ingestion.
//!
//! Tree operations themselves are infallible; errors only arise at the
//! edges (loading options, spawning ingest workers).

use std::fmt;

/// Errors produced by this crate.
#[derive(Debug)]
pub enum OctreeError {
  /// Per-node capacity must be at least one element.
  ZeroCapacity,
  /// Failed to read a configuration file or spawn a worker thread.
  Io(std::io::Error),
  /// Configuration TOML was malformed.
  Parse(toml::de::Error),
  /// A child would sit deeper than the depth counter can represent.
  DepthOverflow {
    /// Depth of the node that tried to create a child.
    depth: u32,
  },
}

impl fmt::Display for OctreeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OctreeError::ZeroCapacity => write!(f, "max points per node must be greater than zero"),
      OctreeError::Io(err) => write!(f, "I/O error: {}", err),
      OctreeError::Parse(err) => write!(f, "invalid build options: {}", err),
      OctreeError::DepthOverflow { depth } => {
        write!(f, "octree depth overflow: node at depth {} cannot have children", depth)
      }
    }
  }
}

impl std::error::Error for OctreeError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      OctreeError::Io(err) => Some(err),
      OctreeError::Parse(err) => Some(err),
      _ => None,
    }
  }
}

impl From<std::io::Error> for OctreeError {
  fn from(err: std::io::Error) -> Self {
    OctreeError::Io(err)
  }
}

impl From<toml::de::Error> for OctreeError {
  fn from(err: toml::de::Error) -> Self {
    OctreeError::Parse(err)
  }
}
