//! point_octree - concurrent capacity-bounded octree for point cloud tiling
//!
//! This crate builds the spatial index at the heart of a point-cloud tiler.
//! Points arrive from many producers at once and are inserted into a shared
//! octree that subdivides space lazily so that no node stores more than a
//! configured number of points.
//!
//! # Features
//!
//! - **Lock-local insertion**: each node has its own `RwLock`; insertion
//!   never holds two node locks and there is no global lock
//! - **Lazy subdivision**: children are created on the first overflow into
//!   their octant, exactly once even under contention
//! - **Stable node ids**: nodes live in an append-only arena and are
//!   addressed by `NodeId`
//! - **Parallel ingestion**: rayon bulk insertion and a crossbeam channel
//!   front-end for streaming producers
//!
//! # Example
//!
//! ```ignore
//! use glam::DVec3;
//! use point_octree::{AabbPartitioner, BuildOptions, DAabb3, Octree, PointElement};
//!
//! let bounds = DAabb3::new(DVec3::ZERO, DVec3::splat(100.0));
//! let tree = Octree::new(bounds, BuildOptions::new(5_000)?, AabbPartitioner);
//!
//! tree.insert(PointElement::new(DVec3::new(1.0, 2.0, 3.0)));
//!
//! print!("{}", tree.describe());
//! ```

pub mod arena;
pub mod config;
pub mod element;
pub mod error;
pub mod partition;

// Octree nodes, insertion and traversal
pub mod octree;

// Parallel front-ends
pub mod ingest;

// Read-only summaries of a built tree
pub mod stats;

#[cfg(test)]
mod test_utils;

// Re-export commonly used items
pub use arena::{NodeArena, NodeId};
pub use config::{BuildOptions, DEFAULT_MAX_POINTS_PER_NODE};
pub use element::{PointElement, Positioned};
pub use error::OctreeError;
pub use ingest::{build_par, insert_par, ChannelIngest, IngestReport, IngestSender};
pub use octree::{DAabb3, IndexNode, Octant, Octree, OctreeNode};
pub use partition::{AabbPartitioner, SpacePartitioner};
pub use stats::TreeStats;
