//! Octree module - concurrent capacity-bounded spatial subdivision.
//!
//! Nodes are created lazily as elements overflow their parent. Each node
//! stores at most `capacity` elements directly; once full, further elements
//! descend into the child covering their octant.
//!
//! # Octant Convention
//!
//! Octant ids are 0-7 with one bit per axis (bit 0 = +X, bit 1 = +Y,
//! bit 2 = +Z). Children are always visited in ascending octant order.
//!
//! # Module Structure
//!
//! - [`bounds`]: `DAabb3` - double precision node volumes
//! - [`octant`]: `Octant` - child slot index
//! - [`node`]: `IndexNode` - per-node storage, counters and lock
//! - [`tree`]: `Octree` - arena of nodes, insertion and traversal

pub mod bounds;
pub mod node;
pub mod octant;
pub mod tree;

// Re-exports
pub use bounds::DAabb3;
pub use node::IndexNode;
pub use octant::Octant;
pub use tree::{Octree, OctreeNode};
