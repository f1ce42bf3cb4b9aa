//! Shared fixtures for unit tests.
//!
//! `ScriptedPartitioner` routes `Probe`s through fixed octants so tests can
//! describe tree shapes exactly, independent of any geometry.

use glam::DVec3;

use crate::arena::NodeId;
use crate::config::BuildOptions;
use crate::element::PointElement;
use crate::octree::{DAabb3, Octant, Octree};
use crate::partition::{AabbPartitioner, SpacePartitioner};

/// Test element whose octant at depth `d` is `route[d % 8]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Probe {
  pub id: usize,
  pub route: [u8; 8],
}

impl Probe {
  /// Probe that takes the same octant at every depth.
  pub fn toward(id: usize, octant: u8) -> Self {
    Self {
      id,
      route: [octant; 8],
    }
  }

  /// Probe with a pseudo-random route derived from its id.
  pub fn scattered(id: usize) -> Self {
    let mut state = id as u64 ^ 0x9E37_79B9_7F4A_7C15;
    let mut route = [0u8; 8];
    for octant in &mut route {
      state = lcg(state);
      *octant = (state >> 61) as u8;
    }
    Self { id, route }
  }
}

/// Partitioner whose volume is just the node depth.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScriptedPartitioner;

impl SpacePartitioner<Probe> for ScriptedPartitioner {
  type Volume = u32;

  fn octant_of(&self, depth: &u32, probe: &Probe) -> Octant {
    Octant::ALL[probe.route[*depth as usize % 8] as usize]
  }

  fn sub_volume(&self, depth: &u32, _octant: Octant) -> u32 {
    depth + 1
  }
}

pub fn scripted_tree(capacity: usize) -> Octree<Probe, ScriptedPartitioner> {
  Octree::new(0, BuildOptions::new(capacity).unwrap(), ScriptedPartitioner)
}

pub fn point_tree(capacity: usize) -> Octree<PointElement> {
  Octree::new(unit_cube(), BuildOptions::new(capacity).unwrap(), AabbPartitioner)
}

/// Cube from (0,0,0) to (1,1,1).
pub fn unit_cube() -> DAabb3 {
  DAabb3::new(DVec3::ZERO, DVec3::ONE)
}

fn lcg(state: u64) -> u64 {
  state
    .wrapping_mul(6_364_136_223_846_793_005)
    .wrapping_add(1_442_695_040_888_963_407)
}

/// Deterministic pseudo-random points inside the unit cube.
pub fn scatter_points(count: usize, seed: u64) -> Vec<PointElement> {
  let mut state = seed;
  let mut next = || {
    state = lcg(state);
    (state >> 11) as f64 / (1u64 << 53) as f64
  };
  (0..count)
    .map(|i| {
      PointElement::new(DVec3::new(next(), next(), next())).with_intensity((i % 256) as u8)
    })
    .collect()
}

/// Sum of local counts over the subtree rooted at `id`.
pub fn subtree_stored<E, P: SpacePartitioner<E>>(tree: &Octree<E, P>, id: NodeId) -> u64 {
  let mut stored = 0;
  tree.visit_from(id, |_, node| stored += node.local_count() as u64);
  stored
}

/// Every node's global count equals the elements stored in its subtree,
/// and every node respects its capacity.
pub fn assert_tree_consistent<E, P: SpacePartitioner<E>>(tree: &Octree<E, P>) {
  tree.visit(|id, node| {
    assert_eq!(
      node.global_count(),
      subtree_stored(tree, id),
      "global count of node {} disagrees with its subtree",
      id
    );
    assert!(
      node.local_count() <= node.capacity(),
      "node {} holds {} elements, capacity {}",
      id,
      node.local_count(),
      node.capacity()
    );
    node.with_items(|items| assert_eq!(items.len(), node.local_count()));
  });
}
