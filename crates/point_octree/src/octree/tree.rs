//! Octree - arena-backed tree of [`IndexNode`]s with concurrent insertion.
//!
//! Every node lives in a [`NodeArena`] and is addressed by a stable
//! [`NodeId`]. Children are referenced by id and each node keeps its
//! parent's id as a plain back-reference, so the arena is the only owner.
//!
//! # Insertion
//!
//! `insert` may be called from any number of threads at once. Each call
//! walks down from the start node:
//!
//! 1. Try to store the element locally (lock-free reject when full).
//! 2. Otherwise look up (or lazily create) the child for the element's
//!    octant and continue there.
//! 3. After the element is stored, bump `global_count` on every node of
//!    the walked path, deepest first.
//!
//! At most one node lock is held at any time, so insertion cannot deadlock.

use std::fmt::Write;
use std::ops::Index;

use smallvec::{smallvec, SmallVec};

use super::{IndexNode, Octant};
use crate::arena::{NodeArena, NodeId};
use crate::config::BuildOptions;
use crate::error::OctreeError;
use crate::partition::{AabbPartitioner, SpacePartitioner};

/// Node type stored by an [`Octree`].
pub type OctreeNode<E, P> = IndexNode<E, <P as SpacePartitioner<E>>::Volume>;

/// Concurrent capacity-bounded octree.
pub struct Octree<E, P: SpacePartitioner<E> = AabbPartitioner> {
  nodes: NodeArena<OctreeNode<E, P>>,
  partitioner: P,
  options: BuildOptions,
}

impl<E, P: SpacePartitioner<E>> Octree<E, P> {
  /// Create a tree whose root covers `bounds`.
  pub fn new(bounds: P::Volume, options: BuildOptions, partitioner: P) -> Self {
    let nodes = NodeArena::new();
    let root = nodes.push(IndexNode::create(bounds, &options, 0, None));
    debug_assert_eq!(root, NodeId::ROOT);
    Self {
      nodes,
      partitioner,
      options,
    }
  }

  /// Id of the root node.
  #[inline]
  pub fn root_id(&self) -> NodeId {
    NodeId::ROOT
  }

  #[inline]
  pub fn root(&self) -> &OctreeNode<E, P> {
    &self[NodeId::ROOT]
  }

  /// Look up a node. Returns None for ids from another tree.
  #[inline]
  pub fn node(&self, id: NodeId) -> Option<&OctreeNode<E, P>> {
    self.nodes.get(id)
  }

  pub fn options(&self) -> &BuildOptions {
    &self.options
  }

  pub fn partitioner(&self) -> &P {
    &self.partitioner
  }

  /// Number of nodes created so far.
  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// Number of elements inserted through the root. Exact at quiescence.
  pub fn len(&self) -> u64 {
    self.root().global_count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// All nodes in creation order.
  pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &OctreeNode<E, P>)> + '_ {
    self.nodes.iter()
  }

  /// Insert an element starting at the root.
  pub fn insert(&self, element: E) {
    self.insert_at(NodeId::ROOT, element);
  }

  /// Insert an element into the subtree rooted at `start`.
  ///
  /// # Panics
  /// Panics if `start` does not belong to this tree.
  pub fn insert_at(&self, start: NodeId, element: E) {
    let mut path: SmallVec<[NodeId; 16]> = SmallVec::new();
    let mut current = start;
    let mut element = element;

    loop {
      path.push(current);
      match self[current].try_store(element) {
        Ok(()) => break,
        Err(rejected) => {
          current = self.get_or_create_child(current, &rejected);
          element = rejected;
        }
      }
    }

    for id in path.iter().rev() {
      self[*id].record_routed();
    }
  }

  /// Child of `id` in the octant `element` falls into, created on first use.
  ///
  /// Concurrent callers for the same node and octant all get the same id;
  /// exactly one child is ever constructed per slot.
  pub fn get_or_create_child(&self, id: NodeId, element: &E) -> NodeId {
    let node = &self[id];
    let octant = self.partitioner.octant_of(node.bounds(), element);
    node.child_or_create(octant, || self.spawn_child(id, node, octant))
  }

  /// Existing child of `id` in `octant`.
  pub fn child(&self, id: NodeId, octant: Octant) -> Option<NodeId> {
    self.node(id)?.child(octant)
  }

  /// Runs under the parent's write lock.
  fn spawn_child(&self, parent_id: NodeId, parent: &OctreeNode<E, P>, octant: Octant) -> NodeId {
    let depth = match parent.depth().checked_add(1) {
      Some(depth) => depth,
      None => panic!("{}", OctreeError::DepthOverflow { depth: parent.depth() }),
    };
    let bounds = self.partitioner.sub_volume(parent.bounds(), octant);
    let child = self
      .nodes
      .push(IndexNode::create(bounds, &self.options, depth, Some(parent_id)));

    #[cfg(feature = "tracing")]
    tracing::trace!(
      parent = parent_id.index(),
      octant = octant.index(),
      child = child.index(),
      depth,
      "created octree node"
    );

    child
  }

  /// Depth-first pre-order traversal from the root, children in octant order.
  pub fn visit(&self, visit: impl FnMut(NodeId, &OctreeNode<E, P>)) {
    self.visit_from(NodeId::ROOT, visit);
  }

  /// Depth-first pre-order traversal of the subtree rooted at `start`.
  ///
  /// Not a snapshot: nodes created during the walk may or may not be seen.
  pub fn visit_from(&self, start: NodeId, mut visit: impl FnMut(NodeId, &OctreeNode<E, P>)) {
    let mut stack: SmallVec<[NodeId; 32]> = smallvec![start];
    while let Some(id) = stack.pop() {
      let node = &self[id];
      visit(id, node);
      stack.extend(node.children().iter().rev().flatten().copied());
    }
  }

  /// Call `f` on every stored element, node by node in traversal order.
  pub fn for_each_item(&self, mut f: impl FnMut(&E)) {
    self.visit(|_, node| node.with_items(|items| items.iter().for_each(&mut f)));
  }

  /// Copy every stored element out of the tree.
  pub fn collect_items(&self) -> Vec<E>
  where
    E: Clone,
  {
    let mut items = Vec::new();
    self.for_each_item(|item| items.push(item.clone()));
    items
  }

  /// Human-readable structure dump of the whole tree.
  pub fn describe(&self) -> String {
    self.describe_from(NodeId::ROOT)
  }

  /// Structure dump of the subtree rooted at `start`.
  ///
  /// One line per node: `depth - 1` spaces (none for the root), then
  /// `- element no: <local count> leaf: <is leaf>`.
  pub fn describe_from(&self, start: NodeId) -> String {
    let mut out = String::new();
    self.visit_from(start, |_, node| {
      let indent = node.depth().saturating_sub(1) as usize;
      let _ = writeln!(
        out,
        "{:indent$}- element no: {} leaf: {}",
        "",
        node.local_count(),
        node.is_leaf(),
        indent = indent
      );
    });
    out
  }
}

impl<E, P: SpacePartitioner<E>> Index<NodeId> for Octree<E, P> {
  type Output = OctreeNode<E, P>;

  fn index(&self, id: NodeId) -> &Self::Output {
    match self.nodes.get(id) {
      Some(node) => node,
      None => panic!("node {} does not belong to this octree", id),
    }
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
