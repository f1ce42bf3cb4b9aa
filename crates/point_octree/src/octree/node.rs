//! IndexNode - one node of the concurrent octree.
//!
//! A node owns its local element list and the ids of up to eight children.
//! Mutable state sits behind a per-node `RwLock`; the element counters are
//! atomics so the capacity check and statistics never take the lock.
//!
//! # Phases
//!
//! ```text
//! Leaf ──first overflow──▶ Internal
//! ```
//!
//! A leaf stores elements until `capacity` is reached. The first element
//! that does not fit creates a child and the node becomes internal for the
//! rest of its life. Elements already stored are never moved.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::Octant;
use crate::arena::NodeId;
use crate::config::BuildOptions;

/// State guarded by the node lock.
struct NodeState<E> {
  items: Vec<E>,
  children: [Option<NodeId>; 8],
  is_leaf: bool,
}

/// Octree node, generic over element type `E` and bounding volume `V`.
pub struct IndexNode<E, V> {
  bounds: V,
  parent: Option<NodeId>,
  depth: u32,
  capacity: usize,
  /// Mirrors `items.len()`; written only under the lock, read lock-free.
  local_count: AtomicUsize,
  /// Elements routed through this subtree. Exact at quiescence.
  global_count: AtomicU64,
  state: RwLock<NodeState<E>>,
}

impl<E, V> IndexNode<E, V> {
  /// Create an empty leaf.
  pub fn create(bounds: V, options: &BuildOptions, depth: u32, parent: Option<NodeId>) -> Self {
    Self {
      bounds,
      parent,
      depth,
      capacity: options.capacity(),
      local_count: AtomicUsize::new(0),
      global_count: AtomicU64::new(0),
      state: RwLock::new(NodeState {
        items: Vec::new(),
        children: [None; 8],
        is_leaf: true,
      }),
    }
  }

  /// Bounding volume covered by this node.
  #[inline]
  pub fn bounds(&self) -> &V {
    &self.bounds
  }

  /// Owning node, None for the root.
  #[inline]
  pub fn parent(&self) -> Option<NodeId> {
    self.parent
  }

  /// Distance from the root (root = 0).
  #[inline]
  pub fn depth(&self) -> u32 {
    self.depth
  }

  /// Maximum number of elements stored directly on this node.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Number of elements stored directly on this node.
  #[inline]
  pub fn local_count(&self) -> usize {
    self.local_count.load(Ordering::Acquire)
  }

  /// Number of elements inserted into this subtree.
  #[inline]
  pub fn global_count(&self) -> u64 {
    self.global_count.load(Ordering::Acquire)
  }

  /// True until the first child is created.
  pub fn is_leaf(&self) -> bool {
    self.read_state().is_leaf
  }

  /// Child in `octant`, if it exists.
  pub fn child(&self, octant: Octant) -> Option<NodeId> {
    self.read_state().children[octant.index()]
  }

  /// Snapshot of all child slots, indexed by octant.
  pub fn children(&self) -> [Option<NodeId>; 8] {
    self.read_state().children
  }

  /// Run `f` over the locally stored elements while holding a read lock.
  pub fn with_items<R>(&self, f: impl FnOnce(&[E]) -> R) -> R {
    f(&self.read_state().items)
  }

  /// Copy of the locally stored elements, in insertion order.
  pub fn items(&self) -> Vec<E>
  where
    E: Clone,
  {
    self.with_items(|items| items.to_vec())
  }

  /// Store `element` locally if there is room, otherwise hand it back.
  ///
  /// The lock-free count check rejects full nodes without locking; the
  /// check is repeated under the write lock so concurrent writers can never
  /// push the node past its capacity.
  pub(crate) fn try_store(&self, element: E) -> Result<(), E> {
    if self.local_count.load(Ordering::Acquire) >= self.capacity {
      return Err(element);
    }

    let mut state = self.write_state();
    if state.items.len() >= self.capacity {
      return Err(element);
    }
    state.items.push(element);
    self.local_count.fetch_add(1, Ordering::Release);
    Ok(())
  }

  /// Count one element as routed through this subtree.
  #[inline]
  pub(crate) fn record_routed(&self) {
    self.global_count.fetch_add(1, Ordering::AcqRel);
  }

  /// Child in `octant`, creating it with `make` if absent.
  ///
  /// Double-checked: a shared read serves the common case, and the slot is
  /// re-checked under the write lock so `make` runs at most once per slot.
  pub(crate) fn child_or_create(&self, octant: Octant, make: impl FnOnce() -> NodeId) -> NodeId {
    let existing = self.read_state().children[octant.index()];
    if let Some(child) = existing {
      return child;
    }

    let mut state = self.write_state();
    if let Some(child) = state.children[octant.index()] {
      return child;
    }
    let child = make();
    state.children[octant.index()] = Some(child);
    state.is_leaf = false;
    child
  }

  // Poisoning is ignored: every critical section leaves the state consistent.
  fn read_state(&self) -> RwLockReadGuard<'_, NodeState<E>> {
    self.state.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write_state(&self) -> RwLockWriteGuard<'_, NodeState<E>> {
    self.state.write().unwrap_or_else(PoisonError::into_inner)
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
