//! NodeArena - append-only, lock-free storage addressed by stable ids.
//!
//! Slots live in segments whose lengths double (64, 128, 256, ...), so an
//! index never moves once written and readers never block writers. A
//! segment is allocated the first time an index inside it is reserved.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// log2 of the first segment's length.
const FIRST_SEGMENT_BITS: u32 = 6;
const FIRST_SEGMENT_LEN: usize = 1 << FIRST_SEGMENT_BITS;
/// Enough segments to address every `usize` index.
const SEGMENT_COUNT: usize = (usize::BITS - FIRST_SEGMENT_BITS) as usize;

/// Stable handle to a value stored in a [`NodeArena`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(usize);

impl NodeId {
  /// The first id handed out by an arena. Octrees store their root here.
  pub const ROOT: NodeId = NodeId(0);

  #[cfg(test)]
  pub(crate) fn from_index(index: usize) -> Self {
    Self(index)
  }

  /// Position in allocation order.
  #[inline]
  pub fn index(self) -> usize {
    self.0
  }
}

impl fmt::Display for NodeId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

type Segment<T> = Box<[OnceLock<T>]>;

/// Append-only arena shared between threads.
pub struct NodeArena<T> {
  segments: [OnceLock<Segment<T>>; SEGMENT_COUNT],
  reserved: AtomicUsize,
}

/// Segment number and offset of a flat index.
#[inline]
fn locate(index: usize) -> (usize, usize) {
  let biased = index + FIRST_SEGMENT_LEN;
  let segment = (usize::BITS - 1 - biased.leading_zeros() - FIRST_SEGMENT_BITS) as usize;
  (segment, biased - (FIRST_SEGMENT_LEN << segment))
}

#[inline]
fn segment_len(segment: usize) -> usize {
  FIRST_SEGMENT_LEN << segment
}

impl<T> NodeArena<T> {
  /// Create an empty arena. No segment is allocated until the first push.
  pub fn new() -> Self {
    Self {
      segments: std::array::from_fn(|_| OnceLock::new()),
      reserved: AtomicUsize::new(0),
    }
  }

  /// Store `value` and return its id.
  ///
  /// The value is visible through [`get`](Self::get) before this returns.
  pub fn push(&self, value: T) -> NodeId {
    let index = self.reserved.fetch_add(1, Ordering::Relaxed);
    let (segment, offset) = locate(index);
    let slots = self.segments[segment].get_or_init(|| {
      (0..segment_len(segment)).map(|_| OnceLock::new()).collect()
    });
    let stored = slots[offset].set(value);
    debug_assert!(stored.is_ok(), "arena slot {} written twice", index);
    NodeId(index)
  }

  /// Look up a value. Returns None for ids not (yet) published.
  #[inline]
  pub fn get(&self, id: NodeId) -> Option<&T> {
    let (segment, offset) = locate(id.0);
    self.segments[segment].get()?.get(offset)?.get()
  }

  /// Number of ids handed out so far, including pushes still in flight.
  pub fn len(&self) -> usize {
    self.reserved.load(Ordering::Acquire)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Iterate over published values in allocation order.
  pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> + '_ {
    (0..self.len()).filter_map(move |index| {
      let id = NodeId(index);
      self.get(id).map(|value| (id, value))
    })
  }
}

impl<T> Default for NodeArena<T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
#[path = "arena_test.rs"]
mod arena_test;
