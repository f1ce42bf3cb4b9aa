//! Read-only summary of a built octree.
//!
//! Collected by a single traversal once insertion traffic has stopped.
//! Collecting during insertion is allowed but yields a fuzzy picture.

use std::fmt;

use crate::arena::NodeId;
use crate::octree::Octree;
use crate::partition::SpacePartitioner;

/// Shape statistics of an octree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
  /// Nodes reachable from the root.
  pub node_count: usize,
  /// Nodes without children.
  pub leaf_count: usize,
  /// Nodes with at least one child.
  pub internal_count: usize,
  /// Sum of local element counts.
  pub stored_elements: u64,
  /// Root's global count (elements routed through the tree).
  pub routed_elements: u64,
  /// Deepest node depth (root = 0).
  pub max_depth: u32,
  /// Node count per depth (index = depth).
  pub nodes_per_depth: Vec<usize>,
  /// Elements stored directly on internal nodes.
  pub internal_elements: u64,
  /// Node storing the most elements, with its local count.
  pub fullest_node: Option<(NodeId, usize)>,
}

impl TreeStats {
  /// Walk the whole tree once.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::stats"))]
  pub fn collect<E, P: SpacePartitioner<E>>(tree: &Octree<E, P>) -> Self {
    let mut stats = TreeStats {
      routed_elements: tree.len(),
      ..Default::default()
    };

    tree.visit(|id, node| {
      let local = node.local_count();
      let depth = node.depth() as usize;

      stats.node_count += 1;
      stats.stored_elements += local as u64;
      stats.max_depth = stats.max_depth.max(node.depth());
      if stats.nodes_per_depth.len() <= depth {
        stats.nodes_per_depth.resize(depth + 1, 0);
      }
      stats.nodes_per_depth[depth] += 1;

      if node.is_leaf() {
        stats.leaf_count += 1;
      } else {
        stats.internal_count += 1;
        stats.internal_elements += local as u64;
      }

      if stats.fullest_node.map_or(true, |(_, most)| local > most) {
        stats.fullest_node = Some((id, local));
      }
    });

    stats
  }

  /// Stored and routed counts agree (always true at quiescence).
  pub fn is_consistent(&self) -> bool {
    self.stored_elements == self.routed_elements
  }

  /// Mean number of elements per leaf node.
  pub fn mean_leaf_fill(&self) -> f64 {
    if self.leaf_count == 0 {
      0.0
    } else {
      (self.stored_elements - self.internal_elements) as f64 / self.leaf_count as f64
    }
  }
}

impl fmt::Display for TreeStats {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "nodes:            {}", self.node_count)?;
    writeln!(f, "  leaves:         {}", self.leaf_count)?;
    writeln!(f, "  internal:       {}", self.internal_count)?;
    writeln!(f, "elements:         {}", self.stored_elements)?;
    writeln!(f, "  on internal:    {}", self.internal_elements)?;
    writeln!(f, "  mean leaf fill: {:.1}", self.mean_leaf_fill())?;
    writeln!(f, "max depth:        {}", self.max_depth)?;
    for (depth, count) in self.nodes_per_depth.iter().enumerate() {
      writeln!(f, "  depth {:>3}:      {}", depth, count)?;
    }
    Ok(())
  }
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;
