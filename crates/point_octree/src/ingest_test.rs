use std::collections::HashSet;

use super::*;
use crate::element::PointElement;
use crate::partition::AabbPartitioner;
use crate::stats::TreeStats;
use crate::test_utils::{
  assert_tree_consistent, point_tree, scatter_points, scripted_tree, unit_cube, Probe,
  ScriptedPartitioner,
};

// =========================================================================
// rayon bulk insertion
// =========================================================================

#[test]
fn test_insert_par_conserves_elements() {
  let tree = point_tree(64);
  let inserted = insert_par(&tree, scatter_points(20_000, 11));

  assert_eq!(inserted, 20_000);
  assert_eq!(tree.len(), 20_000);
  assert!(TreeStats::collect(&tree).is_consistent());
  assert_tree_consistent(&tree);
}

/// Parallel insertion stores exactly the same multiset as serial insertion.
#[test]
fn test_insert_par_matches_serial_contents() {
  let probes: Vec<Probe> = (0..5_000).map(Probe::scattered).collect();

  let serial = scripted_tree(5);
  for probe in &probes {
    serial.insert(*probe);
  }
  let parallel = scripted_tree(5);
  insert_par(&parallel, probes.clone());

  let mut serial_ids: Vec<usize> = serial.collect_items().iter().map(|p| p.id).collect();
  let mut parallel_ids: Vec<usize> = parallel.collect_items().iter().map(|p| p.id).collect();
  serial_ids.sort_unstable();
  parallel_ids.sort_unstable();
  assert_eq!(serial_ids, parallel_ids);
  assert_tree_consistent(&parallel);
}

#[test]
fn test_build_par() {
  let options = BuildOptions::new(8).unwrap();
  let tree = build_par(unit_cube(), options, AabbPartitioner, scatter_points(3_000, 5));

  assert_eq!(tree.len(), 3_000);
  assert_eq!(tree.collect_items().len(), 3_000);
}

// =========================================================================
// Channel ingestion
// =========================================================================

/// Many producers, few workers: every element arrives exactly once.
#[test]
fn test_channel_ingest_many_producers() {
  let tree = Arc::new(scripted_tree(16));
  let ingest = ChannelIngest::start(Arc::clone(&tree), 3, 64).unwrap();

  let producers = 6;
  let per_producer = 1_000;
  std::thread::scope(|s| {
    for p in 0..producers {
      let sender = ingest.sender();
      s.spawn(move || {
        for i in 0..per_producer {
          sender.send(Probe::scattered(p * per_producer + i)).unwrap();
        }
      });
    }
  });

  let report = ingest.finish();
  let total = producers * per_producer;
  assert_eq!(report.inserted, total as u64);
  assert_eq!(report.workers, 3);

  let ids: HashSet<usize> = tree.collect_items().iter().map(|p| p.id).collect();
  assert_eq!(ids.len(), total);
  assert_eq!(tree.len(), total as u64);
  assert_tree_consistent(&*tree);
}

#[test]
fn test_channel_ingest_send_from_owner() {
  let tree = Arc::new(point_tree(4));
  let ingest = ChannelIngest::start(Arc::clone(&tree), 2, 8).unwrap();

  for point in scatter_points(500, 1) {
    ingest.send(point).unwrap();
  }
  let report = ingest.finish();

  assert_eq!(report.inserted, 500);
  assert_eq!(tree.len(), 500);
  assert!(report.throughput() >= 0.0);
}

/// Zero workers still drains the channel.
#[test]
fn test_channel_ingest_zero_workers_uses_one() {
  let tree: Arc<Octree<Probe, ScriptedPartitioner>> = Arc::new(scripted_tree(2));
  let ingest = ChannelIngest::start(Arc::clone(&tree), 0, 1).unwrap();

  for id in 0..10 {
    ingest.send(Probe::toward(id, 3)).unwrap();
  }

  let report = ingest.finish();
  assert_eq!(report.workers, 1);
  assert_eq!(report.inserted, 10);
}

#[test]
fn test_channel_ingest_empty() {
  let tree: Arc<Octree<PointElement>> = Arc::new(point_tree(4));
  let report = ChannelIngest::start(Arc::clone(&tree), 2, 4).unwrap().finish();

  assert_eq!(report.inserted, 0);
  assert!(tree.is_empty());
}

#[test]
fn test_report_throughput_zero_elapsed() {
  let report = IngestReport {
    inserted: 10,
    workers: 1,
    elapsed: Duration::ZERO,
  };
  assert_eq!(report.throughput(), 0.0);
}
