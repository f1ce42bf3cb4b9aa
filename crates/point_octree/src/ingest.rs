//! Parallel ingestion - feeding many elements into a shared octree.
//!
//! Two entry points:
//! - [`insert_par`]: bulk insert anything rayon can iterate in parallel.
//! - [`ChannelIngest`]: streaming insert. Any number of producers send
//!   elements through a bounded crossbeam channel; a fixed set of worker
//!   threads drains it into the tree.
//!
//! # Usage
//!
//! ```ignore
//! let tree = Arc::new(Octree::new(bounds, options, AabbPartitioner));
//! let ingest = ChannelIngest::start(Arc::clone(&tree), 4, 1024)?;
//!
//! let sender = ingest.sender();
//! std::thread::spawn(move || {
//!     for point in reader {
//!         sender.send(point).ok();
//!     }
//! });
//!
//! let report = ingest.finish();
//! println!("{} points in {:?}", report.inserted, report.elapsed);
//! ```

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{self as channel, SendError, Sender};
use rayon::prelude::*;
use web_time::Instant;

use crate::config::BuildOptions;
use crate::error::OctreeError;
use crate::octree::Octree;
use crate::partition::SpacePartitioner;

/// Insert every element of `elements` using rayon's thread pool.
///
/// Returns the number of elements inserted.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "ingest::insert_par"))]
pub fn insert_par<E, P, I>(tree: &Octree<E, P>, elements: I) -> u64
where
	I: IntoParallelIterator<Item = E>,
	E: Send + Sync,
	P: SpacePartitioner<E> + Sync,
	P::Volume: Send + Sync,
{
	elements
		.into_par_iter()
		.map(|element| {
			tree.insert(element);
			1u64
		})
		.sum()
}

/// Build a new tree from `elements` in parallel.
pub fn build_par<E, P>(bounds: P::Volume, options: BuildOptions, partitioner: P, elements: Vec<E>) -> Octree<E, P>
where
	E: Send + Sync,
	P: SpacePartitioner<E> + Sync,
	P::Volume: Send + Sync,
{
	let tree = Octree::new(bounds, options, partitioner);
	insert_par(&tree, elements);
	tree
}

/// Summary of a finished [`ChannelIngest`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IngestReport {
	/// Elements inserted by all workers.
	pub inserted: u64,
	/// Worker threads used.
	pub workers: usize,
	/// Time from start until the last worker finished.
	pub elapsed: Duration,
}

impl IngestReport {
	/// Inserted elements per second.
	pub fn throughput(&self) -> f64 {
		let secs = self.elapsed.as_secs_f64();
		if secs > 0.0 {
			self.inserted as f64 / secs
		} else {
			0.0
		}
	}
}

/// Cloneable producer handle of a [`ChannelIngest`].
pub struct IngestSender<E> {
	sender: Sender<E>,
}

impl<E> IngestSender<E> {
	/// Queue an element, blocking while the channel is full.
	///
	/// Fails only after the ingest has finished.
	pub fn send(&self, element: E) -> Result<(), SendError<E>> {
		self.sender.send(element)
	}
}

impl<E> Clone for IngestSender<E> {
	fn clone(&self) -> Self {
		Self {
			sender: self.sender.clone(),
		}
	}
}

/// Streaming ingestion into a shared octree.
///
/// Workers stop once every sender (including the one held here) has been
/// dropped and the channel is drained; [`finish`](Self::finish) drops the
/// internal sender and waits for them.
pub struct ChannelIngest<E> {
	sender: Sender<E>,
	workers: Vec<JoinHandle<u64>>,
	started: Instant,
}

impl<E: Send + Sync + 'static> ChannelIngest<E> {
	/// Spawn `workers` threads draining a channel of `capacity` slots.
	///
	/// A worker count of zero is treated as one.
	pub fn start<P>(tree: Arc<Octree<E, P>>, workers: usize, capacity: usize) -> Result<Self, OctreeError>
	where
		P: SpacePartitioner<E> + Send + Sync + 'static,
		P::Volume: Send + Sync,
	{
		let (sender, receiver) = channel::bounded::<E>(capacity);
		let worker_count = workers.max(1);

		let workers = (0..worker_count)
			.map(|index| {
				let tree = Arc::clone(&tree);
				let receiver = receiver.clone();
				std::thread::Builder::new()
					.name(format!("octree-ingest-{}", index))
					.spawn(move || {
						let mut inserted = 0u64;
						for element in receiver.iter() {
							tree.insert(element);
							inserted += 1;
						}
						inserted
					})
			})
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Self {
			sender,
			workers,
			started: Instant::now(),
		})
	}

	/// New producer handle.
	pub fn sender(&self) -> IngestSender<E> {
		IngestSender {
			sender: self.sender.clone(),
		}
	}

	/// Queue an element from the owning thread.
	pub fn send(&self, element: E) -> Result<(), SendError<E>> {
		self.sender.send(element)
	}

	/// Close the channel and wait for the workers to drain it.
	///
	/// Blocks until every outstanding [`IngestSender`] is dropped too.
	///
	/// # Panics
	/// Re-raises a panic from any worker.
	#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "ingest::finish"))]
	pub fn finish(self) -> IngestReport {
		let Self {
			sender,
			workers,
			started,
		} = self;
		drop(sender);

		let worker_count = workers.len();
		let inserted = workers
			.into_iter()
			.map(|handle| match handle.join() {
				Ok(count) => count,
				Err(panic) => std::panic::resume_unwind(panic),
			})
			.sum();

		let report = IngestReport {
			inserted,
			workers: worker_count,
			elapsed: started.elapsed(),
		};

		#[cfg(feature = "tracing")]
		tracing::debug!(
			inserted = report.inserted,
			workers = report.workers,
			elapsed_ms = report.elapsed.as_millis() as u64,
			"ingest finished"
		);

		report
	}
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod ingest_test;
