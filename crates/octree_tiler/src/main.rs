//! Point cloud octree tiler.
//!
//! Reads plain-text point files, indexes them into a capacity-bounded octree
//! with parallel insertion and prints a summary of the resulting tree.
//!
//! Set `RUST_LOG=debug` to see ingestion logs from the octree crate.

mod config;
mod points;

use anyhow::{Context, Result};
use clap::Parser;
use point_octree::{
	insert_par, AabbPartitioner, BuildOptions, ChannelIngest, DAabb3, Octree, PointElement, TreeStats,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use config::{Config, IngestMode};

/// Point cloud octree tiler.
#[derive(Parser, Debug)]
#[command(name = "octree_tiler")]
#[command(about = "Indexes point files into a capacity-bounded octree")]
struct Args {
	/// Point files (`x y z [r g b [intensity [classification]]]` per line).
	#[arg(required = true)]
	inputs: Vec<PathBuf>,

	/// Path to configuration TOML file.
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Override `tree.max_points_per_node`.
	#[arg(long)]
	max_points_per_node: Option<usize>,

	/// Override `ingest.workers`.
	#[arg(short, long)]
	workers: Option<usize>,

	/// Print the node dump after building.
	#[arg(long)]
	describe: bool,
}

fn main() -> Result<()> {
	env_logger::init();
	let args = Args::parse();

	let mut config = match &args.config {
		Some(path) => {
			println!("Loading config from: {}", path.display());
			Config::load(path)?
		}
		None => Config::default(),
	};
	if let Some(capacity) = args.max_points_per_node {
		config.tree = BuildOptions::new(capacity).context("Invalid --max-points-per-node")?;
	}
	if let Some(workers) = args.workers {
		config.ingest.workers = workers;
	}

	let mut points = Vec::new();
	for input in &args.inputs {
		let loaded = points::load(input)?;
		println!("Read {} points from {}", loaded.len(), input.display());
		points.extend(loaded);
	}

	let bounds = DAabb3::from_points(points.iter().map(|p| p.position))
		.context("Input files contain no points")?
		.to_cube();
	println!(
		"Indexing {} points into [{} .. {}], max {} per node",
		points.len(),
		bounds.min,
		bounds.max,
		config.tree.capacity()
	);

	let started = Instant::now();
	let tree = build(&config, bounds, points)?;
	println!("Built in {:.2?}\n", started.elapsed());

	let stats = TreeStats::collect(&*tree);
	print!("{}", stats);
	if !stats.is_consistent() {
		anyhow::bail!("Subtree counts disagree with stored elements");
	}

	if args.describe {
		println!();
		print!("{}", tree.describe());
	}

	Ok(())
}

/// Insert `points` with the configured front-end.
fn build(config: &Config, bounds: DAabb3, points: Vec<PointElement>) -> Result<Arc<Octree<PointElement>>> {
	let workers = config.ingest.resolved_workers();
	let tree = Arc::new(Octree::new(bounds, config.tree, AabbPartitioner));

	match config.ingest.mode {
		IngestMode::Rayon => {
			log::info!("rayon ingest with {} threads", workers);
			let pool = rayon::ThreadPoolBuilder::new()
				.num_threads(workers)
				.thread_name(|i| format!("octree-rayon-{}", i))
				.build()
				.context("Failed to build rayon thread pool")?;
			let inserted = pool.install(|| insert_par(&*tree, points));
			log::debug!("rayon ingest inserted {} points", inserted);
		}
		IngestMode::Channel => {
			log::info!(
				"channel ingest with {} workers, {} slots",
				workers,
				config.ingest.channel_capacity
			);
			let ingest = ChannelIngest::start(Arc::clone(&tree), workers, config.ingest.channel_capacity)
				.context("Failed to spawn ingest workers")?;
			for point in points {
				ingest
					.send(point)
					.map_err(|_| anyhow::anyhow!("Ingest channel closed early"))?;
			}
			let report = ingest.finish();
			log::debug!(
				"channel ingest inserted {} points ({:.0} points/s)",
				report.inserted,
				report.throughput()
			);
		}
	}

	Ok(tree)
}

#[cfg(test)]
mod tests {
	use super::*;
	use glam::DVec3;

	fn grid_points(side: usize) -> Vec<PointElement> {
		let mut points = Vec::with_capacity(side * side * side);
		for x in 0..side {
			for y in 0..side {
				for z in 0..side {
					points.push(PointElement::new(DVec3::new(x as f64, y as f64, z as f64)));
				}
			}
		}
		points
	}

	fn run(mode: IngestMode) -> Arc<Octree<PointElement>> {
		let mut config = Config::default();
		config.tree = BuildOptions::new(16).unwrap();
		config.ingest.mode = mode;
		config.ingest.workers = 2;
		config.ingest.channel_capacity = 32;

		let points = grid_points(10);
		let bounds = DAabb3::from_points(points.iter().map(|p| p.position)).unwrap().to_cube();
		build(&config, bounds, points).unwrap()
	}

	#[test]
	fn test_build_rayon() {
		let tree = run(IngestMode::Rayon);
		assert_eq!(tree.len(), 1000);
		assert!(TreeStats::collect(&*tree).is_consistent());
	}

	#[test]
	fn test_build_channel() {
		let tree = run(IngestMode::Channel);
		assert_eq!(tree.len(), 1000);
		let stats = TreeStats::collect(&*tree);
		assert!(stats.is_consistent());
		assert!(stats.fullest_node.is_some_and(|(_, most)| most <= 16));
	}
}
