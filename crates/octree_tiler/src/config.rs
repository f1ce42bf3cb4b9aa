//! Configuration parsing for octree tiling.

use anyhow::{Context, Result};
use point_octree::BuildOptions;
use serde::Deserialize;
use std::path::Path;

/// Root configuration for a tiling run.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Tree options (`max_points_per_node`).
	#[serde(default)]
	pub tree: BuildOptions,
	/// How points are fed into the tree.
	#[serde(default)]
	pub ingest: IngestConfig,
}

/// Ingestion front-end selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestMode {
	/// rayon bulk insertion.
	#[default]
	Rayon,
	/// Worker threads draining a bounded channel.
	Channel,
}

/// `[ingest]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngestConfig {
	#[serde(default)]
	pub mode: IngestMode,
	/// Worker threads (0 = one per available core).
	#[serde(default)]
	pub workers: usize,
	/// Slots in the ingest channel (channel mode only).
	#[serde(default = "default_channel_capacity")]
	pub channel_capacity: usize,
}

impl Default for IngestConfig {
	fn default() -> Self {
		Self {
			mode: IngestMode::default(),
			workers: 0,
			channel_capacity: default_channel_capacity(),
		}
	}
}

fn default_channel_capacity() -> usize {
	4096
}

impl IngestConfig {
	/// Worker count with 0 resolved to the available parallelism.
	pub fn resolved_workers(&self) -> usize {
		if self.workers > 0 {
			return self.workers;
		}
		std::thread::available_parallelism()
			.map(|n| n.get())
			.unwrap_or(4)
	}
}

impl Config {
	/// Parse configuration from TOML text.
	pub fn from_toml_str(content: &str) -> Result<Self> {
		let config: Config = toml::from_str(content).context("Failed to parse config TOML")?;

		if config.ingest.mode == IngestMode::Channel && config.ingest.channel_capacity == 0 {
			anyhow::bail!("ingest.channel_capacity must be greater than zero");
		}

		Ok(config)
	}

	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::from_toml_str(&content)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_config_uses_defaults() {
		let config = Config::from_toml_str("").unwrap();
		assert_eq!(config.tree, BuildOptions::default());
		assert_eq!(config.ingest.mode, IngestMode::Rayon);
		assert_eq!(config.ingest.workers, 0);
		assert_eq!(config.ingest.channel_capacity, 4096);
		assert!(config.ingest.resolved_workers() >= 1);
	}

	#[test]
	fn test_full_config() {
		let config = Config::from_toml_str(
			r#"
			[tree]
			max_points_per_node = 5000

			[ingest]
			mode = "channel"
			workers = 3
			channel_capacity = 128
			"#,
		)
		.unwrap();

		assert_eq!(config.tree.capacity(), 5000);
		assert_eq!(config.ingest.mode, IngestMode::Channel);
		assert_eq!(config.ingest.resolved_workers(), 3);
		assert_eq!(config.ingest.channel_capacity, 128);
	}

	#[test]
	fn test_zero_capacity_rejected() {
		let err = Config::from_toml_str("[tree]\nmax_points_per_node = 0\n").unwrap_err();
		assert!(format!("{:#}", err).contains("greater than zero"), "{:#}", err);
	}

	#[test]
	fn test_zero_channel_capacity_rejected() {
		assert!(Config::from_toml_str("[ingest]\nmode = \"channel\"\nchannel_capacity = 0\n").is_err());
		// Ignored in rayon mode.
		assert!(Config::from_toml_str("[ingest]\nchannel_capacity = 0\n").is_ok());
	}

	#[test]
	fn test_unknown_keys_rejected() {
		assert!(Config::from_toml_str("[tiles]\nsize = 4\n").is_err());
		assert!(Config::from_toml_str("[ingest]\nthreads = 4\n").is_err());
	}
}
