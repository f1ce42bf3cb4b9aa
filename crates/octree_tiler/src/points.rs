//! Plain-text point reader.
//!
//! One point per line, whitespace separated:
//!
//! ```text
//! x y z [r g b [intensity [classification]]]
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use anyhow::{Context, Result};
use glam::DVec3;
use point_octree::PointElement;
use std::io::BufRead;
use std::path::Path;

/// Read every point of a file.
pub fn load(path: &Path) -> Result<Vec<PointElement>> {
	let file = std::fs::File::open(path)
		.with_context(|| format!("Failed to open point file: {}", path.display()))?;
	read_points(std::io::BufReader::new(file))
		.with_context(|| format!("Failed to read points from: {}", path.display()))
}

/// Read points from any buffered source.
pub fn read_points(reader: impl BufRead) -> Result<Vec<PointElement>> {
	let mut points = Vec::new();
	for (index, line) in reader.lines().enumerate() {
		let line = line?;
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') {
			continue;
		}
		let point = parse_line(line).with_context(|| format!("line {}", index + 1))?;
		points.push(point);
	}
	Ok(points)
}

/// Parse a single non-empty line.
pub fn parse_line(line: &str) -> Result<PointElement> {
	let fields: Vec<&str> = line.split_whitespace().collect();
	if !matches!(fields.len(), 3 | 6 | 7 | 8) {
		anyhow::bail!(
			"expected 3, 6, 7 or 8 fields (x y z [r g b [intensity [classification]]]), found {}",
			fields.len()
		);
	}

	let coord = |i: usize| -> Result<f64> {
		let value: f64 = fields[i]
			.parse()
			.with_context(|| format!("invalid coordinate '{}'", fields[i]))?;
		if !value.is_finite() {
			anyhow::bail!("coordinate '{}' is not finite", fields[i]);
		}
		Ok(value)
	};
	let byte = |i: usize| -> Result<u8> {
		fields[i]
			.parse()
			.with_context(|| format!("invalid attribute '{}' (expected 0-255)", fields[i]))
	};

	let mut point = PointElement::new(DVec3::new(coord(0)?, coord(1)?, coord(2)?));
	if fields.len() >= 6 {
		point = point.with_color([byte(3)?, byte(4)?, byte(5)?]);
	}
	if fields.len() >= 7 {
		point = point.with_intensity(byte(6)?);
	}
	if fields.len() == 8 {
		point = point.with_classification(byte(7)?);
	}
	Ok(point)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_position_only() {
		let point = parse_line("1.5 -2 3e2").unwrap();
		assert_eq!(point.position, DVec3::new(1.5, -2.0, 300.0));
		assert_eq!(point.color, [0, 0, 0]);
	}

	#[test]
	fn test_parse_all_attributes() {
		let point = parse_line("0 0 0  255 128 1  40  2").unwrap();
		assert_eq!(point.color, [255, 128, 1]);
		assert_eq!(point.intensity, 40);
		assert_eq!(point.classification, 2);
	}

	#[test]
	fn test_parse_rejects_bad_lines() {
		assert!(parse_line("1 2").is_err());
		assert!(parse_line("1 2 3 4").is_err());
		assert!(parse_line("1 2 nope").is_err());
		assert!(parse_line("1 2 inf").is_err());
		assert!(parse_line("1 2 3 256 0 0").is_err());
	}

	#[test]
	fn test_read_skips_comments_and_blanks() {
		let text = "# header\n\n1 2 3\n  \n4 5 6 1 2 3\n";
		let points = read_points(text.as_bytes()).unwrap();
		assert_eq!(points.len(), 2);
		assert_eq!(points[1].position, DVec3::new(4.0, 5.0, 6.0));
	}

	#[test]
	fn test_read_reports_line_number() {
		let err = read_points("1 2 3\n1 2\n".as_bytes()).unwrap_err();
		assert!(format!("{:#}", err).contains("line 2"), "{:#}", err);
	}
}
