//! Height-map sources
//!
//! A source is a rectangular array of corner heights plus a base color.
//! Rectangularity is enforced here, at construction: a ragged or empty
//! map is an error rather than an out-of-bounds access later.

use std::path::Path;

use scarp_core::{Color, Result, ScarpError};
use serde::Deserialize;

#[derive(Deserialize)]
struct MapFile {
    map: MapDef,
}

#[derive(Deserialize)]
struct MapDef {
    heights: Vec<Vec<f32>>,
    color: Option<[f32; 4]>,
}

/// A rectangular array of corner heights with a base corner color
#[derive(Debug)]
pub struct MapSource {
    heights: Vec<Vec<f32>>,
    color: Color,
}

impl MapSource {
    /// Load a map from a TOML file:
    ///
    /// ```toml
    /// [map]
    /// heights = [[0, 0, 1], [0, 2, 1]]
    /// color = [0.0, 1.0, 1.0, 1.0]   # optional
    /// ```
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let file: MapFile = toml::from_str(&text)?;
        let color = file
            .map
            .color
            .map(Color::from_array)
            .unwrap_or(Color::CYAN);
        Self::new(file.map.heights, color)
    }

    /// Load a map from a grayscale PNG. Luma values are normalized and
    /// scaled so white maps to `max_height`.
    pub fn from_png(path: &Path, max_height: f32) -> Result<Self> {
        let img = image::open(path).map_err(|e| {
            ScarpError::Image(format!("failed to load '{}': {}", path.display(), e))
        })?;

        let gray = img.into_luma16();
        let heights: Vec<Vec<f32>> = gray
            .rows()
            .map(|row| {
                row.map(|p| p.0[0] as f32 / 65535.0 * max_height)
                    .collect()
            })
            .collect();

        Self::new(heights, Color::CYAN)
    }

    /// Create a source from raw height rows (primarily for testing)
    pub fn from_raw(heights: Vec<Vec<f32>>) -> Result<Self> {
        Self::new(heights, Color::CYAN)
    }

    /// The built-in demo island: a 10x10 map with a few hills
    pub fn demo() -> Self {
        let rows: [[f32; 10]; 10] = [
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 5.0, 3.0, 0.0, 0.0, 1.0, 1.0, 0.0],
            [0.0, 9.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 7.0, 5.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            [0.0, 3.0, 6.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        ];
        Self {
            heights: rows.iter().map(|r| r.to_vec()).collect(),
            color: Color::CYAN,
        }
    }

    fn new(heights: Vec<Vec<f32>>, color: Color) -> Result<Self> {
        if heights.is_empty() || heights[0].is_empty() {
            return Err(ScarpError::EmptyMap);
        }
        let expected = heights[0].len();
        for (row, r) in heights.iter().enumerate() {
            if r.len() != expected {
                return Err(ScarpError::RaggedRow {
                    row,
                    expected,
                    got: r.len(),
                });
            }
        }
        Ok(Self { heights, color })
    }

    /// Corners per row
    pub fn width(&self) -> usize {
        self.heights[0].len()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.heights.len()
    }

    pub fn height_at(&self, x: usize, y: usize) -> f32 {
        self.heights[y][x]
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_dimensions() {
        let source = MapSource::demo();
        assert_eq!(source.width(), 10);
        assert_eq!(source.height(), 10);
        assert_eq!(source.height_at(1, 3), 9.0);
        assert_eq!(source.color(), Color::CYAN);
    }

    #[test]
    fn test_empty_map_rejected() {
        assert!(matches!(
            MapSource::from_raw(vec![]),
            Err(ScarpError::EmptyMap)
        ));
        assert!(matches!(
            MapSource::from_raw(vec![vec![]]),
            Err(ScarpError::EmptyMap)
        ));
    }

    #[test]
    fn test_ragged_map_rejected() {
        let result = MapSource::from_raw(vec![vec![0.0, 0.0], vec![0.0]]);
        match result {
            Err(ScarpError::RaggedRow { row, expected, got }) => {
                assert_eq!(row, 1);
                assert_eq!(expected, 2);
                assert_eq!(got, 1);
            }
            other => panic!("expected RaggedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_toml_parsing() {
        let text = "[map]\nheights = [[0, 1], [2, 3]]\ncolor = [1.0, 0.0, 0.0, 1.0]\n";
        let file: MapFile = toml::from_str(text).unwrap();
        let source = MapSource::new(
            file.map.heights,
            file.map.color.map(Color::from_array).unwrap(),
        )
        .unwrap();
        assert_eq!(source.width(), 2);
        assert_eq!(source.height_at(1, 1), 3.0);
        assert_eq!(source.color(), Color::RED);
    }
}
