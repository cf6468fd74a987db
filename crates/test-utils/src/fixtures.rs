//! Common test fixtures for grid I/O tests.
//!
//! This module provides pre-defined grids and regions with known answers.

use tempfile::TempDir;

/// Region definitions as `(west, east, south, north)`.
pub mod region {
    /// The all-zero region, meaning "entire grid".
    pub const ENTIRE: (f64, f64, f64, f64) = (0.0, 0.0, 0.0, 0.0);

    /// Crosses the prime meridian on a 0..360 grid.
    pub const ACROSS_GREENWICH: (f64, f64, f64, f64) = (350.0, 10.0, -10.0, 10.0);

    /// Gulf of Mexico.
    pub const GULF_OF_MEXICO: (f64, f64, f64, f64) = (-98.0, -80.0, 18.0, 31.0);
}

/// Common grid specifications for testing.
pub mod grid {
    /// Global 1 degree pixel-registered grid, 0..360 longitude.
    pub const GLOBAL_1DEG: GridSpec = GridSpec {
        west: 0.0,
        east: 360.0,
        south: -90.0,
        north: 90.0,
        inc: 1.0,
        pixel: true,
    };

    /// Regional 0.25 degree grid-line registered grid.
    pub const GULF_QUARTER_DEG: GridSpec = GridSpec {
        west: -100.0,
        east: -78.0,
        south: 16.0,
        north: 32.0,
        inc: 0.25,
        pixel: false,
    };

    /// Small 10 by 10 pixel grid on a unit lattice.
    pub const SIMPLE_10X10: GridSpec = GridSpec {
        west: 0.0,
        east: 10.0,
        south: 0.0,
        north: 10.0,
        inc: 1.0,
        pixel: true,
    };

    /// Grid extent and spacing with square cells.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub west: f64,
        pub east: f64,
        pub south: f64,
        pub north: f64,
        pub inc: f64,
        /// Pixel registration if true, grid-line otherwise.
        pub pixel: bool,
    }

    impl GridSpec {
        /// Number of columns.
        pub fn width(&self) -> usize {
            self.nodes(self.east - self.west)
        }

        /// Number of rows.
        pub fn height(&self) -> usize {
            self.nodes(self.north - self.south)
        }

        /// Returns the total number of grid cells.
        pub fn size(&self) -> usize {
            self.width() * self.height()
        }

        /// Returns the extent as `(west, east, south, north)`.
        pub fn region(&self) -> (f64, f64, f64, f64) {
            (self.west, self.east, self.south, self.north)
        }

        fn nodes(&self, span: f64) -> usize {
            let cells = (span / self.inc).round() as usize;
            if self.pixel {
                cells
            } else {
                cells + 1
            }
        }
    }
}

/// The 4 by 4 grid with holes whose valid range is `[1, 16]`.
pub fn extrema_4x4() -> Vec<f32> {
    let nan = f32::NAN;
    vec![
        1.0, 2.0, nan, 4.0, //
        5.0, 6.0, 7.0, nan, //
        9.0, 10.0, 11.0, 12.0, //
        13.0, 14.0, 15.0, 16.0,
    ]
}

/// A fresh scratch directory, removed when dropped.
///
/// # Panics
/// Panics if the directory cannot be created.
pub fn scratch_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("grid-io-test-")
        .tempdir()
        .expect("failed to create scratch directory")
}

#[cfg(test)]
mod tests {
    use super::grid::*;
    use super::*;

    #[test]
    fn test_grid_spec_sizes() {
        assert_eq!((GLOBAL_1DEG.width(), GLOBAL_1DEG.height()), (360, 180));
        assert_eq!(GULF_QUARTER_DEG.width(), 89);
        assert_eq!(GULF_QUARTER_DEG.height(), 65);
        assert_eq!(SIMPLE_10X10.size(), 100);
    }

    #[test]
    fn test_extrema_fixture() {
        let grid = extrema_4x4();
        assert_eq!(grid.len(), 16);
        assert_eq!(grid.iter().filter(|v| v.is_nan()).count(), 2);
    }

    #[test]
    fn test_scratch_dir_exists() {
        let dir = scratch_dir();
        assert!(dir.path().is_dir());
    }
}
