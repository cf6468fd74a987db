//! Generators for synthetic logical grids.
//!
//! All grids are row-major `Vec<f32>` with row 0 at the top (north).

/// Creates a test grid with predictable values.
///
/// Each cell value is `row * 1000 + col`, so a misplaced row or column
/// shows up directly in the value.
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50);
/// assert_eq!(grid[1], 1.0);     // row 0, col 1
/// assert_eq!(grid[10], 1000.0); // row 1, col 0
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((row * 1000 + col) as f32);
        }
    }
    data
}

/// Creates a bathymetry-like grid in metres.
///
/// Depth increases smoothly away from a coastline along the west edge, from
/// about +50 m on land down to roughly -5000 m.
pub fn create_bathymetry_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x = col as f32 / width.max(1) as f32;
            let y = row as f32 / height.max(1) as f32;
            let depth = 50.0 - 5050.0 * x.powf(0.7) + 200.0 * (y * std::f32::consts::TAU).sin();
            data.push(depth);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Creates a grid with NaN values at specified positions.
///
/// Other cells hold the [`create_test_grid`] pattern. Positions are
/// `(col, row)`; out-of-range positions are ignored.
pub fn create_grid_with_nans(
    width: usize,
    height: usize,
    nan_positions: &[(usize, usize)],
) -> Vec<f32> {
    let mut data = create_test_grid(width, height);
    for &(col, row) in nan_positions {
        if col < width && row < height {
            data[row * width + col] = f32::NAN;
        }
    }
    data
}

/// Embeds a grid in a padded buffer.
///
/// `pad` is `[west, east, south, north]`. Border cells hold `fill`; in
/// complex mode values go to the even (real) slots and odd slots hold `fill`.
pub fn pad_grid(
    data: &[f32],
    width: usize,
    height: usize,
    pad: [usize; 4],
    complex: bool,
    fill: f32,
) -> Vec<f32> {
    let [west, east, south, north] = pad;
    let padded_width = width + west + east;
    let stride = if complex { 2 } else { 1 };
    let mut out = vec![fill; padded_width * (height + south + north) * stride];
    for row in 0..height {
        for col in 0..width {
            let index = ((row + north) * padded_width + west + col) * stride;
            out[index] = data[row * width + col];
        }
    }
    out
}

/// Extracts the real, unpadded cells of a buffer built like [`pad_grid`].
pub fn unpad_grid(
    padded: &[f32],
    width: usize,
    height: usize,
    pad: [usize; 4],
    complex: bool,
) -> Vec<f32> {
    let [west, east, _, north] = pad;
    let padded_width = width + west + east;
    let stride = if complex { 2 } else { 1 };
    let mut out = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            out.push(padded[((row + north) * padded_width + west + col) * stride]);
        }
    }
    out
}

/// Reverses the row order of a row-major grid.
pub fn flip_rows(data: &[f32], width: usize) -> Vec<f32> {
    data.chunks(width).rev().flatten().copied().collect()
}
