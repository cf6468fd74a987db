//! Grid header model.
//!
//! A [`GridHeader`] describes one grid: its extent, spacing, node
//! registration, stored representation and value transform. It is owned by
//! the caller and updated in place by the read and write pipelines.

use serde::{Deserialize, Serialize};

use crate::error::{GridIoError, GridWarning, Result};
use crate::format::GridFormat;
use crate::steps::check_step;

/// Tolerance used when comparing coordinates that should be equal.
pub(crate) const CONV_LIMIT: f64 = 1.0e-8;

/// Node placement convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Registration {
    /// Values sit on grid-line intersections; bounds are the outer nodes.
    #[default]
    GridLine,
    /// Values sit at cell centres; bounds are the outer cell edges.
    Pixel,
}

impl Registration {
    /// Offset of the first node from the lower bound, in cells.
    pub fn half_cell(&self) -> f64 {
        match self {
            Self::GridLine => 0.0,
            Self::Pixel => 0.5,
        }
    }

    /// Extra node a grid-line registered span carries over its cell count.
    pub fn extra_node(&self) -> i64 {
        match self {
            Self::GridLine => 1,
            Self::Pixel => 0,
        }
    }

    /// Value of the `node_offset` attribute.
    pub fn node_offset(&self) -> u8 {
        match self {
            Self::GridLine => 0,
            Self::Pixel => 1,
        }
    }

    /// Parse a `node_offset` attribute value.
    pub fn from_node_offset(offset: u64) -> Self {
        if offset == 0 {
            Self::GridLine
        } else {
            Self::Pixel
        }
    }
}

/// Order of rows in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// First stored row is the northernmost (y_order < 0).
    TopDown,
    /// First stored row is the southernmost (y_order > 0).
    #[default]
    BottomUp,
}

impl RowOrder {
    /// Sign convention: negative for top-down, positive for bottom-up.
    pub fn y_order(&self) -> i32 {
        match self {
            Self::TopDown => -1,
            Self::BottomUp => 1,
        }
    }

    /// Storage row holding logical row `row` of a grid with `ny` rows.
    ///
    /// The mapping is its own inverse.
    pub fn storage_row(&self, row: usize, ny: usize) -> usize {
        match self {
            Self::TopDown => row,
            Self::BottomUp => ny - 1 - row,
        }
    }
}

/// A geographic rectangle `west/east/south/north`.
///
/// The all-zero region means "the entire stored extent".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Region {
    /// Create a region from its four bounds.
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Self {
        Self {
            west,
            east,
            south,
            north,
        }
    }

    /// The region that selects the entire grid.
    pub fn entire() -> Self {
        Self::default()
    }

    /// True if this region requests the entire grid.
    pub fn is_entire(&self) -> bool {
        self.west == 0.0 && self.east == 0.0 && self.south == 0.0 && self.north == 0.0
    }

    /// Width in coordinate units.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Height in coordinate units.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}

/// Header of a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridHeader {
    /// File identifier; `"="` denotes a pipe.
    pub name: String,
    /// Columns of the currently materialized region.
    pub nx: usize,
    /// Rows of the currently materialized region.
    pub ny: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub x_inc: f64,
    pub y_inc: f64,
    pub registration: Registration,
    /// Stored code to real value: `code * z_scale_factor + z_add_offset`.
    pub z_scale_factor: f64,
    pub z_add_offset: f64,
    /// No-data sentinel; NaN means the native not-a-number marker.
    pub nan_value: f64,
    pub row_order: RowOrder,
    /// Real-world value range, valid after a completed read or write.
    pub z_min: f64,
    pub z_max: f64,
    pub format: GridFormat,
    /// X is longitude and may wrap by 360 degrees.
    pub geographic: bool,
    pub title: String,
    pub remark: String,
    /// Axis labels in `"long_name [units]"` form.
    pub x_units: String,
    pub y_units: String,
    pub z_units: String,
}

impl Default for GridHeader {
    fn default() -> Self {
        Self {
            name: String::new(),
            nx: 0,
            ny: 0,
            x_min: 0.0,
            x_max: 0.0,
            y_min: 0.0,
            y_max: 0.0,
            x_inc: 0.0,
            y_inc: 0.0,
            registration: Registration::GridLine,
            z_scale_factor: 1.0,
            z_add_offset: 0.0,
            nan_value: f64::NAN,
            row_order: RowOrder::BottomUp,
            z_min: f64::NAN,
            z_max: f64::NAN,
            format: GridFormat::default(),
            geographic: false,
            title: String::new(),
            remark: String::new(),
            x_units: "x".to_string(),
            y_units: "y".to_string(),
            z_units: "z".to_string(),
        }
    }
}

impl GridHeader {
    /// Create a header from its extent, spacing and registration.
    ///
    /// `nx` and `ny` are derived from the extent and must fit it to within
    /// a hundredth of a cell.
    pub fn new(
        name: impl Into<String>,
        region: Region,
        x_inc: f64,
        y_inc: f64,
        registration: Registration,
    ) -> Result<Self> {
        let name = name.into();
        if !(x_inc > 0.0 && y_inc > 0.0) {
            return Err(GridIoError::invalid_header(
                &name,
                format!("increments must be positive (x_inc={}, y_inc={})", x_inc, y_inc),
            ));
        }
        if !(region.east > region.west && region.north > region.south) {
            return Err(GridIoError::invalid_header(
                &name,
                format!(
                    "empty extent {}/{}/{}/{}",
                    region.west, region.east, region.south, region.north
                ),
            ));
        }

        let nx = node_count(&name, "x", region.width(), x_inc, registration)?;
        let ny = node_count(&name, "y", region.height(), y_inc, registration)?;

        Ok(Self {
            name,
            nx,
            ny,
            x_min: region.west,
            x_max: region.east,
            y_min: region.south,
            y_max: region.north,
            x_inc,
            y_inc,
            registration,
            ..Default::default()
        })
    }

    /// Infer a header from coordinate vectors as found in array files.
    ///
    /// The direction of `y` decides the row order. Both axes go through the
    /// step-uniformity check; a non-uniform axis is still accepted with its
    /// mean step and reported as a warning.
    pub fn from_axes(
        name: impl Into<String>,
        x: &[f64],
        y: &[f64],
        registration: Registration,
    ) -> Result<(Self, Vec<GridWarning>)> {
        let name = name.into();
        if x.len() < 2 || y.len() < 2 {
            return Err(GridIoError::invalid_header(
                &name,
                format!("need at least two coordinates per axis, got {}x{}", x.len(), y.len()),
            ));
        }

        let mut warnings = Vec::new();
        warnings.extend(check_step(x, "x", &name));
        warnings.extend(check_step(y, "y", &name));

        let (x_first, x_last) = (x[0], x[x.len() - 1]);
        if x_last <= x_first {
            return Err(GridIoError::invalid_header(&name, "x coordinates must increase"));
        }
        let (y_first, y_last) = (y[0], y[y.len() - 1]);
        if y_first == y_last {
            return Err(GridIoError::invalid_header(&name, "y coordinates are constant"));
        }

        let x_inc = (x_last - x_first) / (x.len() - 1) as f64;
        let y_inc = (y_last - y_first).abs() / (y.len() - 1) as f64;
        let half = registration.half_cell();
        let (y_lo, y_hi) = (y_first.min(y_last), y_first.max(y_last));

        let header = Self {
            name,
            nx: x.len(),
            ny: y.len(),
            x_min: x_first - half * x_inc,
            x_max: x_last + half * x_inc,
            y_min: y_lo - half * y_inc,
            y_max: y_hi + half * y_inc,
            x_inc,
            y_inc,
            registration,
            row_order: if y_last > y_first {
                RowOrder::BottomUp
            } else {
                RowOrder::TopDown
            },
            ..Default::default()
        };
        Ok((header, warnings))
    }

    pub fn with_format(mut self, format: GridFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_scaling(mut self, scale_factor: f64, add_offset: f64) -> Self {
        self.z_scale_factor = scale_factor;
        self.z_add_offset = add_offset;
        self
    }

    pub fn with_nan_value(mut self, nan_value: f64) -> Self {
        self.nan_value = nan_value;
        self
    }

    pub fn with_row_order(mut self, row_order: RowOrder) -> Self {
        self.row_order = row_order;
        self
    }

    pub fn geographic(mut self, geographic: bool) -> Self {
        self.geographic = geographic;
        self
    }

    /// Check the fields the row pipelines rely on.
    pub fn validate(&self) -> Result<()> {
        if self.nx == 0 || self.ny == 0 {
            return Err(GridIoError::invalid_header(
                &self.name,
                format!("grid has no cells ({}x{})", self.nx, self.ny),
            ));
        }
        if !(self.x_inc > 0.0 && self.y_inc > 0.0) {
            return Err(GridIoError::invalid_header(
                &self.name,
                "increments must be positive",
            ));
        }
        if self.z_scale_factor == 0.0 || !self.z_scale_factor.is_finite() {
            return Err(GridIoError::invalid_header(
                &self.name,
                format!("unusable scale factor {}", self.z_scale_factor),
            ));
        }
        Ok(())
    }

    /// Bounds as a region.
    pub fn region(&self) -> Region {
        Region::new(self.x_min, self.x_max, self.y_min, self.y_max)
    }

    /// Overwrite the bounds with a region.
    pub fn set_region(&mut self, region: &Region) {
        self.x_min = region.west;
        self.x_max = region.east;
        self.y_min = region.south;
        self.y_max = region.north;
    }

    /// Sign of the row order (negative: top-down).
    pub fn y_order(&self) -> i32 {
        self.row_order.y_order()
    }

    /// True if the grid spans the full 360 degrees of longitude.
    pub fn is_global(&self) -> bool {
        self.geographic && (self.x_max - self.x_min - 360.0).abs() < CONV_LIMIT
    }

    /// True if stored codes differ from real values.
    pub fn is_scaled(&self) -> bool {
        self.z_scale_factor != 1.0 || self.z_add_offset != 0.0
    }

    /// Node x coordinates of all columns.
    pub fn x_coordinates(&self) -> Vec<f64> {
        let half = self.registration.half_cell();
        (0..self.nx)
            .map(|i| self.x_min + (i as f64 + half) * self.x_inc)
            .collect()
    }

    /// Node y coordinates of all rows, in storage order.
    pub fn y_coordinates(&self) -> Vec<f64> {
        let half = self.registration.half_cell();
        (0..self.ny)
            .map(|j| {
                let from_top = match self.row_order {
                    RowOrder::TopDown => j,
                    RowOrder::BottomUp => self.ny - 1 - j,
                };
                self.y_max - (from_top as f64 + half) * self.y_inc
            })
            .collect()
    }
}

fn node_count(
    name: &str,
    axis: &str,
    span: f64,
    inc: f64,
    registration: Registration,
) -> Result<usize> {
    let cells = span / inc;
    let rounded = cells.round();
    if (cells - rounded).abs() > 0.01 {
        return Err(GridIoError::invalid_header(
            name,
            format!("{} range {} is not a multiple of the increment {}", axis, span, inc),
        ));
    }
    let count = rounded as i64 + registration.extra_node();
    if count < 1 {
        return Err(GridIoError::invalid_header(
            name,
            format!("{} axis has no nodes", axis),
        ));
    }
    Ok(count as usize)
}
