//! Error and warning types for grid I/O.
//!
//! Fatal conditions are [`GridIoError`] values returned through [`Result`].
//! Recoverable conditions are [`GridWarning`] values collected into an
//! [`IoReport`] and logged once at the end of the call that produced them.

use thiserror::Error;

/// Errors that abort a grid read or write.
#[derive(Error, Debug)]
pub enum GridIoError {
    /// The grid's encoding does not match the requested codec path.
    #[error("format mismatch for grid {name}: {message}")]
    FormatMismatch { name: String, message: String },

    /// The target is a non-seekable pipe; row access needs random access.
    #[error("grid {0} is a pipe; row-by-row access is not supported")]
    UnsupportedTarget(String),

    /// The resolved subwindow is empty or falls outside the grid.
    #[error("invalid geometry for grid {name}: {message}")]
    InvalidGeometry { name: String, message: String },

    /// A temporary row or index buffer could not be allocated.
    #[error("cannot allocate {what} of {len} elements")]
    AllocationFailure { what: &'static str, len: usize },

    /// The caller's logical buffer is shorter than the padded window needs.
    #[error("grid buffer holds {actual} values but {expected} are required")]
    BufferSize { expected: usize, actual: usize },

    /// Header fields are inconsistent (non-positive increment, zero scale, ...).
    #[error("invalid header for grid {name}: {message}")]
    InvalidHeader { name: String, message: String },

    /// The named grid does not exist in the store.
    #[error("grid not found: {0}")]
    NotFound(String),

    /// The codec collaborator failed.
    #[error("codec error: {0}")]
    Codec(String),
}

impl GridIoError {
    /// Create a FormatMismatch error.
    pub fn format_mismatch(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FormatMismatch {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidGeometry error.
    pub fn invalid_geometry(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an InvalidHeader error.
    pub fn invalid_header(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a Codec error.
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }
}

impl From<std::io::Error> for GridIoError {
    fn from(err: std::io::Error) -> Self {
        Self::Codec(err.to_string())
    }
}

/// Result type for grid I/O operations.
pub type Result<T> = std::result::Result<T, GridIoError>;

/// Conditions that are recovered locally and reported once per call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridWarning {
    /// Cells whose magnitude exceeded the stored representation were
    /// replaced by the sentinel.
    #[error("{count} out-of-range grid values converted to the no-data value [{name}]")]
    OutOfRange { name: String, count: usize },

    /// No valid cell was read or written.
    #[error("no valid values in grid [{name}]")]
    EmptyValidRange { name: String },

    /// The requested subset exceeded the data domain and was reduced.
    #[error("subset exceeds data domain of {name}; reduced to common region")]
    SubsetClamped { name: String },

    /// The requested subset was moved to the nearest multiple of the grid spacing.
    #[error("subset of {name} adjusted to nearest multiple of grid spacing")]
    SubsetSnapped { name: String },

    /// A coordinate axis does not have a constant step.
    #[error(
        "step size of coordinate {axis} in grid {name} is not constant; \
         using {used}, the stored steps range from {min} to {max}"
    )]
    IrregularStep {
        name: String,
        axis: String,
        used: f64,
        min: f64,
        max: f64,
    },
}

/// Outcome of a successful read or write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IoReport {
    /// Recoverable conditions, in the order they were detected.
    pub warnings: Vec<GridWarning>,
    /// Number of cells that contributed to the value range.
    pub valid_cells: usize,
}

impl IoReport {
    pub(crate) fn push(&mut self, warning: GridWarning) {
        self.warnings.push(warning);
    }

    pub(crate) fn extend(&mut self, warnings: impl IntoIterator<Item = GridWarning>) {
        self.warnings.extend(warnings);
    }

    /// Number of cells replaced by the sentinel because they were out of range.
    pub fn out_of_range(&self) -> usize {
        self.warnings
            .iter()
            .map(|w| match w {
                GridWarning::OutOfRange { count, .. } => *count,
                _ => 0,
            })
            .sum()
    }

    /// True if the call saw no valid cell at all.
    pub fn is_empty_range(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, GridWarning::EmptyValidRange { .. }))
    }

    /// Log every collected warning through `tracing`.
    pub(crate) fn emit(&self) {
        for warning in &self.warnings {
            tracing::warn!(warning = %warning, "grid I/O warning");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_file() {
        let err = GridIoError::invalid_geometry("topo.grd", "width is 0");
        assert_eq!(err.to_string(), "invalid geometry for grid topo.grd: width is 0");

        let err = GridIoError::UnsupportedTarget("=".to_string());
        assert!(err.to_string().contains("pipe"));
    }

    #[test]
    fn test_report_out_of_range_sum() {
        let mut report = IoReport::default();
        assert_eq!(report.out_of_range(), 0);
        assert!(!report.is_empty_range());

        report.push(GridWarning::OutOfRange {
            name: "a".to_string(),
            count: 3,
        });
        report.push(GridWarning::EmptyValidRange {
            name: "a".to_string(),
        });

        assert_eq!(report.out_of_range(), 3);
        assert!(report.is_empty_range());
    }

    #[test]
    fn test_warning_display() {
        let w = GridWarning::OutOfRange {
            name: "bathy.nc".to_string(),
            count: 7,
        };
        assert_eq!(
            w.to_string(),
            "7 out-of-range grid values converted to the no-data value [bathy.nc]"
        );
    }
}
