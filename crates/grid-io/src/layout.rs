//! Placement of logical cells in the caller's padded buffer.

use crate::error::{GridIoError, Result};

/// Border cells around the logical window, in the order west, east,
/// south, north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub west: usize,
    pub east: usize,
    pub south: usize,
    pub north: usize,
}

impl Padding {
    pub fn new(west: usize, east: usize, south: usize, north: usize) -> Self {
        Self {
            west,
            east,
            south,
            north,
        }
    }

    /// Same width on all four sides.
    pub fn uniform(width: usize) -> Self {
        Self::new(width, width, width, width)
    }

    /// From a `[west, east, south, north]` array.
    pub fn from_array(pad: [usize; 4]) -> Self {
        Self::new(pad[0], pad[1], pad[2], pad[3])
    }
}

/// Shape of a padded, optionally complex-interleaved logical grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalLayout {
    pub width: usize,
    pub height: usize,
    pub padding: Padding,
    /// Values are interleaved as `[re, im, re, im, ...]`.
    pub complex: bool,
}

impl LogicalLayout {
    pub fn new(width: usize, height: usize, padding: Padding, complex: bool) -> Self {
        Self {
            width,
            height,
            padding,
            complex,
        }
    }

    pub fn padded_width(&self) -> usize {
        self.width + self.padding.west + self.padding.east
    }

    pub fn padded_height(&self) -> usize {
        self.height + self.padding.south + self.padding.north
    }

    /// Buffer slots per cell.
    pub fn interleave(&self) -> usize {
        if self.complex {
            2
        } else {
            1
        }
    }

    /// Minimum buffer length for this layout.
    pub fn required_len(&self) -> usize {
        self.padded_width() * self.padded_height() * self.interleave()
    }

    /// Fail with [`GridIoError::BufferSize`] if `actual` is too short.
    pub fn check(&self, actual: usize) -> Result<()> {
        let expected = self.required_len();
        if actual < expected {
            return Err(GridIoError::BufferSize { expected, actual });
        }
        Ok(())
    }

    /// Buffer index of the real part of logical cell (`row`, `col`).
    ///
    /// Row 0 is the northernmost logical row.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        ((row + self.padding.north) * self.padded_width() + self.padding.west + col)
            * self.interleave()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpadded_real_layout() {
        let layout = LogicalLayout::new(4, 3, Padding::default(), false);
        assert_eq!(layout.required_len(), 12);
        assert_eq!(layout.index(0, 0), 0);
        assert_eq!(layout.index(2, 3), 11);
    }

    #[test]
    fn test_padded_layout() {
        let layout = LogicalLayout::new(4, 3, Padding::from_array([1, 2, 3, 2]), false);
        assert_eq!(layout.padded_width(), 7);
        assert_eq!(layout.padded_height(), 8);
        assert_eq!(layout.required_len(), 56);
        // Two rows of north padding, one column of west padding.
        assert_eq!(layout.index(0, 0), 2 * 7 + 1);
        assert_eq!(layout.index(2, 3), 4 * 7 + 4);
    }

    #[test]
    fn test_complex_layout_strides_by_two() {
        let layout = LogicalLayout::new(2, 2, Padding::uniform(1), true);
        assert_eq!(layout.required_len(), 32);
        assert_eq!(layout.index(0, 0), 10);
        assert_eq!(layout.index(0, 1), 12);
        assert_eq!(layout.index(1, 0), 18);
    }

    #[test]
    fn test_check_buffer_length() {
        let layout = LogicalLayout::new(3, 3, Padding::default(), true);
        assert!(layout.check(18).is_ok());
        assert!(layout.check(100).is_ok());
        let err = layout.check(17).unwrap_err();
        assert!(matches!(
            err,
            GridIoError::BufferSize {
                expected: 18,
                actual: 17
            }
        ));
    }
}
