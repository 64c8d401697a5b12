//! Hyperslab requests
//!
//! A request names a rectangular window in logical array coordinates:
//! (row, column) for a single-band variable, (band, row, column) for a
//! multi-band one. Requests are validated against the variable's shape
//! before any I/O happens.

use crate::tiff::errors::{TiffError, TiffResult};

/// Start and count per axis, outermost axis first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperslabRequest {
    /// First index on each axis
    pub start: Vec<u64>,

    /// Number of elements on each axis
    pub count: Vec<u64>,
}

impl HyperslabRequest {
    /// Create a new request
    ///
    /// # Arguments
    /// * `start` - First index on each axis
    /// * `count` - Number of elements to read on each axis
    ///
    /// # Returns
    /// A request; nothing is checked until [`HyperslabRequest::validate`]
    pub fn new(start: &[u64], count: &[u64]) -> Self {
        HyperslabRequest { start: start.to_vec(), count: count.to_vec() }
    }

    pub fn rank(&self) -> usize {
        self.start.len()
    }

    /// Check the request against a variable shape
    ///
    /// Every axis must satisfy `count > 0`, `start < len` and
    /// `start + count <= len`.
    ///
    /// # Arguments
    /// * `shape` - Dimension lengths of the variable, outermost first
    ///
    /// # Returns
    /// The window to read, `InvalidArgument` for a rank mismatch, or
    /// `OutOfRange` for any axis outside its dimension
    pub fn validate(&self, shape: &[u64]) -> TiffResult<Window> {
        if self.start.len() != shape.len() || self.count.len() != shape.len() {
            return Err(TiffError::InvalidArgument(format!(
                "Request has {} start and {} count values for a rank {} variable",
                self.start.len(),
                self.count.len(),
                shape.len()
            )));
        }
        if !(2..=3).contains(&shape.len()) {
            return Err(TiffError::InvalidArgument(format!("Unsupported rank {}", shape.len())));
        }

        for (axis, ((&start, &count), &len)) in self.start.iter().zip(&self.count).zip(shape).enumerate() {
            if count == 0 {
                return Err(TiffError::OutOfRange(format!("Axis {}: count is zero", axis)));
            }
            if start >= len {
                return Err(TiffError::OutOfRange(format!("Axis {}: start {} is outside length {}", axis, start, len)));
            }
            if count > len - start {
                return Err(TiffError::OutOfRange(format!(
                    "Axis {}: start {} + count {} exceeds length {}",
                    axis, start, count, len
                )));
            }
        }

        let lead = shape.len() - 2;
        let (band, bands) = if lead == 1 { (self.start[0], self.count[0]) } else { (0, 1) };
        Ok(Window {
            band: band as usize,
            bands: bands as usize,
            row: self.start[lead] as usize,
            rows: self.count[lead] as usize,
            col: self.start[lead + 1] as usize,
            cols: self.count[lead + 1] as usize,
        })
    }
}

/// Validated window in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub band: usize,
    pub bands: usize,
    pub row: usize,
    pub rows: usize,
    pub col: usize,
    pub cols: usize,
}

impl Window {
    /// Row just past the window
    pub fn end_row(&self) -> usize {
        self.row + self.rows
    }

    /// Column just past the window
    pub fn end_col(&self) -> usize {
        self.col + self.cols
    }

    /// Elements covered by the window, None on overflow
    pub fn element_count(&self) -> Option<u64> {
        (self.bands as u64)
            .checked_mul(self.rows as u64)?
            .checked_mul(self.cols as u64)
    }
}
