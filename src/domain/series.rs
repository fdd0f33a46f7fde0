//! Immutable bar series with a stable 0-based index space.

use crate::domain::bar::Bar;
use crate::domain::error::SigtraderError;

/// An ordered, immutable sequence of bars.
///
/// Indices are contiguous, 0-based, and monotonically non-decreasing in
/// time; the series is read-only after construction, which is what makes
/// write-once indicator caching sound. Shared between indicators via
/// `Rc<Series>`.
#[derive(Debug)]
pub struct Series {
    name: String,
    bars: Vec<Bar>,
}

impl Series {
    /// Builds a series, rejecting empty input and out-of-order timestamps.
    pub fn new(name: impl Into<String>, bars: Vec<Bar>) -> Result<Series, SigtraderError> {
        if bars.is_empty() {
            return Err(SigtraderError::EmptySeries);
        }
        for index in 1..bars.len() {
            if bars[index].timestamp < bars[index - 1].timestamp {
                return Err(SigtraderError::UnorderedBars { index });
            }
        }
        Ok(Series {
            name: name.into(),
            bars,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.bars.len()
    }

    /// First valid index. Always 0; kept for symmetry with [`Series::end`].
    pub fn begin(&self) -> usize {
        0
    }

    /// Last valid index (inclusive).
    pub fn end(&self) -> usize {
        self.bars.len() - 1
    }

    pub fn bar(&self, index: usize) -> Result<&Bar, SigtraderError> {
        self.bars.get(index).ok_or(SigtraderError::OutOfBounds {
            index,
            begin: self.begin(),
            end: self.end(),
        })
    }
}
