//! Series partitioning for segmented backtests.

use crate::domain::bar::Bar;
use crate::domain::error::SigtraderError;
use crate::domain::series::Series;
use chrono::Duration;
use std::rc::Rc;

/// A contiguous sub-range of a series' index space.
///
/// Bounds are inclusive and refer to the shared underlying storage — no
/// bars are copied. `bar` rejects indices outside the slice so a strategy
/// run against one slice cannot observe outside indices as "current"
/// (indicators may still look back past `begin` through the series).
#[derive(Debug, Clone)]
pub struct Slice {
    series: Rc<Series>,
    begin: usize,
    end: usize,
}

impl Slice {
    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn size(&self) -> usize {
        self.end - self.begin + 1
    }

    pub fn series(&self) -> &Rc<Series> {
        &self.series
    }

    pub fn bar(&self, index: usize) -> Result<&Bar, SigtraderError> {
        if index < self.begin || index > self.end {
            return Err(SigtraderError::OutOfBounds {
                index,
                begin: self.begin,
                end: self.end,
            });
        }
        self.series.bar(index)
    }
}

/// How a series is partitioned into slices.
#[derive(Debug, Clone)]
pub enum SlicePolicy {
    /// One slice covering the whole series.
    Single,
    /// Consecutive chunks of at most `n` bars.
    ByCount(usize),
    /// Aligned time windows of the given length, anchored at the first bar.
    /// Windows containing no bars produce no slice.
    ByPeriod(Duration),
}

/// Partitions a series into ordered, gap-free slices per the policy.
pub fn slice(series: &Rc<Series>, policy: &SlicePolicy) -> Result<Vec<Slice>, SigtraderError> {
    match policy {
        SlicePolicy::Single => Ok(vec![Slice {
            series: Rc::clone(series),
            begin: series.begin(),
            end: series.end(),
        }]),
        SlicePolicy::ByCount(count) => {
            if *count == 0 {
                return Err(SigtraderError::InvalidSlicing {
                    reason: "slice length must be at least 1 bar".into(),
                });
            }
            let mut slices = Vec::new();
            let mut begin = series.begin();
            while begin <= series.end() {
                let end = (begin + count - 1).min(series.end());
                slices.push(Slice {
                    series: Rc::clone(series),
                    begin,
                    end,
                });
                begin = end + 1;
            }
            Ok(slices)
        }
        SlicePolicy::ByPeriod(period) => {
            if *period <= Duration::zero() {
                return Err(SigtraderError::InvalidSlicing {
                    reason: "slice period must be positive".into(),
                });
            }
            let mut slices = Vec::new();
            let mut begin = series.begin();
            let mut window_end = series.bar(begin)?.timestamp + *period;
            for index in series.begin()..=series.end() {
                let timestamp = series.bar(index)?.timestamp;
                if timestamp >= window_end {
                    slices.push(Slice {
                        series: Rc::clone(series),
                        begin,
                        end: index - 1,
                    });
                    begin = index;
                    while timestamp >= window_end {
                        window_end += *period;
                    }
                }
            }
            slices.push(Slice {
                series: Rc::clone(series),
                begin,
                end: series.end(),
            });
            Ok(slices)
        }
    }
}
