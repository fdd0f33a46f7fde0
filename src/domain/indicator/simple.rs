//! Direct per-bar indicators: price selectors, constants, crossings.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{Cache, Indicator, NumIndicator};
use crate::domain::num::Num;
use crate::domain::series::Series;
use std::rc::Rc;

/// Close price of the bar at each index.
#[derive(Debug)]
pub struct ClosePriceIndicator {
    series: Rc<Series>,
}

impl ClosePriceIndicator {
    pub fn new(series: Rc<Series>) -> ClosePriceIndicator {
        ClosePriceIndicator { series }
    }
}

impl Indicator for ClosePriceIndicator {
    type Output = Num;

    fn value(&self, index: usize) -> Result<Num, SigtraderError> {
        Ok(self.series.bar(index)?.close)
    }
}

/// (high + low + close) / 3 of the bar at each index.
#[derive(Debug)]
pub struct TypicalPriceIndicator {
    series: Rc<Series>,
}

impl TypicalPriceIndicator {
    pub fn new(series: Rc<Series>) -> TypicalPriceIndicator {
        TypicalPriceIndicator { series }
    }
}

impl Indicator for TypicalPriceIndicator {
    type Output = Num;

    fn value(&self, index: usize) -> Result<Num, SigtraderError> {
        self.series.bar(index)?.typical_price()
    }
}

/// Traded volume of the bar at each index.
#[derive(Debug)]
pub struct VolumeIndicator {
    series: Rc<Series>,
}

impl VolumeIndicator {
    pub fn new(series: Rc<Series>) -> VolumeIndicator {
        VolumeIndicator { series }
    }
}

impl Indicator for VolumeIndicator {
    type Output = Num;

    fn value(&self, index: usize) -> Result<Num, SigtraderError> {
        Ok(self.series.bar(index)?.volume)
    }
}

/// The same value at every index. Carries no series, so it is total over
/// indices rather than bounds-checked.
#[derive(Debug)]
pub struct ConstantIndicator {
    value: Num,
}

impl ConstantIndicator {
    pub fn new(value: Num) -> ConstantIndicator {
        ConstantIndicator { value }
    }
}

impl Indicator for ConstantIndicator {
    type Output = Num;

    fn value(&self, _index: usize) -> Result<Num, SigtraderError> {
        Ok(self.value)
    }
}

/// True at indices where `first` closes below `second` after having been at
/// or above it on the previous bar. Always false at index 0.
#[derive(Debug)]
pub struct CrossedDownIndicator {
    first: NumIndicator,
    second: NumIndicator,
    cache: Cache<bool>,
}

impl CrossedDownIndicator {
    pub fn new(first: NumIndicator, second: NumIndicator) -> CrossedDownIndicator {
        CrossedDownIndicator {
            first,
            second,
            cache: Cache::new(),
        }
    }
}

impl Indicator for CrossedDownIndicator {
    type Output = bool;

    fn value(&self, index: usize) -> Result<bool, SigtraderError> {
        self.cache.get_or_compute(index, || {
            if index == 0 {
                return Ok(false);
            }
            let now_below = self.first.value(index)?.is_less_than(self.second.value(index)?);
            let was_at_or_above = self
                .first
                .value(index - 1)?
                .is_greater_than(self.second.value(index - 1)?)
                || self.first.value(index - 1)?.is_equal(self.second.value(index - 1)?);
            Ok(now_below && was_at_or_above)
        })
    }

    fn lookback(&self) -> usize {
        self.first.lookback().max(self.second.lookback()) + 1
    }
}
