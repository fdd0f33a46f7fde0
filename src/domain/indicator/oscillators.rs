//! Oscillating indicators bounded around a reference band.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::simple::TypicalPriceIndicator;
use crate::domain::indicator::trackers::SmaIndicator;
use crate::domain::indicator::{Cache, Indicator, NumIndicator};
use crate::domain::num::Num;
use crate::domain::series::Series;
use rust_decimal::Decimal;
use std::rc::Rc;

/// Commodity channel index over the typical price.
///
/// `(tp - sma(tp)) / (0.015 * mean deviation)`, with the window shortened
/// to the available samples under lookback. A zero mean deviation (flat
/// window) yields 0 rather than a division error.
#[derive(Debug)]
pub struct CciIndicator {
    typical: NumIndicator,
    sma: SmaIndicator,
    period: usize,
    cache: Cache<Num>,
}

impl CciIndicator {
    pub fn new(series: Rc<Series>, period: usize) -> Result<CciIndicator, SigtraderError> {
        if period == 0 {
            return Err(SigtraderError::InvalidPeriod { period });
        }
        let typical: NumIndicator = Rc::new(TypicalPriceIndicator::new(series));
        let sma = SmaIndicator::new(typical.clone(), period)?;
        Ok(CciIndicator {
            typical,
            sma,
            period,
            cache: Cache::new(),
        })
    }

    fn factor() -> Num {
        Num::new(Decimal::new(15, 3)) // 0.015
    }
}

impl Indicator for CciIndicator {
    type Output = Num;

    fn value(&self, index: usize) -> Result<Num, SigtraderError> {
        self.cache.get_or_compute(index, || {
            let typical = self.typical.value(index)?;
            let average = self.sma.value(index)?;
            let start = (index + 1).saturating_sub(self.period);
            let mut deviation_sum = Num::ZERO;
            for i in start..=index {
                deviation_sum = deviation_sum + (self.typical.value(i)? - average).abs();
            }
            let mean_deviation = deviation_sum.divided_by(Num::from(index - start + 1))?;
            if mean_deviation.is_zero() {
                return Ok(Num::ZERO);
            }
            (typical - average).divided_by(Self::factor() * mean_deviation)
        })
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }
}
