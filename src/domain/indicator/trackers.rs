//! Smoothing and momentum trackers.
//!
//! Under-lookback policy for this family: a partial window falls back to
//! the samples actually available (a moving average asked at index 0
//! returns the single price there), never an error. Indices outside the
//! series are errors.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{Cache, Indicator, NumIndicator};
use crate::domain::num::Num;

/// Simple moving average of the source over `period` bars.
#[derive(Debug)]
pub struct SmaIndicator {
    source: NumIndicator,
    period: usize,
    cache: Cache<Num>,
}

impl SmaIndicator {
    pub fn new(source: NumIndicator, period: usize) -> Result<SmaIndicator, SigtraderError> {
        if period == 0 {
            return Err(SigtraderError::InvalidPeriod { period });
        }
        Ok(SmaIndicator {
            source,
            period,
            cache: Cache::new(),
        })
    }
}

impl Indicator for SmaIndicator {
    type Output = Num;

    fn value(&self, index: usize) -> Result<Num, SigtraderError> {
        self.cache.get_or_compute(index, || {
            let start = (index + 1).saturating_sub(self.period);
            let mut sum = Num::ZERO;
            for i in start..=index {
                sum = sum + self.source.value(i)?;
            }
            sum.divided_by(Num::from(index - start + 1))
        })
    }

    fn lookback(&self) -> usize {
        self.source.lookback() + self.period - 1
    }
}

/// Exponential moving average with multiplier `2 / (period + 1)`.
///
/// Warmup: while fewer than `period` samples exist the value is the partial
/// simple average; from there on each value is computed recursively from
/// the previous one, which makes the per-instance cache load-bearing.
#[derive(Debug)]
pub struct EmaIndicator {
    source: NumIndicator,
    period: usize,
    multiplier: Num,
    sma: SmaIndicator,
    cache: Cache<Num>,
}

impl EmaIndicator {
    pub fn new(source: NumIndicator, period: usize) -> Result<EmaIndicator, SigtraderError> {
        if period == 0 {
            return Err(SigtraderError::InvalidPeriod { period });
        }
        let multiplier = Num::TWO.divided_by(Num::from(period + 1))?;
        let sma = SmaIndicator::new(source.clone(), period)?;
        Ok(EmaIndicator {
            source,
            period,
            multiplier,
            sma,
            cache: Cache::new(),
        })
    }

    fn calculate(&self, index: usize) -> Result<Num, SigtraderError> {
        if index + 1 < self.period {
            return self.sma.value(index);
        }
        if index == 0 {
            return self.source.value(0);
        }
        let previous = self.value(index - 1)?;
        Ok(previous + (self.source.value(index)? - previous) * self.multiplier)
    }
}

impl Indicator for EmaIndicator {
    type Output = Num;

    fn value(&self, index: usize) -> Result<Num, SigtraderError> {
        self.cache.get_or_fill(index, |i| self.calculate(i))
    }

    fn lookback(&self) -> usize {
        self.source.lookback() + self.period - 1
    }
}

/// Triple exponential moving average: `3 * (EMA - EMA(EMA)) + EMA(EMA(EMA))`.
///
/// Three chained recursive averages; without memoization this construction
/// is exponential in index count.
#[derive(Debug)]
pub struct TripleEmaIndicator {
    ema: std::rc::Rc<EmaIndicator>,
    ema_ema: std::rc::Rc<EmaIndicator>,
    ema_ema_ema: std::rc::Rc<EmaIndicator>,
    cache: Cache<Num>,
}

impl TripleEmaIndicator {
    pub fn new(source: NumIndicator, period: usize) -> Result<TripleEmaIndicator, SigtraderError> {
        let ema = std::rc::Rc::new(EmaIndicator::new(source, period)?);
        let ema_handle: NumIndicator = ema.clone();
        let ema_ema = std::rc::Rc::new(EmaIndicator::new(ema_handle, period)?);
        let ema_ema_handle: NumIndicator = ema_ema.clone();
        let ema_ema_ema = std::rc::Rc::new(EmaIndicator::new(ema_ema_handle, period)?);
        Ok(TripleEmaIndicator {
            ema,
            ema_ema,
            ema_ema_ema,
            cache: Cache::new(),
        })
    }
}

impl Indicator for TripleEmaIndicator {
    type Output = Num;

    fn value(&self, index: usize) -> Result<Num, SigtraderError> {
        self.cache.get_or_compute(index, || {
            let single = self.ema.value(index)?;
            let double = self.ema_ema.value(index)?;
            let triple = self.ema_ema_ema.value(index)?;
            Ok(Num::THREE * (single - double) + triple)
        })
    }

    fn lookback(&self) -> usize {
        // Three chained EMAs: the innermost source's lookback plus
        // 3 * (period - 1), already accumulated through the chain.
        self.ema_ema_ema.lookback()
    }
}

/// Relative strength index over simple gain/loss averages ("Cutler's RSI").
///
/// Degenerate values: 50 at index 0 (no movement observed yet); 100 when
/// the window shows gains but no losses; 0 for losses without gains. The
/// zero-loss guard keeps the `rs` division total.
#[derive(Debug)]
pub struct RsiIndicator {
    source: NumIndicator,
    period: usize,
    cache: Cache<Num>,
}

impl RsiIndicator {
    pub fn new(source: NumIndicator, period: usize) -> Result<RsiIndicator, SigtraderError> {
        if period == 0 {
            return Err(SigtraderError::InvalidPeriod { period });
        }
        Ok(RsiIndicator {
            source,
            period,
            cache: Cache::new(),
        })
    }
}

impl Indicator for RsiIndicator {
    type Output = Num;

    fn value(&self, index: usize) -> Result<Num, SigtraderError> {
        self.cache.get_or_compute(index, || {
            if index == 0 {
                return Ok(Num::from(50));
            }
            let start = (index + 1).saturating_sub(self.period).max(1);
            let mut gains = Num::ZERO;
            let mut losses = Num::ZERO;
            for i in start..=index {
                let delta = self.source.value(i)? - self.source.value(i - 1)?;
                if delta.is_positive() {
                    gains = gains + delta;
                } else {
                    losses = losses - delta;
                }
            }
            if losses.is_zero() {
                if gains.is_zero() {
                    return Ok(Num::from(50));
                }
                return Ok(Num::HUNDRED);
            }
            let rs = gains.divided_by(losses)?;
            Ok(Num::HUNDRED - Num::HUNDRED.divided_by(Num::ONE + rs)?)
        })
    }

    fn lookback(&self) -> usize {
        self.source.lookback() + self.period
    }
}
