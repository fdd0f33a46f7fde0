//! Ready-made strategy assemblies.
//!
//! Each builder wires indicators from a series into a [`Strategy`] tree.
//! They double as worked examples of the combinator algebra.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::oscillators::CciIndicator;
use crate::domain::indicator::simple::{ClosePriceIndicator, ConstantIndicator};
use crate::domain::indicator::trackers::{RsiIndicator, SmaIndicator};
use crate::domain::indicator::NumIndicator;
use crate::domain::num::Num;
use crate::domain::series::Series;
use crate::domain::strategy::Strategy;
use std::rc::Rc;

fn close_price(series: &Rc<Series>) -> NumIndicator {
    Rc::new(ClosePriceIndicator::new(Rc::clone(series)))
}

fn sma(source: &NumIndicator, period: usize) -> Result<NumIndicator, SigtraderError> {
    Ok(Rc::new(SmaIndicator::new(source.clone(), period)?))
}

fn constant(value: i64) -> NumIndicator {
    Rc::new(ConstantIndicator::new(Num::from(value)))
}

/// Trend following on a single moving average: enter while the close is
/// above its SMA, exit while below.
pub fn sma_crossover(series: &Rc<Series>, period: usize) -> Result<Strategy, SigtraderError> {
    let close = close_price(series);
    let average = sma(&close, period)?;
    Ok(Strategy::indicator_over(close, average))
}

/// Mean reversion on a short RSI inside a long-term uptrend.
///
/// Trades only while the 5-bar SMA is above the 200-bar SMA. Within that
/// trend, enters when the 2-bar RSI drops to 5 or below with the close
/// under its 5-bar SMA, and exits when the RSI reaches 95 or above with
/// the close still under that SMA.
pub fn rsi2(series: &Rc<Series>) -> Result<Strategy, SigtraderError> {
    let close = close_price(series);
    let short_sma = sma(&close, 5)?;
    let long_sma = sma(&close, 200)?;
    let rsi: NumIndicator = Rc::new(RsiIndicator::new(close.clone(), 2)?);

    let trend = Strategy::indicator_over(short_sma.clone(), long_sma);

    let price_below_sma = Strategy::indicator_over(short_sma, close);
    let oversold = Strategy::support(rsi.clone(), price_below_sma.clone(), Num::from(5));
    let overbought = Strategy::resistance(rsi, price_below_sma, Num::from(95));

    Ok(trend.and(Strategy::combined(oversold, overbought)))
}

/// Pullback entries in the direction of a long CCI trend.
///
/// The 200-bar CCI defines the regime: above +100 is bullish, below -100
/// ends it. The 5-bar CCI times the trade: a dip under -100 enters, a
/// spike over +100 exits.
pub fn cci_correction(series: &Rc<Series>) -> Result<Strategy, SigtraderError> {
    let long_cci: NumIndicator = Rc::new(CciIndicator::new(Rc::clone(series), 200)?);
    let short_cci: NumIndicator = Rc::new(CciIndicator::new(Rc::clone(series), 5)?);

    let bull = Strategy::indicator_over(long_cci.clone(), constant(100));
    let bear = Strategy::indicator_over(long_cci, constant(-100));
    let trend = Strategy::combined(bull, bear);

    let dip = Strategy::indicator_over(constant(-100), short_cci.clone());
    let spike = Strategy::indicator_over(constant(100), short_cci);
    let timing = Strategy::combined(dip, spike);

    Ok(trend.and(timing))
}
