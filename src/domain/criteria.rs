//! Scoring of completed backtest runs.

use crate::domain::num::Num;
use crate::domain::series::Series;
use crate::domain::trade::Trade;

/// A scalar score over a run's trade history. Open trades in the history
/// contribute nothing.
pub trait Criterion {
    fn name(&self) -> &'static str;

    fn calculate(&self, series: &Series, trades: &[Trade]) -> Num;
}

/// Sum of signed per-trade profits, in price units.
#[derive(Debug, Default)]
pub struct TotalProfit;

impl Criterion for TotalProfit {
    fn name(&self) -> &'static str {
        "total profit"
    }

    fn calculate(&self, _series: &Series, trades: &[Trade]) -> Num {
        trades.iter().filter_map(Trade::profit).sum()
    }
}

/// Count of closed trades.
#[derive(Debug, Default)]
pub struct NumberOfTrades;

impl Criterion for NumberOfTrades {
    fn name(&self) -> &'static str {
        "number of trades"
    }

    fn calculate(&self, _series: &Series, trades: &[Trade]) -> Num {
        Num::from(trades.iter().filter(|t| t.profit().is_some()).count())
    }
}
