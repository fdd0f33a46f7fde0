//! Backtest execution over slices.

use crate::domain::error::SigtraderError;
use crate::domain::series::Series;
use crate::domain::slicer::{self, Slice, SlicePolicy};
use crate::domain::strategy::Strategy;
use crate::domain::trade::Trade;
use std::rc::Rc;
use tracing::debug;

/// Replays a strategy over one slice, producing the closed trades in order.
///
/// Walks indices ascending with a flat/in-trade state machine: flat and
/// `should_enter` fires a buy at the bar's close; in a trade and
/// `should_exit` fires a sell at the bar's close. Entry signals while in a
/// trade are ignored, and a trade still open at the end of the slice is
/// discarded. Any indicator error aborts the run.
pub fn run(strategy: &Strategy, slice: &Slice) -> Result<Vec<Trade>, SigtraderError> {
    let mut trades = Vec::new();
    let mut current: Option<Trade> = None;

    for index in slice.begin()..=slice.end() {
        current = match current.take() {
            None => {
                if strategy.should_enter(index)? {
                    let price = slice.bar(index)?.close;
                    let mut trade = Trade::new();
                    trade.enter(index, price)?;
                    debug!(index, price = %price, "entered trade");
                    Some(trade)
                } else {
                    None
                }
            }
            Some(mut trade) => {
                if strategy.should_exit(index)? {
                    let price = slice.bar(index)?.close;
                    trade.exit_at(index, price)?;
                    debug!(index, price = %price, "exited trade");
                    trades.push(trade);
                    None
                } else {
                    Some(trade)
                }
            }
        };
    }

    if current.is_some() {
        debug!(end = slice.end(), "discarding trade still open at slice end");
    }
    Ok(trades)
}

/// Runs a strategy over a whole series as a single slice.
pub fn run_series(strategy: &Strategy, series: &Rc<Series>) -> Result<Vec<Trade>, SigtraderError> {
    let slices = slicer::slice(series, &SlicePolicy::Single)?;
    run(strategy, &slices[0])
}

/// Runs a strategy independently over each slice of a partitioned series.
pub fn run_all(
    strategy: &Strategy,
    series: &Rc<Series>,
    policy: &SlicePolicy,
) -> Result<Vec<Vec<Trade>>, SigtraderError> {
    let slices = slicer::slice(series, policy)?;
    slices.iter().map(|slice| run(strategy, slice)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::simple::{ClosePriceIndicator, ConstantIndicator};
    use crate::domain::indicator::NumIndicator;
    use crate::domain::num::Num;
    use crate::domain::series::testutil::series_of_closes;
    use crate::domain::trade::TradeState;

    fn num(s: &str) -> Num {
        s.parse().unwrap()
    }

    /// Enter while close > level, exit while close < level.
    fn threshold_strategy(series: &Rc<Series>, level: &str) -> Strategy {
        let close: NumIndicator = Rc::new(ClosePriceIndicator::new(Rc::clone(series)));
        let level: NumIndicator = Rc::new(ConstantIndicator::new(num(level)));
        Strategy::indicator_over(close, level)
    }

    #[test]
    fn enters_and_exits_at_bar_closes() {
        let series = series_of_closes(&["5", "12", "11", "4", "5"]);
        let trades = run_series(&threshold_strategy(&series, "10"), &series).unwrap();

        assert_eq!(trades.len(), 1);
        let trade = &trades[0];
        assert_eq!(trade.state(), TradeState::Closed);
        assert_eq!(trade.entry().unwrap().index, 1);
        assert_eq!(trade.entry().unwrap().price, num("12"));
        assert_eq!(trade.exit().unwrap().index, 3);
        assert_eq!(trade.exit().unwrap().price, num("4"));
        assert_eq!(trade.profit(), Some(num("-8")));
    }

    #[test]
    fn no_signals_no_trades() {
        let series = series_of_closes(&["10", "10", "10"]);
        let trades = run_series(&threshold_strategy(&series, "10"), &series).unwrap();
        assert!(trades.is_empty());
    }

    #[test]
    fn entry_signals_while_in_trade_are_ignored() {
        // Closes stay above the level after entry, so should_enter keeps
        // firing; only one trade may be open at a time.
        let series = series_of_closes(&["12", "13", "14", "4", "12", "3"]);
        let trades = run_series(&threshold_strategy(&series, "10"), &series).unwrap();

        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].entry().unwrap().index, 0);
        assert_eq!(trades[0].exit().unwrap().index, 3);
        assert_eq!(trades[1].entry().unwrap().index, 4);
        assert_eq!(trades[1].exit().unwrap().index, 5);
    }

    #[test]
    fn open_trade_at_range_end_is_discarded() {
        let series = series_of_closes(&["5", "12", "13"]);
        let trades = run_series(&threshold_strategy(&series, "10"), &series).unwrap();
        assert!(trades.is_empty());
    }

    #[test]
    fn slices_are_independent_runs() {
        // One long up-then-down swing; split in the middle so the first
        // slice's open trade is discarded and the second slice re-enters.
        let series = series_of_closes(&["5", "12", "13", "14", "12", "4"]);
        let strategy = threshold_strategy(&series, "10");
        let per_slice = run_all(&strategy, &series, &SlicePolicy::ByCount(3)).unwrap();

        assert_eq!(per_slice.len(), 2);
        assert!(per_slice[0].is_empty(), "trade open at slice end discarded");
        assert_eq!(per_slice[1].len(), 1);
        assert_eq!(per_slice[1][0].entry().unwrap().index, 3);
        assert_eq!(per_slice[1][0].exit().unwrap().index, 5);
    }

    #[test]
    fn indicator_errors_abort_the_run() {
        let series = series_of_closes(&["5", "12"]);
        let other = series_of_closes(&["5"]);
        // Strategy reads a shorter series than the slice it runs over.
        let strategy = threshold_strategy(&other, "10");
        assert!(matches!(
            run_series(&strategy, &series).unwrap_err(),
            SigtraderError::OutOfBounds { .. }
        ));
    }
}
