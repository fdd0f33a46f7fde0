//! Entry/exit rule engine and combinator algebra.
//!
//! A strategy is a pair of boolean predicates over a bar index. The closed
//! set of variants below composes without mutating children, so evaluating
//! a composed strategy always equals the documented boolean formula over
//! its children at the same index.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::NumIndicator;
use crate::domain::num::Num;

#[derive(Debug, Clone)]
pub enum Strategy {
    /// Enter while `first` is strictly above `second`; exit while strictly
    /// below. Equality signals neither.
    IndicatorOver {
        first: NumIndicator,
        second: NumIndicator,
    },
    /// Enter iff both enter; exit iff both exit.
    And(Box<Strategy>, Box<Strategy>),
    /// Enter iff either enters; exit iff either exits.
    Or(Box<Strategy>, Box<Strategy>),
    /// Swaps enter and exit.
    Opposite(Box<Strategy>),
    /// Gates entry on the oscillator sitting at or below the support
    /// level; exit delegates to the inner strategy.
    Support {
        oscillator: NumIndicator,
        inner: Box<Strategy>,
        level: Num,
    },
    /// Gates exit on the oscillator sitting at or above the resistance
    /// level; entry delegates to the inner strategy.
    Resistance {
        oscillator: NumIndicator,
        inner: Box<Strategy>,
        level: Num,
    },
    /// Independent buy and sell rules: enter follows the buy rule's enter,
    /// exit follows the sell rule's exit.
    CombinedBuyAndSell {
        buy: Box<Strategy>,
        sell: Box<Strategy>,
    },
}

impl Strategy {
    pub fn indicator_over(first: NumIndicator, second: NumIndicator) -> Strategy {
        Strategy::IndicatorOver { first, second }
    }

    pub fn support(oscillator: NumIndicator, inner: Strategy, level: Num) -> Strategy {
        Strategy::Support {
            oscillator,
            inner: Box::new(inner),
            level,
        }
    }

    pub fn resistance(oscillator: NumIndicator, inner: Strategy, level: Num) -> Strategy {
        Strategy::Resistance {
            oscillator,
            inner: Box::new(inner),
            level,
        }
    }

    pub fn combined(buy: Strategy, sell: Strategy) -> Strategy {
        Strategy::CombinedBuyAndSell {
            buy: Box::new(buy),
            sell: Box::new(sell),
        }
    }

    pub fn and(self, other: Strategy) -> Strategy {
        Strategy::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Strategy) -> Strategy {
        Strategy::Or(Box::new(self), Box::new(other))
    }

    pub fn opposite(self) -> Strategy {
        Strategy::Opposite(Box::new(self))
    }

    pub fn should_enter(&self, index: usize) -> Result<bool, SigtraderError> {
        match self {
            Strategy::IndicatorOver { first, second } => {
                Ok(first.value(index)?.is_greater_than(second.value(index)?))
            }
            Strategy::And(left, right) => {
                Ok(left.should_enter(index)? && right.should_enter(index)?)
            }
            Strategy::Or(left, right) => {
                Ok(left.should_enter(index)? || right.should_enter(index)?)
            }
            Strategy::Opposite(inner) => inner.should_exit(index),
            Strategy::Support {
                oscillator,
                inner,
                level,
            } => {
                if oscillator.value(index)?.is_greater_than(*level) {
                    return Ok(false);
                }
                inner.should_enter(index)
            }
            Strategy::Resistance { inner, .. } => inner.should_enter(index),
            Strategy::CombinedBuyAndSell { buy, .. } => buy.should_enter(index),
        }
    }

    pub fn should_exit(&self, index: usize) -> Result<bool, SigtraderError> {
        match self {
            Strategy::IndicatorOver { first, second } => {
                Ok(first.value(index)?.is_less_than(second.value(index)?))
            }
            Strategy::And(left, right) => Ok(left.should_exit(index)? && right.should_exit(index)?),
            Strategy::Or(left, right) => Ok(left.should_exit(index)? || right.should_exit(index)?),
            Strategy::Opposite(inner) => inner.should_enter(index),
            Strategy::Support { inner, .. } => inner.should_exit(index),
            Strategy::Resistance {
                oscillator,
                inner,
                level,
            } => {
                if oscillator.value(index)?.is_less_than(*level) {
                    return Ok(false);
                }
                inner.should_exit(index)
            }
            Strategy::CombinedBuyAndSell { sell, .. } => sell.should_exit(index),
        }
    }
}
