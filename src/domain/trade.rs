//! Round-trip trades built from paired orders.

use crate::domain::error::SigtraderError;
use crate::domain::num::Num;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn complement(self) -> OrderSide {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

/// A fill at a bar index, priced at that bar's close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub side: OrderSide,
    pub index: usize,
    pub price: Num,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeState {
    New,
    Opened,
    Closed,
}

/// A single entry/exit pair. The lifecycle is enforced: enter once, then
/// exit once at an index no earlier than the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    entry_side: OrderSide,
    entry: Option<Order>,
    exit: Option<Order>,
}

impl Trade {
    /// A long trade: enters with a buy, exits with a sell.
    pub fn new() -> Trade {
        Trade::with_entry_side(OrderSide::Buy)
    }

    pub fn with_entry_side(entry_side: OrderSide) -> Trade {
        Trade {
            entry_side,
            entry: None,
            exit: None,
        }
    }

    pub fn state(&self) -> TradeState {
        match (&self.entry, &self.exit) {
            (None, _) => TradeState::New,
            (Some(_), None) => TradeState::Opened,
            (Some(_), Some(_)) => TradeState::Closed,
        }
    }

    pub fn entry(&self) -> Option<&Order> {
        self.entry.as_ref()
    }

    pub fn exit(&self) -> Option<&Order> {
        self.exit.as_ref()
    }

    pub fn enter(&mut self, index: usize, price: Num) -> Result<(), SigtraderError> {
        if self.entry.is_some() {
            return Err(SigtraderError::AlreadyEntered);
        }
        self.entry = Some(Order {
            side: self.entry_side,
            index,
            price,
        });
        Ok(())
    }

    pub fn exit_at(&mut self, index: usize, price: Num) -> Result<(), SigtraderError> {
        let entry = match &self.entry {
            None => return Err(SigtraderError::NotEntered),
            Some(entry) => entry,
        };
        if self.exit.is_some() {
            return Err(SigtraderError::AlreadyClosed);
        }
        if index < entry.index {
            return Err(SigtraderError::ExitBeforeEntry {
                entry: entry.index,
                exit: index,
            });
        }
        self.exit = Some(Order {
            side: self.entry_side.complement(),
            index,
            price,
        });
        Ok(())
    }

    /// Signed profit of a closed trade, from the entry side's point of
    /// view. `None` until closed.
    pub fn profit(&self) -> Option<Num> {
        let (entry, exit) = match (&self.entry, &self.exit) {
            (Some(entry), Some(exit)) => (entry, exit),
            _ => return None,
        };
        let delta = exit.price - entry.price;
        Some(match self.entry_side {
            OrderSide::Buy => delta,
            OrderSide::Sell => -delta,
        })
    }
}

impl Default for Trade {
    fn default() -> Self {
        Trade::new()
    }
}
