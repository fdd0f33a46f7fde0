//! Index-addressed, memoizing indicator graph.
//!
//! An indicator is a pure function of a bar index, computed from the series
//! and/or other indicators, with results cached per instance for its
//! lifetime. Caching is part of the contract, not an optimization: chained
//! recursive constructions (a triple EMA, say) are exponential without it.

pub mod simple;
pub mod trackers;
pub mod oscillators;

use crate::domain::error::SigtraderError;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// A cached derived value over a series.
///
/// `value(i)` may only depend on indices `<= i` of its inputs; evaluating
/// the same index twice returns identical results without recomputation.
pub trait Indicator: fmt::Debug {
    type Output: Clone;

    fn value(&self, index: usize) -> Result<Self::Output, SigtraderError>;

    /// How many preceding indices this indicator needs before its value at
    /// an index is fully warmed up. Earlier indices still return a defined
    /// degenerate value, documented per indicator.
    fn lookback(&self) -> usize {
        0
    }
}

/// Shared handle to a numeric indicator.
pub type NumIndicator = Rc<dyn Indicator<Output = crate::domain::num::Num>>;

/// Shared handle to a boolean indicator.
pub type BoolIndicator = Rc<dyn Indicator<Output = bool>>;

/// Write-once, index-addressed memo store.
///
/// Entries are never invalidated; the underlying series cannot mutate.
/// Not `Sync`: first-time population of an index is unguarded, so sharing
/// one indicator instance across threads is unsound without external
/// serialization. Single-threaded pull evaluation is the intended model.
pub struct Cache<T> {
    slots: RefCell<Vec<Option<T>>>,
    /// Length of the contiguous filled prefix, maintained by `insert`.
    filled: Cell<usize>,
}

impl<T: Clone> Cache<T> {
    pub fn new() -> Cache<T> {
        Cache {
            slots: RefCell::new(Vec::new()),
            filled: Cell::new(0),
        }
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.slots.borrow().get(index).cloned().flatten()
    }

    pub fn insert(&self, index: usize, value: T) {
        let mut slots = self.slots.borrow_mut();
        if slots.len() <= index {
            slots.resize(index + 1, None);
        }
        slots[index] = Some(value);
        let mut filled = self.filled.get();
        while filled < slots.len() && slots[filled].is_some() {
            filled += 1;
        }
        self.filled.set(filled);
    }

    /// Memoizes a single index. For indicators whose value at `index` does
    /// not reference their own earlier output (window averages and the
    /// like).
    pub fn get_or_compute<F>(&self, index: usize, compute: F) -> Result<T, SigtraderError>
    where
        F: FnOnce() -> Result<T, SigtraderError>,
    {
        if let Some(value) = self.get(index) {
            return Ok(value);
        }
        let value = compute()?;
        self.insert(index, value.clone());
        Ok(value)
    }

    /// Memoizes by filling forward from the last cached index.
    ///
    /// For self-referencing indicators: `calculate(i)` may call back into
    /// the indicator at `i - 1`, which is guaranteed to be a cache hit by
    /// the time it runs. Keeps evaluation linear in index count and the
    /// recursion depth constant.
    pub fn get_or_fill<F>(&self, index: usize, mut calculate: F) -> Result<T, SigtraderError>
    where
        F: FnMut(usize) -> Result<T, SigtraderError>,
    {
        if let Some(value) = self.get(index) {
            return Ok(value);
        }
        for i in self.filled.get()..index {
            if self.get(i).is_none() {
                let value = calculate(i)?;
                self.insert(i, value);
            }
        }
        let value = calculate(index)?;
        self.insert(index, value.clone());
        Ok(value)
    }
}

impl<T: Clone> Default for Cache<T> {
    fn default() -> Self {
        Cache::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Cache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("filled", &self.filled.get())
            .finish_non_exhaustive()
    }
}
