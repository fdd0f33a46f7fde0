//! OHLCV bar representation.

use crate::domain::error::SigtraderError;
use crate::domain::num::Num;
use chrono::NaiveDateTime;

/// One time-stamped OHLCV sample in a [`Series`](crate::domain::series::Series).
#[derive(Debug, Clone)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: Num,
    pub high: Num,
    pub low: Num,
    pub close: Num,
    pub volume: Num,
}

impl Bar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> Result<Num, SigtraderError> {
        (self.high + self.low + self.close).divided_by(Num::THREE)
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: Num) -> Num {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn num(s: &str) -> Num {
        s.parse().unwrap()
    }

    fn sample_bar() -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 15)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: num("100"),
            high: num("110"),
            low: num("90"),
            close: num("105"),
            volume: num("50000"),
        }
    }

    #[test]
    fn typical_price() {
        let bar = sample_bar();
        // (110 + 90 + 105) / 3 = 101.666...
        let expected = (num("110") + num("90") + num("105"))
            .divided_by(Num::THREE)
            .unwrap();
        assert_eq!(bar.typical_price().unwrap(), expected);
    }

    #[test]
    fn true_range_hl_dominates() {
        let bar = sample_bar();
        // high-low=20, |high-100|=10, |low-100|=10 → 20
        assert_eq!(bar.true_range(num("100")), num("20"));
    }

    #[test]
    fn true_range_gap_up() {
        let bar = sample_bar();
        // high-low=20, |110-70|=40, |90-70|=20 → 40
        assert_eq!(bar.true_range(num("70")), num("40"));
    }

    #[test]
    fn true_range_gap_down() {
        let bar = sample_bar();
        // high-low=20, |110-130|=20, |90-130|=40 → 40
        assert_eq!(bar.true_range(num("130")), num("40"));
    }
}
