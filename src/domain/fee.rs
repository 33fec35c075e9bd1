//! Per-source taker fee table.

use std::collections::HashMap;

use super::id::SourceId;
use super::money::FeePct;

/// Taker fee percentage for each known source.
///
/// Read-only once the engine is running.
#[derive(Debug, Clone, Default)]
pub struct FeeSchedule {
    fees: HashMap<SourceId, FeePct>,
}

impl FeeSchedule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_fee(mut self, source: impl Into<SourceId>, fee_pct: FeePct) -> Self {
        self.fees.insert(source.into(), fee_pct);
        self
    }

    /// Fee for `source`, or `None` if it was never configured.
    #[must_use]
    pub fn taker_fee(&self, source: &SourceId) -> Option<FeePct> {
        self.fees.get(source).copied()
    }

    pub fn len(&self) -> usize {
        self.fees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fees.is_empty()
    }
}

impl FromIterator<(SourceId, FeePct)> for FeeSchedule {
    fn from_iter<I: IntoIterator<Item = (SourceId, FeePct)>>(iter: I) -> Self {
        Self {
            fees: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn unknown_source_has_no_fee() {
        let fees = FeeSchedule::new().with_fee("kraken", dec!(0.26));
        assert_eq!(fees.taker_fee(&SourceId::from("kraken")), Some(dec!(0.26)));
        assert_eq!(fees.taker_fee(&SourceId::from("binance")), None);
    }
}
