//! Change computation.

use tracing::debug;

use crate::selector::Selection;

/// Smallest change value emitted by default. Any positive change is kept.
pub const DEFAULT_DUST_THRESHOLD: u64 = 1;

/// How the value of a selection splits between payment, change and fee.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangePlan {
    /// Value of the change output, or `None` when no change output is made.
    pub change: Option<u64>,
    /// Fee actually paid, which absorbs any change below the dust threshold.
    pub fee: u64,
}

impl ChangePlan {
    pub fn requires_change_output(&self) -> bool {
        self.change.is_some()
    }
}

/// Splits the leftover of a selection into change and fee.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeCalculator {
    pub dust_threshold: u64,
}

impl ChangeCalculator {
    pub fn new(dust_threshold: u64) -> Self {
        ChangeCalculator { dust_threshold }
    }

    /// Compute the change for paying `amount` from `selection`.
    ///
    /// A change output is made when the selection exceeds the amount plus
    /// the with-change fee by at least the dust threshold. Otherwise the
    /// whole excess over `amount` goes to the fee.
    pub fn calculate(&self, selection: &Selection, amount: u64) -> ChangePlan {
        let excess = selection.total_value.saturating_sub(amount);
        let threshold = self.dust_threshold.max(1);

        let plan = match excess.checked_sub(selection.fee_with_change) {
            Some(change) if change >= threshold => ChangePlan {
                change: Some(change),
                fee: selection.fee_with_change,
            },
            _ => ChangePlan {
                change: None,
                fee: excess,
            },
        };
        debug!(change = ?plan.change, fee = plan.fee, "computed change");
        plan
    }
}

impl Default for ChangeCalculator {
    fn default() -> Self {
        ChangeCalculator::new(DEFAULT_DUST_THRESHOLD)
    }
}
