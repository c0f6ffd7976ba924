//! # Validation
//!
//! Produces the single verdict gating submission. Evaluation is a pure
//! function of the current form state and is re-run on every query, never
//! cached across edits.

use crate::decimal;
use crate::types::{AmountPair, Asset, AssetSlot, SelectionState};

/// The single validation outcome, ordered by precedence: the first failing
/// check wins, and only [`Verdict::Ready`] enables submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// An asset selector is still empty
    NoSelection,
    /// No pool exists for the selected pair and fee tier
    PoolMissing,
    /// An amount carries more fractional digits than its token supports
    PrecisionExceeded(AssetSlot),
    /// An amount exceeds the available balance
    InsufficientBalance(AssetSlot),
    Ready,
}

impl Verdict {
    /// Fixed label shown on the submit control
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::NoSelection => "Select tokens",
            Verdict::PoolMissing => "Pool is not existent",
            Verdict::PrecisionExceeded(AssetSlot::First) => "Invalid value of token 01",
            Verdict::PrecisionExceeded(AssetSlot::Second) => "Invalid value of token 02",
            Verdict::InsufficientBalance(AssetSlot::First) => "You don't have enough token 01",
            Verdict::InsufficientBalance(AssetSlot::Second) => "You don't have enough token 02",
            Verdict::Ready => "Add Liquidity",
        }
    }

    pub fn allows_submit(&self) -> bool {
        matches!(self, Verdict::Ready)
    }
}

/// Evaluate the precondition chain, short-circuiting at the first failure.
pub fn evaluate(
    selection: &SelectionState,
    amounts: &AmountPair,
    assets: &[Asset],
    pool_exists: bool,
) -> Verdict {
    let (asset_1, asset_2) = match (
        selection.asset_1.and_then(|i| assets.get(i)),
        selection.asset_2.and_then(|i| assets.get(i)),
    ) {
        (Some(asset_1), Some(asset_2)) => (asset_1, asset_2),
        _ => return Verdict::NoSelection,
    };

    if !pool_exists {
        return Verdict::PoolMissing;
    }

    if decimal::scale_of(&amounts.amount_1) > asset_1.decimals as usize {
        return Verdict::PrecisionExceeded(AssetSlot::First);
    }
    if decimal::scale_of(&amounts.amount_2) > asset_2.decimals as usize {
        return Verdict::PrecisionExceeded(AssetSlot::Second);
    }

    if let Some(verdict) = balance_check(&amounts.amount_1, asset_1, AssetSlot::First) {
        return verdict;
    }
    if let Some(verdict) = balance_check(&amounts.amount_2, asset_2, AssetSlot::Second) {
        return verdict;
    }

    Verdict::Ready
}

fn balance_check(amount: &str, asset: &Asset, slot: AssetSlot) -> Option<Verdict> {
    match decimal::to_integer(amount, asset.decimals) {
        Ok(value) if value > asset.balance => Some(Verdict::InsufficientBalance(slot)),
        Ok(_) => None,
        // Undefined input at this boundary surfaces as an invalid value
        // instead of a fault
        Err(_) => Some(Verdict::PrecisionExceeded(slot)),
    }
}
