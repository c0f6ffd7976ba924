//! # Amount Conversion
//!
//! Seam between the sync engine and the externally supplied range-dependent
//! conversion function. The engine only ever reaches the capability through
//! [`AmountConverter::convert_guarded`], which refuses the call while an
//! input is blocked, a selection is missing, or the driving amount is zero.

use num_bigint::BigUint;
use num_traits::Zero;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::types::TickRange;

/// Externally supplied conversion capability.
///
/// Computes the counterpart deposit display string for a driving amount
/// within a price range. Pure from the engine's perspective: the same
/// inputs must yield the same output.
pub trait ConvertAmount {
    /// `by_first` is true when the driving amount belongs to the first
    /// asset of the pair; `source` is the driving asset's mint address.
    fn convert(
        &self,
        amount: &BigUint,
        left_tick: i32,
        right_tick: i32,
        by_first: bool,
        source: &Pubkey,
    ) -> String;
}

/// Preconditions gathered from the current form state
#[derive(Debug, Clone, Copy)]
pub(crate) struct RecomputeGate {
    /// True when either input carries an external block flag
    pub blocked: bool,
    /// True when both assets are selected
    pub both_selected: bool,
    /// Max requests drive with the full balance even when it is zero
    pub bypass_zero_skip: bool,
}

/// Guarding wrapper owning the injected capability
pub struct AmountConverter<C> {
    inner: C,
}

impl<C: ConvertAmount> AmountConverter<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// Run the conversion if every precondition holds, `None` otherwise.
    /// A `None` leaves the counterpart amount untouched.
    pub(crate) fn convert_guarded(
        &self,
        amount: &BigUint,
        range: TickRange,
        by_first: bool,
        source: &Pubkey,
        gate: RecomputeGate,
    ) -> Option<String> {
        if gate.blocked || !gate.both_selected {
            debug!(
                by_first,
                blocked = gate.blocked,
                "conversion suppressed by form state"
            );
            return None;
        }
        if amount.is_zero() && !gate.bypass_zero_skip {
            return None;
        }

        Some(self.inner.convert(
            amount,
            range.left_tick,
            range.right_tick,
            by_first,
            source,
        ))
    }
}
