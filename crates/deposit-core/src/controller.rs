//! # Form Controller
//!
//! Glues the sync engine and validation to the caller's capabilities.
//! Selection notifications and submit requests flow out through the
//! [`FormHooks`] trait; range, pool existence, and block states flow in
//! through setters and only dispatch engine events when their identity
//! actually changed.

use tracing::debug;

use crate::convert::{AmountConverter, ConvertAmount};
use crate::errors::{CoreResult, DepositError};
use crate::sync::{DepositEvent, FormEnv, SyncEngine};
use crate::types::{AmountPair, Asset, AssetSlot, BlockState, SelectionState, TickRange};
use crate::validate::{self, Verdict};

/// Caller-supplied notification capabilities
pub trait FormHooks {
    /// The selected pair or fee tier changed. Downstream effects such as
    /// refetching pool existence belong to the caller.
    fn selection_changed(
        &mut self,
        asset_1: Option<usize>,
        asset_2: Option<usize>,
        fee_tier: usize,
    );

    /// The user confirmed a submit while the form was ready
    fn submit(&mut self);
}

/// The deposit form facade. Owns the selection and amount state
/// exclusively; assets, fee tiers, range, pool flag, and block states are
/// caller-supplied inputs.
pub struct DepositForm<C, H> {
    assets: Vec<Asset>,
    fee_tiers: Vec<u16>,
    range: TickRange,
    pool_exists: bool,
    block_1: BlockState,
    block_2: BlockState,
    engine: SyncEngine,
    converter: AmountConverter<C>,
    hooks: H,
}

impl<C: ConvertAmount, H: FormHooks> DepositForm<C, H> {
    /// Create a form session. The pool is considered missing until the
    /// caller reports otherwise.
    pub fn new(
        assets: Vec<Asset>,
        fee_tiers: Vec<u16>,
        range: TickRange,
        converter: C,
        hooks: H,
    ) -> Self {
        Self {
            assets,
            fee_tiers,
            range,
            pool_exists: false,
            block_1: BlockState::default(),
            block_2: BlockState::default(),
            engine: SyncEngine::new(),
            converter: AmountConverter::new(converter),
            hooks,
        }
    }

    // ========================================================================
    // Selection entry points
    // ========================================================================

    /// Select or clear the first asset of the pair. Amounts persist across
    /// selection changes.
    pub fn select_asset_1(&mut self, index: Option<usize>) -> CoreResult<()> {
        self.select(AssetSlot::First, index)
    }

    /// Select or clear the second asset of the pair
    pub fn select_asset_2(&mut self, index: Option<usize>) -> CoreResult<()> {
        self.select(AssetSlot::Second, index)
    }

    /// Select the first asset by display symbol, as the dropdowns do
    pub fn select_asset_1_by_symbol(&mut self, symbol: &str) -> CoreResult<()> {
        let index = self.symbol_index(symbol)?;
        self.select(AssetSlot::First, Some(index))
    }

    /// Select the second asset by display symbol
    pub fn select_asset_2_by_symbol(&mut self, symbol: &str) -> CoreResult<()> {
        let index = self.symbol_index(symbol)?;
        self.select(AssetSlot::Second, Some(index))
    }

    /// Fee tier changes notify the caller but never trigger recomputation
    pub fn select_fee_tier(&mut self, index: usize) -> CoreResult<()> {
        if index >= self.fee_tiers.len() {
            return Err(DepositError::FeeTierOutOfBounds {
                index,
                len: self.fee_tiers.len(),
            });
        }
        self.engine.selection_mut().fee_tier = index;
        self.notify_selection();
        Ok(())
    }

    pub fn asset_index_by_symbol(&self, symbol: &str) -> Option<usize> {
        self.assets.iter().position(|asset| asset.symbol == symbol)
    }

    fn symbol_index(&self, symbol: &str) -> CoreResult<usize> {
        self.asset_index_by_symbol(symbol)
            .ok_or_else(|| DepositError::UnknownSymbol(symbol.to_string()))
    }

    fn select(&mut self, slot: AssetSlot, index: Option<usize>) -> CoreResult<()> {
        if let Some(index) = index {
            if index >= self.assets.len() {
                return Err(DepositError::AssetIndexOutOfBounds {
                    index,
                    len: self.assets.len(),
                });
            }
        }

        let selection = self.engine.selection_mut();
        let changed = selection.slot(slot) != index;
        selection.set_slot(slot, index);

        self.notify_selection();
        if changed {
            self.dispatch(DepositEvent::SelectionChanged);
        }
        Ok(())
    }

    fn notify_selection(&mut self) {
        let selection = *self.engine.selection();
        self.hooks
            .selection_changed(selection.asset_1, selection.asset_2, selection.fee_tier);
    }

    // ========================================================================
    // Amount entry points
    // ========================================================================

    /// The user typed into an amount field
    pub fn edit_amount(&mut self, slot: AssetSlot, value: &str) {
        self.dispatch(DepositEvent::AmountEdited {
            slot,
            value: value.to_string(),
        });
    }

    /// The user asked to deposit the full balance of one side
    pub fn request_max(&mut self, slot: AssetSlot) {
        self.dispatch(DepositEvent::MaxRequested { slot });
    }

    /// An amount field lost focus
    pub fn blur(&mut self, slot: AssetSlot) {
        self.dispatch(DepositEvent::BlurNormalize { slot });
    }

    // ========================================================================
    // Externally refreshed inputs
    // ========================================================================

    /// Replace the price range. Dispatches a recompute only when the tick
    /// pair identity actually changed, never when amounts change.
    pub fn set_range(&mut self, range: TickRange) {
        if self.range == range {
            return;
        }
        self.range = range;
        self.dispatch(DepositEvent::RangeChanged);
    }

    pub fn set_pool_exists(&mut self, exists: bool) {
        self.pool_exists = exists;
    }

    pub fn set_block_states(&mut self, block_1: BlockState, block_2: BlockState) {
        self.block_1 = block_1;
        self.block_2 = block_2;
    }

    // ========================================================================
    // Read surface
    // ========================================================================

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn fee_tiers(&self) -> &[u16] {
        &self.fee_tiers
    }

    pub fn range(&self) -> TickRange {
        self.range
    }

    pub fn selection(&self) -> &SelectionState {
        self.engine.selection()
    }

    /// Current display amounts
    pub fn amounts(&self) -> &AmountPair {
        self.engine.amounts()
    }

    /// Evaluate the verdict from the current state. Never cached.
    pub fn verdict(&self) -> Verdict {
        validate::evaluate(
            self.engine.selection(),
            self.engine.amounts(),
            &self.assets,
            self.pool_exists,
        )
    }

    /// True when the verdict is ready and no input is externally blocked
    pub fn can_submit(&self) -> bool {
        self.verdict().allows_submit() && !self.block_1.blocked && !self.block_2.blocked
    }

    /// Label for the submit control. A set blocker reason takes
    /// precedence over the verdict label, first slot first.
    pub fn submit_label(&self) -> String {
        for block in [&self.block_1, &self.block_2] {
            if block.blocked {
                if let Some(info) = &block.blocker_info {
                    return info.clone();
                }
            }
        }
        self.verdict().label().to_string()
    }

    /// Forward a user submit confirmation; dropped unless the form is
    /// ready and unblocked.
    pub fn request_submit(&mut self) {
        if self.can_submit() {
            self.hooks.submit();
        } else {
            debug!(verdict = ?self.verdict(), "submit request dropped");
        }
    }

    fn dispatch(&mut self, event: DepositEvent) {
        let env = FormEnv {
            assets: &self.assets,
            range: self.range,
            block_1: &self.block_1,
            block_2: &self.block_2,
        };
        self.engine.apply(event, &env, &self.converter);
    }
}
