//! # Synchronization Engine
//!
//! Owns the two display amounts and the pair selection, and decides on
//! every event which side drives the recomputation of the other. Recompute
//! is keyed off range and selection identity, never off the derived
//! amounts, so a recompute can never re-trigger itself. Every handler runs
//! to completion synchronously inside the triggering call.

use num_traits::Zero;
use tracing::{debug, trace};

use crate::convert::{AmountConverter, ConvertAmount, RecomputeGate};
use crate::decimal;
use crate::types::{AmountPair, Asset, AssetSlot, BlockState, SelectionState, TickRange};

/// Transition states of the machine. Handlers run synchronously, so the
/// engine is always observed `Idle` from outside; the intermediate states
/// exist for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    EditingAsset1,
    EditingAsset2,
    RangeRecompute,
}

/// Events that drive the machine.
///
/// There is deliberately no event for "an amount changed": derived output
/// cannot feed back into the machine, which is what keeps the two inputs
/// from recomputing each other in a loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositEvent {
    /// The user typed into one of the amount fields
    AmountEdited { slot: AssetSlot, value: String },
    /// The price range identity changed
    RangeChanged,
    /// The pair selection identity changed
    SelectionChanged,
    /// The user asked to deposit the full balance of one side
    MaxRequested { slot: AssetSlot },
    /// An amount field lost focus
    BlurNormalize { slot: AssetSlot },
}

/// Read-only inputs refreshed by the caller between events
pub struct FormEnv<'a> {
    pub assets: &'a [Asset],
    pub range: TickRange,
    pub block_1: &'a BlockState,
    pub block_2: &'a BlockState,
}

impl FormEnv<'_> {
    fn asset(&self, selection: &SelectionState, slot: AssetSlot) -> Option<&Asset> {
        selection.slot(slot).and_then(|index| self.assets.get(index))
    }

    fn gate(&self, selection: &SelectionState, bypass_zero_skip: bool) -> RecomputeGate {
        RecomputeGate {
            blocked: self.block_1.blocked || self.block_2.blocked,
            both_selected: selection.both_selected(),
            bypass_zero_skip,
        }
    }
}

/// The dual-amount synchronization engine
#[derive(Debug)]
pub struct SyncEngine {
    amounts: AmountPair,
    selection: SelectionState,
    last_driver: Option<AssetSlot>,
    state: SyncState,
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self {
            amounts: AmountPair::default(),
            selection: SelectionState::default(),
            last_driver: None,
            state: SyncState::Idle,
        }
    }
}

impl SyncEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amounts(&self) -> &AmountPair {
        &self.amounts
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub(crate) fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    /// The side whose user action last determined the counterpart
    pub fn last_driver(&self) -> Option<AssetSlot> {
        self.last_driver
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Apply one event. At most one counterpart recompute happens per
    /// call, and it always reads the amount current at event time.
    pub fn apply<C: ConvertAmount>(
        &mut self,
        event: DepositEvent,
        env: &FormEnv<'_>,
        converter: &AmountConverter<C>,
    ) {
        match event {
            DepositEvent::AmountEdited { slot, value } => {
                self.on_edit(slot, value, env, converter)
            }
            DepositEvent::RangeChanged | DepositEvent::SelectionChanged => {
                self.on_trigger(env, converter)
            }
            DepositEvent::MaxRequested { slot } => self.on_max(slot, env, converter),
            DepositEvent::BlurNormalize { slot } => self.on_blur(slot),
        }
        self.transition(SyncState::Idle);
    }

    fn transition(&mut self, to: SyncState) {
        if self.state != to {
            trace!(from = ?self.state, to = ?to, "sync transition");
            self.state = to;
        }
    }

    fn editing_state(slot: AssetSlot) -> SyncState {
        match slot {
            AssetSlot::First => SyncState::EditingAsset1,
            AssetSlot::Second => SyncState::EditingAsset2,
        }
    }

    /// Store the raw edit, then derive the counterpart when the edited
    /// side parses to a nonzero integer.
    fn on_edit<C: ConvertAmount>(
        &mut self,
        slot: AssetSlot,
        value: String,
        env: &FormEnv<'_>,
        converter: &AmountConverter<C>,
    ) {
        let Some(asset) = env.asset(&self.selection, slot) else {
            debug!(?slot, "edit ignored, slot has no selected asset");
            return;
        };
        self.transition(Self::editing_state(slot));

        let parsed = decimal::to_integer(&value, asset.decimals);
        self.amounts.set(slot, value);
        self.last_driver = Some(slot);

        // An over-scale or malformed string is kept for display but
        // cannot drive; validation reports it on the next query.
        let Ok(amount) = parsed else { return };

        let derived = converter.convert_guarded(
            &amount,
            env.range,
            slot == AssetSlot::First,
            &asset.address,
            env.gate(&self.selection, false),
        );
        if let Some(counterpart) = derived {
            self.amounts.set(slot.other(), counterpart);
        }
    }

    /// Range or selection identity changed. At most one side recomputes,
    /// and the first asset drives whenever its amount is nonzero,
    /// regardless of which side was edited last.
    fn on_trigger<C: ConvertAmount>(
        &mut self,
        env: &FormEnv<'_>,
        converter: &AmountConverter<C>,
    ) {
        if env.block_1.blocked || env.block_2.blocked || !self.selection.both_selected() {
            return;
        }
        self.transition(SyncState::RangeRecompute);

        for slot in [AssetSlot::First, AssetSlot::Second] {
            let Some(asset) = env.asset(&self.selection, slot) else {
                return;
            };
            let Ok(amount) = decimal::to_integer(self.amounts.get(slot), asset.decimals)
            else {
                // An unparseable side cannot drive; fall through like zero
                continue;
            };
            if amount.is_zero() {
                continue;
            }

            let derived = converter.convert_guarded(
                &amount,
                env.range,
                slot == AssetSlot::First,
                &asset.address,
                env.gate(&self.selection, false),
            );
            if let Some(counterpart) = derived {
                self.amounts.set(slot.other(), counterpart);
            }
            // Only one side ever recomputes per trigger
            return;
        }
    }

    /// Deposit the full balance of one side and derive the other from it,
    /// even when the balance is zero.
    fn on_max<C: ConvertAmount>(
        &mut self,
        slot: AssetSlot,
        env: &FormEnv<'_>,
        converter: &AmountConverter<C>,
    ) {
        let Some(asset) = env.asset(&self.selection, slot) else {
            debug!(?slot, "max ignored, slot has no selected asset");
            return;
        };
        self.transition(Self::editing_state(slot));

        let balance = asset.balance.clone();
        self.amounts
            .set(slot, decimal::to_display(&balance, asset.decimals));
        self.last_driver = Some(slot);

        let derived = converter.convert_guarded(
            &balance,
            env.range,
            slot == AssetSlot::First,
            &asset.address,
            env.gate(&self.selection, true),
        );
        if let Some(counterpart) = derived {
            self.amounts.set(slot.other(), counterpart);
        }
    }

    /// Empty fields normalize to "0.0" on blur once a pair is selected.
    /// Never touches the opposite side.
    fn on_blur(&mut self, slot: AssetSlot) {
        if self.selection.both_selected() && self.amounts.get(slot).is_empty() {
            self.amounts.set(slot, "0.0".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use solana_sdk::pubkey::Pubkey;
    use std::cell::RefCell;
    use std::rc::Rc;

    type CallLog = Rc<RefCell<Vec<(BigUint, bool, Pubkey)>>>;

    /// Records every capability call and answers with a fixed string
    struct StubConverter {
        calls: CallLog,
        output: String,
    }

    fn stub(output: &str) -> (AmountConverter<StubConverter>, CallLog) {
        let calls = CallLog::default();
        let converter = AmountConverter::new(StubConverter {
            calls: calls.clone(),
            output: output.to_string(),
        });
        (converter, calls)
    }

    impl ConvertAmount for StubConverter {
        fn convert(
            &self,
            amount: &BigUint,
            _left_tick: i32,
            _right_tick: i32,
            by_first: bool,
            source: &Pubkey,
        ) -> String {
            self.calls
                .borrow_mut()
                .push((amount.clone(), by_first, *source));
            self.output.clone()
        }
    }

    fn test_assets() -> Vec<Asset> {
        vec![
            Asset {
                symbol: "USDC".to_string(),
                decimals: 6,
                balance: BigUint::from(1_000_000_000u64),
                address: Pubkey::from([1u8; 32]),
                icon_uri: String::new(),
            },
            Asset {
                symbol: "SOL".to_string(),
                decimals: 9,
                balance: BigUint::from(500_000_000u64),
                address: Pubkey::from([2u8; 32]),
                icon_uri: String::new(),
            },
        ]
    }

    fn engine_with_pair() -> SyncEngine {
        let mut engine = SyncEngine::new();
        engine.selection_mut().asset_1 = Some(0);
        engine.selection_mut().asset_2 = Some(1);
        engine
    }

    fn env<'a>(assets: &'a [Asset], blocks: &'a (BlockState, BlockState)) -> FormEnv<'a> {
        FormEnv {
            assets,
            range: TickRange::new(-120, 120),
            block_1: &blocks.0,
            block_2: &blocks.1,
        }
    }

    #[test]
    fn test_edit_drives_counterpart() {
        let assets = test_assets();
        let blocks = Default::default();
        let mut engine = engine_with_pair();
        let (converter, calls) = stub("0.42");

        engine.apply(
            DepositEvent::AmountEdited {
                slot: AssetSlot::First,
                value: "100.123456".to_string(),
            },
            &env(&assets, &blocks),
            &converter,
        );

        assert_eq!(engine.amounts().amount_1, "100.123456");
        assert_eq!(engine.amounts().amount_2, "0.42");
        assert_eq!(engine.last_driver(), Some(AssetSlot::First));
        assert_eq!(engine.state(), SyncState::Idle);

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, BigUint::from(100_123_456u64));
        assert!(calls[0].1);
        assert_eq!(calls[0].2, assets[0].address);
    }

    #[test]
    fn test_edit_on_unselected_slot_is_ignored() {
        let assets = test_assets();
        let blocks = Default::default();
        let mut engine = SyncEngine::new();
        let (converter, calls) = stub("1");

        engine.apply(
            DepositEvent::AmountEdited {
                slot: AssetSlot::First,
                value: "5".to_string(),
            },
            &env(&assets, &blocks),
            &converter,
        );

        assert_eq!(engine.amounts().amount_1, "");
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_zero_edit_leaves_counterpart_untouched() {
        let assets = test_assets();
        let blocks = Default::default();
        let mut engine = engine_with_pair();
        let (converter, calls) = stub("9.9");

        engine.apply(
            DepositEvent::AmountEdited {
                slot: AssetSlot::Second,
                value: "0.0".to_string(),
            },
            &env(&assets, &blocks),
            &converter,
        );

        assert_eq!(engine.amounts().amount_2, "0.0");
        assert_eq!(engine.amounts().amount_1, "");
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_over_scale_edit_keeps_string_but_does_not_drive() {
        let assets = test_assets();
        let blocks = Default::default();
        let mut engine = engine_with_pair();
        let (converter, calls) = stub("1");

        engine.apply(
            DepositEvent::AmountEdited {
                slot: AssetSlot::First,
                value: "100.1234567".to_string(),
            },
            &env(&assets, &blocks),
            &converter,
        );

        assert_eq!(engine.amounts().amount_1, "100.1234567");
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_range_change_with_zero_amounts_never_converts() {
        let assets = test_assets();
        let blocks = Default::default();
        let mut engine = engine_with_pair();
        let (converter, calls) = stub("1");

        engine.apply(
            DepositEvent::BlurNormalize { slot: AssetSlot::First },
            &env(&assets, &blocks),
            &converter,
        );
        engine.apply(
            DepositEvent::BlurNormalize { slot: AssetSlot::Second },
            &env(&assets, &blocks),
            &converter,
        );
        assert_eq!(engine.amounts().amount_1, "0.0");
        assert_eq!(engine.amounts().amount_2, "0.0");

        engine.apply(
            DepositEvent::RangeChanged,
            &env(&assets, &blocks),
            &converter,
        );

        assert!(calls.borrow().is_empty());
        assert_eq!(engine.amounts().amount_1, "0.0");
        assert_eq!(engine.amounts().amount_2, "0.0");
    }

    #[test]
    fn test_range_change_recomputes_one_side_only() {
        let assets = test_assets();
        let blocks = Default::default();
        let mut engine = engine_with_pair();
        let (converter, calls) = stub("7.5");

        // Editing the second side derives the first, leaving both nonzero
        // with the second as last driver
        engine.apply(
            DepositEvent::AmountEdited {
                slot: AssetSlot::Second,
                value: "3".to_string(),
            },
            &env(&assets, &blocks),
            &converter,
        );
        assert_eq!(engine.amounts().amount_1, "7.5");
        assert_eq!(engine.last_driver(), Some(AssetSlot::Second));
        calls.borrow_mut().clear();

        engine.apply(
            DepositEvent::RangeChanged,
            &env(&assets, &blocks),
            &converter,
        );

        // The first asset wins the driver role by precedence, regardless
        // of which side was edited last; only the second amount changes
        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].1, "first asset must drive");
        assert_eq!(calls[0].0, BigUint::from(7_500_000u64));
        assert_eq!(engine.amounts().amount_1, "7.5");
        assert_eq!(engine.amounts().amount_2, "7.5");
    }

    #[test]
    fn test_range_change_falls_back_to_second_driver() {
        let assets = test_assets();
        let blocks = Default::default();
        let mut engine = SyncEngine::new();
        engine.selection_mut().asset_2 = Some(1);
        let (converter, calls) = stub("2.25");

        // Typed while only the second asset was selected, so nothing
        // derived yet and the first side is still empty
        engine.apply(
            DepositEvent::AmountEdited {
                slot: AssetSlot::Second,
                value: "3".to_string(),
            },
            &env(&assets, &blocks),
            &converter,
        );
        assert_eq!(engine.amounts().amount_1, "");
        assert!(calls.borrow().is_empty());

        // Completing the pair triggers the recompute; the empty first
        // side cannot drive, so the second does
        engine.selection_mut().asset_1 = Some(0);
        engine.apply(
            DepositEvent::SelectionChanged,
            &env(&assets, &blocks),
            &converter,
        );

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].1);
        assert_eq!(engine.amounts().amount_1, "2.25");
        assert_eq!(engine.amounts().amount_2, "3");
    }

    #[test]
    fn test_blocked_input_suppresses_recompute() {
        let assets = test_assets();
        let blocks = (
            BlockState { blocked: true, blocker_info: Some("No liquidity".to_string()) },
            BlockState::default(),
        );
        let mut engine = engine_with_pair();
        let (converter, calls) = stub("1");

        engine.apply(
            DepositEvent::AmountEdited {
                slot: AssetSlot::First,
                value: "10".to_string(),
            },
            &env(&assets, &blocks),
            &converter,
        );
        engine.apply(
            DepositEvent::RangeChanged,
            &env(&assets, &blocks),
            &converter,
        );

        // The raw edit is kept; only the derivation is suppressed
        assert_eq!(engine.amounts().amount_1, "10");
        assert_eq!(engine.amounts().amount_2, "");
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_blur_normalizes_empty_field_idempotently() {
        let assets = test_assets();
        let blocks = Default::default();
        let mut engine = engine_with_pair();
        let (converter, calls) = stub("1");

        for _ in 0..2 {
            engine.apply(
                DepositEvent::BlurNormalize { slot: AssetSlot::Second },
                &env(&assets, &blocks),
                &converter,
            );
            assert_eq!(engine.amounts().amount_2, "0.0");
        }
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_blur_requires_full_selection() {
        let assets = test_assets();
        let blocks = Default::default();
        let mut engine = SyncEngine::new();
        engine.selection_mut().asset_1 = Some(0);
        let (converter, _calls) = stub("1");

        engine.apply(
            DepositEvent::BlurNormalize { slot: AssetSlot::First },
            &env(&assets, &blocks),
            &converter,
        );
        assert_eq!(engine.amounts().amount_1, "");
    }

    #[test]
    fn test_max_uses_full_balance_and_bypasses_zero_skip() {
        let assets = test_assets();
        let blocks = Default::default();
        let mut engine = engine_with_pair();
        let (converter, calls) = stub("101.11");

        engine.apply(
            DepositEvent::MaxRequested { slot: AssetSlot::Second },
            &env(&assets, &blocks),
            &converter,
        );

        assert_eq!(engine.amounts().amount_2, "0.5");
        assert_eq!(engine.amounts().amount_1, "101.11");
        assert_eq!(engine.last_driver(), Some(AssetSlot::Second));

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, BigUint::from(500_000_000u64));
        assert!(!calls[0].1);
        assert_eq!(calls[0].2, assets[1].address);
    }

    #[test]
    fn test_max_with_zero_balance_still_converts() {
        let mut assets = test_assets();
        assets[0].balance = BigUint::default();
        let blocks = Default::default();
        let mut engine = engine_with_pair();
        let (converter, calls) = stub("0");

        engine.apply(
            DepositEvent::MaxRequested { slot: AssetSlot::First },
            &env(&assets, &blocks),
            &converter,
        );

        assert_eq!(engine.amounts().amount_1, "0");
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_selection_change_never_clears_amounts() {
        let assets = test_assets();
        let blocks = Default::default();
        let mut engine = engine_with_pair();
        let (converter, _calls) = stub("4");

        engine.apply(
            DepositEvent::AmountEdited {
                slot: AssetSlot::First,
                value: "10".to_string(),
            },
            &env(&assets, &blocks),
            &converter,
        );
        engine.selection_mut().asset_2 = None;
        engine.apply(
            DepositEvent::SelectionChanged,
            &env(&assets, &blocks),
            &converter,
        );

        assert_eq!(engine.amounts().amount_1, "10");
        assert_eq!(engine.amounts().amount_2, "4");
    }
}
