use deposit_core::{
    decimal, Asset, AssetSlot, ConvertAmount, DepositForm, FormHooks, TickRange,
};
use num_bigint::BigUint;
use solana_sdk::pubkey::Pubkey;

/// Stand-in for the real range conversion: a flat 2 USDC per SOL price
struct FlatPriceConverter;

impl ConvertAmount for FlatPriceConverter {
    fn convert(
        &self,
        amount: &BigUint,
        _left_tick: i32,
        _right_tick: i32,
        by_first: bool,
        _source: &Pubkey,
    ) -> String {
        if by_first {
            decimal::to_display(&(amount * BigUint::from(1_000u64) / BigUint::from(2u64)), 9)
        } else {
            decimal::to_display(&(amount * BigUint::from(2u64) / BigUint::from(1_000u64)), 6)
        }
    }
}

struct PrintingHooks;

impl FormHooks for PrintingHooks {
    fn selection_changed(
        &mut self,
        asset_1: Option<usize>,
        asset_2: Option<usize>,
        fee_tier: usize,
    ) {
        println!("selection changed: {:?} / {:?}, fee tier {}", asset_1, asset_2, fee_tier);
    }

    fn submit(&mut self) {
        println!("submit confirmed - hand off to transaction building");
    }
}

fn main() {
    println!("Deposit Form Engine Basic Usage Example");
    println!("=======================================\n");

    let assets = vec![
        Asset {
            symbol: "USDC".to_string(),
            decimals: 6,
            balance: BigUint::from(1_000_000_000u64),
            address: Pubkey::new_from_array([1u8; 32]),
            icon_uri: "usdc.svg".to_string(),
        },
        Asset {
            symbol: "SOL".to_string(),
            decimals: 9,
            balance: BigUint::from(500_000_000u64),
            address: Pubkey::new_from_array([2u8; 32]),
            icon_uri: "sol.svg".to_string(),
        },
    ];

    let mut form = DepositForm::new(
        assets,
        vec![1, 5, 30, 100],
        TickRange::new(-1200, 1200),
        FlatPriceConverter,
        PrintingHooks,
    );

    println!("verdict: {}", form.submit_label());

    form.select_asset_1_by_symbol("USDC").unwrap();
    form.select_asset_2_by_symbol("SOL").unwrap();
    form.set_pool_exists(true);

    // Typing into the first field derives the second
    form.edit_amount(AssetSlot::First, "100.123456");
    println!(
        "\nafter edit: {} USDC / {} SOL ({})",
        form.amounts().amount_1,
        form.amounts().amount_2,
        form.submit_label()
    );

    // Moving the range recomputes the counterpart from the same driver
    form.set_range(TickRange::new(-600, 600));
    println!(
        "after range move: {} USDC / {} SOL",
        form.amounts().amount_1,
        form.amounts().amount_2
    );

    // Depositing the full SOL balance drives the other way
    form.request_max(AssetSlot::Second);
    println!(
        "after max: {} USDC / {} SOL ({})",
        form.amounts().amount_1,
        form.amounts().amount_2,
        form.submit_label()
    );

    if form.can_submit() {
        form.request_submit();
    }
}
