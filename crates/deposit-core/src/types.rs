//! # Form Type Definitions
//!
//! Data model for the deposit form engine. Everything here is created fresh
//! per form session; the engine owns `SelectionState` and `AmountPair`
//! exclusively, while assets and block states are read-only snapshots
//! refreshed by the caller between events.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Which side of the pair an asset or amount belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetSlot {
    First,
    Second,
}

impl AssetSlot {
    /// The opposite side of the pair
    pub fn other(self) -> Self {
        match self {
            AssetSlot::First => AssetSlot::Second,
            AssetSlot::Second => AssetSlot::First,
        }
    }
}

/// Immutable snapshot of a depositable token, supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Display symbol (e.g. "USDC")
    pub symbol: String,

    /// Number of fractional digits the token supports
    pub decimals: u8,

    /// Available wallet balance, scaled by 10^decimals
    pub balance: BigUint,

    /// Token mint address
    #[serde(with = "pubkey_serde")]
    pub address: Pubkey,

    /// Reference to the token's display icon
    pub icon_uri: String,
}

/// Currently selected pair and fee tier. Either asset index may be absent;
/// selecting the same asset on both sides is not rejected here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub asset_1: Option<usize>,
    pub asset_2: Option<usize>,
    pub fee_tier: usize,
}

impl SelectionState {
    /// Selected asset index for a slot
    pub fn slot(&self, slot: AssetSlot) -> Option<usize> {
        match slot {
            AssetSlot::First => self.asset_1,
            AssetSlot::Second => self.asset_2,
        }
    }

    pub fn both_selected(&self) -> bool {
        self.asset_1.is_some() && self.asset_2.is_some()
    }

    pub(crate) fn set_slot(&mut self, slot: AssetSlot, index: Option<usize>) {
        match slot {
            AssetSlot::First => self.asset_1 = index,
            AssetSlot::Second => self.asset_2 = index,
        }
    }
}

/// The two user-facing amount strings. Each is empty, a non-negative
/// decimal literal, or the blur-normalized literal "0.0".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountPair {
    pub amount_1: String,
    pub amount_2: String,
}

impl AmountPair {
    pub fn get(&self, slot: AssetSlot) -> &str {
        match slot {
            AssetSlot::First => &self.amount_1,
            AssetSlot::Second => &self.amount_2,
        }
    }

    pub(crate) fn set(&mut self, slot: AssetSlot, value: String) {
        match slot {
            AssetSlot::First => self.amount_1 = value,
            AssetSlot::Second => self.amount_2 = value,
        }
    }
}

/// Selected price range, identified by its boundary tick indices.
///
/// The engine compares ranges for identity only; the tick values are
/// operands solely of the injected conversion capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRange {
    pub left_tick: i32,
    pub right_tick: i32,
}

impl TickRange {
    pub fn new(left_tick: i32, right_tick: i32) -> Self {
        Self { left_tick, right_tick }
    }
}

/// Externally owned per-asset suppression flag with an optional
/// human-readable reason
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockState {
    pub blocked: bool,
    pub blocker_info: Option<String>,
}

// Custom serde module for Pubkey
mod pubkey_serde {
    use super::*;
    use serde::{Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(pubkey: &Pubkey, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&pubkey.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Pubkey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(serde::de::Error::custom)
    }
}
