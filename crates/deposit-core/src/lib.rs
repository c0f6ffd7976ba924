//! # Deposit Core - Liquidity Deposit Form Engine
//!
//! Dual-amount synchronization and validation for a two-asset
//! concentrated-liquidity deposit form. This crate provides:
//!
//! - A decimal codec between display strings and exactly scaled integers
//! - A guarded seam around the injected range conversion capability
//! - The synchronization machine deriving the counterpart amount
//! - Pure validation producing the single verdict gating submission
//! - A controller gluing the engine to caller-supplied capabilities
//!
//! The engine is host-agnostic: it has no rendering dependency and is
//! driven entirely through explicit events, so a UI shell, a test harness,
//! and a headless script can all host it the same way. All recomputation
//! happens synchronously inside the triggering call.

// Re-export all modules
pub mod controller;
pub mod convert;
pub mod decimal;
pub mod errors;
pub mod sync;
pub mod types;
pub mod validate;

// Re-export commonly used items
pub use controller::{DepositForm, FormHooks};
pub use convert::{AmountConverter, ConvertAmount};
pub use errors::{CoreResult, DepositError};
pub use sync::{DepositEvent, FormEnv, SyncEngine, SyncState};
pub use types::{AmountPair, Asset, AssetSlot, BlockState, SelectionState, TickRange};
pub use validate::{evaluate, Verdict};
