/// Position bracket: the fixed-capacity ledger of earnings trades
///
/// **Key Design Principles:**
/// 1. The bracket emits **intents**, never direct orders
/// 2. **Capacity is a hard cap**: entries beyond it are refused, not queued
/// 3. Phases only move forward: `Long → Short → Liquidated`
///
/// **Module Structure:**
/// - `intent`: target-weight / liquidation intents
/// - `manager`: `PositionBracket` ledger and `ManagedSymbol` lifecycle
pub mod intent;
pub mod manager;

pub use intent::BracketIntent;
pub use manager::{BracketError, ManagedSymbol, Phase, PositionBracket, DEFAULT_CAPACITY};
