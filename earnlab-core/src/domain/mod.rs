//! Domain types for EarnLab

pub mod candidate;
pub mod fees;
pub mod ids;
pub mod option;

pub use candidate::CoarseCandidate;
pub use fees::{PercentageFee, SecurityModels};
pub use ids::{Market, SymbolId};
pub use option::{ChainFilter, OptionContract, OptionRight};
