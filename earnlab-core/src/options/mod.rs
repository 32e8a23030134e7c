//! Option contract selection

pub mod selector;

pub use selector::OptionContractSelector;
