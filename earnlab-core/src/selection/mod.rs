//! Momentum universe selection

pub mod universe;

pub use universe::{sort_ascending, top_quantile, Selection, UniverseSelector};
