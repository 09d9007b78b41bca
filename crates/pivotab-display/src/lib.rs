//! Read-only renderers for [`pivotab_core::TableState`].

pub mod console;
mod format;
pub mod latex;
pub mod rational;

pub use format::NumberFormat;
pub use rational::{approximate, Approximation};
