//! Media engine abstraction and its `rodio` implementation.

mod engine;
mod output;

pub use engine::{EngineSignal, MediaEngine};
pub use output::RodioEngine;

#[cfg(test)]
pub mod fake;
