//! The Track Store: ordered tracks plus the current selection, with
//! index-consistent insertion and removal.

mod store;

pub use store::*;
