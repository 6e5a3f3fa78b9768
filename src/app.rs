//! Application module: the view model the TUI renders and the runtime
//! updates from controller events.
//!
//! The `App` model lives in `app::model`. It mirrors what the controller
//! publishes (playlist snapshot, play state, progress) and adds purely
//! presentational state: the list cursor, the path prompt and toasts.

mod model;

pub use model::*;
