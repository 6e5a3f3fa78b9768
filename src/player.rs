//! The Playback Controller and the values it publishes to the UI.

mod controller;
mod events;
mod notice;
mod progress;

pub use controller::Controller;
pub use events::WidgetEvent;
pub use notice::{Notice, Notification, Severity};
pub use progress::{Progress, format_time};

#[cfg(test)]
mod tests;
