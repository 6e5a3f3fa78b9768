use crate::playlist::PlaylistSnapshot;

use super::notice::Notification;
use super::progress::Progress;

/// Outbound notifications for whatever renders the widget.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    PlaylistChanged(PlaylistSnapshot),
    PlayStateChanged(bool),
    /// Display name of the loaded track, `None` when idle.
    NowPlaying(Option<String>),
    Progress(Progress),
    Notify(Notification),
}
