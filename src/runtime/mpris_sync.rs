use crate::audio::MediaEngine;
use crate::mpris::{MprisHandle, PlaybackStatus};
use crate::player::Controller;

pub fn update_mpris<E: MediaEngine>(mpris: &MprisHandle, ctl: &Controller<E>) {
    let index = ctl.current();
    mpris.set_track_metadata(index, ctl.now_playing(), ctl.duration());
    mpris.set_playback(PlaybackStatus::from_state(index.is_some(), ctl.is_playing()));
}
