use super::*;
use crate::audio::fake::{Call, FakeEngine};
use crate::audio::{EngineSignal, MediaEngine};
use crate::config::ValidatorSettings;
use crate::error::PlaylistError;
use crate::library::{FileCandidate, UrlRegistry, Validator};
use proptest::prelude::*;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::Duration;

struct Harness {
    urls: UrlRegistry,
    ctl: Controller<FakeEngine>,
    events: Receiver<WidgetEvent>,
}

fn harness() -> Harness {
    let urls = UrlRegistry::new();
    let validator = Validator::new(&ValidatorSettings::default(), urls.clone());
    let engine = FakeEngine::new(urls.clone());
    let mut ctl = Controller::new(validator, engine, Duration::from_secs(3));
    let events = ctl.subscribe();
    Harness { urls, ctl, events }
}

fn mp3(name: &str) -> FileCandidate {
    FileCandidate {
        name: format!("{name}.mp3"),
        path: PathBuf::from(format!("/music/{name}.mp3")),
        size: 1024,
        declared_type: Some("audio/mpeg".into()),
    }
}

fn add(h: &mut Harness, names: &[&str]) -> usize {
    h.ctl.add_files(names.iter().map(|n| mp3(n)).collect())
}

fn loaded_name(h: &Harness) -> Option<String> {
    h.ctl.now_playing().map(|t| t.display_name().to_string())
}

fn drain(h: &Harness) -> Vec<WidgetEvent> {
    h.events.try_iter().collect()
}

fn notices(events: &[WidgetEvent]) -> Vec<(String, Severity)> {
    events
        .iter()
        .filter_map(|e| match e {
            WidgetEvent::Notify(n) => Some((n.message.clone(), n.severity)),
            _ => None,
        })
        .collect()
}

#[test]
fn format_time_cases() {
    assert_eq!(format_time(f64::NAN), "0:00");
    assert_eq!(format_time(65.0), "1:05");
    assert_eq!(format_time(3.0), "0:03");
    assert_eq!(format_time(59.99), "0:59");
    assert_eq!(format_time(f64::INFINITY), "0:00");
    assert_eq!(format_time(-1.0), "0:00");
    assert_eq!(format_time(3600.0), "60:00");
}

#[test]
fn progress_guards_unknown_duration() {
    let p = Progress::compute(Duration::from_secs(30), None);
    assert_eq!(p.percent, 0.0);
    assert_eq!(p.elapsed, "0:30");
    assert_eq!(p.total, "0:00");

    let p = Progress::compute(Duration::from_secs(30), Some(Duration::ZERO));
    assert_eq!(p.percent, 0.0);

    let p = Progress::compute(Duration::from_secs(50), Some(Duration::from_secs(200)));
    assert_eq!(p.percent, 25.0);
    assert_eq!(p.ratio(), 0.25);
    assert_eq!(p.total, "3:20");

    let p = Progress::compute(Duration::from_secs(300), Some(Duration::from_secs(200)));
    assert_eq!(p.percent, 100.0);
}

#[test]
fn first_add_autoplays_track_zero() {
    let mut h = harness();
    assert_eq!(add(&mut h, &["a", "b", "c"]), 3);

    assert_eq!(h.ctl.current(), Some(0));
    assert!(h.ctl.is_playing());
    assert_eq!(loaded_name(&h).as_deref(), Some("a"));

    let events = drain(&h);
    assert!(events.contains(&WidgetEvent::PlayStateChanged(true)));
    assert!(events.contains(&WidgetEvent::NowPlaying(Some("a".into()))));
    assert_eq!(
        notices(&events),
        vec![("Added 3 track(s)".to_string(), Severity::Info)]
    );
}

#[test]
fn later_adds_do_not_move_selection() {
    let mut h = harness();
    add(&mut h, &["a", "b"]);
    h.ctl.load_track(1).unwrap();
    let loads = h.ctl.engine().loads();

    add(&mut h, &["c"]);
    assert_eq!(h.ctl.current(), Some(1));
    assert_eq!(h.ctl.engine().loads(), loads);
    assert_eq!(h.ctl.playlist().snapshot().names, vec!["a", "b", "c"]);
}

#[test]
fn invalid_files_are_skipped_with_one_notice() {
    let mut h = harness();
    let mut wav = mp3("x");
    wav.name = "x.wav".into();
    wav.declared_type = Some("audio/wav".into());
    let mut huge = mp3("y");
    huge.size = 52_428_801;

    let accepted = h.ctl.add_files(vec![wav, mp3("ok"), huge]);
    assert_eq!(accepted, 1);
    assert_eq!(h.urls.live_count(), 1);

    let notes = notices(&drain(&h));
    assert_eq!(
        notes,
        vec![
            ("Skipped 2 invalid file(s)".to_string(), Severity::Warning),
            ("Added 1 track(s)".to_string(), Severity::Info),
        ]
    );
}

#[test]
fn all_rejected_adds_nothing_and_stays_idle() {
    let mut h = harness();
    let mut wav = mp3("x");
    wav.name = "x.wav".into();
    wav.declared_type = None;

    assert_eq!(h.ctl.add_files(vec![wav]), 0);
    assert!(h.ctl.playlist().is_empty());
    assert_eq!(h.ctl.current(), None);
    assert!(h.ctl.engine().calls.is_empty());
}

#[test]
fn removal_walkthrough() {
    let mut h = harness();
    add(&mut h, &["a", "b", "c"]);
    assert_eq!(h.ctl.current(), Some(0));

    h.ctl.remove_track(0).unwrap();
    assert_eq!(h.ctl.current(), Some(0));
    assert_eq!(loaded_name(&h).as_deref(), Some("b"));
    assert!(h.ctl.is_playing());

    h.ctl.play_next().unwrap();
    assert_eq!(h.ctl.current(), Some(1));
    assert_eq!(loaded_name(&h).as_deref(), Some("c"));

    h.ctl.play_next().unwrap();
    assert_eq!(h.ctl.current(), Some(0));
    assert_eq!(loaded_name(&h).as_deref(), Some("b"));
    assert!(h.ctl.is_playing());
}

#[test]
fn wrap_holds_for_single_track() {
    let mut h = harness();
    add(&mut h, &["solo"]);

    h.ctl.play_next().unwrap();
    assert_eq!(h.ctl.current(), Some(0));
    h.ctl.play_prev().unwrap();
    assert_eq!(h.ctl.current(), Some(0));
    assert!(h.ctl.is_playing());
    assert_eq!(h.ctl.engine().loads(), 3);
}

#[test]
fn wrap_holds_for_two_tracks() {
    let mut h = harness();
    add(&mut h, &["a", "b"]);

    h.ctl.play_prev().unwrap();
    assert_eq!(h.ctl.current(), Some(1));
    h.ctl.play_prev().unwrap();
    assert_eq!(h.ctl.current(), Some(0));
    h.ctl.play_next().unwrap();
    assert_eq!(h.ctl.current(), Some(1));
    h.ctl.play_next().unwrap();
    assert_eq!(h.ctl.current(), Some(0));
}

#[test]
fn prev_next_on_empty_playlist_notify() {
    let mut h = harness();
    h.ctl.play_next().unwrap();
    h.ctl.play_prev().unwrap();
    h.ctl.toggle_play().unwrap();

    let notes = notices(&drain(&h));
    assert_eq!(notes.len(), 3);
    assert!(
        notes
            .iter()
            .all(|(m, s)| m.starts_with("Playlist is empty") && *s == Severity::Warning)
    );
    assert!(h.ctl.engine().calls.is_empty());
}

#[test]
fn toggle_pauses_and_resumes() {
    let mut h = harness();
    add(&mut h, &["a"]);
    drain(&h);

    h.ctl.toggle_play().unwrap();
    assert!(!h.ctl.is_playing());
    assert_eq!(h.ctl.current(), Some(0));
    assert_eq!(h.ctl.engine().calls.last(), Some(&Call::Pause));

    h.ctl.toggle_play().unwrap();
    assert!(h.ctl.is_playing());
    assert_eq!(h.ctl.engine().calls.last(), Some(&Call::Play));
    assert_eq!(h.ctl.engine().loads(), 1);

    assert_eq!(
        drain(&h),
        vec![
            WidgetEvent::PlayStateChanged(false),
            WidgetEvent::PlayStateChanged(true),
        ]
    );
}

#[test]
fn toggle_from_idle_loads_first_track() {
    let mut h = harness();
    add(&mut h, &["a", "b"]);
    h.ctl.stop();
    assert_eq!(h.ctl.current(), None);
    assert!(!h.ctl.is_playing());

    h.ctl.toggle_play().unwrap();
    assert_eq!(h.ctl.current(), Some(0));
    assert!(h.ctl.is_playing());
}

#[test]
fn removing_last_remaining_current_goes_idle() {
    let mut h = harness();
    add(&mut h, &["a"]);
    drain(&h);

    h.ctl.remove_track(0).unwrap();
    assert_eq!(h.ctl.current(), None);
    assert!(!h.ctl.is_playing());
    assert!(h.ctl.playlist().is_empty());
    assert!(!h.ctl.engine().is_loaded());
    assert_eq!(h.urls.live_count(), 0);
    assert_eq!(h.ctl.progress(), Progress::default());

    let events = drain(&h);
    assert!(events.contains(&WidgetEvent::NowPlaying(None)));
    assert!(events.contains(&WidgetEvent::PlayStateChanged(false)));
}

#[test]
fn removing_before_current_keeps_playing_without_reload() {
    let mut h = harness();
    add(&mut h, &["a", "b", "c"]);
    h.ctl.load_track(2).unwrap();
    let loads = h.ctl.engine().loads();

    h.ctl.remove_track(0).unwrap();
    assert_eq!(h.ctl.current(), Some(1));
    assert_eq!(loaded_name(&h).as_deref(), Some("c"));
    assert!(h.ctl.is_playing());
    assert_eq!(h.ctl.engine().loads(), loads);
}

#[test]
fn removing_after_current_changes_nothing_but_the_list() {
    let mut h = harness();
    add(&mut h, &["a", "b", "c"]);
    let loads = h.ctl.engine().loads();

    h.ctl.remove_track(2).unwrap();
    assert_eq!(h.ctl.current(), Some(0));
    assert_eq!(h.ctl.engine().loads(), loads);
    assert_eq!(h.ctl.playlist().snapshot().names, vec!["a", "b"]);
    assert_eq!(h.urls.live_count(), 2);
}

#[test]
fn removing_current_last_index_clamps_to_new_last() {
    let mut h = harness();
    add(&mut h, &["a", "b", "c"]);
    h.ctl.load_track(2).unwrap();

    h.ctl.remove_track(2).unwrap();
    assert_eq!(h.ctl.current(), Some(1));
    assert_eq!(loaded_name(&h).as_deref(), Some("b"));
    assert!(h.ctl.is_playing());
}

#[test]
fn removed_url_is_revoked_after_engine_moved_on() {
    let mut h = harness();
    add(&mut h, &["a", "b"]);
    let first = h.ctl.engine().loaded.clone().unwrap();

    // FakeEngine::load asserts the URL it is handed is live.
    h.ctl.remove_track(0).unwrap();
    assert!(!h.urls.is_live(&first));
    let now = h.ctl.engine().loaded.clone().unwrap();
    assert!(h.urls.is_live(&now));
    assert_eq!(h.urls.live_count(), 1);
}

#[test]
fn bad_indices_are_contract_errors() {
    let mut h = harness();
    add(&mut h, &["a"]);

    assert_eq!(
        h.ctl.load_track(5).unwrap_err(),
        PlaylistError::IndexOutOfRange { index: 5, len: 1 }
    );
    assert_eq!(
        h.ctl.remove_track(1).unwrap_err(),
        PlaylistError::IndexOutOfRange { index: 1, len: 1 }
    );
    assert_eq!(h.ctl.current(), Some(0));
}

#[test]
fn seek_requires_active_track() {
    let mut h = harness();
    assert_eq!(h.ctl.seek_to(0.5), Err(PlaylistError::NoActiveTrack));
    add(&mut h, &["a"]);
    h.ctl.stop();
    assert_eq!(h.ctl.seek_to(0.5), Err(PlaylistError::NoActiveTrack));
}

#[test]
fn seek_scales_and_clamps_fraction() {
    let mut h = harness();
    add(&mut h, &["a"]);

    h.ctl.seek_to(0.25).unwrap();
    assert_eq!(
        h.ctl.engine().calls.last(),
        Some(&Call::Seek(Duration::from_secs(50)))
    );
    assert_eq!(h.ctl.progress().percent, 25.0);

    h.ctl.seek_to(1.7).unwrap();
    assert_eq!(
        h.ctl.engine().calls.last(),
        Some(&Call::Seek(Duration::from_secs(200)))
    );

    h.ctl.seek_to(f64::NAN).unwrap();
    assert_eq!(h.ctl.engine().calls.last(), Some(&Call::Seek(Duration::ZERO)));
}

#[test]
fn seek_with_unknown_duration_is_a_no_op() {
    let mut h = harness();
    h.ctl.engine_mut().duration = None;
    add(&mut h, &["a"]);
    let calls = h.ctl.engine().calls.len();

    h.ctl.seek_to(0.5).unwrap();
    assert_eq!(h.ctl.engine().calls.len(), calls);
}

#[test]
fn seek_failure_notifies() {
    let mut h = harness();
    add(&mut h, &["a"]);
    h.ctl.engine_mut().fail_seek = true;
    drain(&h);

    h.ctl.seek_to(0.5).unwrap();
    assert_eq!(
        notices(&drain(&h)),
        vec![(
            "Seeking is not available for this track".to_string(),
            Severity::Warning
        )]
    );
    assert!(h.ctl.is_playing());
}

#[test]
fn time_updates_drive_progress() {
    let mut h = harness();
    add(&mut h, &["a"]);
    drain(&h);

    h.ctl.handle_signal(EngineSignal::MetadataLoaded {
        duration: Some(Duration::from_secs(120)),
    });
    h.ctl.handle_signal(EngineSignal::TimeUpdate {
        position: Duration::from_secs(65),
        duration: None,
    });

    let p = h.ctl.progress();
    assert_eq!(p.elapsed, "1:05");
    assert_eq!(p.total, "2:00");
    assert!((p.percent - 65.0 / 120.0 * 100.0).abs() < 1e-9);
    assert!(matches!(drain(&h).last(), Some(WidgetEvent::Progress(_))));
}

#[test]
fn signals_while_idle_are_ignored() {
    let mut h = harness();
    h.ctl.handle_signal(EngineSignal::TimeUpdate {
        position: Duration::from_secs(5),
        duration: Some(Duration::from_secs(10)),
    });
    h.ctl.handle_signal(EngineSignal::Ended);
    assert_eq!(h.ctl.progress(), Progress::default());
    assert!(drain(&h).is_empty());
    assert!(h.ctl.engine().calls.is_empty());
}

#[test]
fn ended_advances_and_wraps() {
    let mut h = harness();
    add(&mut h, &["a", "b"]);

    h.ctl.handle_signal(EngineSignal::Ended);
    assert_eq!(h.ctl.current(), Some(1));
    h.ctl.handle_signal(EngineSignal::Ended);
    assert_eq!(h.ctl.current(), Some(0));
    assert!(h.ctl.is_playing());
}

#[test]
fn engine_error_pauses_and_reports() {
    let mut h = harness();
    add(&mut h, &["a"]);
    drain(&h);

    h.ctl.handle_signal(EngineSignal::Error("decoder died".into()));
    assert!(!h.ctl.is_playing());
    assert_eq!(h.ctl.current(), Some(0));

    let events = drain(&h);
    assert!(events.contains(&WidgetEvent::PlayStateChanged(false)));
    assert_eq!(
        notices(&events),
        vec![("Playback error: decoder died".to_string(), Severity::Error)]
    );
}

#[test]
fn resume_after_engine_dropped_source_reloads() {
    let mut h = harness();
    add(&mut h, &["a"]);
    h.ctl.engine_mut().unload();
    h.ctl.handle_signal(EngineSignal::Error("source was removed".into()));

    h.ctl.toggle_play().unwrap();
    assert!(h.ctl.is_playing());
    assert_eq!(h.ctl.engine().loads(), 2);
}

#[test]
fn load_failure_goes_idle_with_error_notice() {
    let mut h = harness();
    h.ctl.engine_mut().fail_load = true;
    add(&mut h, &["broken"]);

    assert_eq!(h.ctl.current(), None);
    assert!(!h.ctl.is_playing());
    assert_eq!(h.ctl.playlist().len(), 1);

    let notes = notices(&drain(&h));
    assert!(notes.contains(&("Playback error: cannot play broken".to_string(), Severity::Error)));
}

#[test]
fn play_failure_leaves_track_loaded_and_paused() {
    let mut h = harness();
    h.ctl.engine_mut().fail_play = true;
    add(&mut h, &["a"]);

    assert_eq!(h.ctl.current(), Some(0));
    assert!(!h.ctl.is_playing());
    assert!(
        notices(&drain(&h))
            .iter()
            .any(|(_, s)| *s == Severity::Error)
    );
}

#[test]
fn dropped_subscriber_is_pruned() {
    let mut h = harness();
    let extra = h.ctl.subscribe();
    drop(extra);
    add(&mut h, &["a"]);
    assert!(!drain(&h).is_empty());
}

#[derive(Debug, Clone)]
enum Step {
    Add(usize),
    Remove(usize),
    Load(usize),
    Next,
    Prev,
    Toggle,
    Stop,
    Seek(f64),
    Error,
    Ended,
    FailLoad(bool),
    FailPlay(bool),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (1usize..4).prop_map(Step::Add),
        (0usize..8).prop_map(Step::Remove),
        (0usize..8).prop_map(Step::Load),
        Just(Step::Next),
        Just(Step::Prev),
        Just(Step::Toggle),
        Just(Step::Stop),
        (-0.5f64..1.5).prop_map(Step::Seek),
        Just(Step::Error),
        Just(Step::Ended),
        any::<bool>().prop_map(Step::FailLoad),
        any::<bool>().prop_map(Step::FailPlay),
    ]
}

proptest! {
    /// Whatever the order of operations, the engine holds exactly the
    /// selected track, nothing plays without a selection, and every live URL
    /// belongs to a queued track.
    #[test]
    fn playback_state_tracks_the_engine(steps in prop::collection::vec(step(), 1..80)) {
        let mut h = harness();
        let mut counter = 0usize;

        for step in steps {
            let len = h.ctl.playlist().len();
            match step {
                Step::Add(n) => {
                    let names: Vec<String> = (0..n).map(|_| { counter += 1; format!("t{counter}") }).collect();
                    h.ctl.add_files(names.iter().map(|n| mp3(n)).collect());
                }
                Step::Remove(i) => {
                    let result = h.ctl.remove_track(i);
                    prop_assert_eq!(result.is_err(), i >= len);
                }
                Step::Load(i) => {
                    let result = h.ctl.load_track(i);
                    prop_assert_eq!(result.is_err(), i >= len);
                }
                Step::Next => h.ctl.play_next().unwrap(),
                Step::Prev => h.ctl.play_prev().unwrap(),
                Step::Toggle => h.ctl.toggle_play().unwrap(),
                Step::Stop => h.ctl.stop(),
                Step::Seek(f) => {
                    let result = h.ctl.seek_to(f);
                    prop_assert_eq!(result.is_err(), h.ctl.current().is_none());
                }
                Step::Error => h.ctl.handle_signal(EngineSignal::Error("decoder gave up".into())),
                Step::Ended => h.ctl.handle_signal(EngineSignal::Ended),
                Step::FailLoad(on) => h.ctl.engine_mut().fail_load = on,
                Step::FailPlay(on) => h.ctl.engine_mut().fail_play = on,
            }
            drain(&h);

            let len = h.ctl.playlist().len();
            match h.ctl.current() {
                Some(i) => prop_assert!(i < len),
                None => {
                    prop_assert!(!h.ctl.is_playing());
                    prop_assert!(!h.ctl.engine().is_loaded());
                }
            }
            if h.ctl.is_playing() {
                prop_assert!(h.ctl.engine().is_loaded());
            }
            let selected = h.ctl.now_playing().map(|t| t.url().as_str().to_string());
            prop_assert_eq!(h.ctl.engine().loaded.clone(), selected);
            prop_assert_eq!(h.urls.live_count(), len);
        }
    }
}
