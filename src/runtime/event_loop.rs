use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};

use crate::app::{App, InputMode};
use crate::audio::{MediaEngine, RodioEngine};
use crate::config;
use crate::library;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::player::{Controller, Notice, WidgetEvent};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui::{self, Gesture, Overlays};

/// Step for `H`/`L` seeking, as a fraction of the track.
const SEEK_STEP: f64 = 0.05;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Screen area of the last drawn frame, used for mouse hit-testing.
    pub last_area: Rect,
    /// Something MPRIS reports has changed since the last sync.
    mpris_dirty: bool,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self {
            pending_gg: false,
            last_area: Rect::default(),
            mpris_dirty: true,
        }
    }
}

/// Main terminal event loop: feeds engine signals into the controller,
/// folds controller events into the view model, draws, and dispatches
/// input. Returns `Ok(())` when shutdown is requested.
#[allow(clippy::too_many_arguments)]
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    ctl: &mut Controller<RodioEngine>,
    events: &mpsc::Receiver<WidgetEvent>,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        for signal in ctl.engine_mut().poll() {
            ctl.handle_signal(signal);
        }

        let now = Instant::now();
        while let Ok(event) = events.try_recv() {
            if !matches!(event, WidgetEvent::Progress(_) | WidgetEvent::Notify(_)) {
                state.mpris_dirty = true;
            }
            app.apply(event, now);
        }
        app.prune_toasts(now);

        // Keep MPRIS in sync even when changes come from media keys or auto-advance.
        if state.mpris_dirty {
            update_mpris(mpris, ctl);
            state.mpris_dirty = false;
        }

        let frame = terminal.draw(|f| ui::draw(f, app, &settings.ui))?;
        state.last_area = frame.area;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, ctl) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, settings, app, ctl, control_tx, state) {
                        break;
                    }
                }
                Event::Paste(text) => handle_paste(&text, settings, app, ctl),
                Event::Mouse(mouse) if settings.ui.mouse => handle_mouse(mouse, app, ctl, state),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Expand picked or dropped paths and hand the results to the controller.
pub fn add_paths<E: MediaEngine>(
    ctl: &mut Controller<E>,
    settings: &config::Settings,
    paths: &[PathBuf],
) {
    let collected = library::collect(paths, &settings.library, ctl.accepted_extensions());
    log::debug!(
        "collected {} candidate(s), {} unreadable",
        collected.candidates.len(),
        collected.unreadable.len()
    );

    if !collected.unreadable.is_empty() {
        ctl.notify(Notice::Unreadable(collected.unreadable.len()));
    }
    if !collected.candidates.is_empty() {
        ctl.add_files(collected.candidates);
    }
}

fn ignore_contract_error(result: crate::error::Result<()>) {
    if let Err(e) = result {
        log::debug!("ignored: {e}");
    }
}

fn quit_softly(settings: &config::Settings, ctl: &mut Controller<RodioEngine>) {
    ctl.engine_mut()
        .fade_out(Duration::from_millis(settings.audio.quit_fade_out_ms));
}

fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    ctl: &mut Controller<RodioEngine>,
) -> bool {
    log::debug!("control: {cmd:?}");
    match cmd {
        ControlCmd::Quit => {
            quit_softly(settings, ctl);
            return true;
        }
        ControlCmd::Play => {
            if !ctl.is_playing() {
                ignore_contract_error(ctl.toggle_play());
            }
        }
        ControlCmd::Pause => {
            if ctl.is_playing() {
                ignore_contract_error(ctl.toggle_play());
            }
        }
        ControlCmd::PlayPause => ignore_contract_error(ctl.toggle_play()),
        ControlCmd::Stop => ctl.stop(),
        ControlCmd::Next => ignore_contract_error(ctl.play_next()),
        ControlCmd::Prev => ignore_contract_error(ctl.play_prev()),
    }

    false
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    ctl: &mut Controller<RodioEngine>,
    control_tx: &mpsc::Sender<ControlCmd>,
    state: &mut EventLoopState,
) -> bool {
    if app.mode == InputMode::PathPrompt {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.cancel_prompt(),
            KeyCode::Backspace => app.pop_prompt_char(),
            KeyCode::Enter => {
                if let Some(text) = app.submit_prompt() {
                    let paths = dropped_paths(&text, env::var_os("HOME").as_deref());
                    add_paths(ctl, settings, &paths);
                }
            }
            KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            quit_softly(settings, ctl);
            return true;
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback_off();
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.follow_playback_off();
            app.last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            if let Some(index) = app.cursor_index() {
                play_row(app, ctl, index);
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            state.pending_gg = false;
            if let Some(index) = app.cursor_index() {
                ignore_contract_error(ctl.remove_track(index));
            }
        }
        KeyCode::Char('a') => {
            state.pending_gg = false;
            app.open_prompt();
        }
        KeyCode::Char('s') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Stop);
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            state.pending_gg = false;
            // Behave like MPRIS PlayPause.
            let _ = control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            state.pending_gg = false;
            let _ = control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('L') => {
            state.pending_gg = false;
            ignore_contract_error(ctl.seek_to(ctl.progress().ratio() + SEEK_STEP));
        }
        KeyCode::Char('H') => {
            state.pending_gg = false;
            ignore_contract_error(ctl.seek_to(ctl.progress().ratio() - SEEK_STEP));
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    false
}

/// Terminals deliver drag-and-drop as a bracketed paste of paths.
pub(super) fn handle_paste<E: MediaEngine>(
    text: &str,
    settings: &config::Settings,
    app: &mut App,
    ctl: &mut Controller<E>,
) {
    if app.mode == InputMode::PathPrompt {
        app.push_prompt_str(text);
        return;
    }
    let paths = dropped_paths(text, env::var_os("HOME").as_deref());
    log::debug!("drop of {} path(s)", paths.len());
    if !paths.is_empty() {
        add_paths(ctl, settings, &paths);
    }
}

fn handle_mouse(
    mouse: MouseEvent,
    app: &mut App,
    ctl: &mut Controller<RodioEngine>,
    state: &EventLoopState,
) {
    let overlays = Overlays {
        toasts: app.toasts().len(),
        prompt: app.mode == InputMode::PathPrompt,
    };
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let gesture = ui::hit_test(
                state.last_area,
                app.playlist.names.len(),
                app.cursor,
                overlays,
                mouse.column,
                mouse.row,
            );
            match gesture {
                Some(Gesture::Select(index)) => play_row(app, ctl, index),
                Some(Gesture::Remove(index)) => ignore_contract_error(ctl.remove_track(index)),
                Some(Gesture::Seek(fraction)) => ignore_contract_error(ctl.seek_to(fraction)),
                None => {}
            }
        }
        _ if overlays.prompt => {}
        MouseEventKind::ScrollDown => {
            app.follow_playback_off();
            app.next();
        }
        MouseEventKind::ScrollUp => {
            app.follow_playback_off();
            app.prev();
        }
        _ => {}
    }
}

/// Start `index` from the top, even when it is already playing, and let the
/// cursor follow playback from there.
pub(super) fn play_row<E: MediaEngine>(app: &mut App, ctl: &mut Controller<E>, index: usize) {
    app.cursor = index;
    app.follow_playback_on();
    ignore_contract_error(ctl.load_track(index));
}

/// Paths from dropped, pasted or typed text, with `~` expanded against `home`.
pub(super) fn dropped_paths(text: &str, home: Option<&OsStr>) -> Vec<PathBuf> {
    library::parse_dropped(text, |p| p.exists())
        .into_iter()
        .map(|p| expand_home(p, home))
        .collect()
}

fn expand_home(path: PathBuf, home: Option<&OsStr>) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path;
    };
    match home {
        Some(home) => Path::new(home).join(rest),
        None => path,
    }
}
