use std::env;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::RodioEngine;
use crate::library::{UrlRegistry, Validator};
use crate::mpris::ControlCmd;
use crate::player::Controller;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    if let Err(e) = logging::init_logging(&settings.logging) {
        eprintln!("droplist: logging disabled: {e}");
    }

    // Paths on the command line count as picked files.
    let picked: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();

    let urls = UrlRegistry::new();
    let validator = Validator::new(&settings.validator, urls.clone());
    let engine = RodioEngine::open(urls, &settings.audio)?;
    let mut ctl = Controller::new(
        validator,
        engine,
        Duration::from_millis(settings.ui.notification_ms),
    );
    let events = ctl.subscribe();
    let mut app = App::new();

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    if !picked.is_empty() {
        event_loop::add_paths(&mut ctl, &settings, &picked);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    if settings.ui.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new();

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut ctl,
            &events,
            &mpris,
            &control_tx,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    if settings.ui.mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    log::info!("shutting down");
    run_result
}
