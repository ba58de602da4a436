use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableFocusChange, EnableFocusChange, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use molehunt::{
    app::{hole_for_key, App, Screen},
    config::{Config, ConfigStore, FileConfigStore},
    difficulty::Difficulty,
    runtime::{CrosstermEventSource, FixedTicker, Runner, Ticker, UiEvent, UiEventSource},
    session::{GameSession, SessionPhase},
    util::sanitize_player_name,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};

const TICK_RATE_MS: u64 = 50;

/// terminal whack-a-mole with a persistent leaderboard
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Whack moles before they retreat. Hits score points, moles that escape and \
strikes on empty holes cost them. Sixty seconds on the clock; top scores land on the leaderboard."
)]
pub struct Cli {
    /// player name to register for the leaderboard (remembered across runs)
    #[clap(short = 'n', long)]
    name: Option<String>,

    /// difficulty tier (remembered across runs)
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    if let Some(ref name) = cli.name {
        config.player_name = sanitize_player_name(name);
    }
    if let Some(tier) = cli.difficulty {
        config.difficulty = tier;
    }
    if !config.has_player() {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::MissingRequiredArgument,
            "no player registered; run once with --name to register",
        )
        .exit();
    }
    let _ = config_store.save(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let session = GameSession::new(config.difficulty, &config.player_name);
    let mut app = App::new(session);
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    let result = run_app(&mut terminal, &mut app, &runner, &config_store, &mut config);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend, E: UiEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
    config_store: &FileConfigStore,
    config: &mut Config,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            UiEvent::Tick => {
                let events = app.session.advance(Instant::now());
                app.apply_events(&events);
            }
            UiEvent::Resize => {}
            UiEvent::FocusLost => {
                // Page-visibility analog: losing the terminal pauses the round.
                app.session.pause();
            }
            UiEvent::FocusGained => {
                let events = app.session.resume(Instant::now());
                app.apply_events(&events);
            }
            UiEvent::Key(key) => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break;
                }
                match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Char('s') => {
                        app.status = None;
                        match app.session.start(Instant::now()) {
                            Ok(events) => {
                                app.screen = Screen::Arena;
                                app.apply_events(&events);
                            }
                            Err(err) => app.status = Some(err.to_string()),
                        }
                    }
                    KeyCode::Char('p') => match app.session.phase() {
                        SessionPhase::Running => app.session.pause(),
                        SessionPhase::Paused => {
                            let events = app.session.resume(Instant::now());
                            app.apply_events(&events);
                        }
                        _ => {}
                    },
                    KeyCode::Char('l') => {
                        if app.screen == Screen::Leaderboard {
                            app.screen = Screen::Arena;
                        } else {
                            app.refresh_leaderboard();
                            app.screen = Screen::Leaderboard;
                        }
                    }
                    KeyCode::Char('b') if app.screen == Screen::Leaderboard => {
                        app.screen = Screen::Arena;
                    }
                    KeyCode::Left | KeyCode::Right => {
                        let tier = if key.code == KeyCode::Right {
                            app.session.difficulty().next()
                        } else {
                            app.session.difficulty().prev()
                        };
                        match app.session.select_difficulty(tier) {
                            Ok(()) => {
                                app.status = None;
                                config.difficulty = tier;
                                let _ = config_store.save(config);
                            }
                            Err(err) => app.status = Some(err.to_string()),
                        }
                    }
                    KeyCode::Char(c) => {
                        if let Some(hole) = hole_for_key(c) {
                            let events = app.session.strike(hole);
                            app.apply_events(&events);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    // A round in flight is abandoned, not scored: cancel everything so no
    // timer outlives the terminal session.
    app.session.pause();
    Ok(())
}
