//! # Binary: TUI Dashboard
//!
//! ## Responsibility
//! Entry point for the CacheCraft terminal dashboard. Runs the sync engine on
//! a background thread, draws the latest view and forwards key presses as
//! actions.
//!
//! ## Usage
//! ```bash
//! cargo run --bin cachecraft-tui -- --mock
//! cargo run --bin cachecraft-tui -- --base-url http://localhost:8000 --user alice
//! cargo run --bin cachecraft-tui -- --config dashboard.toml --log-file /tmp/dash.log
//! ```
//!
//! ## Guarantees
//! - Terminal state always restored on exit, even on panic
//! - Clean shutdown on q, Esc, or Ctrl+C
//! - Logs go to a file so the alternate screen stays intact

use std::io;
use std::thread;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info};

use cachecraft_dashboard::cli::{build_api, parse_args, resolve_config};
use cachecraft_dashboard::config::schema_json;
use cachecraft_dashboard::tui::app::App;
use cachecraft_dashboard::tui::events::{apply_event, poll_event};
use cachecraft_dashboard::tui::ui;
use cachecraft_dashboard::{init_file_tracing, Action, Coordinator, DashboardHandle};

/// Render refresh rate: 10 frames per second.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Sets up the terminal for TUI rendering.
///
/// # Errors
/// Returns `io::Error` if terminal initialization fails.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restores the terminal to its original state.
fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), io::Error> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_args(std::env::args());
    if cli.print_schema {
        println!("{}", schema_json()?);
        return Ok(());
    }

    if let Err(e) = init_file_tracing(&cli.log_file) {
        eprintln!("logging disabled: {e}");
    }
    let config = resolve_config(&cli)?;

    // The engine gets its own runtime on a dedicated thread; the draw loop
    // below is synchronous.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let api = build_api(&cli, &config);
    let (coordinator, handle) = Coordinator::new(config, api);
    let engine = thread::Builder::new()
        .name("cachecraft-engine".into())
        .spawn(move || runtime.block_on(coordinator.run()))?;

    // Install panic hook that restores terminal before printing panic message
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &handle);
    restore_terminal(&mut terminal)?;

    // Covers the error path; a no-op if the loop already sent it.
    let _ = handle.try_dispatch(Action::Shutdown);
    drop(handle);
    if engine.join().is_err() {
        error!("engine thread panicked");
    }

    if let Err(e) = result {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
    info!("terminal dashboard exited");
    Ok(())
}

/// Draw/input loop.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    handle: &DashboardHandle,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(handle.view());

    loop {
        app.set_view(handle.view());
        terminal.draw(|f| ui::draw(f, &app))?;

        let event = poll_event(TICK_RATE, app.mode);
        if let Some(action) = apply_event(&mut app, event) {
            if let Err(e) = handle.try_dispatch(action) {
                error!(error = %e, "action dropped");
            }
        }

        if app.should_quit {
            break;
        }
        app.on_frame();
    }

    Ok(())
}
