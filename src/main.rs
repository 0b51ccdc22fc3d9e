use canopy_tui::{
    api::HttpConnector,
    app::{apply_app_event, execute as run_command, handle_key, Orchestrator, TranscriptScroll, UiState},
    config::Cli,
    event::AppEvent,
    logging,
    paths::Paths,
    view::render,
};
use clap::Parser;
use color_eyre::eyre::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Install color-eyre panic handler for better error messages
    color_eyre::install()?;

    let cli = Cli::parse();
    let paths = Paths::resolve(cli.log_dir.as_deref());
    let _log_guard = logging::init(&paths, cli.debug)?;
    info!(server = %cli.server, log = %paths.log_file.display(), "starting canopy-tui");

    let (tx, rx) = mpsc::unbounded_channel::<AppEvent>();
    let connector = HttpConnector::new(cli.client_config());
    let mut orchestrator = Orchestrator::new(connector, TranscriptScroll::new(), tx);
    let mut ui = UiState::new();

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut orchestrator, &mut ui, rx, cli.tick_rate()).await;

    // Terminal cleanup (always execute even if event loop errored)
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!(error = %e, "event loop failed");
    }
    result
}

/// Main event loop.
/// Draws, then waits on keys, relay/history events and the tick timer.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    orchestrator: &mut Orchestrator<TranscriptScroll>,
    ui: &mut UiState,
    mut rx: UnboundedReceiver<AppEvent>,
    tick_rate: Duration,
) -> Result<()> {
    let mut keys = EventStream::new();
    let mut ticker = tokio::time::interval(tick_rate);

    draw(terminal, orchestrator, ui)?;
    orchestrator.connect().await;

    loop {
        draw(terminal, orchestrator, ui)?;

        tokio::select! {
            maybe_key = keys.next() => match maybe_key {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if let Some(command) = handle_key(ui, orchestrator.context_mut(), key) {
                        run_command(orchestrator, command).await;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(event) = rx.recv() => {
                apply_app_event(orchestrator, event);
                // Drain whatever else arrived so a burst of deltas costs one frame
                while let Ok(event) = rx.try_recv() {
                    apply_app_event(orchestrator, event);
                }
            }
            // Periodic redraw
            _ = ticker.tick() => {}
        }

        if ui.should_quit {
            break;
        }
    }

    orchestrator.disconnect();
    Ok(())
}

fn draw(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    orchestrator: &mut Orchestrator<TranscriptScroll>,
    ui: &UiState,
) -> Result<()> {
    let streaming = orchestrator.is_streaming();
    let mut metrics = None;
    terminal.draw(|frame| {
        metrics = render(
            frame,
            orchestrator.context(),
            ui,
            orchestrator.surface(),
            streaming,
        );
    })?;
    if let Some(metrics) = metrics {
        orchestrator
            .surface_mut()
            .after_draw(metrics.content_height, metrics.viewport_height);
    }
    Ok(())
}
