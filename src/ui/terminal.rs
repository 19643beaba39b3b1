//! Terminal setup and the draw/input loop

use {
    super::input::{handle_key, Focus, KeyOutcome, LocalInput},
    crate::{state::Event, view::RenderModel},
    ratatui::{backend::CrosstermBackend, Terminal},
    std::time::Duration,
    tokio::sync::{mpsc, watch},
};

/// Input poll interval; also bounds how stale a frame can get
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the TUI event loop
///
/// Redraws from the latest render model and forwards key presses as session events.
/// Returns when the user quits or the runtime goes away.
pub async fn run_ui(
    model_rx: watch::Receiver<RenderModel>,
    events: mpsc::Sender<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    let stdout = std::io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Enable raw mode for keyboard input
    crossterm::terminal::enable_raw_mode()?;

    // Alternate screen keeps stderr logs off the dashboard
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::cursor::Hide
    )?;

    terminal.clear()?;

    let result = ui_loop(&mut terminal, model_rx, events).await;

    // Cleanup - restore terminal state even when the loop failed
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    crossterm::terminal::disable_raw_mode()?;
    result
}

async fn ui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    model_rx: watch::Receiver<RenderModel>,
    events: mpsc::Sender<Event>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut focus = Focus::None;
    let mut local = LocalInput::default();

    loop {
        let model = local.overlay(&model_rx.borrow(), focus);

        let area = terminal.size()?;
        terminal.draw(|f| {
            if let Err(e) = crate::ui::layout::render_layout(f, area, &model, focus) {
                log::error!("Layout render error: {}", e);
            }
        })?;

        // Check for keyboard input (non-blocking)
        if !crossterm::event::poll(POLL_INTERVAL)? {
            continue;
        }
        let crossterm::event::Event::Key(key) = crossterm::event::read()? else {
            continue;
        };
        if key.kind != crossterm::event::KeyEventKind::Press {
            continue;
        }

        match handle_key(key.code, &mut focus, &model) {
            KeyOutcome::Quit => {
                let _ = events.send(Event::Shutdown).await;
                break;
            }
            KeyOutcome::Send(event) => {
                local.record(&event);
                if events.send(event).await.is_err() {
                    log::info!("Runtime stopped, closing UI");
                    break;
                }
            }
            KeyOutcome::Ignored => {}
        }
    }

    Ok(())
}
