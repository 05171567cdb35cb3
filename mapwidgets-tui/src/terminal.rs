//! Terminal management and main run loop

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use crate::app::App;
use crate::config::WidgetsConfig;

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Run the demo until the user quits
pub fn run(config: &WidgetsConfig) -> Result<()> {
    let mut app = App::new(config)?;
    let mut terminal = init_terminal()?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore even if the loop failed
    restore_terminal(&mut terminal)?;
    info!("terminal restored");
    result
}

/// Draws only when the app reports a change or the terminal was resized
fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    terminal.draw(|frame| app.render(frame))?;
    loop {
        // 100ms timeout keeps the loop responsive
        let resized = match poll_event(Duration::from_millis(100))? {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                app.handle_key(key);
                false
            }
            Some(Event::Resize(_, _)) => true,
            _ => false,
        };

        if app.should_quit() {
            break;
        }
        if resized || app.needs_redraw() {
            terminal.draw(|frame| app.render(frame))?;
        }
    }
    Ok(())
}
