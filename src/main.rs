mod cli;
mod logging;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use picpick::{App, Controller, Error, Model, Sorter, Tag, TerminalView};
use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Dropping the guard flushes pending log lines, keep it until exit
    let _log_guard = match logging::init_logging(&cli.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== PicPick Starting ===");

    let app = build_app(&cli)?;

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("PicPick shutting down");
    Ok(())
}

/// Assemble the project from the command line: optional project file first,
/// then extra tags and input images on top of it.
fn build_app(cli: &Cli) -> Result<App> {
    let mut controller = Controller::new(Model::new(), TerminalView::new());

    if let Some(ref project) = cli.open {
        controller
            .load(project)
            .with_context(|| format!("Failed to open {}", project.display()))?;
    }

    for name in &cli.tags {
        match controller.add_tag(Tag::new(name.as_str())?) {
            Ok(()) | Err(Error::TagAlreadyPresent(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    let paths = cli::collect_images(&cli.inputs)?;
    let added = controller.add_images(paths);
    tracing::info!(added, "Images added from the command line");

    let sorter = if cli.outputs.is_empty() {
        None
    } else {
        Some(Sorter::new(cli.outputs.clone(), cli.transfer_mode()))
    };

    Ok(App::new(controller, sorter))
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key_event(key);
            }
        }

        if app.should_quit() {
            break;
        }
    }

    if app.controller().view().is_dirty() {
        tracing::warn!("Quit with unsaved changes");
    }
    Ok(())
}
