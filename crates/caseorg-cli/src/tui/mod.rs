//! Interactive case browser.
//!
//! Backend calls run on the tokio runtime and report back over a channel;
//! the draw loop applies them between key presses, so a slow answer never
//! blocks input and a stale one is discarded by the component it targets.

mod app;
mod tui_event;
mod ui;

use crate::context::ExecutionContext;
use anyhow::Result;
use caseorg_client::Backend;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::info;

use app::App;
use tui_event::TuiEvent;

pub fn run(ctx: &ExecutionContext) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let backend: Arc<dyn Backend> = ctx.backend();
    let mut app = App::new(
        backend,
        ctx.runtime().handle().clone(),
        tx,
        ctx.renderer(),
        ctx.picker_config(),
    );
    app.load_years();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    ctrlc::set_handler(move || {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        std::process::exit(0);
    })?;

    info!(server = %ctx.config().server.base_url, "browser started");
    let result = event_loop(&mut terminal, &mut app, &rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mpsc::Receiver<TuiEvent>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        while let Ok(tui_event) = rx.try_recv() {
            app.apply(tui_event);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
    Ok(())
}
