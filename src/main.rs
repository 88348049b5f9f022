use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use study_session::{
    db, logger, ui, App, Auth, Config, HistorySink, HttpStudyApi,
    LocalProfileProvider, MemoryHistory, SqliteHistory, StudySessionController,
};

const TICK_RATE: Duration = Duration::from_millis(120);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    if let Err(e) = logger::init(&config.log_path()) {
        eprintln!("Logging disabled: {}", e);
    }
    tracing::info!(api_base = %config.api_base, data_dir = %config.data_dir.display(), "starting");

    let auth = Auth::new(Arc::new(LocalProfileProvider::new(
        config.user.clone(),
        config.id_token.clone(),
    )));
    if config.user.is_some()
        && let Err(e) = auth.sign_in()
    {
        tracing::warn!(error = %e, "automatic sign-in failed");
    }

    let sink: Arc<dyn HistorySink> = match db::init_db(&config.db_path()) {
        Ok(conn) => Arc::new(SqliteHistory::new(conn)),
        Err(e) => {
            tracing::error!(error = %e, "history database unavailable, keeping history in memory");
            Arc::new(MemoryHistory::default())
        }
    };
    let api = HttpStudyApi::new(&config.api_base, config.api_timeout)?.with_auth(auth.clone());
    let controller = StudySessionController::new(Arc::new(api), auth, sink);
    let mut app = App::new(controller);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "terminal loop failed");
    }
    result?;
    tracing::info!("exiting");
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    let mut last_tick = Instant::now();

    while !app.should_quit {
        app.controller.process_responses();
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}
