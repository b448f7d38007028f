mod app;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};

use ringtype::config::Config;
use ringtype::engine::EngineState;
use ringtype::phrases;
use ringtype::session::clock::MonotonicClock;
use ringtype::store::json_store::JsonStore;
use ringtype::store::{KeyValueStore, MemoryStore};

use app::App;
use ui::components::entry_panel::EntryPanel;
use ui::components::metrics_bar::MetricsBar;
use ui::components::ring::RingView;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "ringtype", version, about = "Circular character entry with adaptive prediction")]
struct Cli {
    #[arg(short, long, help = "Start a trial run immediately")]
    trial: bool,

    #[arg(short, long, help = "JSON array of trial phrases")]
    phrases: Option<PathBuf>,

    #[arg(short, long, help = "Directory for exported reports")]
    export_dir: Option<PathBuf>,

    #[arg(long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Keep frequency counts in memory only")]
    ephemeral: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(path) = cli.phrases {
        config.trial_phrases_path = Some(path.to_string_lossy().to_string());
    }
    if let Some(dir) = cli.export_dir {
        config.export_dir = dir.to_string_lossy().to_string();
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    if let Err(e) = init_tracing(&config) {
        eprintln!("logging disabled: {e}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "ringtype starting");

    let store = open_store(&config, cli.ephemeral);
    let engine = EngineState::from_config(&config, store, Box::new(MonotonicClock::new()))
        .with_trial_phrases(phrases::trial_phrases(&config));
    let pool = phrases::phrase_pool(&config);
    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(
            theme = %config.theme,
            available = ?Theme::available_themes(),
            "unknown theme, using default"
        );
        Theme::default()
    });
    info!(theme = %theme.name, "theme loaded");

    let mut app = App::new(&config, engine, pool, theme);
    if cli.trial {
        app.toggle_trials();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn init_tracing(config: &Config) -> Result<()> {
    let path = config.log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(config.tracing_level())
        .init();
    Ok(())
}

fn open_store(config: &Config, ephemeral: bool) -> Box<dyn KeyValueStore> {
    if ephemeral {
        info!("ephemeral mode, counts kept in memory");
        return Box::new(MemoryStore::new());
    }
    match JsonStore::with_base_dir(PathBuf::from(&config.data_dir)) {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(error = %e, "data dir unavailable, counts kept in memory");
            Box::new(MemoryStore::new())
        }
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
        {
            handle_key(app, key);
        }

        if app.should_quit {
            info!("ringtype exiting");
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Only process Press events; Repeat would inflate the log
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.should_quit = true,
            KeyCode::Char('l') => app.clear(),
            KeyCode::Char('e') => app.export_log(),
            KeyCode::Char('t') => app.toggle_trials(),
            KeyCode::Char('n') => app.next_target(),
            KeyCode::Char('u') => app.toggle_shift(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab => app.toggle_numbers(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Enter => app.advance_trial(),
        // Digits pick predictions unless the outer ring shows digits
        KeyCode::Char(ch @ '1'..='9') if !app.numbers_mode => {
            app.select_candidate(ch as usize - '1' as usize);
        }
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let advance_hint = app.advance_label().map(|label| format!("[Enter] {label}"));
    let mut hints = vec![
        "[1-6] predict",
        "[Tab] digits",
        "[^U] shift",
        "[Bksp] undo",
        "[^L] clear",
        "[^N] next target",
        "[^E] export",
        "[^T] trials",
    ];
    if let Some(hint) = advance_hint.as_deref() {
        hints.push(hint);
    }
    hints.push("[Esc] quit");
    let hint_lines = pack_hint_lines(&hints, area.width as usize);

    let layout = AppLayout::new(area, hint_lines.len().max(1) as u16);

    let mut header_spans = vec![Span::styled(
        " ringtype ",
        Style::default()
            .fg(colors.bg())
            .bg(colors.accent())
            .add_modifier(Modifier::BOLD),
    )];
    let trial_label = app.trial_label();
    if !trial_label.is_empty() {
        header_spans.push(Span::styled(
            format!(" {trial_label}"),
            Style::default().fg(colors.fg()),
        ));
    }
    if app.numbers_mode {
        header_spans.push(Span::styled(" [123]", Style::default().fg(colors.warning())));
    }
    if app.uppercase {
        header_spans.push(Span::styled(" [SHIFT]", Style::default().fg(colors.warning())));
    }
    let header = Paragraph::new(Line::from(header_spans)).block(
        Block::bordered().border_style(Style::default().fg(colors.border())),
    );
    frame.render_widget(header, layout.header);

    let outer = app.outer_ring();
    let ring = RingView::new(
        app.last.current_char,
        &app.last.candidates,
        &outer,
        app.full_ring(),
        app.uppercase,
        &app.theme,
    );
    frame.render_widget(ring, layout.ring);

    frame.render_widget(
        EntryPanel::new(&app.last.text, &app.last.target, &app.theme),
        layout.entry,
    );
    frame.render_widget(
        MetricsBar::new(
            app.last.wpm,
            app.last.edit_distance,
            app.status.as_ref(),
            &app.theme,
        ),
        layout.metrics,
    );

    let footer_lines: Vec<Line> = hint_lines
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted()))))
        .collect();
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);
}
