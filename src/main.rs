//! Infinite-scroll browser for a movie listing server.
//!
//! Run with a listing URL to browse it as a card grid; more cards load as
//! the grid is scrolled toward its end.  Run with `--html` to load the whole
//! listing without a terminal and print it as HTML.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use reqwest::Url;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    fetch_runtime::{apply_fetch_update, open_page_view, spawn_page_load, FetchUpdate},
    handler,
    headless::{self, Opening},
    state::AppState,
};
use crate::config::{Action, AppConfig};
use crate::core::{
    query::{initial_page, FilterContext},
    source::HttpSource,
    trigger::ScrollTrigger,
};
use crate::ui::{
    detail,
    footer::{Footer, Pagination},
    grid_widget::GridWidget,
    layout::AppLayout,
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Infinite-scroll movie listing browser")]
struct Cli {
    /// Listing page to open.  Its query string (sort, genre, year,
    /// rating_min, page) selects what is listed.
    #[arg(default_value = "http://localhost:5000/movies")]
    url: Url,

    /// Load the whole listing without a terminal and print it as HTML.
    #[arg(long)]
    html: bool,

    /// Page to open on (defaults to the URL's `page` parameter, else 1).
    #[arg(long)]
    page: Option<u32>,

    /// Known total page count.  With `--page`, skips fetching the opening
    /// page and starts from an empty grid.
    #[arg(long, requires = "page")]
    total_pages: Option<u32>,

    /// Stop after this many additional pages (`--html` only).
    #[arg(long)]
    max_pages: Option<u32>,

    /// Lines below the visible grid at which the next page is requested.
    #[arg(long)]
    lead_margin: Option<u32>,

    /// Per-request timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    fn opening(&self) -> Opening {
        match (self.page, self.total_pages) {
            (Some(current_page), Some(total_pages)) => Opening::Counters {
                current_page,
                total_pages,
            },
            (page, _) => Opening::Fetch(page.unwrap_or_else(|| initial_page(&self.url))),
        }
    }
}

// ───────────────────────────────────────── logging ──────────

/// `RUST_LOG` wins when set.  Otherwise warnings go to the log file or, in
/// `--html` mode, to stderr; the full-screen UI stays silent.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let default_directive = if interactive && log_file.is_none() {
        "off"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        // never pollute stdout
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

// ───────────────────────────────────────── drawing ──────────

fn draw(frame: &mut Frame, state: &mut AppState) {
    let layout = AppLayout::from_area(frame.area());

    let grid_block = Block::default()
        .title(format!(" {} ", state.listing_url))
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    let grid_widget = GridWidget::new(&state.view.grid, state.config.card_width).block(grid_block);
    frame.render_stateful_widget(grid_widget, layout.grid_area, &mut state.grid_state);

    let next_key = state.config.short_binding(Action::NextPage);
    let prev_key = state.config.short_binding(Action::PrevPage);
    let pagination = state.view.loader.as_ref().map(|loader| Pagination {
        first_page: state.view.first_page,
        current_page: loader.state().current_page(),
        total_pages: loader.state().total_pages(),
        next_key: &next_key,
        prev_key: &prev_key,
    });
    frame.render_widget(
        Footer {
            indicators: state.view.grid.indicators(),
            tick: state.tick,
            pagination,
        },
        layout.footer_area,
    );

    let status_text = match (&state.status_message, state.selected_card()) {
        (Some(message), _) => message.clone(),
        (None, Some(card)) => {
            let link = state.card_link(card);
            detail::describe(card, link.as_ref().map(Url::as_str))
        }
        (None, None) => state.config.status_bar_hint(),
    };
    let status_style = if state.view.open_error.is_some() {
        Theme::error_style()
    } else {
        Theme::status_bar_style()
    };
    frame.render_widget(Paragraph::new(status_text).style(status_style), layout.status_area);
}

/// Feed the sentinel position from the last draw to the loader and start a
/// fetch when the trigger fires.
fn check_sentinel(
    state: &mut AppState,
    tx: &mpsc::UnboundedSender<FetchUpdate>,
    source: &HttpSource,
) {
    let Some(viewport) = state.grid_state.viewport() else {
        return;
    };
    let sentinel = state.grid_state.sentinel_line(state.view.grid.len());
    let view = &mut state.view;
    let Some(loader) = view.loader.as_mut() else {
        return;
    };
    if let Some(request) = loader.observe(viewport, sentinel, &mut view.grid) {
        spawn_page_load(tx.clone(), source.clone(), view.generation, request);
    }
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref(), !cli.html)?;

    let mut config = AppConfig::load();
    if let Some(margin) = cli.lead_margin {
        config.lead_margin = margin;
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout_secs = secs.max(1);
    }

    if cli.write_config {
        config.save().context("failed to write config")?;
        println!("{}", config::config_path().display());
        return Ok(());
    }

    let source = HttpSource::new(cli.url.clone(), Duration::from_secs(config.request_timeout_secs))
        .context("failed to build HTTP client")?;
    let opening = cli.opening();

    // ── headless mode ─────────────────────────────────────────
    if cli.html {
        let listing = headless::collect(
            &source,
            FilterContext::from_url(&cli.url),
            opening,
            ScrollTrigger::default(),
            cli.max_pages,
        )
        .await?;
        tracing::info!(
            cards = listing.grid.len(),
            pages = listing.pages_loaded,
            phase = ?listing.phase,
            "listing collected"
        );
        print!("{}", listing.grid.markup());
        return Ok(());
    }

    let mut state = AppState::new(cli.url.clone(), config);
    let (fetch_tx, mut fetch_rx) = mpsc::unbounded_channel::<FetchUpdate>();
    match opening {
        Opening::Fetch(page) => open_page_view(&mut state, &fetch_tx, &source, page),
        Opening::Counters {
            current_page,
            total_pages,
        } => {
            state.begin_page_view(current_page);
            state.open_with_counters(current_page, total_pages);
        }
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let mut events = spawn_event_reader(Duration::from_millis(100));

    // ── event loop ────────────────────────────────────────────
    loop {
        terminal.draw(|frame| draw(frame, &mut state))?;

        // Geometry from the draw above decides whether the sentinel is near.
        check_sentinel(&mut state, &fetch_tx, &source);

        if let Some(page) = state.pending_navigation.take() {
            open_page_view(&mut state, &fetch_tx, &source, page);
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(_, _) => {}
                    AppEvent::Tick => state.tick = state.tick.wrapping_add(1),
                }
            }

            Some(update) = fetch_rx.recv() => {
                apply_fetch_update(&mut state, update);
                while let Ok(update) = fetch_rx.try_recv() {
                    apply_fetch_update(&mut state, update);
                }
            }

            else => break,
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Some(link) = &state.opened_link {
        println!("{link}");
    }

    Ok(())
}
