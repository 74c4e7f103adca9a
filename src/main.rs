mod config;
mod models;
mod store;
mod summary;
mod ui;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};

use crate::models::Project;
use crate::store::ProjectStore;
use crate::ui::{
    board::{BoardAction, BoardState, handle_input as handle_board_input, render_board},
    dashboard::{
        DashboardAction, DashboardState, handle_input as handle_dashboard_input, render_dashboard,
    },
    project_details::{
        ProjectDetailsAction, ProjectDetailsState, handle_input as handle_details_input,
        render_project_details,
    },
};

#[derive(Parser)]
#[command(name = "project_dashboard", about = "Terminal project-management dashboard")]
struct Cli {
    /// Path of the JSON project file (overrides DATA_FILE)
    #[arg(short, long)]
    data: Option<String>,
}

// Represents the current screen in the app
enum AppScreen {
    Dashboard,
    Board,
    ProjectDetails,
}

// Main application state
struct AppState {
    store: ProjectStore,
    projects: Vec<Project>,
    screen: AppScreen,
    dashboard_state: Option<DashboardState>,
    board_state: Option<BoardState>,
    details_state: Option<ProjectDetailsState>,
}

impl AppState {
    fn new(store: ProjectStore, projects: Vec<Project>) -> Self {
        Self {
            store,
            projects,
            screen: AppScreen::Dashboard,
            dashboard_state: None,
            board_state: None,
            details_state: None,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;
    init_logging(&config)?;

    // Load the project list before touching the terminal
    let project_store = match cli.data {
        Some(path) => ProjectStore::new(path),
        None => store::init(&config),
    };
    let projects = project_store
        .load_projects()
        .with_context(|| format!("loading projects from {}", project_store.path().display()))?;
    info!(count = projects.len(), "project list loaded");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app_state = AppState::new(project_store, projects);
    load_dashboard_screen(&mut app_state);

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state);

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = result {
        println!("Error: {err}");
    }

    Ok(())
}

/// Install a file-backed subscriber when LOG_FILE is configured. Nothing may
/// log to stdout while the terminal is in raw mode.
fn init_logging(config: &config::Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {path}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| match app_state.screen {
            AppScreen::Dashboard => {
                if let Some(state) = &mut app_state.dashboard_state {
                    render_dashboard(f, state);
                }
            }
            AppScreen::Board => {
                if let Some(state) = &mut app_state.board_state {
                    render_board(f, state);
                }
            }
            AppScreen::ProjectDetails => {
                if let Some(state) = &mut app_state.details_state {
                    render_project_details(f, state);
                }
            }
        })?;

        // Handle input for current screen
        let should_quit = match app_state.screen {
            AppScreen::Dashboard => handle_dashboard_screen(app_state)?,
            AppScreen::Board => handle_board_screen(app_state)?,
            AppScreen::ProjectDetails => handle_details_screen(app_state)?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

/// Rebuild the dashboard from the in-memory list, capturing a fresh `now`.
fn load_dashboard_screen(app_state: &mut AppState) {
    let now = Local::now().naive_local();
    app_state.dashboard_state = Some(DashboardState::new(&app_state.projects, now));
    app_state.screen = AppScreen::Dashboard;
}

fn handle_dashboard_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.dashboard_state {
        match handle_dashboard_input(state)? {
            Some(DashboardAction::Exit) => {
                return Ok(true);
            }
            Some(DashboardAction::SelectProject(project_id)) => {
                match app_state.projects.iter().find(|p| p.id == project_id) {
                    Some(project) => {
                        info!(%project_id, "opening project details");
                        app_state.details_state = Some(ProjectDetailsState::new(project.clone()));
                        app_state.screen = AppScreen::ProjectDetails;
                    }
                    None => {
                        warn!(%project_id, "selected project is not in the loaded list");
                    }
                }
            }
            Some(DashboardAction::ShowBoard) => {
                info!("opening board view");
                app_state.board_state = Some(BoardState::new(app_state.projects.clone()));
                app_state.screen = AppScreen::Board;
            }
            Some(DashboardAction::Refresh) => {
                // Reload from the store and rebuild with a fresh clock
                app_state.projects = app_state.store.load_projects()?;
                info!(count = app_state.projects.len(), "project list reloaded");
                load_dashboard_screen(app_state);
            }
            None => {}
        }
    }

    Ok(false)
}

fn handle_board_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.board_state {
        match handle_board_input(state)? {
            Some(BoardAction::Back) => {
                load_dashboard_screen(app_state);
            }
            None => {}
        }
    }

    Ok(false)
}

fn handle_details_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.details_state {
        match handle_details_input(state)? {
            Some(ProjectDetailsAction::Back) => {
                load_dashboard_screen(app_state);
            }
            None => {}
        }
    }

    Ok(false)
}
