use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    Frame,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
};

use crate::models::Project;
use crate::ui::dashboard::status_color;
use crate::ui::format::{SENTINEL, format_brl, format_date};

// Represents the state of the project details screen
pub struct ProjectDetailsState {
    project: Project,
}

impl ProjectDetailsState {
    pub fn new(project: Project) -> Self {
        Self { project }
    }
}

pub enum ProjectDetailsAction {
    Back,
}

fn optional_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => format_date(date),
        None => SENTINEL.to_string(),
    }
}

fn stage_gap_days(from: Option<NaiveDate>, to: Option<NaiveDate>) -> String {
    match (from, to) {
        (Some(from), Some(to)) => format!("{} days", (to - from).num_days()),
        _ => SENTINEL.to_string(),
    }
}

pub fn render_project_details<B: Backend>(frame: &mut Frame<B>, state: &mut ProjectDetailsState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    let project = &state.project;
    let stages = &project.stages;

    let value = match project.value {
        Some(value) => format_brl(value),
        None => SENTINEL.to_string(),
    };

    let lines = vec![
        Spans::from(vec![
            Span::raw("Status:             "),
            Span::styled(
                project.status.label(),
                Style::default()
                    .fg(status_color(project.status))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Spans::from(format!(
            "Created:            {}",
            format_date(project.created_at.date())
        )),
        Spans::from(format!("Value:              {value}")),
        Spans::from(format!(
            "Estimated delivery: {}",
            optional_date(project.estimated_delivery)
        )),
        Spans::from(""),
        Spans::from(Span::styled(
            "Stages",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(format!("  Quote:            {}", optional_date(stages.quote))),
        Spans::from(format!(
            "  Technical design: {}",
            optional_date(stages.technical_design)
        )),
        Spans::from(format!(
            "  Installation:     {}",
            optional_date(stages.installation)
        )),
        Spans::from(""),
        Spans::from(format!(
            "Conversion time:    {}",
            stage_gap_days(stages.quote, stages.technical_design)
        )),
        Spans::from(format!(
            "Production time:    {}",
            stage_gap_days(stages.technical_design, stages.installation)
        )),
    ];

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(project.name.clone())
            .borders(Borders::ALL),
    );

    frame.render_widget(panel, chunks[0]);

    let buttons = Paragraph::new("<Esc> Back to Dashboard")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[1]);
}

pub fn handle_input(_state: &mut ProjectDetailsState) -> Result<Option<ProjectDetailsAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter => {
                return Ok(Some(ProjectDetailsAction::Back));
            }
            _ => {}
        }
    }
    Ok(None)
}
