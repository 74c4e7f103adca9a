use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    Frame,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::models::{Project, ProjectStatus};
use crate::ui::dashboard::status_color;
use crate::ui::format::format_brl;

const COLUMNS: [ProjectStatus; 4] = [
    ProjectStatus::ToStart,
    ProjectStatus::InProgress,
    ProjectStatus::Completed,
    ProjectStatus::Canceled,
];

// Represents the state of the board screen
pub struct BoardState {
    projects: Vec<Project>,
}

impl BoardState {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    fn column(&self, status: ProjectStatus) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| p.status == status)
            .collect()
    }
}

pub enum BoardAction {
    Back,
}

pub fn render_board<B: Backend>(frame: &mut Frame<B>, state: &mut BoardState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ]
            .as_ref(),
        )
        .split(chunks[0]);

    for (status, column) in COLUMNS.iter().zip(columns.iter()) {
        let cards = state.column(*status);
        let items: Vec<ListItem> = cards
            .iter()
            .map(|project| {
                let value = match project.value {
                    Some(value) => format_brl(value),
                    None => String::new(),
                };
                ListItem::new(vec![
                    Spans::from(Span::raw(project.name.clone())),
                    Spans::from(Span::styled(value, Style::default().fg(Color::DarkGray))),
                ])
            })
            .collect();

        let title = format!("{} ({})", status.label(), cards.len());
        let list = List::new(items).block(
            Block::default()
                .title(Span::styled(title, Style::default().fg(status_color(*status))))
                .borders(Borders::ALL),
        );

        frame.render_widget(list, *column);
    }

    let buttons = Paragraph::new("<Esc> Back to Dashboard")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[1]);
}

pub fn handle_input(_state: &mut BoardState) -> Result<Option<BoardAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                return Ok(Some(BoardAction::Back));
            }
            _ => {}
        }
    }
    Ok(None)
}
