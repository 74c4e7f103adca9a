use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use crossterm::event::{self, Event, KeyCode};
use std::collections::BTreeSet;
use tui::{
    Frame,
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::models::{Project, ProjectStatus};
use crate::summary::{DashboardSummary, summarize};
use crate::ui::format::{
    format_avg_days, format_brl, format_date, format_day_month, format_rate,
};

// Which of the two selectable lists has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PanelFocus {
    RecentProjects,
    Deliveries,
}

// Represents the state of the dashboard screen
pub struct DashboardState {
    summary: DashboardSummary,
    today: NaiveDate,
    recent_state: ListState,
    deliveries_state: ListState,
    focus: PanelFocus,
}

impl DashboardState {
    /// Build the screen state from the project list, capturing `now` once.
    pub fn new(projects: &[Project], now: NaiveDateTime) -> Self {
        let summary = summarize(projects, now);
        let mut recent_state = ListState::default();
        if !summary.recent_projects.is_empty() {
            recent_state.select(Some(0));
        }

        Self {
            summary,
            today: now.date(),
            recent_state,
            deliveries_state: ListState::default(),
            focus: PanelFocus::RecentProjects,
        }
    }

    fn focused_len(&self) -> usize {
        match self.focus {
            PanelFocus::RecentProjects => self.summary.recent_projects.len(),
            PanelFocus::Deliveries => self.summary.next_deliveries.len(),
        }
    }

    fn focused_list_state(&mut self) -> &mut ListState {
        match self.focus {
            PanelFocus::RecentProjects => &mut self.recent_state,
            PanelFocus::Deliveries => &mut self.deliveries_state,
        }
    }

    pub fn next(&mut self) {
        let len = self.focused_len();
        if len == 0 {
            return;
        }

        let state = self.focused_list_state();
        let i = match state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.focused_len();
        if len == 0 {
            return;
        }

        let state = self.focused_list_state();
        let i = match state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            PanelFocus::RecentProjects => PanelFocus::Deliveries,
            PanelFocus::Deliveries => PanelFocus::RecentProjects,
        };
        let len = self.focused_len();
        let state = self.focused_list_state();
        if state.selected().is_none() && len > 0 {
            state.select(Some(0));
        }
    }

    /// Identifier of the row selected in the focused list, if any.
    pub fn selected_project_id(&self) -> Option<String> {
        match self.focus {
            PanelFocus::RecentProjects => self
                .recent_state
                .selected()
                .and_then(|i| self.summary.recent_projects.get(i))
                .map(|p| p.id.clone()),
            PanelFocus::Deliveries => self
                .deliveries_state
                .selected()
                .and_then(|i| self.summary.next_deliveries.get(i))
                .map(|d| d.id.clone()),
        }
    }
}

pub enum DashboardAction {
    SelectProject(String), // Contains project_id
    ShowBoard,
    Refresh,
    Exit,
}

pub fn status_color(status: ProjectStatus) -> Color {
    match status {
        ProjectStatus::ToStart => Color::Gray,
        ProjectStatus::InProgress => Color::Blue,
        ProjectStatus::Completed => Color::Green,
        ProjectStatus::Canceled => Color::Red,
    }
}

pub fn render_dashboard<B: Backend>(frame: &mut Frame<B>, state: &mut DashboardState) {
    // Create the layout: activity tiles, main panels, buttons
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(5),
                Constraint::Min(12),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    render_activity_summary(frame, &state.summary, chunks[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(chunks[1]);

    render_recent_projects(frame, state, middle[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(6)].as_ref())
        .split(middle[1]);

    render_financial_summary(frame, &state.summary, right[0]);
    render_upcoming_deliveries(frame, state, right[1]);

    // Create and render the buttons
    let buttons_text = if state.selected_project_id().is_some() {
        "<Enter> Open Project | <Tab> Switch List | <B> Board | <R> Reload | <Q> Quit"
    } else {
        "<Tab> Switch List | <B> Board | <R> Reload | <Q> Quit"
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[2]);
}

fn render_activity_summary<B: Backend>(
    frame: &mut Frame<B>,
    summary: &DashboardSummary,
    area: Rect,
) {
    let counts = summary.status_counts;
    let tiles = [
        (counts.to_start, "To start", Color::Gray),
        (counts.in_progress, "In progress", Color::Blue),
        (counts.completed, "Completed", Color::Green),
        (counts.canceled, "Canceled", Color::Red),
        (summary.upcoming_count, "Due in 7 days", Color::Yellow),
    ];

    // Outer block first, tiles rendered inside it
    let title = format!("Activity Summary ({} projects)", counts.total());
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
            ]
            .as_ref(),
        )
        .split(inner);

    for ((count, label, color), column) in tiles.iter().zip(columns.iter()) {
        let tile = Paragraph::new(vec![
            Spans::from(Span::styled(
                count.to_string(),
                Style::default().fg(*color).add_modifier(Modifier::BOLD),
            )),
            Spans::from(Span::raw(*label)),
        ])
        .alignment(Alignment::Center);

        frame.render_widget(tile, *column);
    }
}

fn render_recent_projects<B: Backend>(
    frame: &mut Frame<B>,
    state: &mut DashboardState,
    area: Rect,
) {
    let items: Vec<ListItem> = state
        .summary
        .recent_projects
        .iter()
        .map(|project| {
            ListItem::new(Spans::from(vec![
                Span::styled("● ", Style::default().fg(status_color(project.status))),
                Span::raw(&project.name),
                Span::styled(
                    format!(" ({})", format_date(project.created_at.date())),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let mut list = List::new(items).block(
        Block::default()
            .title("Recent Projects")
            .borders(Borders::ALL),
    );
    if state.focus == PanelFocus::RecentProjects {
        list = list.highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    }

    frame.render_stateful_widget(list, area, &mut state.recent_state);
}

fn render_financial_summary<B: Backend>(
    frame: &mut Frame<B>,
    summary: &DashboardSummary,
    area: Rect,
) {
    let lines = vec![
        Spans::from(vec![
            Span::raw("In progress total:   "),
            Span::styled(
                format_brl(summary.in_progress_total),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Spans::from(vec![
            Span::raw("Conversion rate:     "),
            Span::raw(format_rate(summary.conversion_rate)),
        ]),
        Spans::from(vec![
            Span::raw("Avg conversion time: "),
            Span::raw(format_avg_days(summary.avg_conversion_days)),
        ]),
        Spans::from(vec![
            Span::raw("Avg production time: "),
            Span::raw(format_avg_days(summary.avg_production_days)),
        ]),
    ];

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title("Financial Summary")
            .borders(Borders::ALL),
    );

    frame.render_widget(panel, area);
}

fn render_upcoming_deliveries<B: Backend>(
    frame: &mut Frame<B>,
    state: &mut DashboardState,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(8)].as_ref())
        .split(area);

    let items: Vec<ListItem> = state
        .summary
        .next_deliveries
        .iter()
        .map(|delivery| {
            let (flag, flag_color) = if delivery.on_time {
                ("on time", Color::Green)
            } else {
                ("late", Color::Red)
            };
            ListItem::new(Spans::from(vec![
                Span::styled(
                    format!("{} ", format_day_month(delivery.date)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(&delivery.name),
                Span::styled(format!(" {flag}"), Style::default().fg(flag_color)),
            ]))
        })
        .collect();

    let mut list = List::new(items).block(
        Block::default()
            .title("Upcoming Deliveries")
            .borders(Borders::ALL),
    );
    if state.focus == PanelFocus::Deliveries {
        list = list.highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    }

    frame.render_stateful_widget(list, chunks[0], &mut state.deliveries_state);

    render_month_calendar(
        frame,
        state.today,
        &state.summary.month_delivery_days,
        chunks[1],
    );
}

// Compact month grid with delivery days highlighted
fn render_month_calendar<B: Backend>(
    frame: &mut Frame<B>,
    today: NaiveDate,
    marked: &BTreeSet<u32>,
    area: Rect,
) {
    let lead = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .map(|first| first.weekday().num_days_from_sunday() as usize)
        .unwrap_or(0);

    let mut rows: Vec<Spans> = Vec::new();
    let mut row: Vec<Span> = Vec::new();
    for _ in 0..lead {
        row.push(Span::raw("   "));
    }
    for day in 1..=days_in_month(today) {
        let cell = format!("{day:>2} ");
        if marked.contains(&day) {
            row.push(Span::styled(
                cell,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        } else if day == today.day() {
            row.push(Span::styled(
                cell,
                Style::default().add_modifier(Modifier::UNDERLINED),
            ));
        } else {
            row.push(Span::raw(cell));
        }
        if (lead + day as usize) % 7 == 0 {
            rows.push(Spans::from(std::mem::take(&mut row)));
        }
    }
    if !row.is_empty() {
        rows.push(Spans::from(row));
    }

    let title = format!("Deliveries in {}", today.format("%m/%Y"));
    let calendar = Paragraph::new(rows).block(Block::default().title(title).borders(Borders::ALL));

    frame.render_widget(calendar, area);
}

fn days_in_month(date: NaiveDate) -> u32 {
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next_month
        .map(|first| (first - Duration::days(1)).day())
        .unwrap_or(30)
}

pub fn handle_input(state: &mut DashboardState) -> Result<Option<DashboardAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                return Ok(Some(DashboardAction::Exit));
            }
            KeyCode::Char('b') => {
                return Ok(Some(DashboardAction::ShowBoard));
            }
            KeyCode::Char('r') => {
                return Ok(Some(DashboardAction::Refresh));
            }
            KeyCode::Tab => {
                state.toggle_focus();
            }
            KeyCode::Down => {
                state.next();
            }
            KeyCode::Up => {
                state.previous();
            }
            KeyCode::Enter => {
                if let Some(id) = state.selected_project_id() {
                    return Ok(Some(DashboardAction::SelectProject(id)));
                }
            }
            _ => {}
        }
    }
    Ok(None)
}
