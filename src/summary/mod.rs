use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::models::{Project, ProjectStatus, StageDates};

/// How many projects the recent list shows.
const RECENT_LIMIT: usize = 10;
/// How many upcoming deliveries the dashboard shows.
const DELIVERY_LIMIT: usize = 5;
/// Width of the upcoming-deliveries window, in days, inclusive.
const UPCOMING_WINDOW_DAYS: i64 = 7;

/// Per-status project counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub to_start: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub canceled: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.to_start + self.in_progress + self.completed + self.canceled
    }
}

/// Row of the recent-projects list.
#[derive(Debug, Clone)]
pub struct RecentProject {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub created_at: NaiveDateTime,
}

/// Row of the upcoming-deliveries list.
#[derive(Debug, Clone)]
pub struct UpcomingDelivery {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub on_time: bool,
}

/// Everything the dashboard renders, derived in one pass from the project
/// list and an explicit `now`. No clock access happens below this point.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub status_counts: StatusCounts,
    pub upcoming_count: usize,
    pub recent_projects: Vec<RecentProject>,
    pub avg_conversion_days: Option<f64>,
    pub avg_production_days: Option<f64>,
    pub conversion_rate: Option<f64>,
    pub in_progress_total: f64,
    pub month_delivery_days: BTreeSet<u32>,
    pub next_deliveries: Vec<UpcomingDelivery>,
}

pub fn summarize(projects: &[Project], now: NaiveDateTime) -> DashboardSummary {
    let today = now.date();
    DashboardSummary {
        status_counts: status_counts(projects),
        upcoming_count: upcoming_delivery_count(projects, today),
        recent_projects: recent_projects(projects),
        avg_conversion_days: average_conversion_days(projects),
        avg_production_days: average_production_days(projects),
        conversion_rate: conversion_rate(projects),
        in_progress_total: in_progress_total(projects),
        month_delivery_days: month_delivery_days(projects, today),
        next_deliveries: next_deliveries(projects, today),
    }
}

pub fn status_counts(projects: &[Project]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for project in projects {
        match project.status {
            ProjectStatus::ToStart => counts.to_start += 1,
            ProjectStatus::InProgress => counts.in_progress += 1,
            ProjectStatus::Completed => counts.completed += 1,
            ProjectStatus::Canceled => counts.canceled += 1,
        }
    }
    counts
}

/// In-progress projects due within the next seven days, today included.
pub fn upcoming_delivery_count(projects: &[Project], today: NaiveDate) -> usize {
    let window_end = today + Duration::days(UPCOMING_WINDOW_DAYS);
    projects
        .iter()
        .filter(|p| p.status == ProjectStatus::InProgress)
        .filter_map(|p| p.estimated_delivery)
        .filter(|delivery| *delivery >= today && *delivery <= window_end)
        .count()
}

/// Newest projects first, capped at ten.
pub fn recent_projects(projects: &[Project]) -> Vec<RecentProject> {
    let mut recent: Vec<RecentProject> = projects
        .iter()
        .map(|p| RecentProject {
            id: p.id.clone(),
            name: p.name.clone(),
            status: p.status,
            created_at: p.created_at,
        })
        .collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(RECENT_LIMIT);
    recent
}

/// Mean days from quote to technical design, over projects with both dates.
pub fn average_conversion_days(projects: &[Project]) -> Option<f64> {
    average_stage_gap(projects, |stages| {
        Some((stages.technical_design? - stages.quote?).num_days())
    })
}

/// Mean days from technical design to installation.
pub fn average_production_days(projects: &[Project]) -> Option<f64> {
    average_stage_gap(projects, |stages| {
        Some((stages.installation? - stages.technical_design?).num_days())
    })
}

fn average_stage_gap(
    projects: &[Project],
    gap: impl Fn(&StageDates) -> Option<i64>,
) -> Option<f64> {
    let gaps: Vec<i64> = projects.iter().filter_map(|p| gap(&p.stages)).collect();
    if gaps.is_empty() {
        return None;
    }
    Some(gaps.iter().sum::<i64>() as f64 / gaps.len() as f64)
}

/// Share of quoted projects that reached technical design, as a percentage.
/// `None` when nothing has been quoted yet.
pub fn conversion_rate(projects: &[Project]) -> Option<f64> {
    let quoted: Vec<&Project> = projects
        .iter()
        .filter(|p| p.stages.quote.is_some())
        .collect();
    if quoted.is_empty() {
        return None;
    }
    let converted = quoted
        .iter()
        .filter(|p| p.stages.technical_design.is_some())
        .count();
    Some(converted as f64 / quoted.len() as f64 * 100.0)
}

/// Sum of the values of in-progress projects. Projects without a value
/// contribute nothing.
pub fn in_progress_total(projects: &[Project]) -> f64 {
    projects
        .iter()
        .filter(|p| p.status == ProjectStatus::InProgress)
        .filter_map(|p| p.value)
        .sum()
}

/// Calendar day numbers of this month's deliveries, for calendar marking.
pub fn month_delivery_days(projects: &[Project], today: NaiveDate) -> BTreeSet<u32> {
    projects
        .iter()
        .filter_map(|p| p.estimated_delivery)
        .filter(|d| d.month() == today.month() && d.year() == today.year())
        .map(|d| d.day())
        .collect()
}

/// The next five deliveries from today on, soonest first.
pub fn next_deliveries(projects: &[Project], today: NaiveDate) -> Vec<UpcomingDelivery> {
    let mut deliveries: Vec<UpcomingDelivery> = projects
        .iter()
        .filter_map(|p| {
            let date = p.estimated_delivery?;
            if date < today {
                return None;
            }
            Some(UpcomingDelivery {
                id: p.id.clone(),
                name: p.name.clone(),
                date,
                on_time: date >= today,
            })
        })
        .collect();
    deliveries.sort_by_key(|d| d.date);
    deliveries.truncate(DELIVERY_LIMIT);
    deliveries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn datetime(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    fn project(id: &str, status: ProjectStatus) -> Project {
        Project {
            id: id.to_string(),
            name: format!("Project {id}"),
            status,
            created_at: datetime(2026, 1, 1, 9),
            stages: StageDates::default(),
            estimated_delivery: None,
            value: None,
        }
    }

    #[test]
    fn status_counts_sum_to_project_count() {
        let projects = vec![
            project("a", ProjectStatus::ToStart),
            project("b", ProjectStatus::InProgress),
            project("c", ProjectStatus::InProgress),
            project("d", ProjectStatus::Completed),
            project("e", ProjectStatus::Canceled),
        ];
        let counts = status_counts(&projects);
        assert_eq!(counts.to_start, 1);
        assert_eq!(counts.in_progress, 2);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.canceled, 1);
        assert_eq!(counts.total(), projects.len());
    }

    #[test]
    fn upcoming_count_keeps_only_the_seven_day_window() {
        let today = date(2026, 8, 1);
        let mut soon = project("a", ProjectStatus::InProgress);
        soon.estimated_delivery = Some(date(2026, 8, 4));
        let mut far = project("b", ProjectStatus::InProgress);
        far.estimated_delivery = Some(date(2026, 8, 11));
        assert_eq!(upcoming_delivery_count(&[soon, far], today), 1);
    }

    #[test]
    fn upcoming_window_boundary_is_inclusive() {
        let today = date(2026, 8, 1);
        let mut edge = project("a", ProjectStatus::InProgress);
        edge.estimated_delivery = Some(date(2026, 8, 8));
        let mut past = project("b", ProjectStatus::InProgress);
        past.estimated_delivery = Some(date(2026, 7, 31));
        assert_eq!(upcoming_delivery_count(&[edge, past], today), 1);
    }

    #[test]
    fn upcoming_count_ignores_other_statuses() {
        let today = date(2026, 8, 1);
        let mut done = project("a", ProjectStatus::Completed);
        done.estimated_delivery = Some(date(2026, 8, 3));
        assert_eq!(upcoming_delivery_count(&[done], today), 0);
    }

    #[test]
    fn recent_projects_are_newest_first_and_capped_at_ten() {
        let mut projects = Vec::new();
        for day in 1..=12 {
            let mut p = project(&format!("p{day}"), ProjectStatus::ToStart);
            p.created_at = datetime(2026, 3, day, 8);
            projects.push(p);
        }
        let recent = recent_projects(&projects);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].id, "p12");
        assert_eq!(recent[9].id, "p3");
    }

    #[test]
    fn recent_projects_on_short_lists_keep_everything() {
        let projects = vec![
            project("a", ProjectStatus::ToStart),
            project("b", ProjectStatus::Completed),
        ];
        assert_eq!(recent_projects(&projects).len(), 2);
    }

    #[test]
    fn conversion_average_needs_both_stage_dates() {
        let mut quoted_only = project("a", ProjectStatus::InProgress);
        quoted_only.stages.quote = Some(date(2026, 5, 1));
        assert_eq!(average_conversion_days(&[quoted_only]), None);
    }

    #[test]
    fn conversion_average_counts_whole_days() {
        let mut p = project("a", ProjectStatus::InProgress);
        p.stages.quote = Some(date(2026, 5, 1));
        p.stages.technical_design = Some(date(2026, 5, 6));
        assert_eq!(average_conversion_days(&[p]), Some(5.0));
    }

    #[test]
    fn conversion_average_is_the_mean_over_qualifying_projects() {
        let mut a = project("a", ProjectStatus::InProgress);
        a.stages.quote = Some(date(2026, 5, 1));
        a.stages.technical_design = Some(date(2026, 5, 3));
        let mut b = project("b", ProjectStatus::Completed);
        b.stages.quote = Some(date(2026, 5, 1));
        b.stages.technical_design = Some(date(2026, 5, 8));
        let c = project("c", ProjectStatus::ToStart);
        assert_eq!(average_conversion_days(&[a, b, c]), Some(4.5));
    }

    #[test]
    fn production_average_spans_design_to_installation() {
        let mut p = project("a", ProjectStatus::Completed);
        p.stages.technical_design = Some(date(2026, 5, 6));
        p.stages.installation = Some(date(2026, 5, 20));
        assert_eq!(average_production_days(&[p]), Some(14.0));
    }

    #[test]
    fn conversion_rate_uses_quoted_projects_as_denominator() {
        let mut quoted = project("a", ProjectStatus::ToStart);
        quoted.stages.quote = Some(date(2026, 5, 1));
        let mut converted = project("b", ProjectStatus::InProgress);
        converted.stages.quote = Some(date(2026, 5, 1));
        converted.stages.technical_design = Some(date(2026, 5, 4));
        let unquoted = project("c", ProjectStatus::ToStart);
        let rate = conversion_rate(&[quoted, converted, unquoted]).unwrap();
        assert!((rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn conversion_rate_is_none_without_quotes() {
        let projects = vec![project("a", ProjectStatus::ToStart)];
        assert_eq!(conversion_rate(&projects), None);
    }

    #[test]
    fn financial_total_skips_missing_values() {
        let mut priced = project("a", ProjectStatus::InProgress);
        priced.value = Some(10_000.0);
        let unpriced = project("b", ProjectStatus::InProgress);
        let mut done = project("c", ProjectStatus::Completed);
        done.value = Some(99_000.0);
        let total = in_progress_total(&[priced, unpriced, done]);
        assert!((total - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn month_days_cover_only_the_current_month_and_year() {
        let today = date(2026, 8, 6);
        let mut this_month = project("a", ProjectStatus::InProgress);
        this_month.estimated_delivery = Some(date(2026, 8, 21));
        let mut next_month = project("b", ProjectStatus::InProgress);
        next_month.estimated_delivery = Some(date(2026, 9, 2));
        let mut last_year = project("c", ProjectStatus::Completed);
        last_year.estimated_delivery = Some(date(2025, 8, 21));
        let days = month_delivery_days(&[this_month, next_month, last_year], today);
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![21]);
    }

    #[test]
    fn next_deliveries_are_sorted_future_only_and_capped() {
        let today = date(2026, 8, 1);
        let mut projects = Vec::new();
        for day in [20, 3, 15, 9, 27, 30] {
            let mut p = project(&format!("p{day}"), ProjectStatus::InProgress);
            p.estimated_delivery = Some(date(2026, 8, day));
            projects.push(p);
        }
        let mut past = project("old", ProjectStatus::Completed);
        past.estimated_delivery = Some(date(2026, 7, 20));
        projects.push(past);

        let deliveries = next_deliveries(&projects, today);
        assert_eq!(deliveries.len(), 5);
        let days: Vec<u32> = deliveries.iter().map(|d| d.date.day()).collect();
        assert_eq!(days, vec![3, 9, 15, 20, 27]);
        assert!(deliveries.iter().all(|d| d.date >= today));
        assert!(deliveries.iter().all(|d| d.on_time));
    }

    #[test]
    fn empty_list_degrades_to_zeros_and_sentinels() {
        let now = datetime(2026, 8, 6, 12);
        let summary = summarize(&[], now);
        assert_eq!(summary.status_counts.total(), 0);
        assert_eq!(summary.upcoming_count, 0);
        assert!(summary.recent_projects.is_empty());
        assert_eq!(summary.avg_conversion_days, None);
        assert_eq!(summary.avg_production_days, None);
        assert_eq!(summary.conversion_rate, None);
        assert_eq!(summary.in_progress_total, 0.0);
        assert!(summary.month_delivery_days.is_empty());
        assert!(summary.next_deliveries.is_empty());
    }
}
