//! Derived task analytics.
//!
//! # Responsibility
//! - Compute statistics, streaks, groupings and filters over task slices.
//!
//! # Invariants
//! - Every function is pure: same input yields the same output.
//! - "Today" is always a parameter; nothing here reads the wall clock.
//! - Grouped buckets keep input order; map keys iterate chronologically.

use crate::date::{days_before, display_date_short, in_month, month_key};
use crate::model::task::{PriorityFilter, Task, TaskStatus};
use chrono::{Datelike, NaiveDate, Weekday};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Window used by dashboards when the caller has no preference.
pub const DEFAULT_DAILY_STATS_DAYS: u32 = 7;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Completion summary over a set of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub missed: usize,
    /// `round(100 * completed / total)`, or 0 for an empty set.
    pub percentage: u32,
}

impl TaskStats {
    /// Tasks that are neither completed nor missed.
    pub fn pending(&self) -> usize {
        self.total - self.completed - self.missed
    }
}

/// Per-day tallies for the trailing-window chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStat {
    pub date: NaiveDate,
    /// Short label, e.g. `Jun 01`.
    pub label: String,
    pub completed: usize,
    pub missed: usize,
    pub total: usize,
}

/// Weekday with the best completion rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductiveDay {
    /// `None` when no weekday has a completion rate above zero.
    pub day: Option<Weekday>,
    pub rate: f64,
    pub completed: usize,
    pub total: usize,
}

pub fn calculate_task_stats<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> TaskStats {
    let mut stats = TaskStats::default();
    for task in tasks {
        stats.total += 1;
        match task.status {
            TaskStatus::Completed => stats.completed += 1,
            TaskStatus::Missed => stats.missed += 1,
            TaskStatus::Pending => {}
        }
    }
    stats.percentage = percentage(stats.completed, stats.total);
    stats
}

/// Counts consecutive fully-completed days ending at `today`.
///
/// Walks backwards one calendar day at a time and stops at the first day
/// that has no tasks or has any task not completed. That day is not
/// counted.
pub fn calculate_task_streak(tasks: &[Task], today: NaiveDate) -> u32 {
    let by_date = group_tasks_by_date(tasks);
    let mut streak = 0;
    let mut cursor = Some(today);

    while let Some(day) = cursor {
        let fully_completed = by_date
            .get(&day)
            .is_some_and(|day_tasks| day_tasks.iter().all(|task| task.is_completed()));
        if !fully_completed {
            break;
        }
        streak += 1;
        cursor = day.pred_opt();
    }

    streak
}

pub fn group_tasks_by_date(tasks: &[Task]) -> BTreeMap<NaiveDate, Vec<&Task>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        grouped.entry(task.date).or_default().push(task);
    }
    grouped
}

/// Groups by `YYYY-MM`.
pub fn group_tasks_by_month(tasks: &[Task]) -> BTreeMap<String, Vec<&Task>> {
    let mut grouped: BTreeMap<String, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        grouped.entry(month_key(task.date)).or_default().push(task);
    }
    grouped
}

/// Tallies for each of the last `days` days ending at `today`, oldest first.
pub fn get_daily_stats(tasks: &[Task], days: u32, today: NaiveDate) -> Vec<DailyStat> {
    let by_date = group_tasks_by_date(tasks);

    (0..days)
        .rev()
        .filter_map(|offset| days_before(today, u64::from(offset)))
        .map(|date| {
            let day_tasks = by_date.get(&date).map(Vec::as_slice).unwrap_or_default();
            let stats = calculate_task_stats(day_tasks.iter().copied());
            DailyStat {
                date,
                label: display_date_short(date),
                completed: stats.completed,
                missed: stats.missed,
                total: stats.total,
            }
        })
        .collect()
}

/// Borrows the input unchanged for `PriorityFilter::All`.
pub fn filter_tasks_by_priority(tasks: &[Task], filter: PriorityFilter) -> Cow<'_, [Task]> {
    match filter {
        PriorityFilter::All => Cow::Borrowed(tasks),
        PriorityFilter::Only(priority) => Cow::Owned(
            tasks
                .iter()
                .filter(|task| task.priority == priority)
                .cloned()
                .collect(),
        ),
    }
}

/// Case-insensitive substring match on title or description.
///
/// Borrows the input unchanged when `term` is empty.
pub fn filter_tasks_by_search<'a>(tasks: &'a [Task], term: &str) -> Cow<'a, [Task]> {
    if term.is_empty() {
        return Cow::Borrowed(tasks);
    }

    let needle = term.to_lowercase();
    Cow::Owned(
        tasks
            .iter()
            .filter(|task| {
                task.title.to_lowercase().contains(&needle)
                    || task.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect(),
    )
}

/// Stable sort: High, then Medium, then Low.
pub fn sort_tasks_by_priority(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by_key(|task| task.priority.rank());
    sorted
}

/// Pending tasks dated strictly before `today`.
pub fn get_overdue_tasks(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.date < today && task.status == TaskStatus::Pending)
        .collect()
}

/// Stats over tasks dated within `[start, end]`, both inclusive.
pub fn get_completion_rate_in_range(tasks: &[Task], start: NaiveDate, end: NaiveDate) -> TaskStats {
    calculate_task_stats(
        tasks
            .iter()
            .filter(|task| task.date >= start && task.date <= end),
    )
}

/// Weekday (Monday first) with the strictly highest completion rate.
///
/// Ties keep the earlier weekday; weekdays without tasks are skipped.
pub fn get_most_productive_day(tasks: &[Task]) -> ProductiveDay {
    let mut tallies = [(0usize, 0usize); 7];
    for task in tasks {
        let slot = &mut tallies[task.date.weekday().num_days_from_monday() as usize];
        slot.1 += 1;
        if task.is_completed() {
            slot.0 += 1;
        }
    }

    let mut best = ProductiveDay {
        day: None,
        rate: 0.0,
        completed: 0,
        total: 0,
    };
    for (weekday, (completed, total)) in WEEK.iter().zip(tallies) {
        if total == 0 {
            continue;
        }
        let rate = completed as f64 / total as f64;
        if rate > best.rate {
            best = ProductiveDay {
                day: Some(*weekday),
                rate,
                completed,
                total,
            };
        }
    }
    best
}

/// Stats for one calendar month (`month` is 1-based).
pub fn get_monthly_progress(tasks: &[Task], year: i32, month: u32) -> TaskStats {
    calculate_task_stats(
        tasks
            .iter()
            .filter(|task| in_month(task.date, year, month)),
    )
}

pub fn get_yearly_progress(tasks: &[Task], year: i32) -> TaskStats {
    calculate_task_stats(tasks.iter().filter(|task| task.date.year() == year))
}

fn percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (completed as f64 * 100.0 / total as f64).round() as u32
}
