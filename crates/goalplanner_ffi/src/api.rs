//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Translate string inputs into domain types and domain results into
//!   flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One store session lives for the whole process. It is opened by the
//!   first store-backed call and serialized behind a mutex.
//! - Every store-backed call first retries saves dropped by earlier calls.
//! - Ids and dates cross the boundary as strings (`YYYY-MM-DD` for dates).

use chrono::NaiveDate;
use goalplanner_core::analytics::{
    filter_tasks_by_priority, filter_tasks_by_search, get_daily_stats, get_monthly_progress,
    get_most_productive_day, get_overdue_tasks, get_yearly_progress,
};
use goalplanner_core::date::{format_iso_date, parse_iso_date, weekday_name};
use goalplanner_core::db::open_db;
use goalplanner_core::{
    core_version as core_version_inner, export_backup as export_backup_inner,
    import_backup as import_backup_inner, init_logging as init_logging_inner, ping as ping_inner,
    DailyStat, NewTask, Priority, PriorityFilter, RecordId, ReorderDirection, Skill, SkillStatus,
    SqliteKvStore, Store, SystemClock, Task, TaskKind, TaskPatch, TaskStats, TaskStatus,
    DEFAULT_DAILY_STATS_DAYS,
};
use log::{info, warn};
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const DB_FILE_NAME: &str = "goalplanner.sqlite3";
const DB_PATH_ENV: &str = "GOALPLANNER_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

type SessionStore = Store<SqliteKvStore<Connection>>;
static SESSION: OnceCell<Mutex<SessionStore>> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the database file used by the store session.
///
/// Must run before the first store-backed call; afterwards only the
/// already-active path is accepted.
///
/// # FFI contract
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_db_path(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }

    let requested = PathBuf::from(trimmed);
    let active = DB_PATH.get_or_init(|| requested.clone());
    if *active != requested {
        warn!(
            "event=db_path_configure module=ffi status=error error_code=already_configured active={}",
            active.display()
        );
        return format!(
            "db path already configured as `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        );
    }

    info!(
        "event=db_path_configure module=ffi status=ok path={}",
        active.display()
    );
    String::new()
}

/// Task projection for Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `High|Medium|Low`.
    pub priority: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `pending|completed|missed`.
    pub status: String,
    /// `daily|monthly|yearly`.
    pub kind: String,
    pub linked_skill: Option<String>,
}

/// Skill projection for Dart. List order is priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillItem {
    pub id: String,
    pub name: String,
    /// `active|completed|missed`.
    pub status: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the affected record, when there is one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// `false` while some change is only held in memory. A later call
    /// retries the write.
    pub saved: bool,
}

/// What a successful action reports back before the saved flag is known.
type ActionOutcome = (String, Option<String>);

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>, saved: bool) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
            saved,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
            saved: false,
        }
    }

    fn from_result(result: Result<(ActionOutcome, bool), String>, operation: &str) -> Self {
        match result {
            Ok(((message, id), saved)) => {
                if !saved {
                    warn!("event={operation} module=ffi status=ok saved=false");
                }
                Self::success(message, id, saved)
            }
            Err(err) => Self::failure(format!("{operation} failed: {err}")),
        }
    }
}

/// Dashboard summary for the current day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardResponse {
    pub ok: bool,
    pub today: String,
    pub total: u32,
    pub completed: u32,
    pub missed: u32,
    /// Completed share of today's tasks, rounded to 0..=100.
    pub percentage: u32,
    pub streak: u32,
    pub quote: String,
    pub dark_mode: bool,
    pub message: String,
}

/// One day of the trailing activity window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStatItem {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Short label, e.g. `Jun 01`.
    pub label: String,
    pub completed: u32,
    pub missed: u32,
    pub total: u32,
}

/// Completion tallies for a month or a year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressResponse {
    pub ok: bool,
    pub total: u32,
    pub completed: u32,
    pub missed: u32,
    pub percentage: u32,
    pub message: String,
}

/// All-time summary for the analytics screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverviewResponse {
    pub ok: bool,
    pub total: u32,
    pub completed: u32,
    pub missed: u32,
    pub percentage: u32,
    pub streak: u32,
    /// English weekday name; `None` until some task is completed.
    pub most_productive_day: Option<String>,
    /// Completion rate of that weekday, rounded to 0..=100.
    pub most_productive_percentage: u32,
    /// Pending tasks dated before today.
    pub overdue: Vec<TaskItem>,
    pub message: String,
}

/// Backup export envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupResponse {
    pub ok: bool,
    /// Pretty JSON `{ "tasks": [...], "skills": [...] }` on success.
    pub document: Option<String>,
    pub message: String,
}

/// Adds a pending task.
///
/// Optional inputs fall back to store defaults: empty description,
/// `Medium`, today, `daily`, no linked skill.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the created task id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(
    title: String,
    description: Option<String>,
    priority: Option<String>,
    date: Option<String>,
    kind: Option<String>,
    linked_skill: Option<String>,
) -> ActionResponse {
    let result = build_new_task(title, description, priority, date, kind, linked_skill)
        .and_then(|input| {
            with_action(|store| {
                let task = store.add_task(input);
                Ok(("Task added.".to_string(), Some(task.id.to_string())))
            })
        });
    ActionResponse::from_result(result, "task_add")
}

/// Flips a task between pending and completed.
///
/// # FFI contract
/// - A missed task is reported as unchanged, not as failure.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(task_id: String) -> ActionResponse {
    let result = parse_id(&task_id).and_then(|id| {
        with_action(|store| {
            let task = store
                .toggle_task(&id)
                .ok_or_else(|| format!("task `{id}` not found"))?;
            Ok((
                format!("Task is {}.", status_label(task.status)),
                Some(id.to_string()),
            ))
        })
    });
    ActionResponse::from_result(result, "task_toggle")
}

/// Flips a task between pending and missed.
#[flutter_rust_bridge::frb(sync)]
pub fn task_mark_missed(task_id: String) -> ActionResponse {
    let result = parse_id(&task_id).and_then(|id| {
        with_action(|store| {
            let task = store
                .mark_task_missed(&id)
                .ok_or_else(|| format!("task `{id}` not found"))?;
            Ok((
                format!("Task is {}.", status_label(task.status)),
                Some(id.to_string()),
            ))
        })
    });
    ActionResponse::from_result(result, "task_mark_missed")
}

/// Shallow-merges the provided fields into a task.
///
/// `None` leaves a field unchanged. For `linked_skill`, an empty string
/// clears the link.
#[flutter_rust_bridge::frb(sync)]
pub fn task_edit(
    task_id: String,
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    date: Option<String>,
    kind: Option<String>,
    linked_skill: Option<String>,
) -> ActionResponse {
    let result = parse_id(&task_id).and_then(|id| {
        let patch = build_task_patch(title, description, priority, date, kind, linked_skill)?;
        with_action(|store| {
            store
                .edit_task(&id, patch)
                .ok_or_else(|| format!("task `{id}` not found"))?;
            Ok(("Task updated.".to_string(), Some(id.to_string())))
        })
    });
    ActionResponse::from_result(result, "task_edit")
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(task_id: String) -> ActionResponse {
    let result = parse_id(&task_id).and_then(|id| {
        with_action(|store| {
            store
                .delete_task(&id)
                .ok_or_else(|| format!("task `{id}` not found"))?;
            Ok(("Task deleted.".to_string(), Some(id.to_string())))
        })
    });
    ActionResponse::from_result(result, "task_delete")
}

/// Lists tasks in store order, optionally restricted to one date.
///
/// # FFI contract
/// - Returns an empty list on any failure (bad date or DB error).
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list(date: Option<String>) -> Vec<TaskItem> {
    let result = parse_optional_date(date).and_then(|date| {
        with_store(|store| {
            let tasks = match date {
                Some(date) => store.tasks_by_date(date),
                None => store.tasks().to_vec(),
            };
            Ok(tasks.iter().map(to_task_item).collect())
        })
    });
    result.unwrap_or_else(|err| {
        warn!("event=tasks_list module=ffi status=error error={err}");
        Vec::new()
    })
}

/// Filtered task list for the calendar and search screens.
///
/// Scope is `date` when given, else `year` + `month`, else `year`, else
/// every task. Priority (`All|High|Medium|Low`) and a case-insensitive
/// title/description search are then applied, keeping store order.
///
/// # FFI contract
/// - Returns an empty list on any failure (bad input or DB error).
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_query(
    date: Option<String>,
    year: Option<i32>,
    month: Option<u32>,
    search: Option<String>,
    priority: Option<String>,
) -> Vec<TaskItem> {
    let result = parse_optional_date(date).and_then(|date| {
        let filter = parse_priority_filter(priority)?;
        if date.is_none() {
            validate_month(year, month)?;
        }
        with_store(|store| {
            let scoped = match (date, year, month) {
                (Some(date), _, _) => store.tasks_by_date(date),
                (None, Some(year), Some(month)) => store.tasks_by_month(year, month),
                (None, Some(year), None) => store.tasks_by_year(year),
                (None, None, _) => store.tasks().to_vec(),
            };
            let prioritized = filter_tasks_by_priority(&scoped, filter);
            let matched = filter_tasks_by_search(&prioritized, search.as_deref().unwrap_or(""));
            Ok(matched.iter().map(to_task_item).collect())
        })
    });
    result.unwrap_or_else(|err| {
        warn!("event=tasks_query module=ffi status=error error={err}");
        Vec::new()
    })
}

/// Adds a skill at the top of the priority list.
#[flutter_rust_bridge::frb(sync)]
pub fn skill_add(name: String) -> ActionResponse {
    let name = name.trim().to_string();
    if name.is_empty() {
        return ActionResponse::failure("skill_add failed: name cannot be empty");
    }
    let result = with_action(|store| {
        let skill = store.add_skill(name);
        Ok(("Skill added.".to_string(), Some(skill.id.to_string())))
    });
    ActionResponse::from_result(result, "skill_add")
}

#[flutter_rust_bridge::frb(sync)]
pub fn skill_toggle(skill_id: String) -> ActionResponse {
    let result = parse_id(&skill_id).and_then(|id| {
        with_action(|store| {
            let skill = store
                .toggle_skill(&id)
                .ok_or_else(|| format!("skill `{id}` not found"))?;
            Ok((
                format!("Skill is {}.", skill_status_label(skill.status)),
                Some(id.to_string()),
            ))
        })
    });
    ActionResponse::from_result(result, "skill_toggle")
}

#[flutter_rust_bridge::frb(sync)]
pub fn skill_mark_missed(skill_id: String) -> ActionResponse {
    let result = parse_id(&skill_id).and_then(|id| {
        with_action(|store| {
            let skill = store
                .mark_skill_missed(&id)
                .ok_or_else(|| format!("skill `{id}` not found"))?;
            Ok((
                format!("Skill is {}.", skill_status_label(skill.status)),
                Some(id.to_string()),
            ))
        })
    });
    ActionResponse::from_result(result, "skill_mark_missed")
}

#[flutter_rust_bridge::frb(sync)]
pub fn skill_delete(skill_id: String) -> ActionResponse {
    let result = parse_id(&skill_id).and_then(|id| {
        with_action(|store| {
            store
                .delete_skill(&id)
                .ok_or_else(|| format!("skill `{id}` not found"))?;
            Ok(("Skill deleted.".to_string(), Some(id.to_string())))
        })
    });
    ActionResponse::from_result(result, "skill_delete")
}

/// Moves a skill one slot `up` or `down`.
///
/// # FFI contract
/// - A move past either end succeeds with an "unchanged" message.
#[flutter_rust_bridge::frb(sync)]
pub fn skill_reorder(skill_id: String, direction: String) -> ActionResponse {
    let result = parse_id(&skill_id).and_then(|id| {
        let direction = ReorderDirection::parse(&direction)
            .ok_or_else(|| format!("unsupported direction `{direction}`; expected up|down"))?;
        with_action(|store| {
            if store.skill(&id).is_none() {
                return Err(format!("skill `{id}` not found"));
            }
            let message = if store.reorder_skill(&id, direction) {
                "Skill moved."
            } else {
                "Skill already at the edge; unchanged."
            };
            Ok((message.to_string(), Some(id.to_string())))
        })
    });
    ActionResponse::from_result(result, "skill_reorder")
}

#[flutter_rust_bridge::frb(sync)]
pub fn skills_list() -> Vec<SkillItem> {
    with_store(|store| Ok(store.skills().iter().map(to_skill_item).collect())).unwrap_or_else(
        |err| {
            warn!("event=skills_list module=ffi status=error error={err}");
            Vec::new()
        },
    )
}

/// Flips the persisted dark-mode flag; the message carries the new theme.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_toggle() -> ActionResponse {
    let result = with_action(|store| {
        let theme = if store.toggle_dark_mode() {
            "dark"
        } else {
            "light"
        };
        Ok((theme.to_string(), None))
    });
    ActionResponse::from_result(result, "theme_toggle")
}

/// Today's tallies, streak, quote and theme in one call.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard_today() -> DashboardResponse {
    let result = with_store(|store| {
        let todays = store.todays_tasks();
        let stats = store.task_stats(&todays);
        Ok(DashboardResponse {
            ok: true,
            today: format_iso_date(store.today()),
            total: to_u32(stats.total),
            completed: to_u32(stats.completed),
            missed: to_u32(stats.missed),
            percentage: stats.percentage,
            streak: store.task_streak(),
            quote: store.daily_quote().to_string(),
            dark_mode: store.dark_mode(),
            message: String::new(),
        })
    });
    result.unwrap_or_else(|err| DashboardResponse {
        ok: false,
        today: String::new(),
        total: 0,
        completed: 0,
        missed: 0,
        percentage: 0,
        streak: 0,
        quote: String::new(),
        dark_mode: false,
        message: format!("dashboard_today failed: {err}"),
    })
}

/// Per-day tallies for the trailing window ending today, oldest first.
///
/// `days` defaults to a week.
#[flutter_rust_bridge::frb(sync)]
pub fn analytics_daily(days: Option<u32>) -> Vec<DailyStatItem> {
    let days = days.unwrap_or(DEFAULT_DAILY_STATS_DAYS);
    let result = with_store(|store| {
        Ok(get_daily_stats(store.tasks(), days, store.today())
            .iter()
            .map(to_daily_stat_item)
            .collect())
    });
    result.unwrap_or_else(|err| {
        warn!("event=analytics_daily module=ffi status=error error={err}");
        Vec::new()
    })
}

/// Completion tallies for one month (`month` is 1-based) or, without a
/// month, for the whole year.
#[flutter_rust_bridge::frb(sync)]
pub fn analytics_progress(year: i32, month: Option<u32>) -> ProgressResponse {
    let result = validate_month(Some(year), month).and_then(|()| {
        with_store(|store| {
            Ok(match month {
                Some(month) => get_monthly_progress(store.tasks(), year, month),
                None => get_yearly_progress(store.tasks(), year),
            })
        })
    });
    match result {
        Ok(stats) => ProgressResponse {
            ok: true,
            total: to_u32(stats.total),
            completed: to_u32(stats.completed),
            missed: to_u32(stats.missed),
            percentage: stats.percentage,
            message: String::new(),
        },
        Err(err) => ProgressResponse {
            ok: false,
            total: 0,
            completed: 0,
            missed: 0,
            percentage: 0,
            message: format!("analytics_progress failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn analytics_overview() -> OverviewResponse {
    let result = with_store(|store| {
        let stats: TaskStats = store.overall_stats();
        let best = get_most_productive_day(store.tasks());
        let overdue = get_overdue_tasks(store.tasks(), store.today())
            .into_iter()
            .map(to_task_item)
            .collect();
        Ok(OverviewResponse {
            ok: true,
            total: to_u32(stats.total),
            completed: to_u32(stats.completed),
            missed: to_u32(stats.missed),
            percentage: stats.percentage,
            streak: store.task_streak(),
            most_productive_day: best.day.map(|day| weekday_name(day).to_string()),
            most_productive_percentage: (best.rate * 100.0).round() as u32,
            overdue,
            message: String::new(),
        })
    });
    result.unwrap_or_else(|err| OverviewResponse {
        ok: false,
        total: 0,
        completed: 0,
        missed: 0,
        percentage: 0,
        streak: 0,
        most_productive_day: None,
        most_productive_percentage: 0,
        overdue: Vec::new(),
        message: format!("analytics_overview failed: {err}"),
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn backup_export() -> BackupResponse {
    let result = with_store(|store| export_backup_inner(store).map_err(|err| err.to_string()));
    match result {
        Ok(document) => BackupResponse {
            ok: true,
            document: Some(document),
            message: "Backup exported.".to_string(),
        },
        Err(err) => BackupResponse {
            ok: false,
            document: None,
            message: format!("backup_export failed: {err}"),
        },
    }
}

/// Replaces all tasks and skills with the document's contents.
///
/// # FFI contract
/// - A malformed document fails and leaves stored state unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn backup_import(document: String) -> ActionResponse {
    let result = with_action(|store| {
        let summary = import_backup_inner(store, &document).map_err(|err| err.to_string())?;
        Ok((
            format!(
                "Imported {} task(s) and {} skill(s).",
                summary.tasks, summary.skills
            ),
            None,
        ))
    });
    ActionResponse::from_result(result, "backup_import")
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn session() -> Result<&'static Mutex<SessionStore>, String> {
    SESSION.get_or_try_init(|| {
        let db_path = resolve_db_path();
        let conn = open_db(&db_path).map_err(|err| format!("DB open failed: {err}"))?;
        let kv =
            SqliteKvStore::try_new(conn).map_err(|err| format!("store init failed: {err}"))?;
        info!(
            "event=session_open module=ffi status=ok path={}",
            db_path.display()
        );
        Ok(Mutex::new(Store::open(kv, SystemClock)))
    })
}

fn with_store<T>(f: impl FnOnce(&mut SessionStore) -> Result<T, String>) -> Result<T, String> {
    let mut store = session()?
        .lock()
        .map_err(|_| "store session is poisoned".to_string())?;
    if store.has_unsaved_changes() && !store.flush() {
        warn!("event=session_flush module=ffi status=error");
    }
    f(&mut store)
}

fn with_action(
    f: impl FnOnce(&mut SessionStore) -> Result<ActionOutcome, String>,
) -> Result<(ActionOutcome, bool), String> {
    with_store(|store| {
        let outcome = f(store)?;
        Ok((outcome, !store.has_unsaved_changes()))
    })
}

fn build_new_task(
    title: String,
    description: Option<String>,
    priority: Option<String>,
    date: Option<String>,
    kind: Option<String>,
    linked_skill: Option<String>,
) -> Result<NewTask, String> {
    let title = title.trim().to_string();
    if title.is_empty() {
        return Err("title cannot be empty".to_string());
    }

    let mut input = NewTask::titled(title);
    if let Some(description) = description {
        input = input.description(description);
    }
    if let Some(priority) = parse_optional_priority(priority)? {
        input = input.priority(priority);
    }
    if let Some(date) = parse_optional_date(date)? {
        input = input.on(date);
    }
    if let Some(kind) = parse_optional_kind(kind)? {
        input = input.kind(kind);
    }
    if let Some(skill_id) = linked_skill.filter(|raw| !raw.trim().is_empty()) {
        input = input.linked_to(parse_id(&skill_id)?);
    }
    Ok(input)
}

fn build_task_patch(
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    date: Option<String>,
    kind: Option<String>,
    linked_skill: Option<String>,
) -> Result<TaskPatch, String> {
    let title = match title.map(|raw| raw.trim().to_string()) {
        Some(title) if title.is_empty() => return Err("title cannot be empty".to_string()),
        other => other,
    };
    let linked_skill = match linked_skill {
        None => None,
        Some(raw) if raw.trim().is_empty() => Some(None),
        Some(raw) => Some(Some(parse_id(&raw)?)),
    };

    Ok(TaskPatch {
        title,
        description,
        priority: parse_optional_priority(priority)?,
        date: parse_optional_date(date)?,
        kind: parse_optional_kind(kind)?,
        linked_skill,
    })
}

fn parse_id(raw: &str) -> Result<RecordId, String> {
    RecordId::parse(raw).ok_or_else(|| format!("invalid id `{}`", raw.trim()))
}

fn parse_optional_date(raw: Option<String>) -> Result<Option<NaiveDate>, String> {
    raw.map(|value| parse_iso_date(&value).map_err(|err| err.to_string()))
        .transpose()
}

fn parse_optional_priority(raw: Option<String>) -> Result<Option<Priority>, String> {
    raw.map(|value| {
        Priority::parse(&value)
            .ok_or_else(|| format!("unsupported priority `{value}`; expected High|Medium|Low"))
    })
    .transpose()
}

fn parse_priority_filter(raw: Option<String>) -> Result<PriorityFilter, String> {
    match raw {
        None => Ok(PriorityFilter::All),
        Some(value) => PriorityFilter::parse(&value).ok_or_else(|| {
            format!("unsupported priority filter `{value}`; expected All|High|Medium|Low")
        }),
    }
}

fn validate_month(year: Option<i32>, month: Option<u32>) -> Result<(), String> {
    match (year, month) {
        (None, Some(_)) => Err("month requires a year".to_string()),
        (_, Some(month)) if !(1..=12).contains(&month) => {
            Err(format!("month `{month}` is out of range 1..=12"))
        }
        _ => Ok(()),
    }
}

fn parse_optional_kind(raw: Option<String>) -> Result<Option<TaskKind>, String> {
    raw.map(|value| {
        TaskKind::parse(&value)
            .ok_or_else(|| format!("unsupported kind `{value}`; expected daily|monthly|yearly"))
    })
    .transpose()
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        priority: task.priority.as_str().to_string(),
        date: format_iso_date(task.date),
        status: status_label(task.status).to_string(),
        kind: task.kind.as_str().to_string(),
        linked_skill: task.linked_skill.as_ref().map(RecordId::to_string),
    }
}

fn to_daily_stat_item(day: &DailyStat) -> DailyStatItem {
    DailyStatItem {
        date: format_iso_date(day.date),
        label: day.label.clone(),
        completed: to_u32(day.completed),
        missed: to_u32(day.missed),
        total: to_u32(day.total),
    }
}

fn to_skill_item(skill: &Skill) -> SkillItem {
    SkillItem {
        id: skill.id.to_string(),
        name: skill.name.clone(),
        status: skill_status_label(skill.status).to_string(),
    }
}

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::Completed => "completed",
        TaskStatus::Missed => "missed",
    }
}

fn skill_status_label(status: SkillStatus) -> &'static str {
    match status {
        SkillStatus::Active => "active",
        SkillStatus::Completed => "completed",
        SkillStatus::Missed => "missed",
    }
}

fn to_u32(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
