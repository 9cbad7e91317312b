//! Domain store owning the task and skill collections.
//!
//! # Responsibility
//! - Hold the canonical `tasks`, `skills` and theme flag for a session.
//! - Expose the only sanctioned mutations and persist after each one.
//! - Serve derived read views as copies or pure computations.
//!
//! # Invariants
//! - Callers never receive a mutable reference into a live collection.
//! - Every state-changing mutation saves the affected record before it
//!   returns; unknown ids are no-ops and write nothing.
//! - Ids minted by the store are unique within their collection.
//! - Persistence failures never escape; in-memory state stays authoritative
//!   and a record whose save was dropped stays unsaved until `flush`.
//! - Seeds are written only when a record is absent, never over a record
//!   that exists but could not be read.

use crate::analytics::{calculate_task_stats, calculate_task_streak, TaskStats};
use crate::date::{in_month, Clock};
use crate::model::id::RecordId;
use crate::model::skill::{ReorderDirection, Skill, SkillId};
use crate::model::task::{NewTask, Priority, Task, TaskId, TaskKind, TaskPatch};
use crate::persistence::{Loaded, Persistence, PersistenceKeys, DEFAULT_NAMESPACE};
use crate::storage::KvStore;
use chrono::{Datelike, NaiveDate};
use log::{debug, info, warn};

/// Fixed quote rotation, indexed by day of month.
pub const DAILY_QUOTES: [&str; 10] = [
    "Success is the sum of small efforts repeated day in and day out.",
    "Don't watch the clock; do what it does. Keep going.",
    "The only way to do great work is to love what you do.",
    "Believe you can and you're halfway there.",
    "It always seems impossible until it's done.",
    "You don't have to be great to start, but you have to start to be great.",
    "Great things never come from comfort zones.",
    "Dream it. Wish it. Do it.",
    "Success doesn't just find you. You have to go out and get it.",
    "The harder you work for something, the greater you'll feel when you achieve it.",
];

/// Store construction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Prefix of the persisted record keys.
    pub namespace: String,
    /// Seed example tasks/skills when nothing is stored yet.
    pub seed_on_first_run: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            seed_on_first_run: true,
        }
    }
}

/// Returns the quote shown on `date`.
pub fn quote_for(date: NaiveDate) -> &'static str {
    DAILY_QUOTES[date.day() as usize % DAILY_QUOTES.len()]
}

/// First-run example tasks, both scheduled for `today`.
pub fn seed_tasks(today: NaiveDate) -> Vec<Task> {
    let run = NewTask::titled("Morning run")
        .description("30 minutes")
        .priority(Priority::High)
        .kind(TaskKind::Daily);
    let read = NewTask::titled("Read 20 pages")
        .description("Skill: Reading")
        .priority(Priority::Medium)
        .kind(TaskKind::Daily);

    let first = Task::from_new(RecordId::generate(), run, today);
    let mut second_id = RecordId::generate();
    while second_id == first.id {
        second_id = RecordId::generate();
    }
    let second = Task::from_new(second_id, read, today);
    vec![first, second]
}

/// First-run example skills.
pub fn seed_skills() -> Vec<Skill> {
    let react = Skill::new(RecordId::generate(), "React");
    let mut spanish_id = RecordId::generate();
    while spanish_id == react.id {
        spanish_id = RecordId::generate();
    }
    vec![react, Skill::new(spanish_id, "Spanish")]
}

/// Session-scoped owner of tasks, skills and the theme flag.
pub struct Store<S: KvStore> {
    persistence: Persistence<S>,
    clock: Box<dyn Clock + Send>,
    tasks: Vec<Task>,
    skills: Vec<Skill>,
    dark_mode: bool,
    unsaved: Unsaved,
}

/// Records whose last save was dropped.
#[derive(Debug, Clone, Copy, Default)]
struct Unsaved {
    tasks: bool,
    skills: bool,
    theme: bool,
}

impl<S: KvStore> Store<S> {
    /// Loads state from `kv` using the default config.
    pub fn open(kv: S, clock: impl Clock + Send + 'static) -> Self {
        Self::with_config(kv, clock, StoreConfig::default())
    }

    /// Loads state from `kv`.
    ///
    /// An absent record is replaced by seed data (or an empty collection
    /// when seeding is off) and the seed is saved. A record that exists
    /// but cannot be read gets the same in-memory fallback, but nothing is
    /// written until the next mutation of that collection.
    pub fn with_config(kv: S, clock: impl Clock + Send + 'static, config: StoreConfig) -> Self {
        let persistence =
            Persistence::with_keys(kv, PersistenceKeys::for_namespace(&config.namespace));
        let today = clock.today();

        let tasks = match persistence.read_tasks() {
            Loaded::Found(tasks) => tasks,
            Loaded::Absent if config.seed_on_first_run => {
                let seeded = seed_tasks(today);
                persistence.save_tasks(&seeded);
                info!(
                    "event=store_seed module=store status=ok record=tasks count={}",
                    seeded.len()
                );
                seeded
            }
            Loaded::Absent => Vec::new(),
            Loaded::Unreadable => {
                warn!("event=store_seed module=store status=degraded record=tasks reason=unreadable");
                fallback(config.seed_on_first_run, || seed_tasks(today))
            }
        };

        let skills = match persistence.read_skills() {
            Loaded::Found(skills) => skills,
            Loaded::Absent if config.seed_on_first_run => {
                let seeded = seed_skills();
                persistence.save_skills(&seeded);
                info!(
                    "event=store_seed module=store status=ok record=skills count={}",
                    seeded.len()
                );
                seeded
            }
            Loaded::Absent => Vec::new(),
            Loaded::Unreadable => {
                warn!("event=store_seed module=store status=degraded record=skills reason=unreadable");
                fallback(config.seed_on_first_run, seed_skills)
            }
        };

        let dark_mode = persistence.load_theme().unwrap_or(false);

        info!(
            "event=store_open module=store status=ok namespace={} tasks={} skills={} dark_mode={}",
            config.namespace.trim(),
            tasks.len(),
            skills.len(),
            dark_mode
        );

        Self {
            persistence,
            clock: Box::new(clock),
            tasks,
            skills,
            dark_mode,
            unsaved: Unsaved::default(),
        }
    }

    /// Read-only view of all tasks, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == *id)
    }

    pub fn skill(&self, id: &SkillId) -> Option<&Skill> {
        self.skills.iter().find(|skill| skill.id == *id)
    }

    /// Whether any record's last save was dropped.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved.tasks || self.unsaved.skills || self.unsaved.theme
    }

    /// Retries every record whose last save was dropped.
    ///
    /// Returns `true` when nothing is left unsaved.
    pub fn flush(&mut self) -> bool {
        if self.unsaved.tasks {
            self.persist_tasks();
        }
        if self.unsaved.skills {
            self.persist_skills();
        }
        if self.unsaved.theme {
            self.persist_theme();
        }
        let clean = !self.has_unsaved_changes();
        debug!("event=store_flush module=store status={}", if clean { "ok" } else { "error" });
        clean
    }

    /// Prepends a new pending task and returns a copy of it.
    pub fn add_task(&mut self, input: NewTask) -> Task {
        let id = self.fresh_task_id();
        let task = Task::from_new(id.clone(), input, self.clock.today());
        self.tasks.insert(0, task.clone());
        self.persist_tasks();
        info!("event=task_add module=store status=ok task_id={id}");
        task
    }

    /// Flips `pending <-> completed`. Missed tasks and unknown ids are
    /// left untouched.
    pub fn toggle_task(&mut self, id: &TaskId) -> Option<&Task> {
        self.update_task(id, "task_toggle", Task::toggle_completed)
    }

    /// Flips `pending <-> missed`. Completed tasks and unknown ids are
    /// left untouched.
    pub fn mark_task_missed(&mut self, id: &TaskId) -> Option<&Task> {
        self.update_task(id, "task_mark_missed", Task::toggle_missed)
    }

    /// Shallow-merges `patch` into the task.
    pub fn edit_task(&mut self, id: &TaskId, patch: TaskPatch) -> Option<&Task> {
        let changes = !patch.is_empty();
        self.update_task(id, "task_edit", move |task| {
            task.apply_patch(patch);
            changes
        })
    }

    /// Removes the task permanently and returns it.
    pub fn delete_task(&mut self, id: &TaskId) -> Option<Task> {
        let Some(index) = self.tasks.iter().position(|task| task.id == *id) else {
            debug!("event=task_delete module=store status=noop task_id={id}");
            return None;
        };
        let removed = self.tasks.remove(index);
        self.persist_tasks();
        info!("event=task_delete module=store status=ok task_id={id}");
        Some(removed)
    }

    /// Prepends a new active skill (highest priority) and returns a copy.
    pub fn add_skill(&mut self, name: impl Into<String>) -> Skill {
        let id = self.fresh_skill_id();
        let skill = Skill::new(id.clone(), name);
        self.skills.insert(0, skill.clone());
        self.persist_skills();
        info!("event=skill_add module=store status=ok skill_id={id}");
        skill
    }

    pub fn toggle_skill(&mut self, id: &SkillId) -> Option<&Skill> {
        self.update_skill(id, "skill_toggle", Skill::toggle_completed)
    }

    pub fn mark_skill_missed(&mut self, id: &SkillId) -> Option<&Skill> {
        self.update_skill(id, "skill_mark_missed", Skill::toggle_missed)
    }

    pub fn delete_skill(&mut self, id: &SkillId) -> Option<Skill> {
        let Some(index) = self.skills.iter().position(|skill| skill.id == *id) else {
            debug!("event=skill_delete module=store status=noop skill_id={id}");
            return None;
        };
        let removed = self.skills.remove(index);
        self.persist_skills();
        info!("event=skill_delete module=store status=ok skill_id={id}");
        Some(removed)
    }

    /// Swaps the skill with its neighbor in `direction`.
    ///
    /// Returns `false` for unknown ids and for moves past either end.
    pub fn reorder_skill(&mut self, id: &SkillId, direction: ReorderDirection) -> bool {
        let Some(index) = self.skills.iter().position(|skill| skill.id == *id) else {
            debug!("event=skill_reorder module=store status=noop reason=not_found skill_id={id}");
            return false;
        };

        let target = match direction {
            ReorderDirection::Up => index.checked_sub(1),
            ReorderDirection::Down => Some(index + 1).filter(|next| *next < self.skills.len()),
        };
        let Some(target) = target else {
            debug!("event=skill_reorder module=store status=noop reason=boundary skill_id={id}");
            return false;
        };

        self.skills.swap(index, target);
        self.persist_skills();
        info!(
            "event=skill_reorder module=store status=ok skill_id={id} from={index} to={target}"
        );
        true
    }

    /// Flips the theme flag and returns the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.persist_theme();
        info!(
            "event=theme_toggle module=store status=ok dark_mode={}",
            self.dark_mode
        );
        self.dark_mode
    }

    /// Replaces both collections wholesale and persists them.
    pub fn replace_all(&mut self, tasks: Vec<Task>, skills: Vec<Skill>) {
        self.tasks = tasks;
        self.skills = skills;
        self.persist_tasks();
        self.persist_skills();
        info!(
            "event=store_replace module=store status=ok tasks={} skills={}",
            self.tasks.len(),
            self.skills.len()
        );
    }

    pub fn todays_tasks(&self) -> Vec<Task> {
        self.tasks_by_date(self.clock.today())
    }

    pub fn tasks_by_date(&self, date: NaiveDate) -> Vec<Task> {
        self.collect_tasks(|task| task.date == date)
    }

    /// `month` is 1-based.
    pub fn tasks_by_month(&self, year: i32, month: u32) -> Vec<Task> {
        self.collect_tasks(|task| in_month(task.date, year, month))
    }

    pub fn tasks_by_year(&self, year: i32) -> Vec<Task> {
        self.collect_tasks(|task| task.date.year() == year)
    }

    pub fn daily_quote(&self) -> &'static str {
        quote_for(self.clock.today())
    }

    pub fn task_stats(&self, subset: &[Task]) -> TaskStats {
        calculate_task_stats(subset)
    }

    /// Stats over the full task collection.
    pub fn overall_stats(&self) -> TaskStats {
        calculate_task_stats(&self.tasks)
    }

    pub fn task_streak(&self) -> u32 {
        calculate_task_streak(&self.tasks, self.clock.today())
    }

    fn update_task(
        &mut self,
        id: &TaskId,
        event: &str,
        apply: impl FnOnce(&mut Task) -> bool,
    ) -> Option<&Task> {
        let Some(index) = self.tasks.iter().position(|task| task.id == *id) else {
            debug!("event={event} module=store status=noop reason=not_found task_id={id}");
            return None;
        };

        if apply(&mut self.tasks[index]) {
            self.persist_tasks();
            info!("event={event} module=store status=ok task_id={id}");
        } else {
            debug!("event={event} module=store status=noop reason=unchanged task_id={id}");
        }
        self.tasks.get(index)
    }

    fn update_skill(
        &mut self,
        id: &SkillId,
        event: &str,
        apply: impl FnOnce(&mut Skill) -> bool,
    ) -> Option<&Skill> {
        let Some(index) = self.skills.iter().position(|skill| skill.id == *id) else {
            debug!("event={event} module=store status=noop reason=not_found skill_id={id}");
            return None;
        };

        if apply(&mut self.skills[index]) {
            self.persist_skills();
            info!("event={event} module=store status=ok skill_id={id}");
        } else {
            debug!("event={event} module=store status=noop reason=unchanged skill_id={id}");
        }
        self.skills.get(index)
    }

    fn collect_tasks(&self, keep: impl Fn(&Task) -> bool) -> Vec<Task> {
        self.tasks.iter().filter(|task| keep(*task)).cloned().collect()
    }

    fn persist_tasks(&mut self) {
        self.unsaved.tasks = !self.persistence.save_tasks(&self.tasks);
    }

    fn persist_skills(&mut self) {
        self.unsaved.skills = !self.persistence.save_skills(&self.skills);
    }

    fn persist_theme(&mut self) {
        self.unsaved.theme = !self.persistence.save_theme(self.dark_mode);
    }

    fn fresh_task_id(&self) -> TaskId {
        loop {
            let id = RecordId::generate();
            if self.task(&id).is_none() {
                return id;
            }
        }
    }

    fn fresh_skill_id(&self) -> SkillId {
        loop {
            let id = RecordId::generate();
            if self.skill(&id).is_none() {
                return id;
            }
        }
    }
}

fn fallback<T>(seed_on_first_run: bool, seed: impl FnOnce() -> Vec<T>) -> Vec<T> {
    if seed_on_first_run {
        seed()
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{quote_for, seed_skills, seed_tasks, DAILY_QUOTES};
    use crate::model::task::{Priority, TaskStatus};
    use chrono::NaiveDate;

    #[test]
    fn quote_is_indexed_by_day_of_month() {
        let first = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let eleventh = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
        let tenth = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();

        assert_eq!(quote_for(first), DAILY_QUOTES[1]);
        assert_eq!(quote_for(eleventh), DAILY_QUOTES[1]);
        assert_eq!(quote_for(tenth), DAILY_QUOTES[0]);
    }

    #[test]
    fn seeds_are_deterministic_apart_from_ids() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let tasks = seed_tasks(today);

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "Morning run");
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[1].title, "Read 20 pages");
        assert!(tasks
            .iter()
            .all(|task| task.date == today && task.status == TaskStatus::Pending));
        assert_ne!(tasks[0].id, tasks[1].id);

        let names: Vec<_> = seed_skills().into_iter().map(|skill| skill.name).collect();
        assert_eq!(names, vec!["React", "Spanish"]);
    }
}
