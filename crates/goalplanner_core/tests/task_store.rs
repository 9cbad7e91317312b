use chrono::NaiveDate;
use goalplanner_core::analytics::calculate_task_stats;
use goalplanner_core::{
    FixedClock, MemoryKvStore, NewTask, Priority, RecordId, Store, StoreConfig, Task, TaskKind,
    TaskPatch, TaskStats, TaskStatus,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn clock() -> FixedClock {
    FixedClock(ymd(2025, 6, 10))
}

fn empty_store(kv: &MemoryKvStore) -> Store<&MemoryKvStore> {
    let config = StoreConfig {
        seed_on_first_run: false,
        ..StoreConfig::default()
    };
    Store::with_config(kv, clock(), config)
}

fn stored_tasks(kv: &MemoryKvStore) -> Vec<Task> {
    serde_json::from_slice(&kv.raw("goal-planner:tasks").unwrap()).unwrap()
}

#[test]
fn first_run_seeds_two_tasks_for_today_and_persists_them() {
    let kv = MemoryKvStore::new();
    let store = Store::open(&kv, clock());

    let titles: Vec<_> = store.tasks().iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["Morning run", "Read 20 pages"]);
    assert!(store.tasks().iter().all(|task| task.date == ymd(2025, 6, 10)));
    assert_eq!(store.skills().len(), 2);
    assert!(!store.dark_mode());
    assert_eq!(stored_tasks(&kv), store.tasks());
}

#[test]
fn stored_state_wins_over_seeds() {
    let kv = MemoryKvStore::new();
    {
        let mut store = empty_store(&kv);
        store.add_task(NewTask::titled("Only task"));
    }

    let reopened = Store::open(&kv, clock());
    assert_eq!(reopened.tasks().len(), 1);
    assert_eq!(reopened.tasks()[0].title, "Only task");
}

#[test]
fn corrupt_tasks_record_falls_back_to_seed() {
    let kv = MemoryKvStore::new();
    kv.insert_raw("goal-planner:tasks", "[oops");

    let store = Store::open(&kv, clock());
    assert_eq!(store.tasks().len(), 2);
    assert_eq!(store.tasks()[0].title, "Morning run");
    assert_eq!(kv.raw("goal-planner:tasks").as_deref(), Some(&b"[oops"[..]));
}

#[test]
fn unreadable_records_are_not_overwritten_by_seeds() {
    let kv = MemoryKvStore::new();
    let mut original = empty_store(&kv);
    original.add_task(NewTask::titled("Mine"));
    original.add_task(NewTask::titled("Also mine"));
    original.add_skill("Cello");
    let saved_tasks = original.tasks().to_vec();
    let writes_before = kv.write_count();

    kv.fail_reads(true);
    let degraded = Store::open(&kv, clock());
    kv.fail_reads(false);

    assert_eq!(degraded.tasks()[0].title, "Morning run");
    assert_eq!(degraded.skills()[0].name, "React");
    assert!(!degraded.has_unsaved_changes());
    assert_eq!(kv.write_count(), writes_before);
    assert_eq!(stored_tasks(&kv), saved_tasks);

    let reopened = Store::open(&kv, clock());
    assert_eq!(reopened.tasks(), saved_tasks.as_slice());
    assert_eq!(reopened.skills()[0].name, "Cello");
}

#[test]
fn add_task_prepends_with_defaults_and_persists() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);

    let first = store.add_task(NewTask::titled("First"));
    let second = store.add_task(
        NewTask::titled("Second")
            .priority(Priority::Low)
            .on(ymd(2025, 7, 1))
            .kind(TaskKind::Monthly),
    );

    assert_eq!(first.status, TaskStatus::Pending);
    assert_eq!(first.priority, Priority::Medium);
    assert_eq!(first.description, "");
    assert_eq!(first.date, ymd(2025, 6, 10));
    assert_eq!(first.kind, TaskKind::Daily);
    assert_eq!(first.linked_skill, None);
    assert_ne!(first.id, second.id);

    assert_eq!(store.tasks()[0], second);
    assert_eq!(store.tasks()[1], first);
    assert_eq!(stored_tasks(&kv), store.tasks());
}

#[test]
fn add_then_toggle_yields_full_completion() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);

    let task = store.add_task(
        NewTask::titled("Run")
            .on(ymd(2025, 6, 1))
            .priority(Priority::High),
    );
    let toggled = store.toggle_task(&task.id).cloned().unwrap();

    assert_eq!(
        calculate_task_stats([&toggled]),
        TaskStats {
            total: 1,
            completed: 1,
            missed: 0,
            percentage: 100,
        }
    );
}

#[test]
fn toggle_twice_restores_pending_and_completed() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    let id = store.add_task(NewTask::titled("Stretch")).id;

    store.toggle_task(&id);
    assert_eq!(store.task(&id).unwrap().status, TaskStatus::Completed);
    store.toggle_task(&id);
    assert_eq!(store.task(&id).unwrap().status, TaskStatus::Pending);

    store.toggle_task(&id);
    store.toggle_task(&id);
    store.toggle_task(&id);
    assert_eq!(store.task(&id).unwrap().status, TaskStatus::Completed);
    assert_eq!(stored_tasks(&kv)[0].status, TaskStatus::Completed);
}

#[test]
fn toggle_and_mark_missed_never_cross_between_completed_and_missed() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    let id = store.add_task(NewTask::titled("Journal")).id;

    store.mark_task_missed(&id);
    assert_eq!(store.task(&id).unwrap().status, TaskStatus::Missed);

    let writes_before = kv.write_count();
    assert_eq!(store.toggle_task(&id).unwrap().status, TaskStatus::Missed);
    assert_eq!(kv.write_count(), writes_before);

    store.mark_task_missed(&id);
    assert_eq!(store.task(&id).unwrap().status, TaskStatus::Pending);

    store.toggle_task(&id);
    assert_eq!(
        store.mark_task_missed(&id).unwrap().status,
        TaskStatus::Completed
    );
}

#[test]
fn unknown_ids_are_silent_noops() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    store.add_task(NewTask::titled("Keep"));
    let before = store.tasks().to_vec();
    let writes_before = kv.write_count();
    let unknown = RecordId::generate();

    assert!(store.toggle_task(&unknown).is_none());
    assert!(store.mark_task_missed(&unknown).is_none());
    let rename = TaskPatch {
        title: Some("x".to_string()),
        ..TaskPatch::default()
    };
    assert!(store.edit_task(&unknown, rename).is_none());
    assert!(store.delete_task(&unknown).is_none());

    assert_eq!(store.tasks(), before.as_slice());
    assert_eq!(kv.write_count(), writes_before);
}

#[test]
fn edit_task_merges_only_given_fields() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    let skill = store.add_skill("Writing");
    let original = store.add_task(
        NewTask::titled("Draft")
            .description("chapter one")
            .linked_to(skill.id.clone()),
    );
    store.toggle_task(&original.id);

    let edited = store
        .edit_task(
            &original.id,
            TaskPatch {
                title: Some("Draft v2".to_string()),
                priority: Some(Priority::High),
                ..TaskPatch::default()
            },
        )
        .cloned()
        .unwrap();

    assert_eq!(edited.id, original.id);
    assert_eq!(edited.title, "Draft v2");
    assert_eq!(edited.priority, Priority::High);
    assert_eq!(edited.description, "chapter one");
    assert_eq!(edited.status, TaskStatus::Completed);
    assert_eq!(edited.linked_skill, Some(skill.id));

    let unlinked = store
        .edit_task(
            &original.id,
            TaskPatch {
                linked_skill: Some(None),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    assert_eq!(unlinked.linked_skill, None);
    assert_eq!(stored_tasks(&kv)[0].linked_skill, None);
}

#[test]
fn delete_task_removes_permanently() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    let keep = store.add_task(NewTask::titled("Keep"));
    let removed = store.add_task(NewTask::titled("Drop"));

    assert_eq!(store.delete_task(&removed.id), Some(removed.clone()));
    assert_eq!(store.tasks(), &[keep]);
    assert!(stored_tasks(&kv).iter().all(|task| task.id != removed.id));
    assert!(store.delete_task(&removed.id).is_none());
}

#[test]
fn deleting_a_linked_skill_leaves_task_reference_dangling() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    let skill = store.add_skill("Chess");
    let task = store.add_task(NewTask::titled("Puzzles").linked_to(skill.id.clone()));

    store.delete_skill(&skill.id);
    assert_eq!(store.task(&task.id).unwrap().linked_skill, Some(skill.id));
}

#[test]
fn date_views_filter_by_day_month_and_year() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    store.add_task(NewTask::titled("today").on(ymd(2025, 6, 10)));
    store.add_task(NewTask::titled("later in june").on(ymd(2025, 6, 28)));
    store.add_task(NewTask::titled("july").on(ymd(2025, 7, 1)));
    store.add_task(NewTask::titled("next year").on(ymd(2026, 6, 10)));

    let titles = |tasks: Vec<Task>| -> Vec<String> {
        tasks.into_iter().map(|task| task.title).collect()
    };

    assert_eq!(titles(store.todays_tasks()), vec!["today"]);
    assert_eq!(
        titles(store.tasks_by_date(ymd(2025, 7, 1))),
        vec!["july"]
    );
    assert_eq!(
        titles(store.tasks_by_month(2025, 6)),
        vec!["later in june", "today"]
    );
    assert_eq!(titles(store.tasks_by_year(2025)).len(), 3);
    assert!(store.tasks_by_month(2025, 13).is_empty());
}

#[test]
fn streak_and_stats_use_store_clock() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    for day in [10, 9, 8] {
        let id = store.add_task(NewTask::titled("daily").on(ymd(2025, 6, day))).id;
        store.toggle_task(&id);
    }
    store.add_task(NewTask::titled("open").on(ymd(2025, 6, 1)));

    assert_eq!(store.task_streak(), 3);
    let stats = store.overall_stats();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.completed, 3);
    assert_eq!(stats.percentage, 75);
    assert_eq!(store.task_stats(&store.todays_tasks()).percentage, 100);
}

#[test]
fn daily_quote_follows_day_of_month() {
    let kv = MemoryKvStore::new();
    let store = empty_store(&kv);
    assert_eq!(
        store.daily_quote(),
        goalplanner_core::store::DAILY_QUOTES[0]
    );
}

#[test]
fn failed_writes_keep_in_memory_state_authoritative() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    kv.fail_writes(true);

    let task = store.add_task(NewTask::titled("Offline"));
    store.toggle_task(&task.id);

    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].status, TaskStatus::Completed);
    assert!(kv.raw("goal-planner:tasks").is_none());
}

#[test]
fn dropped_saves_stay_unsaved_until_flush_succeeds() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    assert!(!store.has_unsaved_changes());

    kv.fail_writes(true);
    let task = store.add_task(NewTask::titled("Queued"));
    store.toggle_dark_mode();
    assert!(store.has_unsaved_changes());
    assert!(!store.flush());

    kv.fail_writes(false);
    assert!(store.flush());
    assert!(!store.has_unsaved_changes());
    assert_eq!(stored_tasks(&kv), vec![task]);
    assert_eq!(kv.raw("goal-planner:theme").as_deref(), Some(&b"true"[..]));

    let writes_before = kv.write_count();
    assert!(store.flush());
    assert_eq!(kv.write_count(), writes_before);
}

#[test]
fn dark_mode_toggles_and_persists() {
    let kv = MemoryKvStore::new();
    {
        let mut store = empty_store(&kv);
        assert!(store.toggle_dark_mode());
    }
    let mut reopened = empty_store(&kv);
    assert!(reopened.dark_mode());
    assert!(!reopened.toggle_dark_mode());
    assert_eq!(kv.raw("goal-planner:theme").as_deref(), Some(&b"false"[..]));
}
