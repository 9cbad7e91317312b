use chrono::NaiveDate;
use goalplanner_core::{
    FixedClock, MemoryKvStore, RecordId, ReorderDirection, Skill, SkillStatus, Store,
    StoreConfig,
};

fn empty_store(kv: &MemoryKvStore) -> Store<&MemoryKvStore> {
    let config = StoreConfig {
        seed_on_first_run: false,
        ..StoreConfig::default()
    };
    let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    Store::with_config(kv, FixedClock(today), config)
}

fn names(store: &Store<&MemoryKvStore>) -> Vec<String> {
    store.skills().iter().map(|skill| skill.name.clone()).collect()
}

fn stored_skills(kv: &MemoryKvStore) -> Vec<Skill> {
    serde_json::from_slice(&kv.raw("goal-planner:skills").unwrap()).unwrap()
}

#[test]
fn new_skills_prepend_and_reorder_up_swaps_with_predecessor() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);

    let guitar = store.add_skill("Guitar");
    store.add_skill("Piano");
    assert_eq!(names(&store), vec!["Piano", "Guitar"]);
    assert_eq!(guitar.status, SkillStatus::Active);

    assert!(store.reorder_skill(&guitar.id, ReorderDirection::Up));
    assert_eq!(names(&store), vec!["Guitar", "Piano"]);
    assert_eq!(stored_skills(&kv), store.skills());
}

#[test]
fn reorder_at_boundaries_and_unknown_ids_is_noop() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    let last = store.add_skill("C");
    store.add_skill("B");
    let first = store.add_skill("A");
    let writes_before = kv.write_count();

    assert!(!store.reorder_skill(&first.id, ReorderDirection::Up));
    assert!(!store.reorder_skill(&last.id, ReorderDirection::Down));
    assert!(!store.reorder_skill(&RecordId::generate(), ReorderDirection::Up));

    assert_eq!(names(&store), vec!["A", "B", "C"]);
    assert_eq!(kv.write_count(), writes_before);
}

#[test]
fn reorder_down_moves_towards_the_end_and_keeps_length() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    store.add_skill("C");
    store.add_skill("B");
    let a = store.add_skill("A");

    assert!(store.reorder_skill(&a.id, ReorderDirection::Down));
    assert_eq!(names(&store), vec!["B", "A", "C"]);
    assert!(store.reorder_skill(&a.id, ReorderDirection::Down));
    assert_eq!(names(&store), vec!["B", "C", "A"]);
    assert_eq!(store.skills().len(), 3);
}

#[test]
fn single_skill_cannot_move() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    let only = store.add_skill("Solo");

    assert!(!store.reorder_skill(&only.id, ReorderDirection::Up));
    assert!(!store.reorder_skill(&only.id, ReorderDirection::Down));
}

#[test]
fn toggle_and_mark_missed_follow_active_pivot() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    let id = store.add_skill("Rust").id;

    assert_eq!(store.toggle_skill(&id).unwrap().status, SkillStatus::Completed);
    assert_eq!(
        store.mark_skill_missed(&id).unwrap().status,
        SkillStatus::Completed
    );
    assert_eq!(store.toggle_skill(&id).unwrap().status, SkillStatus::Active);
    assert_eq!(store.mark_skill_missed(&id).unwrap().status, SkillStatus::Missed);
    assert_eq!(store.mark_skill_missed(&id).unwrap().status, SkillStatus::Active);
    assert_eq!(stored_skills(&kv)[0].status, SkillStatus::Active);

    assert!(store.toggle_skill(&RecordId::generate()).is_none());
    assert!(store.mark_skill_missed(&RecordId::generate()).is_none());
}

#[test]
fn delete_skill_removes_and_persists() {
    let kv = MemoryKvStore::new();
    let mut store = empty_store(&kv);
    let keep = store.add_skill("Keep");
    let gone = store.add_skill("Gone");

    assert_eq!(store.delete_skill(&gone.id), Some(gone.clone()));
    assert!(store.delete_skill(&gone.id).is_none());
    assert_eq!(store.skills(), &[keep.clone()]);
    assert_eq!(stored_skills(&kv), vec![keep]);
}

#[test]
fn first_run_seeds_react_and_spanish() {
    let kv = MemoryKvStore::new();
    let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    let store = Store::open(&kv, FixedClock(today));

    assert_eq!(names(&store), vec!["React", "Spanish"]);
    assert!(store
        .skills()
        .iter()
        .all(|skill| skill.status == SkillStatus::Active));
    assert_eq!(stored_skills(&kv), store.skills());
}
