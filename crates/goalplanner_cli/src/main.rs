//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `goalplanner_core` linkage.
//! - With a database path argument, print today's dashboard from that DB.
//!   The DB must already exist and is never seeded.

use goalplanner_core::analytics::{get_daily_stats, get_most_productive_day};
use goalplanner_core::date::weekday_name;
use goalplanner_core::db::open_existing_db;
use goalplanner_core::store::quote_for;
use goalplanner_core::{
    Clock, SqliteKvStore, Store, StoreConfig, SystemClock, DEFAULT_DAILY_STATS_DAYS,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("goalplanner_core ping={}", goalplanner_core::ping());
    println!("goalplanner_core version={}", goalplanner_core::core_version());
    println!("quote={}", quote_for(SystemClock.today()));

    let Some(db_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match print_dashboard(&db_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("goalplanner_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_dashboard(db_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_existing_db(db_path)?;
    let kv = SqliteKvStore::try_new(&conn)?;
    let config = StoreConfig {
        seed_on_first_run: false,
        ..StoreConfig::default()
    };
    let store = Store::with_config(kv, SystemClock, config);

    let todays = store.todays_tasks();
    let stats = store.task_stats(&todays);
    println!("today={}", store.today());
    println!(
        "tasks total={} completed={} missed={} pending={} percentage={}",
        stats.total,
        stats.completed,
        stats.missed,
        stats.pending(),
        stats.percentage
    );
    println!("streak={}", store.task_streak());
    for day in get_daily_stats(store.tasks(), DEFAULT_DAILY_STATS_DAYS, store.today()) {
        println!(
            "day {} completed={} missed={} total={}",
            day.label, day.completed, day.missed, day.total
        );
    }
    let best = get_most_productive_day(store.tasks());
    println!(
        "most_productive_day={}",
        best.day.map_or("none", weekday_name)
    );
    println!("skills={}", store.skills().len());
    Ok(())
}
