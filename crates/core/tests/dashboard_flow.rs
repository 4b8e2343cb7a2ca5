use agentdeck_core::{filter, parser, views};
use agentdeck_core::{
    Agent, DeckError, FilterCriteria, FilterPresets, Task, TaskPriority, TaskStatus,
};
use chrono::{NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;

fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dom).unwrap()
}

fn agents() -> Vec<Agent> {
    vec![
        Agent {
            id: "agent-ops".into(),
            name: "Sentinel".into(),
            agent_type: "ops".into(),
        },
        Agent {
            id: "agent-api".into(),
            name: "Atlas".into(),
            agent_type: "backend".into(),
        },
    ]
}

fn store(today: NaiveDate) -> Vec<Task> {
    let agents = agents();
    let lines = [
        "Fix login bug @backend high priority tomorrow",
        "Restart workers for sentinel urgent",
        "Write release notes",
        "Archive old logs whenever next week",
        "Audit secrets @ghost",
    ];
    let created = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
    let mut tasks: Vec<Task> = lines
        .iter()
        .map(|line| {
            parser::parse_quick_task(line, &agents, today)
                .unwrap()
                .into_task(created)
        })
        .collect();
    tasks[1].status = TaskStatus::InProgress;
    tasks[2].status = TaskStatus::Completed;
    tasks[2].due_date = Some(day(2024, 1, 2));
    tasks[4].due_date = Some(day(2024, 1, 5));
    tasks
}

#[test]
fn quick_added_tasks_flow_through_filters_and_views() {
    let today = day(2024, 1, 15);
    let tasks = store(today);

    assert_eq!(tasks[0].title, "Fix login bug");
    assert_eq!(tasks[1].assigned_agent.as_deref(), Some("agent-ops"));
    assert_eq!(tasks[1].priority, TaskPriority::Critical);
    assert_eq!(tasks[3].due_date, Some(day(2024, 1, 22)));
    assert_eq!(tasks[4].assigned_agent, None);
    assert_eq!(tasks[4].title, "Audit secrets");

    let overdue = filter::apply(&tasks, &FilterCriteria::new().with_overdue_only(true), today);
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].title, "Audit secrets");

    let board = views::to_board(&tasks);
    assert_eq!(board.total(), tasks.len());
    assert_eq!(board.column(TaskStatus::Pending).len(), 3);

    let index = views::to_month_index(&tasks);
    let dated = tasks.iter().filter(|t| t.due_date.is_some()).count();
    assert_eq!(index.values().map(Vec::len).sum::<usize>(), dated);
}

#[test]
fn presets_drive_the_filter_engine() {
    let today = day(2024, 1, 15);
    let tasks = store(today);
    let mut presets = FilterPresets::new();

    let high = presets.find("High priority").unwrap().apply();
    let result = filter::apply(&tasks, &high, today);
    assert_eq!(result.len(), 2);

    let saved = presets
        .save(
            "Ops queue",
            FilterCriteria::new().with_agents(["agent-ops"]),
        )
        .unwrap();
    let ops = filter::apply(&tasks, &saved.apply(), today);
    assert_eq!(ops.len(), 1);

    assert_eq!(
        presets.delete("builtin-all"),
        Err(DeckError::ProtectedPreset("builtin-all".into()))
    );
}

#[test]
fn filtering_twice_changes_nothing_and_widening_never_shrinks() {
    let today = day(2024, 1, 15);
    let tasks = store(today);

    let mut criteria = FilterCriteria::new();
    let mut previous = 0;
    for status in TaskStatus::ALL {
        criteria = criteria.toggle_status(status);
        let once = filter::apply(&tasks, &criteria, today);
        assert_eq!(filter::apply(&once, &criteria, today), once);
        assert!(once.len() >= previous);
        previous = once.len();
    }
    assert_eq!(previous, tasks.len());
}
