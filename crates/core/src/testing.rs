use chrono::{NaiveDate, TimeZone, Utc};

use crate::model::{Agent, Task, TaskPriority, TaskStatus};

pub(crate) fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dom).expect("valid date")
}

pub(crate) fn task(id: &str, title: &str) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        status: TaskStatus::Pending,
        priority: TaskPriority::Medium,
        assigned_agent: None,
        category: None,
        due_date: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
    }
}

pub(crate) fn agents() -> Vec<Agent> {
    vec![
        Agent {
            id: "agent-ui".into(),
            name: "Iris".into(),
            agent_type: "frontend".into(),
        },
        Agent {
            id: "agent-api".into(),
            name: "Atlas".into(),
            agent_type: "backend".into(),
        },
        Agent {
            id: "agent-docs".into(),
            name: "Quill".into(),
            agent_type: "writer".into(),
        },
    ]
}
