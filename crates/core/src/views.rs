//! Read-only regroupings of a (usually already filtered) task collection
//! for the list, board and calendar views.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::filter::sort_tasks;
use crate::model::{SortDirection, SortField, Task, TaskStatus};

/// Flat list view. Input order is kept unless a sort is requested.
pub fn to_list(tasks: &[Task], sort: Option<(SortField, SortDirection)>) -> Vec<Task> {
    match sort {
        Some((field, direction)) => sort_tasks(tasks, field, direction),
        None => tasks.to_vec(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardColumn {
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub columns: Vec<BoardColumn>,
}

impl Board {
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        self.columns
            .iter()
            .find(|column| column.status == status)
            .map(|column| column.tasks.as_slice())
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(|column| column.tasks.len()).sum()
    }

    pub fn into_map(self) -> BTreeMap<TaskStatus, Vec<Task>> {
        self.columns
            .into_iter()
            .map(|column| (column.status, column.tasks))
            .collect()
    }
}

/// Board view in the canonical column order.
pub fn to_board(tasks: &[Task]) -> Board {
    to_board_in_order(tasks, &TaskStatus::ALL)
}

/// Board view with caller-chosen column order. Repeated statuses are
/// collapsed and any status the caller left out is appended, so each task
/// still lands in exactly one column.
pub fn to_board_in_order(tasks: &[Task], order: &[TaskStatus]) -> Board {
    let mut statuses: Vec<TaskStatus> = Vec::with_capacity(TaskStatus::ALL.len());
    for status in order.iter().chain(TaskStatus::ALL.iter()) {
        if !statuses.contains(status) {
            statuses.push(*status);
        }
    }

    let columns = statuses
        .into_iter()
        .map(|status| BoardColumn {
            status,
            tasks: tasks
                .iter()
                .filter(|task| task.status == status)
                .cloned()
                .collect(),
        })
        .collect();

    Board { columns }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
}

impl CalendarDay {
    pub fn label(&self) -> String {
        day_label(self.date)
    }
}

/// `Mon Jan 15 2024`, the shape of a JavaScript `Date#toDateString`.
pub fn day_label(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Tasks due on `date`, in input order.
pub fn to_calendar_day(tasks: &[Task], date: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.due_date == Some(date))
        .cloned()
        .collect()
}

/// Every due day present in `tasks`, keyed by calendar day. Undated tasks are left out.
pub fn to_month_index(tasks: &[Task]) -> BTreeMap<NaiveDate, Vec<Task>> {
    let mut index: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(due) = task.due_date {
            index.entry(due).or_default().push(task.clone());
        }
    }
    index
}

/// One bucket per requested day, in the caller's order, empty days included.
pub fn to_calendar(tasks: &[Task], days: &[NaiveDate]) -> Vec<CalendarDay> {
    let index = to_month_index(tasks);
    days.iter()
        .map(|date| CalendarDay {
            date: *date,
            tasks: index.get(date).cloned().unwrap_or_default(),
        })
        .collect()
}

/// All days of `month` in `year`; empty when the month is out of range.
pub fn month_days(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|day| day.month() == first.month())
        .collect()
}
