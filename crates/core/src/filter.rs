//! Multi-criteria task filtering.
//!
//! Each dimension of [`FilterCriteria`] is evaluated on its own and the
//! results are combined with AND. An empty set or unset bound places no
//! constraint on its dimension. Evaluation is a pure function of the task
//! slice, the criteria and the evaluation day, so callers may memoize on
//! those inputs.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{SortDirection, SortField, Task, TaskPriority, TaskStatus};

/// Inclusive due-date window. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// `start > end`; such a range admits nothing.
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Immutable snapshot of the user's filter selections.
///
/// Builder methods consume the value and hand back an updated copy, so a UI
/// holding the previous snapshot never observes a change underneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub search: String,
    pub status: BTreeSet<TaskStatus>,
    pub priority: BTreeSet<TaskPriority>,
    pub assigned_agent: BTreeSet<String>,
    pub date_range: DateRange,
    pub overdue_only: bool,
    pub unassigned_only: bool,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.status = statuses.into_iter().collect();
        self
    }

    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = TaskPriority>) -> Self {
        self.priority = priorities.into_iter().collect();
        self
    }

    pub fn with_agents<S: Into<String>>(mut self, agents: impl IntoIterator<Item = S>) -> Self {
        self.assigned_agent = agents
            .into_iter()
            .filter_map(|id| {
                let id: String = id.into();
                let trimmed = id.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .collect();
        self
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.date_range = DateRange::new(start, end);
        self
    }

    pub fn with_overdue_only(mut self, enabled: bool) -> Self {
        self.overdue_only = enabled;
        self
    }

    pub fn with_unassigned_only(mut self, enabled: bool) -> Self {
        self.unassigned_only = enabled;
        self
    }

    pub fn toggle_status(mut self, status: TaskStatus) -> Self {
        if !self.status.remove(&status) {
            self.status.insert(status);
        }
        self
    }

    pub fn toggle_priority(mut self, priority: TaskPriority) -> Self {
        if !self.priority.remove(&priority) {
            self.priority.insert(priority);
        }
        self
    }

    pub fn toggle_agent(mut self, agent_id: &str) -> Self {
        if !self.assigned_agent.remove(agent_id) {
            self.assigned_agent.insert(agent_id.to_string());
        }
        self
    }

    /// Number of dimensions currently constraining the result.
    pub fn active_count(&self) -> usize {
        [
            !self.search.trim().is_empty(),
            !self.status.is_empty(),
            !self.priority.is_empty(),
            !self.assigned_agent.is_empty(),
            self.date_range.is_bounded(),
            self.overdue_only,
            self.unassigned_only,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    pub fn summary(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut parts = Vec::new();
        let search = self.search.trim();
        if !search.is_empty() {
            parts.push(format!("search:\"{search}\""));
        }

        if !self.status.is_empty() {
            let joined = self
                .status
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("status:{joined}"));
        }

        if !self.priority.is_empty() {
            let joined = self
                .priority
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("priority:{joined}"));
        }

        if !self.assigned_agent.is_empty() {
            let joined = self
                .assigned_agent
                .iter()
                .map(|a| format!("@{a}"))
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("agent:{joined}"));
        }

        if self.date_range.is_bounded() {
            let start = self
                .date_range
                .start
                .map(|d| d.to_string())
                .unwrap_or_default();
            let end = self
                .date_range
                .end
                .map(|d| d.to_string())
                .unwrap_or_default();
            parts.push(format!("due:{start}..{end}"));
        }

        if self.overdue_only {
            parts.push("overdue".to_string());
        }
        if self.unassigned_only {
            parts.push("unassigned".to_string());
        }

        Some(parts.join(" | "))
    }
}

/// Return the tasks satisfying every active constraint, in input order.
///
/// `today` is the evaluation-time calendar day used by the overdue check.
pub fn apply(tasks: &[Task], criteria: &FilterCriteria, today: NaiveDate) -> Vec<Task> {
    let needle = criteria.search.trim().to_lowercase();
    tasks
        .iter()
        .filter(|task| matches_with_needle(task, criteria, &needle, today))
        .cloned()
        .collect()
}

pub fn matches(task: &Task, criteria: &FilterCriteria, today: NaiveDate) -> bool {
    let needle = criteria.search.trim().to_lowercase();
    matches_with_needle(task, criteria, &needle, today)
}

fn matches_with_needle(
    task: &Task,
    criteria: &FilterCriteria,
    needle: &str,
    today: NaiveDate,
) -> bool {
    matches_search(task, needle)
        && (criteria.status.is_empty() || criteria.status.contains(&task.status))
        && (criteria.priority.is_empty() || criteria.priority.contains(&task.priority))
        && matches_assignee(task, &criteria.assigned_agent)
        && matches_date_range(task, criteria)
        && (!criteria.overdue_only || task.is_overdue(today))
        && (!criteria.unassigned_only || !task.is_assigned())
}

fn matches_search(task: &Task, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    task.title.to_lowercase().contains(needle)
        || task
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(needle))
}

fn matches_assignee(task: &Task, agents: &BTreeSet<String>) -> bool {
    if agents.is_empty() {
        return true;
    }
    task.assignee().is_some_and(|id| agents.contains(id))
}

fn matches_date_range(task: &Task, criteria: &FilterCriteria) -> bool {
    let range = &criteria.date_range;
    if !range.is_bounded() {
        return true;
    }
    if range.is_inverted() {
        return false;
    }
    match task.due_date {
        Some(due) => range.contains(due),
        // Undated tasks only survive a bounded range when another flag drives the query.
        None => criteria.overdue_only || criteria.unassigned_only,
    }
}

/// Stable sort; tasks comparing equal keep their relative input order.
/// Undated tasks trail dated ones for [`SortField::Due`] in either direction.
pub fn sort_tasks(tasks: &[Task], field: SortField, direction: SortDirection) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| compare(a, b, field, direction));
    sorted
}

pub fn sort_by_created(tasks: &[Task], direction: SortDirection) -> Vec<Task> {
    sort_tasks(tasks, SortField::Created, direction)
}

fn compare(a: &Task, b: &Task, field: SortField, direction: SortDirection) -> Ordering {
    match field {
        SortField::Created => directed(a.created_at.cmp(&b.created_at), direction),
        SortField::Priority => directed(a.priority.cmp(&b.priority), direction),
        SortField::Due => match (a.due_date, b.due_date) {
            (Some(left), Some(right)) => directed(left.cmp(&right), direction),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Values present in a task collection, for populating filter pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterFacets {
    pub assignees: Vec<String>,
    pub categories: Vec<String>,
    pub status_counts: BTreeMap<TaskStatus, usize>,
    pub unassigned: usize,
}

impl FilterFacets {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut assignees = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut status_counts: BTreeMap<TaskStatus, usize> =
            TaskStatus::ALL.iter().map(|status| (*status, 0)).collect();
        let mut unassigned = 0;

        for task in tasks {
            match task.assignee() {
                Some(id) => {
                    assignees.insert(id.to_string());
                }
                None => unassigned += 1,
            }
            if let Some(category) = task.category.as_ref().filter(|c| !c.trim().is_empty()) {
                categories.insert(category.trim().to_string());
            }
            *status_counts.entry(task.status).or_default() += 1;
        }

        Self {
            assignees: assignees.into_iter().collect(),
            categories: categories.into_iter().collect(),
            status_counts,
            unassigned,
        }
    }

    /// Keep selected assignees pickable even when no visible task carries them.
    pub fn ensure_selected(&mut self, criteria: &FilterCriteria) {
        let mut changed = false;
        for agent in &criteria.assigned_agent {
            if !self.assignees.contains(agent) {
                self.assignees.push(agent.clone());
                changed = true;
            }
        }
        if changed {
            self.assignees.sort();
        }
    }
}
