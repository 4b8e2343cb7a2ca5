use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Blocked,
}

impl TaskStatus {
    /// Canonical board column order.
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Blocked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Blocked => "Blocked",
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, TaskStatus::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" | "todo" => Ok(TaskStatus::Pending),
            "in-progress" | "in_progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            "blocked" => Ok(TaskStatus::Blocked),
            other => Err(anyhow!(
                "Unknown status '{}': expected pending|in-progress|completed|blocked",
                other
            )),
        }
    }
}

impl ValueEnum for TaskStatus {
    fn value_variants<'a>() -> &'a [Self] {
        &Self::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Critical => "critical",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" | "med" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "critical" => Ok(TaskPriority::Critical),
            other => Err(anyhow!(
                "Unknown priority '{}': expected low|medium|high|critical",
                other
            )),
        }
    }
}

impl ValueEnum for TaskPriority {
    fn value_variants<'a>() -> &'a [Self] {
        &Self::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Created,
    Due,
    Priority,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Created => "created",
            SortField::Due => "due",
            SortField::Priority => "priority",
        }
    }
}

impl FromStr for SortField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "created" | "created_at" | "created-at" => Ok(SortField::Created),
            "due" | "due_date" | "due-date" => Ok(SortField::Due),
            "priority" => Ok(SortField::Priority),
            other => Err(anyhow!(
                "Unknown sort field '{}': expected created|due|priority",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Oldest / lowest first. Conversational and sequential displays.
    Ascending,
    /// Newest / highest first. "Recent first" displays.
    #[default]
    Descending,
}

/// A unit of work as supplied by the task store. The core only reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "due_date_serde"
    )]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// The assignee id, treating a blank reference the same as no reference.
    pub fn assignee(&self) -> Option<&str> {
        self.assigned_agent
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn is_assigned(&self) -> bool {
        self.assignee().is_some()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status.is_open() && self.due_date.is_some_and(|due| due < today)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub agent_type: String,
}

impl Agent {
    /// Case-insensitive substring match of a mention token against name or type.
    pub fn matches_mention(&self, token: &str) -> bool {
        let needle = token.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.name.to_lowercase().contains(&needle)
            || self.agent_type.to_lowercase().contains(&needle)
    }
}

/// Parse a due date given either as `YYYY-MM-DD` or as an RFC 3339 timestamp.
/// Timestamps keep the calendar day of their own offset; time of day is dropped.
pub fn parse_due_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(stamp.date_naive());
    }
    Err(anyhow!(
        "Unrecognized date '{}': expected YYYY-MM-DD or an RFC 3339 timestamp",
        value
    ))
}

mod due_date_serde {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => super::parse_due_date(value)
                .map(Some)
                .map_err(de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn task(status: TaskStatus, due: Option<NaiveDate>) -> Task {
        Task {
            id: "t-1".into(),
            title: "Index repository".into(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            assigned_agent: None,
            category: None,
            due_date: due,
            created_at: Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        assert_eq!("done".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert!("archived".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn priority_orders_low_to_critical() {
        assert!(TaskPriority::Low < TaskPriority::Medium);
        assert!(TaskPriority::High < TaskPriority::Critical);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn deserializes_dashboard_json() {
        let raw = r#"{
            "id": "task-7",
            "title": "Review embeddings",
            "status": "in-progress",
            "priority": "high",
            "assignedAgent": "agent-2",
            "dueDate": "2024-03-05T17:30:00Z",
            "createdAt": "2024-03-01T08:00:00Z"
        }"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.assignee(), Some("agent-2"));
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert!(task.description.is_none());

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], "2024-03-05");
        assert_eq!(json["status"], "in-progress");
    }

    #[test]
    fn rejects_unparseable_due_date() {
        let raw = r#"{"id":"x","title":"t","status":"pending","priority":"low",
            "dueDate":"someday","createdAt":"2024-03-01T08:00:00Z"}"#;
        assert!(serde_json::from_str::<Task>(raw).is_err());
    }

    #[test]
    fn blank_assignee_counts_as_unassigned() {
        let mut t = task(TaskStatus::Pending, None);
        t.assigned_agent = Some("  ".into());
        assert!(!t.is_assigned());
    }

    #[test]
    fn completed_tasks_are_never_overdue() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let past = NaiveDate::from_ymd_opt(2024, 1, 14);
        assert!(task(TaskStatus::Blocked, past).is_overdue(today));
        assert!(!task(TaskStatus::Completed, past).is_overdue(today));
        assert!(!task(TaskStatus::Pending, Some(today)).is_overdue(today));
    }

    #[test]
    fn agent_mentions_match_name_or_type() {
        let agent = Agent {
            id: "agent-1".into(),
            name: "Atlas".into(),
            agent_type: "Backend".into(),
        };
        assert!(agent.matches_mention("back"));
        assert!(agent.matches_mention("ATL"));
        assert!(!agent.matches_mention("frontend"));
        assert!(!agent.matches_mention(""));
    }
}
