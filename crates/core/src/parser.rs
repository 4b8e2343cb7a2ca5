use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use ulid::Ulid;

use crate::error::{DeckError, DeckResult};
use crate::model::{Agent, Task, TaskPriority, TaskStatus};

/// Priority keyword buckets in precedence order. The first bucket with a
/// whole-word hit decides the priority and only its keywords are consumed.
pub const PRIORITY_KEYWORDS: [(TaskPriority, &[&str]); 4] = [
    (
        TaskPriority::Critical,
        &["urgent", "critical", "asap", "emergency"],
    ),
    (TaskPriority::High, &["high", "important", "priority"]),
    (TaskPriority::Medium, &["medium", "normal"]),
    (TaskPriority::Low, &["low", "whenever", "later"]),
];

pub const WEEKDAY_NAMES: [(&str, Weekday); 7] = [
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
    ("sunday", Weekday::Sun),
];

static PRIORITY_PATTERNS: Lazy<Vec<(TaskPriority, Regex)>> = Lazy::new(|| {
    PRIORITY_KEYWORDS
        .iter()
        .map(|(priority, words)| {
            let pattern = format!(r"(?i)\b(?:{})\b", words.join("|"));
            (*priority, Regex::new(&pattern).expect("valid regex"))
        })
        .collect()
});

/// Mention forms in precedence order: `@token`, `assign to token`, `for token`.
static MENTION_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)(?:^|\s)@([\w-]+)").expect("valid regex"),
        Regex::new(r"(?i)\bassign(?:ed)?\s+to\s+@?([\w-]+)").expect("valid regex"),
        Regex::new(r"(?i)\bfor\s+@?([\w-]+)").expect("valid regex"),
    ]
});

static TOMORROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:for\s+)?tomorrow\b").expect("valid regex"));
static NEXT_WEEK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:for\s+)?next\s+week\b").expect("valid regex"));
static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    let names: Vec<&str> = WEEKDAY_NAMES.iter().map(|(name, _)| *name).collect();
    Regex::new(&format!(r"(?i)\b(?:for\s+)?({})\b", names.join("|"))).expect("valid regex")
});

/// What to do with a weekday name found in quick-add text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeekdayPolicy {
    /// Consume the word without setting a due date.
    #[default]
    Ignore,
    /// Resolve to the next occurrence of that weekday, never today.
    NextOccurrence,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    pub weekdays: WeekdayPolicy,
}

/// Draft produced from one quick-add line. Becomes a [`Task`] once the store accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuickTask {
    pub title: String,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl ParsedQuickTask {
    pub fn into_task(self, created_at: DateTime<Utc>) -> Task {
        Task {
            id: Ulid::new().to_string(),
            title: self.title,
            description: None,
            status: TaskStatus::Pending,
            priority: self.priority,
            assigned_agent: self.assigned_agent,
            category: None,
            due_date: self.due_date,
            created_at,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QuickTaskParser<'a> {
    agents: &'a [Agent],
    options: ParserOptions,
}

impl<'a> QuickTaskParser<'a> {
    pub fn new(agents: &'a [Agent]) -> Self {
        Self {
            agents,
            options: ParserOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Extract priority, assignee and due date from `input`, in that order,
    /// each step working on what the previous one left behind. Only a blank
    /// leftover title is an error.
    pub fn parse(&self, input: &str, today: NaiveDate) -> DeckResult<ParsedQuickTask> {
        let mut remainder = input.to_string();
        let priority = extract_priority(&mut remainder);
        let assigned_agent = self.extract_assignee(&mut remainder);
        let due_date = self.extract_due_date(&mut remainder, today);

        let title = clean_title(&remainder);
        if title.is_empty() {
            tracing::debug!(input, "quick task rejected: nothing left for a title");
            return Err(DeckError::Validation(
                "Task title cannot be empty after parsing keywords".to_string(),
            ));
        }

        tracing::debug!(
            title = title.as_str(),
            priority = priority.as_str(),
            assigned = assigned_agent.as_deref().unwrap_or("-"),
            due = ?due_date,
            "quick task parsed"
        );

        Ok(ParsedQuickTask {
            title,
            priority,
            assigned_agent,
            due_date,
        })
    }

    fn extract_assignee(&self, remainder: &mut String) -> Option<String> {
        for pattern in MENTION_PATTERNS.iter() {
            // Date phrases are left for the date step ("for tomorrow").
            let Some((span, token)) = pattern
                .captures_iter(remainder.as_str())
                .filter_map(|captures| Some((captures.get(0)?, captures.get(1)?)))
                .find(|(_, token)| !is_date_word(token.as_str()))
                .map(|(whole, token)| (whole.range(), token.as_str().to_string()))
            else {
                continue;
            };
            let resolved = self
                .agents
                .iter()
                .find(|agent| agent.matches_mention(&token))
                .map(|agent| agent.id.clone());
            if resolved.is_none() {
                tracing::debug!(token = token.as_str(), "mention did not resolve to a known agent");
            }
            remainder.replace_range(span, " ");
            return resolved;
        }
        None
    }

    fn extract_due_date(&self, remainder: &mut String, today: NaiveDate) -> Option<NaiveDate> {
        if consume(&TOMORROW_RE, remainder) {
            return today.checked_add_days(Days::new(1));
        }
        if consume(&NEXT_WEEK_RE, remainder) {
            return today.checked_add_days(Days::new(7));
        }

        let weekday = WEEKDAY_RE
            .captures(remainder.as_str())
            .and_then(|captures| captures.get(1))
            .and_then(|m| weekday_from_name(m.as_str()))?;
        consume(&WEEKDAY_RE, remainder);
        match self.options.weekdays {
            WeekdayPolicy::Ignore => None,
            WeekdayPolicy::NextOccurrence => next_occurrence(today, weekday),
        }
    }
}

pub fn parse_quick_task(
    input: &str,
    agents: &[Agent],
    today: NaiveDate,
) -> DeckResult<ParsedQuickTask> {
    QuickTaskParser::new(agents).parse(input, today)
}

fn extract_priority(remainder: &mut String) -> TaskPriority {
    for (priority, pattern) in PRIORITY_PATTERNS.iter() {
        if consume(pattern, remainder) {
            return *priority;
        }
    }
    TaskPriority::default()
}

/// Remove every match of `pattern`; reports whether anything matched.
fn consume(pattern: &Regex, remainder: &mut String) -> bool {
    if !pattern.is_match(remainder) {
        return false;
    }
    let stripped = pattern.replace_all(remainder.as_str(), " ").into_owned();
    *remainder = stripped;
    true
}

fn is_date_word(token: &str) -> bool {
    token.eq_ignore_ascii_case("tomorrow")
        || token.eq_ignore_ascii_case("next")
        || weekday_from_name(token).is_some()
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let lower = name.to_ascii_lowercase();
    WEEKDAY_NAMES
        .iter()
        .find(|(label, _)| *label == lower)
        .map(|(_, weekday)| *weekday)
}

/// `None` when the date would fall past the calendar's range.
fn next_occurrence(today: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let mut days_ahead = (weekday.num_days_from_monday() + 7
        - today.weekday().num_days_from_monday())
        % 7;
    if days_ahead == 0 {
        days_ahead = 7;
    }
    today.checked_add_days(Days::new(u64::from(days_ahead)))
}

fn clean_title(remainder: &str) -> String {
    let collapsed = remainder.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-'))
        .to_string()
}
