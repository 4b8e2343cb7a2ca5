use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::core::parser::{ParserOptions, WeekdayPolicy};
use crate::core::{parse_due_date, FilterCriteria, FilterPresets, SortDirection, SortField};
use crate::model::{TaskPriority, TaskStatus};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "agentdeck",
    version,
    about = "Filter, group and quick-add tasks for an AI agent operations dashboard.",
    after_help = "Examples:\n  agentdeck list --status pending,in-progress --priority high\n  agentdeck board --agent agent-api\n  agentdeck calendar --month 2024-02\n  agentdeck parse Fix login bug @backend high priority tomorrow"
)]
pub struct Cli {
    /// Snapshot file holding `tasks` and `agents` arrays (defaults to the platform data dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub snapshot: Option<PathBuf>,

    /// Evaluate overdue checks and relative dates against this day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", global = true)]
    pub today: Option<String>,

    /// Override the tracing filter (e.g. "debug" or "agentdeck_core=trace")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// List tasks matching the filters
    List(ListArgs),
    /// Group filtered tasks into status columns
    Board(BoardArgs),
    /// Show filtered tasks by due day for one month
    Calendar(CalendarArgs),
    /// Preview how a quick-add line is understood
    Parse(ParseArgs),
    /// Show the available filter presets
    Presets,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Start from a preset (id or name); other flags refine it
    #[arg(long, value_name = "PRESET")]
    pub preset: Option<String>,

    /// Case-insensitive text to find in titles and descriptions
    #[arg(long)]
    pub search: Option<String>,

    /// Keep tasks with these statuses (comma-separated or repeated flag)
    #[arg(long, value_enum, value_delimiter = ',', action = ArgAction::Append)]
    pub status: Vec<TaskStatus>,

    /// Keep tasks with these priorities (comma-separated or repeated flag)
    #[arg(long, value_enum, value_delimiter = ',', action = ArgAction::Append)]
    pub priority: Vec<TaskPriority>,

    /// Keep tasks assigned to these agent ids (comma-separated or repeated flag)
    #[arg(long, value_delimiter = ',', action = ArgAction::Append)]
    pub agent: Vec<String>,

    /// Earliest due date to keep (YYYY-MM-DD)
    #[arg(long = "from", value_name = "DATE")]
    pub from: Option<String>,

    /// Latest due date to keep (YYYY-MM-DD)
    #[arg(long = "to", value_name = "DATE")]
    pub to: Option<String>,

    /// Only open tasks whose due date has passed
    #[arg(long)]
    pub overdue: bool,

    /// Only tasks without an assigned agent
    #[arg(long)]
    pub unassigned: bool,
}

impl FilterArgs {
    pub fn to_criteria(&self, presets: &FilterPresets) -> Result<FilterCriteria> {
        let mut criteria = match &self.preset {
            Some(key) => presets
                .find(key)
                .map(|preset| preset.apply())
                .ok_or_else(|| anyhow!("Unknown preset '{}'", key))?,
            None => FilterCriteria::new(),
        };

        if let Some(search) = &self.search {
            criteria = criteria.with_search(search.clone());
        }
        if !self.status.is_empty() {
            criteria = criteria.with_statuses(self.status.iter().copied());
        }
        if !self.priority.is_empty() {
            criteria = criteria.with_priorities(self.priority.iter().copied());
        }
        if !self.agent.is_empty() {
            criteria = criteria.with_agents(self.agent.iter().cloned());
        }
        if self.from.is_some() || self.to.is_some() {
            let start = self.from.as_deref().map(parse_due_date).transpose()?;
            let end = self.to.as_deref().map(parse_due_date).transpose()?;
            criteria = criteria.with_date_range(start, end);
        }
        if self.overdue {
            criteria = criteria.with_overdue_only(true);
        }
        if self.unassigned {
            criteria = criteria.with_unassigned_only(true);
        }

        Ok(criteria)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Sort by created|due|priority (input order when omitted)
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<String>,

    /// Sort in descending order
    #[arg(long)]
    pub reverse: bool,

    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn sort_order(&self) -> Result<Option<(SortField, SortDirection)>> {
        let Some(field) = &self.sort else {
            return Ok(None);
        };
        let direction = if self.reverse {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Ok(Some((field.parse::<SortField>()?, direction)))
    }
}

#[derive(Args, Debug, Clone)]
pub struct BoardArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Column order (comma-separated); omitted statuses follow
    #[arg(long, value_enum, value_delimiter = ',')]
    pub columns: Vec<TaskStatus>,
}

#[derive(Args, Debug, Clone)]
pub struct CalendarArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Month to show as YYYY-MM (defaults to the current month)
    #[arg(long, value_name = "YYYY-MM")]
    pub month: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Quick-add text, e.g. "Fix login bug @backend high priority tomorrow"
    #[arg(value_name = "TEXT", required = true)]
    pub text: Vec<String>,

    /// Resolve weekday names to their next occurrence instead of ignoring them
    #[arg(long)]
    pub weekdays: bool,

    /// Emit JSON instead of labelled lines
    #[arg(long)]
    pub json: bool,
}

impl ParseArgs {
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            weekdays: if self.weekdays {
                WeekdayPolicy::NextOccurrence
            } else {
                WeekdayPolicy::Ignore
            },
        }
    }
}
