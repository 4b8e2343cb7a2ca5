use std::fmt;
use std::io::Write;

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, NaiveDate};

use crate::cli::{BoardArgs, CalendarArgs, CliCommand, FilterArgs, ListArgs, ParseArgs};
use crate::config::AppConfig;
use crate::core::{filter, views, FilterCriteria, FilterPresets, QuickTaskParser};
use crate::model::Task;
use crate::snapshot::Snapshot;

pub fn execute<W: Write>(config: &AppConfig, command: CliCommand, mut writer: W) -> Result<()> {
    let presets = FilterPresets::new();
    match command {
        CliCommand::List(args) => handle_list(config, &presets, &args, &mut writer),
        CliCommand::Board(args) => handle_board(config, &presets, &args, &mut writer),
        CliCommand::Calendar(args) => handle_calendar(config, &presets, &args, &mut writer),
        CliCommand::Parse(args) => handle_parse(config, &args, &mut writer),
        CliCommand::Presets => handle_presets(&presets, &mut writer),
    }
}

struct Filtered {
    snapshot: Snapshot,
    tasks: Vec<Task>,
    criteria: FilterCriteria,
}

fn load_filtered(
    config: &AppConfig,
    presets: &FilterPresets,
    args: &FilterArgs,
) -> Result<Filtered> {
    let snapshot = Snapshot::load(config.snapshot_path())?;
    let criteria = args.to_criteria(presets)?;
    let tasks = filter::apply(&snapshot.tasks, &criteria, config.today());
    tracing::debug!(
        matched = tasks.len(),
        total = snapshot.tasks.len(),
        active = criteria.active_count(),
        "filters applied"
    );
    Ok(Filtered {
        snapshot,
        tasks,
        criteria,
    })
}

fn handle_list<W: Write>(
    config: &AppConfig,
    presets: &FilterPresets,
    args: &ListArgs,
    mut writer: W,
) -> Result<()> {
    let Filtered {
        snapshot,
        tasks,
        criteria,
    } = load_filtered(config, presets, &args.filters)?;
    let tasks = views::to_list(&tasks, args.sort_order()?);

    if args.json {
        serde_json::to_writer_pretty(&mut writer, &tasks)?;
        writeln!(writer)?;
        return Ok(());
    }

    for task in &tasks {
        writeln!(writer, "{}", TaskLine::new(task, &snapshot))?;
    }
    writeln!(
        writer,
        "{}",
        SummaryLine::matched(tasks.len(), snapshot.tasks.len())
    )?;
    if let Some(summary) = criteria.summary() {
        writeln!(writer, "Filters: {summary}")?;
    }
    Ok(())
}

fn handle_board<W: Write>(
    config: &AppConfig,
    presets: &FilterPresets,
    args: &BoardArgs,
    mut writer: W,
) -> Result<()> {
    let filtered = load_filtered(config, presets, &args.filters)?;
    let board = views::to_board_in_order(&filtered.tasks, &args.columns);

    for column in &board.columns {
        writeln!(writer, "{} ({})", column.status.label(), column.tasks.len())?;
        for task in &column.tasks {
            writeln!(
                writer,
                "  - {} [{}]{}",
                task.title,
                task.priority.as_str(),
                assignee_suffix(task, &filtered.snapshot)
            )?;
        }
    }
    Ok(())
}

fn handle_calendar<W: Write>(
    config: &AppConfig,
    presets: &FilterPresets,
    args: &CalendarArgs,
    mut writer: W,
) -> Result<()> {
    let (year, month) = match &args.month {
        Some(raw) => parse_month(raw)?,
        None => (config.today().year(), config.today().month()),
    };
    let days = views::month_days(year, month);
    let Some(first) = days.first().copied() else {
        return Err(anyhow!("Invalid month {}-{:02}", year, month));
    };

    let filtered = load_filtered(config, presets, &args.filters)?;
    let calendar = views::to_calendar(&filtered.tasks, &days);

    writeln!(writer, "{}", first.format("%B %Y"))?;
    let mut shown = 0usize;
    for day in calendar.iter().filter(|day| !day.tasks.is_empty()) {
        writeln!(writer, "{}", day.label())?;
        for task in &day.tasks {
            writeln!(
                writer,
                "  - {} [{}]{}",
                task.title,
                task.status.as_str(),
                assignee_suffix(task, &filtered.snapshot)
            )?;
            shown += 1;
        }
    }
    if shown == 0 {
        writeln!(writer, "No tasks due this month")?;
    }
    Ok(())
}

fn handle_parse<W: Write>(config: &AppConfig, args: &ParseArgs, mut writer: W) -> Result<()> {
    let snapshot = Snapshot::load_or_empty(config.snapshot_path())?;
    let parser = QuickTaskParser::new(&snapshot.agents).with_options(args.parser_options());
    let text = args.text.join(" ");
    let parsed = parser.parse(&text, config.today())?;

    if args.json {
        serde_json::to_writer_pretty(&mut writer, &parsed)?;
        writeln!(writer)?;
        return Ok(());
    }

    writeln!(writer, "Title: {}", parsed.title)?;
    writeln!(writer, "Priority: {}", parsed.priority)?;
    match parsed.assigned_agent.as_deref() {
        Some(id) => writeln!(
            writer,
            "Assignee: {} ({})",
            snapshot.agent_name(id).unwrap_or(id),
            id
        )?,
        None => writeln!(writer, "Assignee: unassigned")?,
    }
    match parsed.due_date {
        Some(due) => writeln!(writer, "Due: {} ({})", due, views::day_label(due))?,
        None => writeln!(writer, "Due: none")?,
    }
    Ok(())
}

fn handle_presets<W: Write>(presets: &FilterPresets, mut writer: W) -> Result<()> {
    for preset in presets.list() {
        let summary = preset
            .criteria
            .summary()
            .unwrap_or_else(|| "no filters".to_string());
        let kind = if preset.is_default { "built-in" } else { "saved" };
        writeln!(
            writer,
            "{:<22}  {:<14}  {:<9}  {}",
            preset.id, preset.name, kind, summary
        )?;
    }
    Ok(())
}

fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let (year, month) = raw
        .trim()
        .split_once('-')
        .ok_or_else(|| anyhow!("Invalid month '{}': expected YYYY-MM", raw))?;
    let year = year
        .parse::<i32>()
        .with_context(|| format!("Invalid year in '{}'", raw))?;
    let month = month
        .parse::<u32>()
        .with_context(|| format!("Invalid month in '{}'", raw))?;
    Ok((year, month))
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(6) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

fn assignee_suffix(task: &Task, snapshot: &Snapshot) -> String {
    match task.assignee() {
        Some(id) => format!(" @{}", snapshot.agent_name(id).unwrap_or(id)),
        None => String::new(),
    }
}

struct TaskLine<'a> {
    task: &'a Task,
    assignee: &'a str,
}

impl<'a> TaskLine<'a> {
    fn new(task: &'a Task, snapshot: &'a Snapshot) -> Self {
        let assignee = task
            .assignee()
            .map(|id| snapshot.agent_name(id).unwrap_or(id))
            .unwrap_or("-");
        Self { task, assignee }
    }
}

impl fmt::Display for TaskLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let due = self
            .task
            .due_date
            .map(|d: NaiveDate| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{:<6}  {:<11}  {:<8}  {:<10}  {:<10}  {}",
            short_id(&self.task.id),
            self.task.status.as_str(),
            self.task.priority.as_str(),
            due,
            self.assignee,
            self.task.title
        )
    }
}

enum SummaryLine {
    Matched { shown: usize, total: usize },
    NoneMatched(usize),
}

impl SummaryLine {
    fn matched(shown: usize, total: usize) -> Self {
        if shown > 0 {
            SummaryLine::Matched { shown, total }
        } else {
            SummaryLine::NoneMatched(total)
        }
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryLine::Matched { shown, total } => write!(
                f,
                "Showing {} of {} task{}",
                shown,
                total,
                if *total == 1 { "" } else { "s" }
            ),
            SummaryLine::NoneMatched(total) => write!(f, "No tasks match ({} total)", total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"{
        "agents": [
            {"id": "agent-api", "name": "Atlas", "type": "backend"},
            {"id": "agent-ui", "name": "Iris", "type": "frontend"}
        ],
        "tasks": [
            {"id": "t1", "title": "Fix login bug", "status": "in-progress", "priority": "high",
             "assignedAgent": "agent-api", "dueDate": "2024-01-10", "createdAt": "2024-01-02T09:00:00Z"},
            {"id": "t2", "title": "Write release notes", "status": "completed", "priority": "low",
             "dueDate": "2024-01-12", "createdAt": "2024-01-03T09:00:00Z"},
            {"id": "t3", "title": "Rotate API keys", "status": "pending", "priority": "critical",
             "dueDate": "2024-02-03", "createdAt": "2024-01-04T09:00:00Z"},
            {"id": "t4", "title": "Polish dashboard", "status": "blocked", "priority": "medium",
             "assignedAgent": "agent-ui", "createdAt": "2024-01-05T09:00:00Z"}
        ]
    }"#;

    fn temp_config() -> (AppConfig, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, SNAPSHOT).expect("write snapshot");
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        (AppConfig::new(path, today), dir)
    }

    fn run(config: &AppConfig, args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("agentdeck").chain(args.iter().copied()))?;
        let mut output = Vec::new();
        execute(config, cli.command, &mut output)?;
        Ok(String::from_utf8(output).expect("utf8"))
    }

    #[test]
    fn list_applies_filters_and_reports_counts() {
        let (config, _dir) = temp_config();
        let output = run(&config, &["list", "--status", "pending,in-progress"]).unwrap();
        assert!(output.contains("Fix login bug"));
        assert!(output.contains("Rotate API keys"));
        assert!(!output.contains("Polish dashboard"));
        assert!(output.contains("Atlas"));
        assert!(output.contains("Showing 2 of 4 tasks"));
        assert!(output.contains("Filters: status:pending,in-progress"));
    }

    #[test]
    fn list_overdue_uses_configured_today() {
        let (config, _dir) = temp_config();
        let output = run(&config, &["list", "--overdue"]).unwrap();
        assert!(output.contains("Fix login bug"));
        assert!(!output.contains("Write release notes"));
        assert!(output.contains("Showing 1 of 4 tasks"));
    }

    #[test]
    fn list_reports_empty_results() {
        let (config, _dir) = temp_config();
        let output = run(&config, &["list", "--search", "kubernetes"]).unwrap();
        assert!(output.contains("No tasks match (4 total)"));
    }

    #[test]
    fn list_json_honours_sort() {
        let (config, _dir) = temp_config();
        let output = run(&config, &["list", "--json", "--sort", "priority", "--reverse"]).unwrap();
        let tasks: Vec<Task> = serde_json::from_str(&output).unwrap();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t1", "t4", "t2"]);
    }

    #[test]
    fn board_prints_every_column() {
        let (config, _dir) = temp_config();
        let output = run(&config, &["board", "--columns", "blocked"]).unwrap();
        let headers: Vec<&str> = output.lines().filter(|l| !l.starts_with("  ")).collect();
        assert_eq!(
            headers,
            vec!["Blocked (1)", "Pending (1)", "In Progress (1)", "Completed (1)"]
        );
        assert!(output.contains("  - Polish dashboard [medium] @Iris"));
    }

    #[test]
    fn calendar_lists_due_days_of_the_month() {
        let (config, _dir) = temp_config();
        let output = run(&config, &["calendar", "--month", "2024-02"]).unwrap();
        assert!(output.starts_with("February 2024"));
        assert!(output.contains("Sat Feb 03 2024"));
        assert!(output.contains("  - Rotate API keys [pending]"));
        assert!(!output.contains("Fix login bug"));

        let january = run(&config, &["calendar", "--unassigned"]).unwrap();
        assert!(january.contains("Fri Jan 12 2024"));
        assert!(!january.contains("Wed Jan 10 2024"));
    }

    #[test]
    fn calendar_rejects_impossible_months() {
        let (config, _dir) = temp_config();
        assert!(run(&config, &["calendar", "--month", "2024-13"]).is_err());
        assert!(run(&config, &["calendar", "--month", "february"]).is_err());
    }

    #[test]
    fn parse_previews_quick_task() {
        let (config, _dir) = temp_config();
        let output = run(
            &config,
            &["parse", "Fix", "login", "bug", "@backend", "high", "priority", "tomorrow"],
        )
        .unwrap();
        assert_eq!(
            output,
            "Title: Fix login bug\nPriority: high\nAssignee: Atlas (agent-api)\nDue: 2024-01-16 (Tue Jan 16 2024)\n"
        );
    }

    #[test]
    fn parse_surfaces_validation_errors() {
        let (config, _dir) = temp_config();
        let err = run(&config, &["parse", "urgent", "tomorrow"]).unwrap_err();
        assert!(err.to_string().contains("Validation error"));
    }

    #[test]
    fn parse_works_without_a_snapshot() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::new(
            dir.path().join("missing.json"),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        );
        let output = run(&config, &["parse", "--json", "Ping", "@backend"]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["title"], "Ping");
        assert!(value.get("assignedAgent").is_none());
    }

    #[test]
    fn presets_lists_builtins() {
        let (config, _dir) = temp_config();
        let output = run(&config, &["presets"]).unwrap();
        assert_eq!(output.lines().count(), 6);
        assert!(output.contains("builtin-overdue"));
        assert!(output.contains("priority:high,critical"));
    }

    #[rstest]
    #[case("2024-02", Some((2024, 2)))]
    #[case(" 2023-11 ", Some((2023, 11)))]
    #[case("2024/02", None)]
    #[case("2024-xx", None)]
    fn parses_month_arguments(#[case] raw: &str, #[case] expected: Option<(i32, u32)>) {
        assert_eq!(parse_month(raw).ok(), expected);
    }

    #[test]
    fn short_id_truncates_long_ids() {
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id("01HN3Q7Z8K"), "01HN3Q");
    }
}
