//! Recent sessions and insights for imports
//!
//! Exports carry no per-conversation log, so the recent-sessions list and the
//! insight lines are synthesized from summary totals. Line counts are
//! proportional splits of `summary.totalLinesGenerated` and never add up to
//! more than it.

use chrono::{DateTime, Duration, Utc};

use crate::format;
use crate::types::{Insight, InsightKind, SessionKind, SessionSummary, Share, Summary};

/// Maximum number of synthesized sessions.
pub const MAX_SESSIONS: usize = 5;

/// How long ago each synthesized session happened, in hours.
const SESSION_AGES_HOURS: [i64; MAX_SESSIONS] = [1, 2, 4, 8, 12];

/// Generic sessions used when the export has no language breakdown.
const GENERIC_SESSIONS: [(&str, f64, SessionKind); MAX_SESSIONS] = [
    ("Building dashboard components", 0.2, SessionKind::Feature),
    ("Service implementation", 0.3, SessionKind::Feature),
    ("Configuration setup", 0.15, SessionKind::Docs),
    ("Styling and animations", 0.15, SessionKind::Feature),
    ("Scripts and automation", 0.05, SessionKind::Optimization),
];

const CODE_KINDS: [SessionKind; 4] = [
    SessionKind::Feature,
    SessionKind::Refactor,
    SessionKind::Bugfix,
    SessionKind::Optimization,
];

/// Languages that are mostly documentation or configuration.
fn is_docs_language(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "markdown" | "yaml" | "json" | "properties" | "xml" | "toml"
    )
}

fn session_title(kind: SessionKind, language: &str) -> String {
    match kind {
        SessionKind::Feature => format!("{} feature work", language),
        SessionKind::Refactor => format!("Refactoring {} modules", language),
        SessionKind::Bugfix => format!("Fixing {} bugs", language),
        SessionKind::Optimization => format!("Optimizing {} hot paths", language),
        SessionKind::Docs => format!("{} documentation and config", language),
    }
}

/// Synthesize the recent-sessions list.
///
/// One session per top language (by share), or the generic list when there
/// are no languages.
pub fn sessions(summary: &Summary, languages: &[Share], now: DateTime<Utc>) -> Vec<SessionSummary> {
    let total = summary.total_lines_generated as f64;
    let timestamp = |i: usize| now - Duration::hours(SESSION_AGES_HOURS[i]);

    if languages.is_empty() {
        return GENERIC_SESSIONS
            .iter()
            .enumerate()
            .map(|(i, (title, share, kind))| SessionSummary {
                id: i as u32 + 1,
                title: title.to_string(),
                timestamp: timestamp(i),
                lines_generated: (total * share).floor() as u64,
                kind: *kind,
            })
            .collect();
    }

    let mut ranked: Vec<&Share> = languages.iter().collect();
    ranked.sort_by(|a, b| b.value.cmp(&a.value));

    let mut code_index = 0;
    ranked
        .into_iter()
        .take(MAX_SESSIONS)
        .enumerate()
        .map(|(i, lang)| {
            let kind = if is_docs_language(&lang.name) {
                SessionKind::Docs
            } else {
                let kind = CODE_KINDS[code_index % CODE_KINDS.len()];
                code_index += 1;
                kind
            };
            SessionSummary {
                id: i as u32 + 1,
                title: session_title(kind, &lang.name),
                timestamp: timestamp(i),
                lines_generated: (total * lang.value as f64 / 100.0).floor() as u64,
                kind,
            }
        })
        .collect()
}

/// Synthesize the insight lines.
pub fn insights(summary: &Summary, streak_days: u64, peak_hour: u8) -> Vec<Insight> {
    let lines = format::thousands(summary.total_lines_generated);
    let generated = if streak_days > 0 {
        format!(
            "Generated {} lines of code with AI in just {} {}!",
            lines,
            streak_days,
            plural(streak_days, "day", "days")
        )
    } else {
        format!("Generated {} lines of code with AI", lines)
    };

    // Peak hour sits in the middle of a three hour window.
    let window_start = (peak_hour % 24 + 23) % 24;

    vec![
        Insight {
            kind: InsightKind::Positive,
            message: generated,
            icon: "trending-up".to_string(),
        },
        Insight {
            kind: InsightKind::Positive,
            message: format!(
                "Saved approximately {} hours with AI assistance",
                format::hours(summary.total_time_saved)
            ),
            icon: "clock".to_string(),
        },
        Insight {
            kind: InsightKind::Info,
            message: format!(
                "Most productive hours: {} based on your activity",
                format::hour_range(window_start, 3)
            ),
            icon: "zap".to_string(),
        },
        Insight {
            kind: InsightKind::Positive,
            message: format!(
                "Modified {} files across {} {}",
                format::thousands(summary.files_modified),
                summary.projects_assisted,
                plural(summary.projects_assisted, "project", "projects")
            ),
            icon: "lightbulb".to_string(),
        },
    ]
}

fn plural<'a>(n: u64, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}
