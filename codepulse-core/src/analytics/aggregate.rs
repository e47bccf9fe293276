//! Range aggregation
//!
//! [`aggregate`] recomputes every range-dependent statistic from the model's
//! daily series. It is a pure function of `(model, range)`: no caching, no
//! memory of earlier calls. Callers that want memoization can use
//! [`RangeMemo`](super::RangeMemo).

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Serialize, Serializer};

use super::range::DateRange;
use crate::types::{weekday_name, AnalyticsModel, DailyRecord};

/// Shown in place of a date or weekday when there is nothing to rank.
pub const NOT_AVAILABLE: &str = "N/A";

/// Heuristic messages per conversation.
pub const MESSAGES_PER_CONVERSATION: u64 = 10;

/// Statistics for one date window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedView {
    /// The window these figures cover
    pub range: DateRange,
    /// Records inside the window, ascending by date
    pub daily_activity: Vec<DailyRecord>,
    pub summary: RangeSummary,
    pub trends: RangeTrends,
    pub mode_breakdown: ModeBreakdown,
    pub token_usage: TokenUsage,
}

/// Totals and day statistics for a window.
///
/// Acceptance, projects and files are not tracked per day and are carried
/// over from the model's lifetime summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSummary {
    pub total_conversations: u64,
    pub total_lines_generated: u64,
    pub total_time_saved: f64,
    /// `total_conversations` times [`MESSAGES_PER_CONVERSATION`]
    pub estimated_messages: u64,
    pub active_days: u64,
    pub avg_per_day: u64,
    pub max_streak: u64,
    pub busiest_day: BusiestDay,
    pub avg_acceptance: u32,
    pub projects_assisted: u64,
    pub files_modified: u64,
}

/// The single day with the most conversations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusiestDay {
    /// `None` when the window is empty (serialized as "N/A")
    #[serde(serialize_with = "date_or_na")]
    pub date: Option<NaiveDate>,
    pub conversations: u64,
}

impl BusiestDay {
    pub fn none() -> Self {
        Self {
            date: None,
            conversations: 0,
        }
    }

    pub fn date_label(&self) -> String {
        self.date
            .map(|d| d.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

/// Trend comparison between the two halves of a window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeTrends {
    /// Conversations in the later half
    pub this_week: u64,
    /// Conversations in the earlier half
    pub last_week: u64,
    /// Growth of the later half over the earlier one, in percent
    #[serde(rename = "weekOverWeekGrowth")]
    pub growth_percent: i64,
    pub peak_hour: u8,
    /// Weekday with the most conversations (serialized as its full name or "N/A")
    #[serde(serialize_with = "weekday_or_na")]
    pub best_day: Option<Weekday>,
}

impl RangeTrends {
    pub fn best_day_label(&self) -> &'static str {
        self.best_day.map(weekday_name).unwrap_or(NOT_AVAILABLE)
    }
}

/// Agent vs chat conversation split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeBreakdown {
    pub agent: u64,
    pub chat: u64,
    pub agent_percent: u32,
    pub chat_percent: u32,
}

impl ModeBreakdown {
    fn new(agent: u64, chat: u64) -> Self {
        let total = agent.saturating_add(chat);
        if total == 0 {
            return Self::default();
        }
        let agent_percent = (agent as f64 / total as f64 * 100.0).round() as u32;
        Self {
            agent,
            chat,
            agent_percent,
            chat_percent: 100 - agent_percent,
        }
    }
}

/// Token totals for a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
    pub total: u64,
}

fn date_or_na<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => s.collect_str(d),
        None => s.serialize_str(NOT_AVAILABLE),
    }
}

fn weekday_or_na<S: Serializer>(day: &Option<Weekday>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(day.map(weekday_name).unwrap_or(NOT_AVAILABLE))
}

/// Compute the view of `model` for `range`.
///
/// An empty series yields a zeroed view. For "all time" the trend split uses
/// the first and last record dates as window bounds; otherwise the range's
/// own bounds.
pub fn aggregate(model: &AnalyticsModel, range: &DateRange) -> DerivedView {
    let mut records: Vec<DailyRecord> = model
        .daily_activity
        .iter()
        .filter(|d| range.contains(d.date))
        .cloned()
        .collect();
    records.sort_by_key(|d| d.date);

    let window = match (range.start, range.days) {
        (Some(start), Some(_)) => Some((start, range.end)),
        _ => records
            .first()
            .zip(records.last())
            .map(|(first, last)| (first.date, last.date)),
    };

    let totals = Totals::of(&records);
    let active_days = records.len() as u64;
    let avg_per_day = if active_days > 0 {
        (totals.conversations as f64 / active_days as f64).round() as u64
    } else {
        0
    };

    let (last_week, this_week) = match window {
        Some((start, end)) => split_halves(&records, start, end),
        None => (0, 0),
    };

    let summary = RangeSummary {
        total_conversations: totals.conversations,
        total_lines_generated: totals.lines_generated,
        total_time_saved: totals.time_saved,
        estimated_messages: totals
            .conversations
            .saturating_mul(MESSAGES_PER_CONVERSATION),
        active_days,
        avg_per_day,
        max_streak: longest_streak(records.iter().map(|d| d.date)),
        busiest_day: busiest_day(&records),
        avg_acceptance: model.summary.avg_acceptance,
        projects_assisted: model.summary.projects_assisted,
        files_modified: model.summary.files_modified,
    };

    let trends = RangeTrends {
        this_week,
        last_week,
        growth_percent: growth_percent(last_week, this_week),
        peak_hour: model.peak_hour,
        best_day: best_weekday(&records),
    };

    tracing::debug!(
        label = %range.label,
        days = active_days,
        conversations = totals.conversations,
        "Aggregated date range"
    );

    DerivedView {
        range: range.clone(),
        daily_activity: records,
        summary,
        trends,
        mode_breakdown: ModeBreakdown::new(totals.agent, totals.chat),
        token_usage: TokenUsage {
            input: totals.input_tokens,
            output: totals.output_tokens,
            total: totals.input_tokens.saturating_add(totals.output_tokens),
        },
    }
}

/// Window totals; counters saturate at `u64::MAX`.
#[derive(Debug, Default)]
struct Totals {
    conversations: u64,
    lines_generated: u64,
    time_saved: f64,
    agent: u64,
    chat: u64,
    input_tokens: u64,
    output_tokens: u64,
}

impl Totals {
    fn of(records: &[DailyRecord]) -> Self {
        records.iter().fold(Totals::default(), |mut t, d| {
            t.conversations = t.conversations.saturating_add(d.conversations);
            t.lines_generated = t.lines_generated.saturating_add(d.lines_generated);
            t.time_saved += d.time_saved;
            t.agent = t.agent.saturating_add(d.agent_count);
            t.chat = t.chat.saturating_add(d.chat_count);
            t.input_tokens = t.input_tokens.saturating_add(d.input_tokens);
            t.output_tokens = t.output_tokens.saturating_add(d.output_tokens);
            t
        })
    }
}

/// Longest run of dates exactly one day apart.
///
/// Expects ascending dates. Any other gap, including a repeated date, starts
/// a new run.
pub fn longest_streak<I>(dates: I) -> u64
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut longest = 0u64;
    let mut current = 0u64;
    let mut prev: Option<NaiveDate> = None;

    for date in dates {
        current = match prev {
            Some(p) if (date - p).num_days() == 1 => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        prev = Some(date);
    }

    longest
}

/// First record with the most conversations.
fn busiest_day(records: &[DailyRecord]) -> BusiestDay {
    let mut best: Option<&DailyRecord> = None;
    for record in records {
        if best.map_or(true, |b| record.conversations > b.conversations) {
            best = Some(record);
        }
    }
    best.map_or_else(BusiestDay::none, |d| BusiestDay {
        date: Some(d.date),
        conversations: d.conversations,
    })
}

/// Conversation totals before and after the window's temporal midpoint.
///
/// The midpoint is `start 00:00` plus half the window length, so a record
/// (dated at midnight) belongs to the earlier half when it falls strictly
/// before it.
fn split_halves(records: &[DailyRecord], start: NaiveDate, end: NaiveDate) -> (u64, u64) {
    const HALF_DAY_SECS: i64 = 12 * 60 * 60;
    let window_days = (end - start).num_days() + 1;
    let midpoint_secs = window_days * HALF_DAY_SECS;

    records.iter().fold((0, 0), |(first, second), d| {
        if (d.date - start).num_seconds() < midpoint_secs {
            (first.saturating_add(d.conversations), second)
        } else {
            (first, second.saturating_add(d.conversations))
        }
    })
}

/// Percent change from `first` to `second`, 0 when `first` is 0.
fn growth_percent(first: u64, second: u64) -> i64 {
    if first == 0 {
        return 0;
    }
    ((second as f64 - first as f64) / first as f64 * 100.0).round() as i64
}

/// Weekday with the highest conversation total; earliest seen wins ties.
fn best_weekday(records: &[DailyRecord]) -> Option<Weekday> {
    let mut buckets: Vec<(Weekday, u64)> = Vec::with_capacity(7);
    for record in records {
        let day = record.date.weekday();
        match buckets.iter_mut().find(|(d, _)| *d == day) {
            Some((_, total)) => *total = total.saturating_add(record.conversations),
            None => buckets.push((day, record.conversations)),
        }
    }

    let mut best: Option<(Weekday, u64)> = None;
    for (day, total) in buckets {
        if best.map_or(true, |(_, t)| total > t) {
            best = Some((day, total));
        }
    }
    best.map(|(day, _)| day)
}
