//! Canonical domain types for codepulse
//!
//! These types make up the [`AnalyticsModel`]: the normalized, immutable view
//! of one usage export (or one generated demo dataset). Everything the range
//! aggregator and the presentation layer need is reachable from here.
//!
//! Field names serialize in camelCase so an exported model reads like the
//! usage export it came from.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Conversation** | One AI chat or agent exchange, counted per day |
//! | **Agent / Chat** | The two interaction modes a conversation can run in |
//! | **Daily record** | Counters for a single calendar day |
//! | **Heatmap cell** | One (day-of-week, hour) bucket with a normalized intensity |
//! | **Streak** | Consecutive calendar days that each have a daily record |

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

// ============================================
// Daily activity
// ============================================

/// Counters for one calendar day.
///
/// Within an [`AnalyticsModel`] dates are unique and ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub conversations: u64,
    pub lines_generated: u64,
    /// Hours saved; imports may carry fractional values
    pub time_saved: f64,
    pub agent_count: u64,
    pub chat_count: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Acceptance percentage for the day, when the source reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_accepted: Option<f64>,
}

impl DailyRecord {
    /// An all-zero record for `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            conversations: 0,
            lines_generated: 0,
            time_saved: 0.0,
            agent_count: 0,
            chat_count: 0,
            input_tokens: 0,
            output_tokens: 0,
            code_accepted: None,
        }
    }

    /// Fold another record for the same day into this one.
    ///
    /// Counters add up, saturating at `u64::MAX`. `code_accepted` is
    /// averaged, weighted by how many records carried a value (`self_weight`
    /// of them are already folded in).
    pub(crate) fn absorb(&mut self, other: &DailyRecord, self_weight: u32) {
        self.conversations = self.conversations.saturating_add(other.conversations);
        self.lines_generated = self.lines_generated.saturating_add(other.lines_generated);
        self.time_saved += other.time_saved;
        self.agent_count = self.agent_count.saturating_add(other.agent_count);
        self.chat_count = self.chat_count.saturating_add(other.chat_count);
        self.input_tokens = self.input_tokens.saturating_add(other.input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(other.output_tokens);
        self.code_accepted = match (self.code_accepted, other.code_accepted) {
            (Some(a), Some(b)) => {
                let w = self_weight.max(1) as f64;
                Some((a * w + b) / (w + 1.0))
            }
            (a, b) => a.or(b),
        };
    }
}

// ============================================
// Summary
// ============================================

/// Lifetime totals for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_conversations: u64,
    pub total_lines_generated: u64,
    pub total_time_saved: f64,
    /// Code acceptance rate in percent
    pub avg_acceptance: u32,
    pub projects_assisted: u64,
    pub files_modified: u64,
    pub total_messages: u64,
    pub active_days: u64,
    pub avg_per_day: u64,
}

// ============================================
// Breakdowns
// ============================================

/// A named slice of a breakdown chart (languages, task categories).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub name: String,
    /// Integer percentage
    pub value: u32,
    /// CSS color (`#rrggbb` or `hsl(...)`)
    pub color: String,
}

/// Day columns of the heatmap, in display order.
pub const HEATMAP_DAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Number of cells in a complete heatmap (7 days x 24 hours).
pub const HEATMAP_CELLS: usize = 7 * 24;

/// One (day-of-week, hour) bucket of the activity heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    #[serde(with = "short_weekday")]
    pub day: Weekday,
    /// Hour of day, 0-23
    pub hour: u8,
    /// Normalized activity in [0, 1]
    pub intensity: f64,
    pub conversations: u32,
}

/// Serializes a weekday as its three-letter name ("Sun", "Mon", ...).
pub(crate) mod short_weekday {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(super::weekday_short_name(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_weekday(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown weekday: {}", s)))
    }
}

/// Three-letter weekday name.
pub fn weekday_short_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

/// Full weekday name.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Parse a short or full weekday name, case-insensitive.
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    HEATMAP_DAYS.iter().copied().find(|day| {
        s.eq_ignore_ascii_case(weekday_short_name(*day)) || s.eq_ignore_ascii_case(weekday_name(*day))
    })
}

// ============================================
// Sessions and insights
// ============================================

/// Category of a session in the recent-sessions list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Feature,
    Bugfix,
    Refactor,
    Docs,
    Optimization,
}

impl SessionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Feature => "feature",
            SessionKind::Bugfix => "bugfix",
            SessionKind::Refactor => "refactor",
            SessionKind::Docs => "docs",
            SessionKind::Optimization => "optimization",
        }
    }
}

/// An entry in the recent-sessions list.
///
/// Unless the export carries a real conversation log these are synthesized
/// from summary totals and should be read as narrative, not records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: u32,
    pub title: String,
    pub timestamp: DateTime<Utc>,
    pub lines_generated: u64,
    #[serde(rename = "type")]
    pub kind: SessionKind,
}

/// Tone of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Info,
    Warning,
}

/// A one-line observation shown in the insights panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: String,
    /// Icon identifier for the presentation layer ("trending-up", "clock", ...)
    pub icon: String,
}

// ============================================
// Trends
// ============================================

/// Trend figures as reported by an export.
///
/// Every field is optional; the range aggregator recomputes its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub this_week: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_week: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_over_week_growth: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_hour: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_day: Option<String>,
}

// ============================================
// Analytics model
// ============================================

/// Where the model's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// A parsed usage export
    Imported,
    /// Generated demo data
    Demo,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Imported => "imported",
            DataSource::Demo => "demo",
        }
    }
}

/// The canonical representation of one dataset.
///
/// Built once per load by [`ModelBuilder`](crate::model::ModelBuilder) and
/// never mutated afterwards; a new import replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsModel {
    pub summary: Summary,
    /// Unique, ascending by date
    pub daily_activity: Vec<DailyRecord>,
    /// Percentages summing to 100 (empty when the source had no languages)
    pub language_breakdown: Vec<Share>,
    pub task_breakdown: Vec<Share>,
    /// Exactly [`HEATMAP_CELLS`] cells, Sun..Sat by 0..23
    pub hourly_heatmap: Vec<HeatmapCell>,
    pub conversations: Vec<SessionSummary>,
    pub insights: Vec<Insight>,
    pub streak_days: u64,
    pub trends: Option<Trends>,
    /// Most active hour of day (0-23)
    pub peak_hour: u8,
    pub top_projects: Vec<serde_json::Value>,
    pub weekly_trends: Vec<serde_json::Value>,
    pub monthly_trends: Vec<serde_json::Value>,
    pub day_of_week_breakdown: Vec<serde_json::Value>,
    pub last_active: DateTime<Utc>,
}

impl AnalyticsModel {
    /// First and last dates of the daily series.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.daily_activity.first()?;
        let last = self.daily_activity.last()?;
        Some((first.date, last.date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("Sun"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("wednesday"), Some(Weekday::Wed));
        assert_eq!(parse_weekday("Funday"), None);
    }

    #[test]
    fn test_heatmap_cell_serializes_short_day() {
        let cell = HeatmapCell {
            day: Weekday::Sat,
            hour: 9,
            intensity: 0.5,
            conversations: 5,
        };
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["day"], "Sat");

        let back: HeatmapCell = serde_json::from_value(json).unwrap();
        assert_eq!(back.day, Weekday::Sat);
    }

    #[test]
    fn test_absorb_sums_counters_and_averages_acceptance() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut a = DailyRecord {
            conversations: 3,
            lines_generated: 100,
            code_accepted: Some(80.0),
            ..DailyRecord::new(date)
        };
        let b = DailyRecord {
            conversations: 2,
            lines_generated: 50,
            code_accepted: Some(90.0),
            ..DailyRecord::new(date)
        };
        a.absorb(&b, 1);
        assert_eq!(a.conversations, 5);
        assert_eq!(a.lines_generated, 150);
        assert_eq!(a.code_accepted, Some(85.0));
    }

    #[test]
    fn test_absorb_saturates_huge_counters() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut a = DailyRecord {
            conversations: u64::MAX - 1,
            input_tokens: u64::MAX,
            ..DailyRecord::new(date)
        };
        let b = DailyRecord {
            conversations: 5,
            input_tokens: 5,
            output_tokens: 7,
            ..DailyRecord::new(date)
        };
        a.absorb(&b, 0);
        assert_eq!(a.conversations, u64::MAX);
        assert_eq!(a.input_tokens, u64::MAX);
        assert_eq!(a.output_tokens, 7);
    }

    #[test]
    fn test_session_kind_serializes_as_type() {
        let session = SessionSummary {
            id: 1,
            title: "x".to_string(),
            timestamp: Utc::now(),
            lines_generated: 10,
            kind: SessionKind::Docs,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["type"], "docs");
        assert_eq!(json["linesGenerated"], 10);
    }
}
