//! Canonical model builder
//!
//! Turns a [`RawImport`] or a [`SyntheticDataset`] into an [`AnalyticsModel`].
//! Building never fails: every missing field resolves through a fixed
//! precedence list down to a documented default.
//!
//! ## Summary defaults
//!
//! | Field | Resolution order |
//! |-------|------------------|
//! | totals, `filesModified`, `totalMessages`, `avgPerDay` | export value, then 0 |
//! | `projectsAssisted` | export value, then `topProjects` length, then 0 |
//! | `activeDays` | export value, then number of daily records, then 0 |
//! | `avgAcceptance` | non-zero export value, then [`DEFAULT_ACCEPTANCE`] |
//! | `streakDays` | non-zero export value, then longest daily streak, then 0 |
//! | `peakHour` | `trends.peakHour`, then busiest heatmap hour, then [`DEFAULT_PEAK_HOUR`] |
//! | `lastActive` | `lastActivity`, then latest daily date, then build time |

pub mod heatmap;
pub mod narrative;
pub mod palette;

use chrono::{DateTime, Utc};

use crate::analytics::aggregate::MESSAGES_PER_CONVERSATION;
use crate::analytics::longest_streak;
use crate::import::RawImport;
use crate::synthetic::SyntheticDataset;
use crate::types::{AnalyticsModel, DailyRecord, Summary};

/// Acceptance rate shown when the export has none.
pub const DEFAULT_ACCEPTANCE: u32 = 85;

/// Peak hour shown when nothing points at a better one.
pub const DEFAULT_PEAK_HOUR: u8 = 14;

/// Builds [`AnalyticsModel`]s.
///
/// `now` anchors everything time-relative (synthesized session timestamps,
/// the `lastActive` fallback), which keeps builds reproducible in tests.
#[derive(Debug, Clone, Copy)]
pub struct ModelBuilder {
    now: DateTime<Utc>,
}

impl ModelBuilder {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Build from a parsed export.
    pub fn from_import(&self, raw: RawImport) -> AnalyticsModel {
        let daily_activity = normalize_daily(
            raw.daily_activity
                .unwrap_or_default()
                .into_iter()
                .map(DailyRecord::from)
                .collect(),
        );

        let languages: Vec<(String, f64)> = raw
            .language_breakdown
            .unwrap_or_default()
            .into_iter()
            .map(|l| {
                let name = l
                    .name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| "Other".to_string());
                (name, l.value.unwrap_or(0.0))
            })
            .collect();
        let language_breakdown = palette::language_breakdown(&languages);

        let hourly_heatmap = heatmap::from_distribution(
            raw.hourly_distribution.as_deref().unwrap_or_default(),
        );

        let top_projects = raw.top_projects.unwrap_or_default();
        let s = raw.summary.unwrap_or_default();
        let summary = Summary {
            total_conversations: s.total_conversations.unwrap_or(0),
            total_lines_generated: s.total_lines_generated.unwrap_or(0),
            total_time_saved: s.total_time_saved.unwrap_or(0.0),
            avg_acceptance: s
                .avg_acceptance
                .filter(|a| *a > 0.0)
                .map(|a| a.round().min(100.0) as u32)
                .unwrap_or(DEFAULT_ACCEPTANCE),
            projects_assisted: s
                .projects_assisted
                .unwrap_or(top_projects.len() as u64),
            files_modified: s.files_modified.unwrap_or(0),
            total_messages: s.total_messages.unwrap_or(0),
            active_days: s.active_days.unwrap_or(daily_activity.len() as u64),
            avg_per_day: s.avg_per_day.unwrap_or(0),
        };

        let streak_days = raw
            .streak_days
            .filter(|d| *d > 0)
            .unwrap_or_else(|| longest_streak(daily_activity.iter().map(|d| d.date)));

        let trends = raw.trends.map(crate::types::Trends::from);
        let peak_hour = trends
            .as_ref()
            .and_then(|t| t.peak_hour)
            .or_else(|| heatmap::peak_hour(&hourly_heatmap))
            .unwrap_or(DEFAULT_PEAK_HOUR);

        let last_active = raw
            .last_activity
            .or_else(|| latest_day_start(&daily_activity))
            .unwrap_or(self.now);

        let conversations = narrative::sessions(&summary, &language_breakdown, self.now);
        let insights = narrative::insights(&summary, streak_days, peak_hour);

        tracing::debug!(
            days = daily_activity.len(),
            languages = language_breakdown.len(),
            streak_days,
            peak_hour,
            "Built model from import"
        );

        AnalyticsModel {
            summary,
            daily_activity,
            language_breakdown,
            task_breakdown: palette::import_task_breakdown(),
            hourly_heatmap,
            conversations,
            insights,
            streak_days,
            trends,
            peak_hour,
            top_projects,
            weekly_trends: raw.weekly_trends.unwrap_or_default(),
            monthly_trends: raw.monthly_trends.unwrap_or_default(),
            day_of_week_breakdown: raw.day_of_week_breakdown.unwrap_or_default(),
            last_active,
        }
    }

    /// Build from a generated demo dataset.
    ///
    /// Totals are derived from the generated daily series, so they always
    /// agree with it.
    pub fn from_synthetic(&self, dataset: SyntheticDataset) -> AnalyticsModel {
        let daily_activity = normalize_daily(dataset.daily_activity);

        let total_conversations =
            saturating_total(daily_activity.iter().map(|d| d.conversations));
        let days = daily_activity.len() as u64;
        let accepted: Vec<f64> = daily_activity
            .iter()
            .filter_map(|d| d.code_accepted)
            .collect();
        let avg_acceptance = if accepted.is_empty() {
            DEFAULT_ACCEPTANCE
        } else {
            (accepted.iter().sum::<f64>() / accepted.len() as f64).round() as u32
        };

        let summary = Summary {
            total_conversations,
            total_lines_generated: saturating_total(
                daily_activity.iter().map(|d| d.lines_generated),
            ),
            total_time_saved: daily_activity.iter().map(|d| d.time_saved).sum(),
            avg_acceptance,
            projects_assisted: dataset.projects_assisted,
            files_modified: dataset.files_modified,
            total_messages: total_conversations.saturating_mul(MESSAGES_PER_CONVERSATION),
            active_days: days,
            avg_per_day: if days > 0 {
                (total_conversations as f64 / days as f64).round() as u64
            } else {
                0
            },
        };

        let language_breakdown = {
            let entries: Vec<(String, f64)> = dataset
                .language_breakdown
                .iter()
                .map(|l| (l.name.clone(), l.value as f64))
                .collect();
            let mut shares = palette::language_breakdown(&entries);
            // Keep the generator's own colors.
            for (share, original) in shares.iter_mut().zip(&dataset.language_breakdown) {
                share.color = original.color.clone();
            }
            shares
        };

        let hourly_heatmap = heatmap::complete(&dataset.hourly_heatmap);
        let peak_hour = heatmap::peak_hour(&hourly_heatmap).unwrap_or(DEFAULT_PEAK_HOUR);
        let streak_days = longest_streak(daily_activity.iter().map(|d| d.date));

        AnalyticsModel {
            summary,
            daily_activity,
            language_breakdown,
            task_breakdown: dataset.task_breakdown,
            hourly_heatmap,
            conversations: dataset.conversations,
            insights: dataset.insights,
            streak_days,
            trends: None,
            peak_hour,
            top_projects: Vec::new(),
            weekly_trends: Vec::new(),
            monthly_trends: Vec::new(),
            day_of_week_breakdown: Vec::new(),
            last_active: dataset.generated_at,
        }
    }
}

/// Sort a daily series by date and merge records sharing a date.
///
/// Merged records sum their counters; see [`DailyRecord`] for how the
/// acceptance rate combines.
pub fn normalize_daily(mut records: Vec<DailyRecord>) -> Vec<DailyRecord> {
    records.sort_by_key(|r| r.date);

    let mut out: Vec<DailyRecord> = Vec::with_capacity(records.len());
    let mut weight = 0u32;
    let mut merged = 0usize;
    for record in records {
        match out.last_mut() {
            Some(last) if last.date == record.date => {
                if record.code_accepted.is_some() {
                    weight += 1;
                }
                last.absorb(&record, weight.saturating_sub(1));
                merged += 1;
            }
            _ => {
                weight = u32::from(record.code_accepted.is_some());
                out.push(record);
            }
        }
    }

    if merged > 0 {
        tracing::warn!(merged, "Merged daily records with duplicate dates");
    }
    out
}

fn saturating_total(counts: impl Iterator<Item = u64>) -> u64 {
    counts.fold(0, u64::saturating_add)
}

fn latest_day_start(daily: &[DailyRecord]) -> Option<DateTime<Utc>> {
    daily
        .last()
        .and_then(|d| d.date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parse_import;
    use crate::types::HEATMAP_CELLS;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn build(json: &str) -> AnalyticsModel {
        ModelBuilder::new(now()).from_import(parse_import(json).unwrap())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_minimal_import_defaults() {
        let model = build(
            r#"{"summary": {"totalConversations": 100},
                "dailyActivity": [{"date": "2024-06-01", "conversations": 100, "linesGenerated": 500}]}"#,
        );
        assert_eq!(model.summary.total_conversations, 100);
        assert_eq!(model.summary.avg_acceptance, DEFAULT_ACCEPTANCE);
        assert_eq!(model.summary.total_lines_generated, 0);
        assert_eq!(model.summary.active_days, 1);
        assert_eq!(model.hourly_heatmap.len(), HEATMAP_CELLS);
        assert_eq!(model.streak_days, 1);
        assert_eq!(model.peak_hour, DEFAULT_PEAK_HOUR);
        assert_eq!(model.last_active.date_naive(), date(2024, 6, 1));
    }

    #[test]
    fn test_empty_import() {
        let model = build("{}");
        assert_eq!(model.summary.total_conversations, 0);
        assert_eq!(model.summary.projects_assisted, 0);
        assert_eq!(model.summary.active_days, 0);
        assert_eq!(model.streak_days, 0);
        assert!(model.daily_activity.is_empty());
        assert!(model.language_breakdown.is_empty());
        assert_eq!(model.hourly_heatmap.len(), HEATMAP_CELLS);
        assert_eq!(model.last_active, now());
        assert_eq!(model.insights.len(), 4);
    }

    #[test]
    fn test_explicit_values_win() {
        let model = build(
            r#"{"summary": {"avgAcceptance": 72.4, "projectsAssisted": 3, "activeDays": 9},
                "streakDays": 6,
                "trends": {"peakHour": 10},
                "topProjects": [{"name": "a"}],
                "lastActivity": "2024-06-09T08:00:00Z"}"#,
        );
        assert_eq!(model.summary.avg_acceptance, 72);
        assert_eq!(model.summary.projects_assisted, 3);
        assert_eq!(model.summary.active_days, 9);
        assert_eq!(model.streak_days, 6);
        assert_eq!(model.peak_hour, 10);
        assert_eq!(model.top_projects.len(), 1);
        assert_eq!(model.last_active.date_naive(), date(2024, 6, 9));
    }

    #[test]
    fn test_zero_acceptance_uses_baseline() {
        let model = build(r#"{"summary": {"avgAcceptance": 0}}"#);
        assert_eq!(model.summary.avg_acceptance, DEFAULT_ACCEPTANCE);
    }

    #[test]
    fn test_projects_fall_back_to_top_projects() {
        let model = build(r#"{"topProjects": [{"name": "a"}, {"name": "b"}]}"#);
        assert_eq!(model.summary.projects_assisted, 2);
    }

    #[test]
    fn test_peak_hour_from_distribution() {
        let model = build(r#"{"hourlyDistribution": [{"hour": 9, "count": 3}, {"hour": 16, "count": 8}]}"#);
        assert_eq!(model.peak_hour, 16);
    }

    #[test]
    fn test_languages_colored_and_normalized() {
        let model = build(
            r#"{"languageBreakdown": [{"name": "Rust", "value": 6}, {"name": "Zig", "value": 2}, {"value": 2}]}"#,
        );
        let names: Vec<_> = model.language_breakdown.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Rust", "Zig", "Other"]);
        let sum: u32 = model.language_breakdown.iter().map(|l| l.value).sum();
        assert_eq!(sum, 100);
        assert_eq!(model.language_breakdown[1].color, "hsl(45, 70%, 50%)");
        assert_eq!(model.language_breakdown[2].color, "#8888aa");
    }

    #[test]
    fn test_streak_derived_from_series() {
        let model = build(
            r#"{"dailyActivity": [
                {"date": "2024-06-03"}, {"date": "2024-06-01"}, {"date": "2024-06-02"},
                {"date": "2024-06-07"}]}"#,
        );
        assert_eq!(model.streak_days, 3);
        assert_eq!(model.date_span(), Some((date(2024, 6, 1), date(2024, 6, 7))));
    }

    #[test]
    fn test_normalize_daily_sorts_and_merges() {
        let mk = |d: u32, conversations: u64, accepted: Option<f64>| DailyRecord {
            conversations,
            code_accepted: accepted,
            ..DailyRecord::new(date(2024, 6, d))
        };
        let out = normalize_daily(vec![
            mk(2, 1, None),
            mk(1, 4, Some(90.0)),
            mk(2, 2, Some(60.0)),
            mk(2, 3, Some(90.0)),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].date, date(2024, 6, 1));
        assert_eq!(out[1].conversations, 6);
        assert_eq!(out[1].code_accepted, Some(75.0));
    }

    #[test]
    fn test_duplicate_dates_with_huge_counters_saturate() {
        let model = build(
            r#"{"dailyActivity": [
                {"date": "2024-06-01", "inputTokens": 18446744073709551615, "conversations": 3},
                {"date": "2024-06-01", "inputTokens": 5, "conversations": 4}]}"#,
        );
        assert_eq!(model.daily_activity.len(), 1);
        assert_eq!(model.daily_activity[0].input_tokens, u64::MAX);
        assert_eq!(model.daily_activity[0].conversations, 7);
    }

    #[test]
    fn test_synthetic_totals_saturate() {
        let huge = |d: u32| DailyRecord {
            conversations: u64::MAX / 2 + 1,
            lines_generated: u64::MAX,
            ..DailyRecord::new(date(2024, 6, d))
        };
        let model = ModelBuilder::new(now()).from_synthetic(crate::synthetic::SyntheticDataset {
            daily_activity: vec![huge(1), huge(2)],
            ..crate::synthetic::SyntheticDataset::empty(now())
        });
        assert_eq!(model.summary.total_conversations, u64::MAX);
        assert_eq!(model.summary.total_lines_generated, u64::MAX);
        assert_eq!(model.summary.total_messages, u64::MAX);
    }

    #[test]
    fn test_synthesized_sessions_respect_total_lines() {
        let model = build(
            r#"{"summary": {"totalLinesGenerated": 2000},
                "languageBreakdown": [{"name": "TypeScript", "value": 3}, {"name": "Python", "value": 1}]}"#,
        );
        let total: u64 = model.conversations.iter().map(|c| c.lines_generated).sum();
        assert!(total <= model.summary.total_lines_generated);
        assert_eq!(model.conversations[0].lines_generated, 1500);
    }
}
