//! Demo dataset generation
//!
//! Produces a plausible month of activity when there is no export to show.
//! The random source is injected so tests (and `--seed`) get reproducible
//! data; [`generate_default`] picks one from the config.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{SyntheticConfig, MAX_LOOKBACK_DAYS};
use crate::format;
use crate::model::heatmap;
use crate::types::{
    DailyRecord, HeatmapCell, Insight, InsightKind, SessionKind, SessionSummary, Share,
    HEATMAP_CELLS, HEATMAP_DAYS,
};

/// Projects reported by every demo dataset.
pub const DEMO_PROJECTS: u64 = 12;

/// Files reported by every demo dataset.
pub const DEMO_FILES: u64 = 847;

const DEMO_LANGUAGES: [(&str, u32, &str); 6] = [
    ("TypeScript", 38, "#3178c6"),
    ("Python", 28, "#3776ab"),
    ("JavaScript", 18, "#f7df1e"),
    ("Go", 8, "#00add8"),
    ("Rust", 5, "#dea584"),
    ("Other", 3, "#8888aa"),
];

const DEMO_TASKS: [(&str, u32, &str); 6] = [
    ("Code Generation", 35, "#00f5ff"),
    ("Bug Fixing", 22, "#00ff88"),
    ("Refactoring", 18, "#bf00ff"),
    ("Documentation", 12, "#ff6b00"),
    ("Code Review", 8, "#ff0080"),
    ("Learning", 5, "#f0ff00"),
];

/// (title, lines, kind, hours ago)
const DEMO_SESSIONS: [(&str, u64, SessionKind, i64); 5] = [
    ("Implement user authentication flow", 247, SessionKind::Feature, 1),
    ("Fix memory leak in WebSocket handler", 89, SessionKind::Bugfix, 2),
    ("Refactor database connection pooling", 156, SessionKind::Refactor, 4),
    ("Create API documentation for payments", 312, SessionKind::Docs, 8),
    ("Optimize React component rendering", 73, SessionKind::Optimization, 12),
];

/// A generated dataset, before model building.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    pub daily_activity: Vec<DailyRecord>,
    pub language_breakdown: Vec<Share>,
    pub task_breakdown: Vec<Share>,
    pub hourly_heatmap: Vec<HeatmapCell>,
    pub conversations: Vec<SessionSummary>,
    pub insights: Vec<Insight>,
    pub projects_assisted: u64,
    pub files_modified: u64,
    pub generated_at: DateTime<Utc>,
}

impl SyntheticDataset {
    /// A dataset with no activity at all.
    pub fn empty(generated_at: DateTime<Utc>) -> Self {
        Self {
            daily_activity: Vec::new(),
            language_breakdown: Vec::new(),
            task_breakdown: Vec::new(),
            hourly_heatmap: Vec::new(),
            conversations: Vec::new(),
            insights: Vec::new(),
            projects_assisted: 0,
            files_modified: 0,
            generated_at,
        }
    }
}

/// Generate a dataset ending on `now`'s date with randomness from `rng`.
///
/// `lookback_days` is clamped to `1..=MAX_LOOKBACK_DAYS`.
pub fn generate<R: Rng>(rng: &mut R, now: DateTime<Utc>, config: &SyntheticConfig) -> SyntheticDataset {
    let today = now.date_naive();
    let days = config.lookback_days.clamp(1, MAX_LOOKBACK_DAYS);
    let start = today
        .checked_sub_days(Days::new(u64::from(days - 1)))
        .unwrap_or(today);

    let daily_activity: Vec<DailyRecord> = start
        .iter_days()
        .take(days as usize)
        .map(|date| daily_record(rng, date))
        .collect();

    let hourly_heatmap = heatmap_cells(rng);
    let insights = insights(&daily_activity, &hourly_heatmap);

    tracing::debug!(
        days = daily_activity.len(),
        start = %start,
        end = %today,
        "Generated demo dataset"
    );

    SyntheticDataset {
        daily_activity,
        language_breakdown: shares(&DEMO_LANGUAGES),
        task_breakdown: shares(&DEMO_TASKS),
        hourly_heatmap,
        conversations: sessions(now),
        insights,
        projects_assisted: DEMO_PROJECTS,
        files_modified: DEMO_FILES,
        generated_at: now,
    }
}

/// Generate with a seeded RNG when `config.seed` is set, else thread-local
/// randomness.
pub fn generate_default(config: &SyntheticConfig, now: DateTime<Utc>) -> SyntheticDataset {
    match config.seed {
        Some(seed) => generate(&mut StdRng::seed_from_u64(seed), now, config),
        None => generate(&mut rand::thread_rng(), now, config),
    }
}

fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

fn daily_record<R: Rng>(rng: &mut R, date: NaiveDate) -> DailyRecord {
    let base: u64 = if is_weekend(date.weekday()) { 5 } else { 20 };

    let conversations = base + rng.gen_range(0..30);
    let lines_generated = base * 50 + rng.gen_range(0..800);
    let time_saved = (base * 2 + rng.gen_range(0..45)) as f64;
    let code_accepted = (70 + rng.gen_range(0..25)) as f64;

    let agent_count = (conversations as f64 * rng.gen_range(0.3..0.7)).round() as u64;
    let input_tokens = (lines_generated as f64 * rng.gen_range(20.0..40.0)).round() as u64;
    let output_tokens = (lines_generated as f64 * rng.gen_range(8.0..14.0)).round() as u64;

    DailyRecord {
        date,
        conversations,
        lines_generated,
        time_saved,
        agent_count,
        chat_count: conversations - agent_count,
        input_tokens,
        output_tokens,
        code_accepted: Some(code_accepted),
    }
}

fn heatmap_cells<R: Rng>(rng: &mut R) -> Vec<HeatmapCell> {
    let mut cells = Vec::with_capacity(HEATMAP_CELLS);
    for day in HEATMAP_DAYS {
        for hour in 0..24u8 {
            let raw = if is_weekend(day) {
                rng.gen_range(0.0..0.2)
            } else if (9..=18).contains(&hour) {
                let mut v = rng.gen_range(0.2..1.0);
                if (10..=12).contains(&hour) {
                    v += 0.2;
                }
                if (14..=16).contains(&hour) {
                    v += 0.15;
                }
                v
            } else {
                rng.gen_range(0.0..0.3)
            };
            let intensity: f64 = f64::min(raw, 1.0);
            cells.push(HeatmapCell {
                day,
                hour,
                intensity,
                conversations: (intensity * 10.0).floor() as u32,
            });
        }
    }
    cells
}

fn shares(table: &[(&str, u32, &str)]) -> Vec<Share> {
    table
        .iter()
        .map(|(name, value, color)| Share {
            name: name.to_string(),
            value: *value,
            color: color.to_string(),
        })
        .collect()
}

fn sessions(now: DateTime<Utc>) -> Vec<SessionSummary> {
    DEMO_SESSIONS
        .iter()
        .enumerate()
        .map(|(i, (title, lines, kind, hours_ago))| SessionSummary {
            id: i as u32 + 1,
            title: title.to_string(),
            timestamp: now - Duration::hours(*hours_ago),
            lines_generated: *lines,
            kind: *kind,
        })
        .collect()
}

fn mean_acceptance(records: &[DailyRecord]) -> Option<f64> {
    let values: Vec<f64> = records.iter().filter_map(|d| d.code_accepted).collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Insight lines computed from the generated data.
fn insights(daily: &[DailyRecord], cells: &[HeatmapCell]) -> Vec<Insight> {
    let split = daily.len().saturating_sub(7);
    let (earlier, recent) = daily.split_at(split);
    let earlier = &earlier[earlier.len().saturating_sub(7)..];

    let acceptance = match (mean_acceptance(earlier), mean_acceptance(recent)) {
        (Some(before), Some(after)) if before > 0.0 => {
            let change = ((after - before) / before * 100.0).round() as i64;
            let kind = if change >= 0 {
                InsightKind::Positive
            } else {
                InsightKind::Warning
            };
            Insight {
                kind,
                message: format!(
                    "Your code acceptance rate changed by {} this week",
                    format::signed_percent(change)
                ),
                icon: "trending-up".to_string(),
            }
        }
        _ => Insight {
            kind: InsightKind::Info,
            message: "Keep going to see how your acceptance rate trends".to_string(),
            icon: "trending-up".to_string(),
        },
    };

    let hours_saved: f64 = daily.iter().map(|d| d.time_saved).sum();
    let peak = heatmap::peak_hour(cells).unwrap_or(10);

    vec![
        acceptance,
        Insight {
            kind: InsightKind::Positive,
            message: format!(
                "You saved approximately {} hours over the last {} days using AI",
                format::hours(hours_saved),
                daily.len()
            ),
            icon: "clock".to_string(),
        },
        Insight {
            kind: InsightKind::Info,
            message: format!("Peak productivity hours: {}", format::hour_range(peak, 2)),
            icon: "zap".to_string(),
        },
        Insight {
            kind: InsightKind::Positive,
            message: "Bug fixes resolved 40% faster with AI assistance".to_string(),
            icon: "bug".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        // A Monday.
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn seeded(seed: u64) -> SyntheticDataset {
        generate(
            &mut StdRng::seed_from_u64(seed),
            now(),
            &SyntheticConfig::default(),
        )
    }

    #[test]
    fn test_series_ends_today() {
        let data = seeded(1);
        assert_eq!(data.daily_activity.len(), 30);
        assert_eq!(
            data.daily_activity.last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
        );
        assert_eq!(
            data.daily_activity.first().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 5, 12).unwrap()
        );
        assert!(data.daily_activity.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_daily_values_in_range() {
        for day in seeded(2).daily_activity {
            let base = if is_weekend(day.date.weekday()) { 5 } else { 20 };
            assert!((base..base + 30).contains(&day.conversations));
            assert!((base * 50..base * 50 + 800).contains(&day.lines_generated));
            assert!(day.time_saved >= (base * 2) as f64);
            let accepted = day.code_accepted.unwrap();
            assert!((70.0..95.0).contains(&accepted));
            assert_eq!(day.agent_count + day.chat_count, day.conversations);
            assert!(day.input_tokens >= day.lines_generated * 20);
            assert!(day.output_tokens >= day.lines_generated * 8);
        }
    }

    #[test]
    fn test_heatmap_favors_weekday_work_hours() {
        let data = seeded(3);
        assert_eq!(data.hourly_heatmap.len(), HEATMAP_CELLS);
        for cell in &data.hourly_heatmap {
            assert!((0.0..=1.0).contains(&cell.intensity));
            assert_eq!(cell.conversations, (cell.intensity * 10.0).floor() as u32);
            if is_weekend(cell.day) {
                assert!(cell.intensity < 0.2);
            } else if (9..=18).contains(&cell.hour) {
                assert!(cell.intensity >= 0.2);
            } else {
                assert!(cell.intensity < 0.3);
            }
        }
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = seeded(42);
        let b = seeded(42);
        assert_eq!(a.daily_activity, b.daily_activity);
        assert_eq!(a.hourly_heatmap, b.hourly_heatmap);
        assert_ne!(a.daily_activity, seeded(43).daily_activity);
    }

    #[test]
    fn test_fixed_lists() {
        let data = seeded(4);
        let sum: u32 = data.language_breakdown.iter().map(|l| l.value).sum();
        assert_eq!(sum, 100);
        assert_eq!(data.task_breakdown.len(), 6);
        assert_eq!(data.conversations.len(), 5);
        assert_eq!(data.conversations[0].timestamp, now() - Duration::hours(1));
        assert_eq!(data.insights.len(), 4);
        assert_eq!(data.projects_assisted, DEMO_PROJECTS);
        assert_eq!(data.files_modified, DEMO_FILES);
    }

    #[test]
    fn test_lookback_clamped() {
        let config = SyntheticConfig {
            lookback_days: 0,
            seed: None,
        };
        let data = generate(&mut StdRng::seed_from_u64(5), now(), &config);
        assert_eq!(data.daily_activity.len(), 1);
        assert_eq!(data.insights.len(), 4);

        let config = SyntheticConfig {
            lookback_days: u32::MAX,
            seed: None,
        };
        let data = generate(&mut StdRng::seed_from_u64(5), now(), &config);
        assert_eq!(data.daily_activity.len(), MAX_LOOKBACK_DAYS as usize);
        assert_eq!(data.daily_activity.last().unwrap().date, now().date_naive());
    }
}
