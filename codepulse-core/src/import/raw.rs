//! Raw export shape
//!
//! Mirrors the JSON written by usage exporters. Every key is optional and
//! numeric counters are read leniently (floats floored, negatives clamped to
//! zero, `null` treated as absent). A key that is present with the wrong JSON
//! type is a schema mismatch and fails the whole parse.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::Deserialize;

use crate::types::{parse_weekday, DailyRecord, Trends, HEATMAP_DAYS};

/// A parsed, still untrusted usage export.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImport {
    #[serde(default)]
    pub summary: Option<RawSummary>,
    #[serde(default)]
    pub daily_activity: Option<Vec<RawDailyRecord>>,
    #[serde(default)]
    pub language_breakdown: Option<Vec<RawLanguage>>,
    #[serde(default)]
    pub hourly_distribution: Option<Vec<RawHourly>>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub streak_days: Option<u64>,
    #[serde(default)]
    pub trends: Option<RawTrends>,
    #[serde(default)]
    pub top_projects: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub weekly_trends: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub monthly_trends: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub day_of_week_breakdown: Option<Vec<serde_json::Value>>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub last_activity: Option<DateTime<Utc>>,
}

impl RawImport {
    /// Whether the export reports any generated code at all.
    pub fn has_activity(&self) -> bool {
        self.summary
            .as_ref()
            .and_then(|s| s.total_lines_generated)
            .is_some_and(|lines| lines > 0)
    }
}

/// Aggregate counters from the export's `summary` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSummary {
    #[serde(default, deserialize_with = "de::opt_count")]
    pub total_conversations: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub total_lines_generated: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_amount")]
    pub total_time_saved: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_amount")]
    pub avg_acceptance: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub projects_assisted: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub files_modified: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub total_messages: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub active_days: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub avg_per_day: Option<u64>,
}

/// One entry of `dailyActivity`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDailyRecord {
    #[serde(deserialize_with = "de::date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "de::count")]
    pub conversations: u64,
    #[serde(default, deserialize_with = "de::count")]
    pub lines_generated: u64,
    #[serde(default, deserialize_with = "de::opt_amount")]
    pub time_saved: Option<f64>,
    #[serde(default, deserialize_with = "de::count")]
    pub agent_count: u64,
    #[serde(default, deserialize_with = "de::count")]
    pub chat_count: u64,
    #[serde(default, deserialize_with = "de::count")]
    pub input_tokens: u64,
    #[serde(default, deserialize_with = "de::count")]
    pub output_tokens: u64,
    #[serde(default, deserialize_with = "de::opt_amount")]
    pub code_accepted: Option<f64>,
}

impl From<RawDailyRecord> for DailyRecord {
    fn from(raw: RawDailyRecord) -> Self {
        DailyRecord {
            date: raw.date,
            conversations: raw.conversations,
            lines_generated: raw.lines_generated,
            time_saved: raw.time_saved.unwrap_or(0.0),
            agent_count: raw.agent_count,
            chat_count: raw.chat_count,
            input_tokens: raw.input_tokens,
            output_tokens: raw.output_tokens,
            code_accepted: raw.code_accepted,
        }
    }
}

/// One entry of `languageBreakdown`: a raw count, not yet a percentage.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLanguage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "count", deserialize_with = "de::opt_amount")]
    pub value: Option<f64>,
}

/// One entry of `hourlyDistribution`.
///
/// `day` is optional; when any entry carries one the distribution is treated
/// as weekday-differentiated.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHourly {
    #[serde(default, deserialize_with = "de::opt_signed")]
    pub hour: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_amount")]
    pub count: Option<f64>,
    #[serde(default)]
    pub day: Option<serde_json::Value>,
}

impl RawHourly {
    /// Hour of day, if within 0-23.
    pub fn hour_of_day(&self) -> Option<usize> {
        self.hour
            .filter(|h| (0..24).contains(h))
            .map(|h| h as usize)
    }

    /// Weekday from a name ("Sun", "Monday") or an index (0 = Sunday).
    pub fn weekday(&self) -> Option<Weekday> {
        match self.day.as_ref()? {
            serde_json::Value::String(s) => parse_weekday(s),
            serde_json::Value::Number(n) => n
                .as_u64()
                .and_then(|i| HEATMAP_DAYS.get(i as usize).copied()),
            _ => None,
        }
    }
}

/// The export's `trends` block, with lenient numbers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrends {
    #[serde(default, deserialize_with = "de::opt_count")]
    pub this_week: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_count")]
    pub last_week: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_signed")]
    pub week_over_week_growth: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_signed")]
    pub peak_hour: Option<i64>,
    #[serde(default)]
    pub best_day: Option<String>,
}

impl From<RawTrends> for Trends {
    fn from(raw: RawTrends) -> Self {
        Trends {
            this_week: raw.this_week,
            last_week: raw.last_week,
            week_over_week_growth: raw.week_over_week_growth,
            peak_hour: raw
                .peak_hour
                .filter(|h| (0..24).contains(h))
                .map(|h| h as u8),
            best_day: raw.best_day,
        }
    }
}

/// Lenient field deserializers.
pub(crate) mod de {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Number;

    /// Non-negative integer count; absent or `null` reads as 0.
    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(opt_count(d)?.unwrap_or(0))
    }

    pub fn opt_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        let n = Option::<Number>::deserialize(d)?;
        Ok(n.map(|n| clamp_count(&n)))
    }

    /// Non-negative real amount (hours, percentages).
    pub fn opt_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let n = Option::<Number>::deserialize(d)?;
        Ok(n.map(|n| {
            let v = n.as_f64().unwrap_or(0.0);
            if v.is_finite() && v > 0.0 {
                v
            } else {
                0.0
            }
        }))
    }

    /// Signed integer, rounded when fractional.
    pub fn opt_signed<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        let n = Option::<Number>::deserialize(d)?;
        Ok(n.and_then(|n| match n.as_i64() {
            Some(v) => Some(v),
            None => n
                .as_f64()
                .filter(|v| v.is_finite())
                .map(|v| v.round() as i64),
        }))
    }

    pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(d)?;
        parse_date(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {:?}", s)))
    }

    pub fn opt_timestamp<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let Some(s) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        if let Ok(ts) = DateTime::parse_from_rfc3339(s.trim()) {
            return Ok(Some(ts.with_timezone(&Utc)));
        }
        parse_date(&s)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Some(naive.and_utc()))
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {:?}", s)))
    }

    /// `YYYY-MM-DD`, or the date part of an RFC 3339 timestamp.
    pub fn parse_date(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|ts| ts.date_naive()))
    }

    fn clamp_count(n: &Number) -> u64 {
        if let Some(v) = n.as_u64() {
            return v;
        }
        if n.is_i64() {
            // negative integer
            return 0;
        }
        match n.as_f64() {
            Some(v) if v.is_finite() && v > 0.0 => v.floor() as u64,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_counts() {
        let raw: RawDailyRecord = serde_json::from_str(
            r#"{"date": "2024-06-01", "conversations": 12.7, "linesGenerated": -4, "chatCount": null}"#,
        )
        .unwrap();
        assert_eq!(raw.conversations, 12);
        assert_eq!(raw.lines_generated, 0);
        assert_eq!(raw.chat_count, 0);
        assert_eq!(raw.time_saved, None);
    }

    #[test]
    fn test_rfc3339_daily_date() {
        let raw: RawDailyRecord =
            serde_json::from_str(r#"{"date": "2024-06-01T18:30:00Z"}"#).unwrap();
        assert_eq!(raw.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let result = serde_json::from_str::<RawDailyRecord>(r#"{"date": "yesterday"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_hourly_weekday_forms() {
        let by_name: RawHourly = serde_json::from_str(r#"{"hour": 9, "count": 3, "day": "Tue"}"#).unwrap();
        assert_eq!(by_name.weekday(), Some(Weekday::Tue));

        let by_index: RawHourly = serde_json::from_str(r#"{"hour": 9, "count": 3, "day": 0}"#).unwrap();
        assert_eq!(by_index.weekday(), Some(Weekday::Sun));

        let out_of_range: RawHourly = serde_json::from_str(r#"{"hour": 24, "count": 3}"#).unwrap();
        assert_eq!(out_of_range.hour_of_day(), None);
    }

    #[test]
    fn test_has_activity() {
        let raw: RawImport =
            serde_json::from_str(r#"{"summary": {"totalLinesGenerated": 10}}"#).unwrap();
        assert!(raw.has_activity());

        let raw: RawImport = serde_json::from_str(r#"{"summary": {}}"#).unwrap();
        assert!(!raw.has_activity());
        assert!(!RawImport::default().has_activity());
    }

    #[test]
    fn test_last_activity_accepts_plain_date() {
        let raw: RawImport = serde_json::from_str(r#"{"lastActivity": "2024-06-02"}"#).unwrap();
        assert_eq!(
            raw.last_activity.unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2024, 6, 2).unwrap()
        );
    }
}
