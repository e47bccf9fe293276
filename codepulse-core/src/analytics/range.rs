//! Date windows for the range aggregator.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::error::{Error, Result};

/// Preset windows offered by the range selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangePreset {
    Today,
    Last7Days,
    Last14Days,
    Last30Days,
    Last90Days,
    AllTime,
}

impl RangePreset {
    /// All presets in menu order.
    pub const ALL: [RangePreset; 6] = [
        RangePreset::Today,
        RangePreset::Last7Days,
        RangePreset::Last14Days,
        RangePreset::Last30Days,
        RangePreset::Last90Days,
        RangePreset::AllTime,
    ];

    /// Display label (e.g., "Last 7 days").
    pub fn label(&self) -> &'static str {
        match self {
            RangePreset::Today => "Today",
            RangePreset::Last7Days => "Last 7 days",
            RangePreset::Last14Days => "Last 14 days",
            RangePreset::Last30Days => "Last 30 days",
            RangePreset::Last90Days => "Last 90 days",
            RangePreset::AllTime => "All time",
        }
    }

    /// Window length in days, `None` for all time.
    pub fn days(&self) -> Option<u32> {
        match self {
            RangePreset::Today => Some(1),
            RangePreset::Last7Days => Some(7),
            RangePreset::Last14Days => Some(14),
            RangePreset::Last30Days => Some(30),
            RangePreset::Last90Days => Some(90),
            RangePreset::AllTime => None,
        }
    }

    /// Short name used on the command line and in config.
    pub fn as_str(&self) -> &'static str {
        match self {
            RangePreset::Today => "today",
            RangePreset::Last7Days => "7d",
            RangePreset::Last14Days => "14d",
            RangePreset::Last30Days => "30d",
            RangePreset::Last90Days => "90d",
            RangePreset::AllTime => "all",
        }
    }
}

impl std::str::FromStr for RangePreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" | "1d" => Ok(RangePreset::Today),
            "7d" => Ok(RangePreset::Last7Days),
            "14d" => Ok(RangePreset::Last14Days),
            "30d" => Ok(RangePreset::Last30Days),
            "90d" => Ok(RangePreset::Last90Days),
            "all" | "all-time" => Ok(RangePreset::AllTime),
            _ => Err(format!(
                "unknown range: {} (expected today, 7d, 14d, 30d, 90d or all)",
                s
            )),
        }
    }
}

/// An inclusive window of calendar dates.
///
/// `start = None` or `days = None` selects all time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: NaiveDate,
    pub label: String,
    pub days: Option<u32>,
}

impl DateRange {
    /// Every record, whatever its date.
    pub fn all_time(end: NaiveDate) -> Self {
        Self {
            start: None,
            end,
            label: RangePreset::AllTime.label().to_string(),
            days: None,
        }
    }

    /// The `preset` window ending on `today`.
    ///
    /// An N-day preset covers exactly N calendar days, `today` included.
    pub fn preset(preset: RangePreset, today: NaiveDate) -> Self {
        let Some(days) = preset.days() else {
            return Self::all_time(today);
        };
        let start = today
            .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
            .unwrap_or(NaiveDate::MIN);
        Self {
            start: Some(start),
            end: today,
            label: preset.label().to_string(),
            days: Some(days),
        }
    }

    /// A custom inclusive window.
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        let days = (end - start).num_days() + 1;
        Ok(Self {
            start: Some(start),
            end,
            label: format!("{} - {}", start.format("%b %d"), end.format("%b %d")),
            days: Some(u32::try_from(days).unwrap_or(u32::MAX)),
        })
    }

    pub fn is_all_time(&self) -> bool {
        self.start.is_none() || self.days.is_none()
    }

    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.days) {
            (Some(start), Some(_)) => start <= date && date <= self.end,
            _ => true,
        }
    }
}
