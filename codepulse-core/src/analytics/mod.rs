//! Range analytics for codepulse
//!
//! Everything the dashboard shows for a selected window is derived here from
//! the model's daily series:
//! - Date windows and presets ([`range`])
//! - Totals, streaks, busiest day, half-over-half trends, mode split and
//!   token usage ([`aggregate`])
//! - An optional last-result memo keyed by model fingerprint ([`memo`])
//!
//! Lifetime-only figures (acceptance, projects, files, peak hour) come from
//! the model unchanged.

pub mod aggregate;
pub mod memo;
pub mod range;

pub use aggregate::{
    aggregate, longest_streak, BusiestDay, DerivedView, ModeBreakdown, RangeSummary, RangeTrends,
    TokenUsage, NOT_AVAILABLE,
};
pub use memo::{fingerprint, RangeMemo};
pub use range::{DateRange, RangePreset};
