//! Last-result memo for [`aggregate`].

use sha2::{Digest, Sha256};

use super::aggregate::{aggregate, DerivedView};
use super::range::DateRange;
use crate::types::AnalyticsModel;

/// SHA-256 hex digest of everything [`aggregate`] reads from a model.
pub fn fingerprint(model: &AnalyticsModel) -> String {
    let mut hasher = Sha256::new();

    for day in &model.daily_activity {
        hasher.update(day.date.to_string().as_bytes());
        hasher.update(day.conversations.to_le_bytes());
        hasher.update(day.lines_generated.to_le_bytes());
        hasher.update(day.time_saved.to_bits().to_le_bytes());
        hasher.update(day.agent_count.to_le_bytes());
        hasher.update(day.chat_count.to_le_bytes());
        hasher.update(day.input_tokens.to_le_bytes());
        hasher.update(day.output_tokens.to_le_bytes());
    }

    let s = &model.summary;
    hasher.update(u64::from(s.avg_acceptance).to_le_bytes());
    hasher.update(s.projects_assisted.to_le_bytes());
    hasher.update(s.files_modified.to_le_bytes());
    hasher.update([model.peak_hour]);

    hex::encode(hasher.finalize())
}

#[derive(Debug)]
struct Entry {
    fingerprint: String,
    range: DateRange,
    view: DerivedView,
}

/// Caches the most recent `(model, range)` view.
///
/// A hit requires the same model fingerprint and an equal range, so a new
/// import or a different window always recomputes.
#[derive(Debug, Default)]
pub struct RangeMemo {
    last: Option<Entry>,
    hits: u64,
    misses: u64,
}

impl RangeMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The view of `model` for `range`, reusing the last one when possible.
    pub fn view(&mut self, model: &AnalyticsModel, range: &DateRange) -> &DerivedView {
        let fingerprint = fingerprint(model);
        let hit = self
            .last
            .as_ref()
            .is_some_and(|e| e.fingerprint == fingerprint && e.range == *range);

        if hit {
            self.hits += 1;
            tracing::trace!(label = %range.label, "Range memo hit");
        } else {
            self.misses += 1;
            self.last = None;
        }

        let entry = self.last.get_or_insert_with(|| Entry {
            fingerprint,
            range: range.clone(),
            view: aggregate(model, range),
        });
        &entry.view
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop the cached view.
    pub fn clear(&mut self) {
        self.last = None;
    }
}
