//! Usage export import
//!
//! Turns an export blob into an [`AnalyticsModel`]. The flow is:
//!
//! 1. [`parse_import`] validates the blob into a [`RawImport`] or fails with
//!    a [`ParseError`]. It never invents data.
//! 2. [`Loader`] decides what to show: the built model on success, or a
//!    generated demo dataset when there is nothing usable to import.
//!
//! Reading the blob (HTTP fetch, file upload) is the caller's job; the loader
//! only offers [`Loader::load_file`] as a convenience for the CLI.

pub mod raw;

pub use raw::{RawDailyRecord, RawHourly, RawImport, RawLanguage, RawSummary, RawTrends};

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::config::SyntheticConfig;
use crate::error::{ParseError, Result};
use crate::model::ModelBuilder;
use crate::synthetic;
use crate::types::{AnalyticsModel, DataSource};

/// Parse an export blob.
///
/// Fails wholesale on invalid JSON, on a non-object document and on any
/// present key with the wrong shape. Absent keys are fine.
pub fn parse_import(text: &str) -> std::result::Result<RawImport, ParseError> {
    let raw: RawImport = serde_json::from_str(text)?;
    Ok(raw)
}

/// Options controlling how [`Loader`] treats its input.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Treat an export without generated lines as empty and show demo data
    /// instead. Used for the bundled static export, not for user uploads.
    pub require_activity: bool,
    /// Shape of the demo dataset used as fallback
    pub synthetic: SyntheticConfig,
}

/// A loaded model and where it came from.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub model: AnalyticsModel,
    pub source: DataSource,
}

/// Loads a model from an export, falling back to demo data.
#[derive(Debug, Clone)]
pub struct Loader {
    options: LoadOptions,
    now: DateTime<Utc>,
}

impl Loader {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            now: Utc::now(),
        }
    }

    /// Pin the clock used for demo data and synthesized session timestamps.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Load from an export blob, or from nothing when the read failed.
    ///
    /// Never fails: every unusable input yields a demo model.
    pub fn load(&self, text: Option<&str>) -> Loaded {
        let Some(text) = text else {
            tracing::info!("No export available, using demo data");
            return self.demo();
        };

        let raw = match parse_import(text) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse usage export, using demo data");
                return self.demo();
            }
        };

        if self.options.require_activity && !raw.has_activity() {
            tracing::info!("Export has no generated lines, using demo data");
            return self.demo();
        }

        let model = ModelBuilder::new(self.now).from_import(raw);
        tracing::info!(
            days = model.daily_activity.len(),
            conversations = model.summary.total_conversations,
            "Loaded usage export"
        );
        Loaded {
            model,
            source: DataSource::Imported,
        }
    }

    /// Read `path` and load it.
    ///
    /// An unreadable file is an error since the caller asked for it by name;
    /// an unparseable one still falls back to demo data.
    pub fn load_file(&self, path: &Path) -> Result<Loaded> {
        let text = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "Read usage export");
        Ok(self.load(Some(&text)))
    }

    /// A freshly generated demo model.
    pub fn demo(&self) -> Loaded {
        let dataset = synthetic::generate_default(&self.options.synthetic, self.now);
        Loaded {
            model: ModelBuilder::new(self.now).from_synthetic(dataset),
            source: DataSource::Demo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn loader() -> Loader {
        Loader::new(LoadOptions {
            synthetic: SyntheticConfig {
                seed: Some(7),
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn test_parse_import_rejects_malformed_json() {
        let err = parse_import("{not json").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_parse_import_rejects_wrong_shape() {
        assert!(matches!(
            parse_import("[1, 2, 3]").unwrap_err(),
            ParseError::Schema { .. }
        ));
        assert!(matches!(
            parse_import(r#"{"dailyActivity": "lots"}"#).unwrap_err(),
            ParseError::Schema { .. }
        ));
    }

    #[test]
    fn test_parse_import_accepts_empty_object() {
        let raw = parse_import("{}").unwrap();
        assert!(raw.summary.is_none());
        assert!(raw.daily_activity.is_none());
    }

    #[test]
    fn test_load_falls_back_on_parse_error() {
        let loaded = loader().load(Some("{not json"));
        assert_eq!(loaded.source, DataSource::Demo);
        assert!(!loaded.model.daily_activity.is_empty());
    }

    #[test]
    fn test_load_without_input_is_demo() {
        assert_eq!(loader().load(None).source, DataSource::Demo);
    }

    #[test]
    fn test_require_activity() {
        let mut loader = loader();
        loader.options.require_activity = true;

        let empty = loader.load(Some(r#"{"summary": {"totalLinesGenerated": 0}}"#));
        assert_eq!(empty.source, DataSource::Demo);

        let real = loader.load(Some(r#"{"summary": {"totalLinesGenerated": 10}}"#));
        assert_eq!(real.source, DataSource::Imported);
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.json");
        std::fs::write(&path, r#"{"summary": {"totalConversations": 3}}"#).unwrap();

        let loaded = loader().load_file(&path).unwrap();
        assert_eq!(loaded.source, DataSource::Imported);
        assert_eq!(loaded.model.summary.total_conversations, 3);

        assert!(loader().load_file(&dir.path().join("missing.json")).is_err());
    }
}
