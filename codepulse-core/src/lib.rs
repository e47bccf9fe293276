//! # codepulse-core
//!
//! Core library for codepulse - an AI coding activity dashboard.
//!
//! This library provides:
//! - Parsing of usage exports, with a demo dataset fallback
//! - The canonical analytics model and its build defaults
//! - Range aggregation over the daily series
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Data flow
//!
//! - **Import:** an export blob parses into a [`RawImport`](import::RawImport),
//!   or the loader generates demo data instead
//! - **Model:** [`ModelBuilder`] turns either into an immutable [`AnalyticsModel`]
//! - **View:** [`aggregate`] derives a [`DerivedView`](analytics::DerivedView)
//!   for any [`DateRange`], recomputed on every range change
//!
//! ## Example
//!
//! ```rust,no_run
//! use codepulse_core::{aggregate, Config, DateRange, LoadOptions, Loader, RangePreset};
//!
//! let config = Config::load().expect("failed to load config");
//! let loaded = Loader::new(LoadOptions::default())
//!     .load_file(std::path::Path::new("usage.json"))
//!     .expect("failed to read export");
//!
//! let today = chrono::Utc::now().date_naive();
//! let preset = config.dashboard.range_preset().unwrap_or(RangePreset::Last30Days);
//! let view = aggregate(&loaded.model, &DateRange::preset(preset, today));
//! println!("{} conversations", view.summary.total_conversations);
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{aggregate, DateRange, DerivedView, RangeMemo, RangePreset};
pub use config::Config;
pub use error::{Error, ParseError, Result};
pub use import::{parse_import, LoadOptions, Loaded, Loader};
pub use model::ModelBuilder;
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod import;
pub mod logging;
pub mod model;
pub mod synthetic;
pub mod types;
