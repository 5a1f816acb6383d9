//! Cleaning and aggregation core for municipal theft-incident reports.
//!
//! [`loader::load`] turns a raw semicolon-separated extract into a
//! [`loader::Dataset`] of cleaned incidents; [`aggregate`] answers the
//! counting queries every chart needs and [`reports`] bundles them into the
//! tables a renderer consumes.
pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

pub use aggregate::{counts_by_category_and_period, counts_by_period, top_categories, Pivot};
pub use config::ReportConfig;
pub use error::{ConfigError, LoadError};
pub use loader::{load, load_path, Dataset, LoadReport};
pub use types::{CategoryField, CleanedIncident, FieldOutcome, MonthKey, Period, PeriodKey, Weekday};
