//! Report configuration.
//!
//! Every knob that differed between the old per-report scripts lives here, so
//! a report variant is a [`ReportConfig`] rather than a forked loader. The
//! defaults describe the Pouso Alegre theft extract.
use crate::error::ConfigError;
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SOURCE: &str = "Alvos - Furto - Jan 2022 a Abr 2025.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Municipality kept after filtering (compared trimmed, case-insensitive).
    pub target_municipality: String,
    pub municipality_column: String,
    /// Neighborhood header spellings, tried in order.
    pub neighborhood_columns: Vec<String>,
    pub date_column: String,
    pub time_column: String,
    /// Optional column; the location view is empty when it is absent.
    pub location_column: String,
    /// Neighborhood placeholders meaning "unknown". Blank is always excluded.
    pub sentinels: Vec<String>,
    /// WHATWG encoding label, e.g. `latin1` or `utf-8`.
    pub encoding: String,
    pub delimiter: String,
    /// Restrict every view to incidents with a parseable fact date.
    pub require_date: bool,
    pub top_n: usize,
    pub top_locations: usize,
    /// Neighborhoods charted in the per-neighborhood trend. Falls back to the
    /// `top_n` busiest neighborhoods when unset.
    pub trend_neighborhoods: Option<Vec<String>>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            target_municipality: "POUSO ALEGRE".to_string(),
            municipality_column: "Município".to_string(),
            neighborhood_columns: vec!["Bairro - FATO FINAL".to_string(), "Bairro".to_string()],
            date_column: "Data Fato".to_string(),
            time_column: "Horário Fato".to_string(),
            location_column: "Descrição do Local".to_string(),
            sentinels: ["DESCONHECIDO", "NÃO CADASTRADO", "NÃO INFORMADO", "N/I"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            encoding: "latin1".to_string(),
            delimiter: ";".to_string(),
            require_date: false,
            top_n: 10,
            top_locations: 10,
            trend_neighborhoods: None,
        }
    }
}

impl ReportConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: ReportConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Check the settings that can only be verified at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.source_encoding()?;
        self.delimiter_byte()?;
        Ok(())
    }

    pub fn source_encoding(&self) -> Result<&'static Encoding, ConfigError> {
        Encoding::for_label(self.encoding.trim().as_bytes())
            .ok_or_else(|| ConfigError::UnknownEncoding(self.encoding.clone()))
    }

    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ConfigError::Delimiter(self.delimiter.clone())),
        }
    }

    /// True when an already upper-cased, trimmed neighborhood is a placeholder.
    pub fn is_sentinel(&self, neighborhood: &str) -> bool {
        neighborhood.is_empty()
            || self
                .sentinels
                .iter()
                .any(|s| s.trim().to_uppercase() == neighborhood)
    }

    /// Stable text form used to key cached loads.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
