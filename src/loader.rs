use crate::config::ReportConfig;
use crate::error::LoadError;
use crate::types::{CleanedIncident, FieldOutcome};
use crate::util::{is_blank, normalize_label, parse_date_safe, parse_hour_safe};
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use std::path::Path;

/// Row accounting for one load, kept for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub unreadable_rows: usize,
    pub dropped_municipality: usize,
    pub dropped_neighborhood: usize,
    pub kept_rows: usize,
    pub date_invalid: usize,
    pub date_missing: usize,
    pub hour_invalid: usize,
    pub hour_missing: usize,
}

/// Cleaned incidents for the target municipality, in source order.
#[derive(Debug, Clone)]
pub struct Dataset {
    incidents: Vec<CleanedIncident>,
    report: LoadReport,
    has_location_column: bool,
}

impl Dataset {
    pub fn incidents(&self) -> &[CleanedIncident] {
        &self.incidents
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Whether the source carried the incident-location column at all.
    pub fn has_location_column(&self) -> bool {
        self.has_location_column
    }

    /// Incidents whose fact date parsed. The base set is left untouched.
    pub fn dated(&self) -> impl Iterator<Item = &CleanedIncident> + '_ {
        self.incidents.iter().filter(|i| i.fact_date().is_some())
    }

    /// The records a report should aggregate over.
    pub fn view(&self, require_date: bool) -> Vec<&CleanedIncident> {
        if require_date {
            self.dated().collect()
        } else {
            self.incidents.iter().collect()
        }
    }
}

/// Header positions of the columns the loader reads.
#[derive(Debug, Clone)]
struct ColumnMap {
    municipality: usize,
    neighborhood: usize,
    date: usize,
    time: Option<usize>,
    location: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord, config: &ReportConfig) -> Result<Self, LoadError> {
        let names: Vec<&str> = headers.iter().map(str::trim).collect();
        let find = |wanted: &str| names.iter().position(|h| *h == wanted.trim());

        let required = |column: &'static str, candidates: &[String]| {
            candidates
                .iter()
                .find_map(|c| find(c.as_str()))
                .ok_or_else(|| LoadError::Schema { column, tried: candidates.to_vec() })
        };

        Ok(ColumnMap {
            municipality: required("municipality", std::slice::from_ref(&config.municipality_column))?,
            neighborhood: required("neighborhood", &config.neighborhood_columns)?,
            date: required("date", std::slice::from_ref(&config.date_column))?,
            time: find(&config.time_column),
            location: find(&config.location_column),
        })
    }
}

/// Read a source file once and clean it.
pub fn load_path(path: &Path, config: &ReportConfig) -> Result<Dataset, LoadError> {
    let bytes = std::fs::read(path)?;
    load(&bytes, config)
}

/// Decode, parse, filter and normalize a raw extract.
///
/// Rows outside the target municipality or with a placeholder neighborhood
/// are dropped. Unparseable dates and times never drop a row; the field is
/// recorded as invalid or missing instead.
pub fn load(bytes: &[u8], config: &ReportConfig) -> Result<Dataset, LoadError> {
    let encoding = config
        .source_encoding()
        .map_err(|_| LoadError::Encoding { encoding: "unknown" })?;
    let text = encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or(LoadError::Encoding { encoding: encoding.name() })?;
    let text: &str = &text;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let delimiter = config.delimiter_byte().unwrap_or(b';');
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = rdr.headers()?.clone();
    let columns = ColumnMap::resolve(&headers, config)?;
    let target = normalize_label(&config.target_municipality);

    let mut report = LoadReport::default();
    let mut incidents = Vec::new();

    for result in rdr.records() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping unreadable row {}: {}", report.total_rows, e);
                report.unreadable_rows += 1;
                continue;
            }
        };
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let municipality = normalize_label(cell(columns.municipality));
        if municipality != target {
            report.dropped_municipality += 1;
            continue;
        }

        let neighborhood = normalize_label(cell(columns.neighborhood));
        if config.is_sentinel(&neighborhood) {
            report.dropped_neighborhood += 1;
            continue;
        }

        let fact_date = parse_date_safe(row.get(columns.date));
        match &fact_date {
            FieldOutcome::Invalid(raw) => {
                log::debug!("Row {}: unparseable date '{}'", report.total_rows, raw);
                report.date_invalid += 1;
            }
            FieldOutcome::Missing => report.date_missing += 1,
            FieldOutcome::Present(_) => {}
        }

        let fact_hour = parse_hour_safe(columns.time.and_then(|idx| row.get(idx)));
        match &fact_hour {
            FieldOutcome::Invalid(raw) => {
                log::debug!("Row {}: unparseable time '{}'", report.total_rows, raw);
                report.hour_invalid += 1;
            }
            FieldOutcome::Missing => report.hour_missing += 1,
            FieldOutcome::Present(_) => {}
        }

        let location_description = columns
            .location
            .and_then(|idx| row.get(idx))
            .filter(|s| !is_blank(s))
            .map(normalize_label);

        incidents.push(CleanedIncident::new(
            municipality,
            neighborhood,
            fact_date,
            fact_hour,
            location_description,
        ));
    }

    report.kept_rows = incidents.len();
    log::info!(
        "Loaded {} rows: kept {}, dropped {} outside {}, {} with unknown neighborhood",
        report.total_rows,
        report.kept_rows,
        report.dropped_municipality,
        target,
        report.dropped_neighborhood
    );

    Ok(Dataset {
        incidents,
        report,
        has_location_column: columns.location.is_some(),
    })
}
