use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;
use tabled::Tabled;

/// Outcome of deriving one field from raw text.
///
/// Keeps "no data" apart from "bad data" so diagnostics can report both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome<T> {
    Present(T),
    /// The raw text was there but could not be interpreted.
    Invalid(String),
    /// Blank or `NaN` in the source.
    Missing,
}

impl<T> FieldOutcome<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            FieldOutcome::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, FieldOutcome::Present(_))
    }
}

/// Day of the week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];
}

impl From<chrono::Weekday> for Weekday {
    fn from(w: chrono::Weekday) -> Self {
        Weekday::ALL[w.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Calendar month bucket, displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl From<NaiveDate> for MonthKey {
    fn from(d: NaiveDate) -> Self {
        MonthKey { year: d.year(), month: d.month() }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Time granularity used to bucket incidents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKey {
    Year,
    Month,
    Weekday,
    Hour,
}

/// A bucket under one [`PeriodKey`]. Values of the same key sort naturally:
/// numerically for years and hours, chronologically for months and Monday
/// first for weekdays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    Year(i32),
    Month(MonthKey),
    Weekday(Weekday),
    Hour(u8),
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Year(y) => write!(f, "{}", y),
            Period::Month(m) => write!(f, "{}", m),
            Period::Weekday(w) => write!(f, "{}", w),
            Period::Hour(h) => write!(f, "{:02}", h),
        }
    }
}

/// Categorical fields that can be ranked or pivoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    Neighborhood,
    LocationDescription,
}

/// One incident after normalization and filtering.
///
/// Only constructed by the loader, which guarantees the municipality matched
/// and the neighborhood is not a placeholder. Calendar fields are computed
/// from `fact_date` on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedIncident {
    municipality: String,
    neighborhood: String,
    fact_date: FieldOutcome<NaiveDate>,
    fact_hour: FieldOutcome<u8>,
    location_description: Option<String>,
}

impl CleanedIncident {
    pub(crate) fn new(
        municipality: String,
        neighborhood: String,
        fact_date: FieldOutcome<NaiveDate>,
        fact_hour: FieldOutcome<u8>,
        location_description: Option<String>,
    ) -> Self {
        Self { municipality, neighborhood, fact_date, fact_hour, location_description }
    }

    pub fn municipality(&self) -> &str {
        &self.municipality
    }

    pub fn neighborhood(&self) -> &str {
        &self.neighborhood
    }

    pub fn fact_date_outcome(&self) -> &FieldOutcome<NaiveDate> {
        &self.fact_date
    }

    pub fn fact_date(&self) -> Option<NaiveDate> {
        self.fact_date.value().copied()
    }

    pub fn fact_year(&self) -> Option<i32> {
        self.fact_date().map(|d| d.year())
    }

    pub fn fact_month_key(&self) -> Option<MonthKey> {
        self.fact_date().map(MonthKey::from)
    }

    pub fn fact_weekday(&self) -> Option<Weekday> {
        self.fact_date().map(|d| d.weekday().into())
    }

    pub fn fact_hour_outcome(&self) -> &FieldOutcome<u8> {
        &self.fact_hour
    }

    pub fn fact_hour(&self) -> Option<u8> {
        self.fact_hour.value().copied()
    }

    pub fn location_description(&self) -> Option<&str> {
        self.location_description.as_deref()
    }

    pub fn category(&self, field: CategoryField) -> Option<&str> {
        match field {
            CategoryField::Neighborhood => Some(self.neighborhood()),
            CategoryField::LocationDescription => self.location_description(),
        }
    }

    pub fn period(&self, key: PeriodKey) -> Option<Period> {
        match key {
            PeriodKey::Year => self.fact_year().map(Period::Year),
            PeriodKey::Month => self.fact_month_key().map(Period::Month),
            PeriodKey::Weekday => self.fact_weekday().map(Period::Weekday),
            PeriodKey::Hour => self.fact_hour().map(Period::Hour),
        }
    }
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq, Eq)]
pub struct CategoryCountRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Incidents")]
    #[tabled(rename = "Incidents")]
    pub incidents: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq, Eq)]
pub struct PeriodCountRow {
    #[serde(rename = "Period")]
    #[tabled(rename = "Period")]
    pub period: String,
    #[serde(rename = "Incidents")]
    #[tabled(rename = "Incidents")]
    pub incidents: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SummaryStats {
    pub municipality: String,
    pub total_incidents: usize,
    pub dated_incidents: usize,
    pub incidents_with_hour: usize,
    pub distinct_neighborhoods: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub peak_hour: Option<u8>,
    pub peak_weekday: Option<Weekday>,
}
