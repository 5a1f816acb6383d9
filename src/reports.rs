use crate::aggregate::{counts_by_category_and_period, counts_by_period, top_categories, Pivot};
use crate::config::ReportConfig;
use crate::loader::Dataset;
use crate::types::{
    CategoryCountRow, CategoryField, CleanedIncident, Period, PeriodCountRow, PeriodKey, SummaryStats,
    Weekday,
};
use std::collections::{BTreeMap, HashSet};

/// Every table the report renders, already cleaned and ordered.
#[derive(Debug, Clone)]
pub struct ReportSet {
    pub top_neighborhoods: Vec<CategoryCountRow>,
    pub yearly: Vec<PeriodCountRow>,
    pub neighborhood_trend: Pivot,
    pub hourly: Vec<PeriodCountRow>,
    pub weekday: Vec<PeriodCountRow>,
    pub monthly: Vec<PeriodCountRow>,
    /// Empty when the source has no location column.
    pub top_locations: Vec<CategoryCountRow>,
    pub summary: SummaryStats,
}

fn category_rows(pairs: Vec<(String, usize)>) -> Vec<CategoryCountRow> {
    pairs
        .into_iter()
        .map(|(category, incidents)| CategoryCountRow { category, incidents })
        .collect()
}

fn period_rows(counts: BTreeMap<Period, usize>) -> Vec<PeriodCountRow> {
    counts
        .into_iter()
        .map(|(p, incidents)| PeriodCountRow { period: p.to_string(), incidents })
        .collect()
}

pub fn generate_top_neighborhoods(data: &[&CleanedIncident], n: usize) -> Vec<CategoryCountRow> {
    category_rows(top_categories(data.iter().copied(), CategoryField::Neighborhood, n, true))
}

pub fn generate_yearly(data: &[&CleanedIncident]) -> Vec<PeriodCountRow> {
    period_rows(counts_by_period(data.iter().copied(), PeriodKey::Year))
}

/// Yearly counts for a fixed neighborhood list, or the `n` busiest ones.
pub fn generate_neighborhood_trend(
    data: &[&CleanedIncident],
    neighborhoods: Option<&[String]>,
    n: usize,
) -> Pivot {
    let chosen: Vec<String> = match neighborhoods {
        Some(list) => list.to_vec(),
        None => top_categories(data.iter().copied(), CategoryField::Neighborhood, n, false)
            .into_iter()
            .map(|(name, _)| name)
            .collect(),
    };
    counts_by_category_and_period(data.iter().copied(), CategoryField::Neighborhood, &chosen, PeriodKey::Year)
}

pub fn generate_hourly(data: &[&CleanedIncident]) -> Vec<PeriodCountRow> {
    period_rows(counts_by_period(data.iter().copied(), PeriodKey::Hour))
}

/// All seven weekdays, Monday first, zero when no incident fell on that day.
pub fn generate_weekday(data: &[&CleanedIncident]) -> Vec<PeriodCountRow> {
    let counts = counts_by_period(data.iter().copied(), PeriodKey::Weekday);
    Weekday::ALL
        .iter()
        .map(|w| {
            let p = Period::Weekday(*w);
            PeriodCountRow { period: p.to_string(), incidents: counts.get(&p).copied().unwrap_or(0) }
        })
        .collect()
}

pub fn generate_monthly(data: &[&CleanedIncident]) -> Vec<PeriodCountRow> {
    period_rows(counts_by_period(data.iter().copied(), PeriodKey::Month))
}

pub fn generate_top_locations(data: &[&CleanedIncident], n: usize) -> Vec<CategoryCountRow> {
    category_rows(top_categories(data.iter().copied(), CategoryField::LocationDescription, n, false))
}

pub fn generate_summary(municipality: &str, data: &[&CleanedIncident]) -> SummaryStats {
    let neighborhoods: HashSet<&str> = data.iter().map(|r| r.neighborhood()).collect();
    let dates: Vec<_> = data.iter().filter_map(|r| r.fact_date()).collect();

    // Ties go to the earliest hour / weekday.
    let peak = |key: PeriodKey| {
        counts_by_period(data.iter().copied(), key)
            .into_iter()
            .fold(None, |best: Option<(Period, usize)>, (p, c)| match best {
                Some((_, bc)) if bc >= c => best,
                _ => Some((p, c)),
            })
            .map(|(p, _)| p)
    };
    let peak_hour = match peak(PeriodKey::Hour) {
        Some(Period::Hour(h)) => Some(h),
        _ => None,
    };
    let peak_weekday = match peak(PeriodKey::Weekday) {
        Some(Period::Weekday(w)) => Some(w),
        _ => None,
    };

    SummaryStats {
        municipality: municipality.to_string(),
        total_incidents: data.len(),
        dated_incidents: dates.len(),
        incidents_with_hour: data.iter().filter(|r| r.fact_hour().is_some()).count(),
        distinct_neighborhoods: neighborhoods.len(),
        first_date: dates.iter().min().copied(),
        last_date: dates.iter().max().copied(),
        peak_hour,
        peak_weekday,
    }
}

/// Build every view over the dataset, honoring `require_date`.
pub fn generate_all(dataset: &Dataset, config: &ReportConfig) -> ReportSet {
    let data = dataset.view(config.require_date);
    let top_locations = if dataset.has_location_column() {
        generate_top_locations(&data, config.top_locations)
    } else {
        Vec::new()
    };
    ReportSet {
        top_neighborhoods: generate_top_neighborhoods(&data, config.top_n),
        yearly: generate_yearly(&data),
        neighborhood_trend: generate_neighborhood_trend(&data, config.trend_neighborhoods.as_deref(), config.top_n),
        hourly: generate_hourly(&data),
        weekday: generate_weekday(&data),
        monthly: generate_monthly(&data),
        top_locations,
        summary: generate_summary(&config.target_municipality.trim().to_uppercase(), &data),
    }
}
