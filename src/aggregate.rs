//! Counting queries over cleaned incidents.
//!
//! Every function takes the records by reference and returns fresh tables;
//! nothing here mutates or filters the loaded dataset.
use crate::types::{CategoryField, CleanedIncident, Period, PeriodKey};
use crate::util::normalize_label;
use std::collections::{BTreeMap, HashMap};

pub const TOTAL_LABEL: &str = "TOTAL";

/// The `n` most frequent values of `field`, busiest first.
///
/// Equal counts keep the order in which the categories first appear in
/// `records`. With `with_total`, a trailing `("TOTAL", sum)` entry covering
/// the returned categories is appended.
pub fn top_categories<'a, I>(
    records: I,
    field: CategoryField,
    n: usize,
    with_total: bool,
) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a CleanedIncident>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for r in records {
        let Some(category) = r.category(field) else { continue };
        match index.get(category) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(category, counts.len());
                counts.push((category.to_string(), 1));
            }
        }
    }

    // `sort_by` is stable, so first-seen order survives among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    if with_total && !counts.is_empty() {
        let total: usize = counts.iter().map(|(_, c)| c).sum();
        counts.push((TOTAL_LABEL.to_string(), total));
    }
    counts
}

/// Incident counts per period, in the natural order of the period type.
/// Records without a value for `key` are left out.
pub fn counts_by_period<'a, I>(records: I, key: PeriodKey) -> BTreeMap<Period, usize>
where
    I: IntoIterator<Item = &'a CleanedIncident>,
{
    let mut map = BTreeMap::new();
    for p in records.into_iter().filter_map(|r| r.period(key)) {
        *map.entry(p).or_insert(0) += 1;
    }
    map
}

/// Dense period x category count table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pivot {
    categories: Vec<String>,
    rows: BTreeMap<Period, Vec<usize>>,
}

impl Pivot {
    /// Requested categories, normalized, in the order they were supplied.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Observed periods in natural order, each with one count per category.
    pub fn rows(&self) -> impl Iterator<Item = (&Period, &[usize])> {
        self.rows.iter().map(|(p, counts)| (p, counts.as_slice()))
    }

    pub fn periods(&self) -> impl Iterator<Item = &Period> {
        self.rows.keys()
    }

    pub fn get(&self, period: &Period, category: &str) -> Option<usize> {
        let col = self.categories.iter().position(|c| c == category)?;
        self.rows.get(period).map(|counts| counts[col])
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Count incidents per (period, category) for the given categories.
///
/// Only records whose `field` value is one of `categories` take part. Every
/// observed period gets a count for every requested category, zero when
/// nothing matched.
pub fn counts_by_category_and_period<'a, I, S>(
    records: I,
    field: CategoryField,
    categories: &[S],
    key: PeriodKey,
) -> Pivot
where
    I: IntoIterator<Item = &'a CleanedIncident>,
    S: AsRef<str>,
{
    let mut wanted: Vec<String> = Vec::with_capacity(categories.len());
    for c in categories {
        let c = normalize_label(c.as_ref());
        if !wanted.contains(&c) {
            wanted.push(c);
        }
    }

    let mut rows: BTreeMap<Period, Vec<usize>> = BTreeMap::new();
    for r in records {
        let Some(category) = r.category(field) else { continue };
        let Some(col) = wanted.iter().position(|c| c == category) else { continue };
        let Some(period) = r.period(key) else { continue };
        rows.entry(period).or_insert_with(|| vec![0; wanted.len()])[col] += 1;
    }

    Pivot { categories: wanted, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldOutcome, Weekday};
    use chrono::NaiveDate;

    fn incident(neighborhood: &str, ymd: Option<(i32, u32, u32)>, hour: Option<u8>) -> CleanedIncident {
        let date = ymd
            .and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
            .map(FieldOutcome::Present)
            .unwrap_or(FieldOutcome::Missing);
        let hour = hour.map(FieldOutcome::Present).unwrap_or(FieldOutcome::Missing);
        CleanedIncident::new("POUSO ALEGRE".to_string(), neighborhood.to_string(), date, hour, None)
    }

    #[test]
    fn top_categories_sorts_desc_with_stable_ties() {
        let data = vec![
            incident("FOCH", None, None),
            incident("CENTRO", None, None),
            incident("CENTRO", None, None),
            incident("PRIMAVERA", None, None),
            incident("FOCH", None, None),
            incident("CRUZEIRO", None, None),
            incident("CENTRO", None, None),
        ];
        let top = top_categories(&data, CategoryField::Neighborhood, 3, false);
        assert_eq!(
            top,
            vec![
                ("CENTRO".to_string(), 3),
                ("FOCH".to_string(), 2),
                ("PRIMAVERA".to_string(), 1),
            ]
        );
    }

    #[test]
    fn top_categories_appends_total_of_kept_rows() {
        let data = vec![
            incident("A", None, None),
            incident("A", None, None),
            incident("B", None, None),
            incident("C", None, None),
        ];
        let top = top_categories(&data, CategoryField::Neighborhood, 2, true);
        assert_eq!(top.last(), Some(&(TOTAL_LABEL.to_string(), 3)));
        assert_eq!(top.len(), 3);
    }

    #[test]
    fn top_categories_skips_absent_locations() {
        let data = vec![incident("A", None, None)];
        assert!(top_categories(&data, CategoryField::LocationDescription, 10, false).is_empty());
    }

    #[test]
    fn weekday_counts_run_monday_to_sunday() {
        // 2023-03-05 is a Sunday, 2023-03-06 a Monday, 2023-03-08 a Wednesday.
        let data = vec![
            incident("A", Some((2023, 3, 5)), None),
            incident("A", Some((2023, 3, 8)), None),
            incident("A", Some((2023, 3, 6)), None),
            incident("A", Some((2023, 3, 5)), None),
        ];
        let counts: Vec<(Period, usize)> = counts_by_period(&data, PeriodKey::Weekday).into_iter().collect();
        assert_eq!(
            counts,
            vec![
                (Period::Weekday(Weekday::Monday), 1),
                (Period::Weekday(Weekday::Wednesday), 1),
                (Period::Weekday(Weekday::Sunday), 2),
            ]
        );
    }

    #[test]
    fn period_counts_skip_absent_values() {
        let data = vec![
            incident("A", Some((2023, 1, 1)), Some(23)),
            incident("A", None, Some(0)),
            incident("A", Some((2022, 12, 31)), None),
        ];
        let years = counts_by_period(&data, PeriodKey::Year);
        assert_eq!(years.into_iter().collect::<Vec<_>>(), vec![(Period::Year(2022), 1), (Period::Year(2023), 1)]);
        let hours = counts_by_period(&data, PeriodKey::Hour);
        assert_eq!(hours.keys().copied().collect::<Vec<_>>(), vec![Period::Hour(0), Period::Hour(23)]);
        let months: Vec<String> = counts_by_period(&data, PeriodKey::Month).keys().map(|p| p.to_string()).collect();
        assert_eq!(months, vec!["2022-12", "2023-01"]);
    }

    #[test]
    fn pivot_is_dense_over_requested_categories() {
        let data = vec![
            incident("CENTRO", Some((2022, 5, 1)), None),
            incident("CENTRO", Some((2023, 5, 1)), None),
            incident("FOCH", Some((2023, 6, 1)), None),
            incident("OUTRO", Some((2024, 6, 1)), None),
            incident("FOCH", None, None),
        ];
        let pivot = counts_by_category_and_period(
            &data,
            CategoryField::Neighborhood,
            &["centro", "Foch", "Primavera", "CENTRO"],
            PeriodKey::Year,
        );
        assert_eq!(pivot.categories(), &["CENTRO", "FOCH", "PRIMAVERA"]);
        assert_eq!(pivot.periods().copied().collect::<Vec<_>>(), vec![Period::Year(2022), Period::Year(2023)]);
        for period in pivot.periods() {
            for c in pivot.categories() {
                assert!(pivot.get(period, c).is_some());
            }
        }
        assert_eq!(pivot.get(&Period::Year(2022), "FOCH"), Some(0));
        assert_eq!(pivot.get(&Period::Year(2023), "CENTRO"), Some(1));
        assert_eq!(pivot.get(&Period::Year(2023), "PRIMAVERA"), Some(0));
        assert_eq!(pivot.get(&Period::Year(2024), "CENTRO"), None);
    }

    #[test]
    fn empty_input_gives_empty_results() {
        let data: Vec<CleanedIncident> = Vec::new();
        assert!(top_categories(&data, CategoryField::Neighborhood, 10, false).is_empty());
        assert!(counts_by_period(&data, PeriodKey::Year).is_empty());
        assert!(counts_by_category_and_period(&data, CategoryField::Neighborhood, &["CENTRO"], PeriodKey::Year).is_empty());
    }
}
