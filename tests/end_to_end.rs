use furto_report::reports::generate_all;
use furto_report::{
    counts_by_category_and_period, counts_by_period, load, load_path, top_categories, CategoryField, Period,
    PeriodKey, ReportConfig,
};
use std::io::Write;

fn latin1(s: &str) -> Vec<u8> {
    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(s);
    bytes.into_owned()
}

fn five_rows() -> Vec<u8> {
    latin1(
        "Município;Bairro - FATO FINAL;Data Fato;Horário Fato\n\
         POUSO ALEGRE;Centro;01/03/2023;0915\n\
         OUTRA CIDADE;Centro;01/03/2023;1000\n\
         pouso alegre;DESCONHECIDO;01/03/2023;1100\n\
         POUSO ALEGRE;Centro;02/03/2023;1830\n\
         POUSO ALEGRE;Fátima I;03-2023-99;0600\n",
    )
}

#[test]
fn five_row_scenario() {
    let ds = load(&five_rows(), &ReportConfig::default()).unwrap();
    assert_eq!(ds.len(), 3);
    assert_eq!(ds.report().total_rows, 5);
    assert_eq!(ds.report().dropped_municipality, 1);
    assert_eq!(ds.report().dropped_neighborhood, 1);

    let top = top_categories(ds.incidents(), CategoryField::Neighborhood, 10, false);
    assert_eq!(top, vec![("CENTRO".to_string(), 2), ("FÁTIMA I".to_string(), 1)]);

    let years: Vec<(Period, usize)> = counts_by_period(ds.incidents(), PeriodKey::Year).into_iter().collect();
    assert_eq!(years, vec![(Period::Year(2023), 2)]);

    let hours: Vec<(Period, usize)> = counts_by_period(ds.incidents(), PeriodKey::Hour).into_iter().collect();
    assert_eq!(hours, vec![(Period::Hour(6), 1), (Period::Hour(9), 1), (Period::Hour(18), 1)]);
}

#[test]
fn kept_rows_match_filter_predicate() {
    let ds = load(&five_rows(), &ReportConfig::default()).unwrap();
    for i in ds.incidents() {
        assert_eq!(i.municipality(), "POUSO ALEGRE");
        assert_ne!(i.neighborhood(), "DESCONHECIDO");
        assert!(!i.neighborhood().is_empty());
    }
}

#[test]
fn loading_twice_gives_identical_aggregations() {
    let config = ReportConfig::default();
    let a = load(&five_rows(), &config).unwrap();
    let b = load(&five_rows(), &config).unwrap();
    for key in [PeriodKey::Year, PeriodKey::Month, PeriodKey::Weekday, PeriodKey::Hour] {
        assert_eq!(counts_by_period(a.incidents(), key), counts_by_period(b.incidents(), key));
    }
    assert_eq!(
        top_categories(a.incidents(), CategoryField::Neighborhood, 10, true),
        top_categories(b.incidents(), CategoryField::Neighborhood, 10, true)
    );
    assert_eq!(
        counts_by_category_and_period(a.incidents(), CategoryField::Neighborhood, &["CENTRO"], PeriodKey::Month),
        counts_by_category_and_period(b.incidents(), CategoryField::Neighborhood, &["CENTRO"], PeriodKey::Month)
    );
}

#[test]
fn loads_from_file_and_builds_report() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&five_rows()).unwrap();
    let config = ReportConfig::default();
    let ds = load_path(file.path(), &config).unwrap();
    let set = generate_all(&ds, &config);
    assert_eq!(set.top_neighborhoods.last().map(|r| r.incidents), Some(3));
    assert!(set.top_locations.is_empty());
    assert_eq!(set.weekday.len(), 7);
    assert_eq!(set.summary.dated_incidents, 2);
}
