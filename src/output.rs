use crate::aggregate::Pivot;
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a pivot with one `Period` column followed by one column per category.
pub fn write_pivot_csv(path: &Path, pivot: &Pivot) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(pivot_header(pivot))?;
    for row in pivot_records(pivot) {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

fn pivot_header(pivot: &Pivot) -> Vec<String> {
    std::iter::once("Period".to_string())
        .chain(pivot.categories().iter().cloned())
        .collect()
}

fn pivot_records(pivot: &Pivot) -> Vec<Vec<String>> {
    pivot
        .rows()
        .map(|(period, counts)| {
            std::iter::once(period.to_string())
                .chain(counts.iter().map(|c| c.to_string()))
                .collect()
        })
        .collect()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

pub fn preview_pivot(pivot: &Pivot, max_rows: usize) {
    if pivot.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(pivot_header(pivot));
    for row in pivot_records(pivot).into_iter().take(max_rows) {
        builder.push_record(row);
    }
    let table_str = builder.build().with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}
