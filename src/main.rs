// Entry point and high-level CLI flow.
//
// - Option [1] loads and cleans the CSV, printing diagnostics.
// - Option [2] writes every report table plus a JSON summary.
// - After generating reports, the user can go back to the selection menu or
//   exit. `--batch` runs both steps once without prompting.
use clap::Parser;
use furto_report::cache::DatasetCache;
use furto_report::config::{ReportConfig, DEFAULT_SOURCE};
use furto_report::loader::Dataset;
use furto_report::{output, reports, util};
use once_cell::sync::Lazy;
use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Parser)]
#[command(name = "furto_report")]
#[command(about = "Theft incident report for one municipality", long_about = None)]
struct Cli {
    /// Semicolon-separated incident extract
    #[arg(long, default_value = DEFAULT_SOURCE)]
    source: PathBuf,
    /// TOML file overriding the default report settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory the report tables are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Load and generate once, without the interactive menu
    #[arg(long)]
    batch: bool,
}

// In-memory app state so repeated loads of an unchanged file reuse the
// cleaned dataset and reports can be generated many times in one run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState::default()));

#[derive(Default)]
struct AppState {
    config: ReportConfig,
    cache: DatasetCache,
    data: Option<Arc<Dataset>>,
}

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask whether to go back to the report selection menu.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: read the extract and clean it through the cache.
fn handle_load(source: &Path) -> Result<(), Box<dyn Error>> {
    let bytes = std::fs::read(source)?;
    let mut state = state();
    let config = state.config.clone();
    let data = state.cache.get_or_load(&bytes, &config)?;
    let r = data.report();
    println!(
        "Processing dataset... ({} rows read, {} kept for {})",
        util::format_int(r.total_rows),
        util::format_int(r.kept_rows),
        config.target_municipality
    );
    println!(
        "Note: {} rows outside the municipality, {} with unknown neighborhood, {} unreadable.",
        util::format_int(r.dropped_municipality),
        util::format_int(r.dropped_neighborhood),
        util::format_int(r.unreadable_rows)
    );
    if r.date_invalid + r.hour_invalid > 0 {
        println!(
            "Info: {} unparseable dates and {} unparseable times kept as blanks.",
            util::format_int(r.date_invalid),
            util::format_int(r.hour_invalid)
        );
    }
    println!();
    state.data = Some(data);
    Ok(())
}

/// Handle option [2]: write every report table and the JSON summary.
fn handle_generate_reports(out_dir: &Path) -> Result<(), Box<dyn Error>> {
    let (data, config) = {
        let state = state();
        (state.data.clone(), state.config.clone())
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return Ok(());
    };

    std::fs::create_dir_all(out_dir)?;
    println!("Generating reports...");
    println!("Outputs saved to {}\n", out_dir.display());

    let set = reports::generate_all(&data, &config);

    let tables = [
        ("top_neighborhoods.csv", "Top Neighborhoods by Thefts", &set.top_neighborhoods),
        ("top_locations.csv", "Top Incident Locations", &set.top_locations),
    ];
    for (file, title, rows) in tables {
        output::write_csv(&out_dir.join(file), rows)?;
        println!("{}\n", title);
        output::preview_table_rows(rows, config.top_n + 1);
        println!("(Full table exported to {})\n", file);
    }

    let series = [
        ("yearly_trend.csv", "Thefts per Year", &set.yearly),
        ("monthly_trend.csv", "Thefts per Month", &set.monthly),
        ("hourly.csv", "Thefts by Hour of Day", &set.hourly),
        ("weekday.csv", "Thefts by Day of Week", &set.weekday),
    ];
    for (file, title, rows) in series {
        output::write_csv(&out_dir.join(file), rows)?;
        println!("{}\n", title);
        output::preview_table_rows(rows, 24);
        println!("(Full table exported to {})\n", file);
    }

    let trend_file = "neighborhood_trend.csv";
    output::write_pivot_csv(&out_dir.join(trend_file), &set.neighborhood_trend)?;
    println!("Yearly Thefts per Neighborhood\n");
    output::preview_pivot(&set.neighborhood_trend, 10);
    println!("(Full table exported to {})\n", trend_file);

    output::write_json(&out_dir.join("summary.json"), &set.summary)?;
    println!("Summary Stats (summary.json):");
    println!("{}\n", serde_json::to_string(&set.summary)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        let config = ReportConfig::from_path(path)?;
        log::info!("Using report config from {}", path.display());
        state().config = config;
    }

    if cli.batch {
        handle_load(&cli.source)?;
        return handle_generate_reports(&cli.out_dir);
    }

    loop {
        println!("Select Report Option:");
        println!("[1] Load the file");
        println!("[2] Generate Reports\n");
        match read_choice().as_str() {
            "1" => {
                if let Err(e) = handle_load(&cli.source) {
                    eprintln!("Failed to load file: {}\n", e);
                }
            }
            "2" => {
                println!();
                if let Err(e) = handle_generate_reports(&cli.out_dir) {
                    eprintln!("Write error: {}", e);
                }
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
    Ok(())
}
