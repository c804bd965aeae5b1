// Entry point and high-level CLI flow.
//
// - Option [1] asks for a spreadsheet path, ingests it into an untyped
//   table and remembers it along with the store name, printing diagnostics.
// - Option [2] runs the report pipeline on the loaded table, prints the
//   overall, weekly and daily views and writes report.json.
// - After generating a report, the user can go back to the menu or exit.

use cpc_report::types::RawTable;
use cpc_report::{loader, output, reports, util};
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

// In-memory app state so one upload can be reported on multiple times in a
// single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { feed: None }));

struct AppState {
    feed: Option<LoadedFeed>,
}

#[derive(Clone)]
struct LoadedFeed {
    table: RawTable,
    store_name: String,
}

const REPORT_FILE: &str = "report.json";
const DAILY_PREVIEW_ROWS: usize = 14;

/// Print a prompt and read one trimmed line from stdin.
fn read_line_trimmed(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_choice() -> String {
    read_line_trimmed("Enter choice: ")
}

/// Ask the user whether to go back to the menu after generating a report.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line_trimmed("Back to menu (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: ingest a spreadsheet and keep it in `APP_STATE`.
fn handle_load() {
    let path_input = read_line_trimmed("Spreadsheet path (.xlsx, .xls or .csv): ");
    if path_input.is_empty() {
        println!("No path given.\n");
        return;
    }
    let path = Path::new(&path_input);
    match loader::load_table(path) {
        Ok(table) => {
            let store_name = loader::store_name(path);
            println!("Store: {}", store_name);
            println!(
                "Processing dataset... ({} rows x {} columns)\n",
                util::format_int(table.rows.len() as i64),
                util::format_int(table.columns.len() as i64)
            );
            let mut state = APP_STATE.lock().unwrap();
            state.feed = Some(LoadedFeed { table, store_name });
        }
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

/// Handle option [2]: run the pipeline, print the report and write the
/// JSON artifact.
fn handle_generate_report() {
    let feed = {
        let state = APP_STATE.lock().unwrap();
        state.feed.clone()
    };
    let Some(feed) = feed else {
        println!("Error: No data loaded. Please load a spreadsheet first (option 1).\n");
        return;
    };

    println!("Generating CPC report for {}...\n", feed.store_name);
    let processed = match reports::process(feed.table) {
        Ok(processed) => processed,
        Err(e) => {
            eprintln!("Report generation failed: {}\n", e);
            return;
        }
    };
    for warning in &processed.warnings {
        eprintln!("Warning: {}", warning);
    }

    let report = &processed.report;
    let stats = &report.overall_stats;
    println!(
        "Overall Performance ({} ~ {}, {} days)",
        report.date_range.start, report.date_range.end, stats.days_count
    );
    println!("  Total cost:          {}", util::format_int(stats.total_cost));
    println!("  Total impressions:   {}", util::format_int(stats.total_impressions));
    println!("  Total clicks:        {}", util::format_int(stats.total_clicks));
    println!("  Average CTR:         {:.2}%", stats.avg_ctr);
    println!("  Average CPC:         {:.2}", stats.avg_cpc);
    println!("  Avg daily cost:      {}", util::format_int(stats.avg_daily_cost));
    println!("  Avg daily imprs:     {}", util::format_int(stats.avg_daily_impressions));
    println!("  Avg daily clicks:    {:.1}\n", stats.avg_daily_clicks);

    println!("Weekly Performance");
    println!("{}\n", output::render_table(&report.weekly_data, reports::MAX_WEEKS));

    println!("Daily Performance");
    println!("{}", output::render_table(&report.daily_data, DAILY_PREVIEW_ROWS));
    if report.daily_data.len() > DAILY_PREVIEW_ROWS {
        println!(
            "(showing first {} of {} days; full table in {})",
            DAILY_PREVIEW_ROWS,
            report.daily_data.len(),
            REPORT_FILE
        );
    }
    println!("");

    if let Err(e) = output::write_json(REPORT_FILE, report) {
        eprintln!("Write error: {}", e);
        return;
    }
    println!("(Full report exported to {})\n", REPORT_FILE);
}

fn main() {
    loop {
        println!("CPC Report Generator:");
        println!("[1] Load spreadsheet");
        println!("[2] Generate CPC report\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!("");
                handle_generate_report();
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
}
