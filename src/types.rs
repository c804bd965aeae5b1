use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use tabled::Tabled;

/// One spreadsheet cell as decoded by the ingestion layer. CSV input only
/// produces `Text`/`Empty`; Excel input produces all three variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
        }
    }
}

/// The in-memory table handed to the processing pipeline: named columns and
/// row-major cells. Column labels may still be in the source vocabulary.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// One cleaned row of the dataset: coerced metrics plus the partial date
/// string exactly as it appeared in the feed. `day` is the reconstructed
/// calendar date, used internally and never exported.
#[derive(Debug, Clone)]
pub struct DayRow {
    pub date: String,
    pub cost: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub cost_per_click: f64,
    pub day: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverallStats {
    pub total_cost: i64,
    pub total_impressions: i64,
    pub total_clicks: i64,
    pub avg_ctr: f64,
    pub avg_cpc: f64,
    pub avg_daily_cost: i64,
    pub avg_daily_impressions: i64,
    pub avg_daily_clicks: f64,
    pub days_count: usize,
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct WeeklyBucket {
    #[tabled(rename = "Week")]
    pub week_number: usize,
    #[tabled(rename = "Impressions")]
    pub impressions: i64,
    #[tabled(rename = "Clicks")]
    pub clicks: i64,
    #[tabled(rename = "CTR %")]
    pub ctr: f64,
    #[tabled(rename = "AvgDailyImpressions")]
    pub avg_daily_impressions: i64,
    #[tabled(rename = "Cost")]
    pub cost: i64,
    #[tabled(rename = "Days")]
    pub days: usize,
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct DailyRecord {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Cost")]
    pub cost: i64,
    #[tabled(rename = "Impressions")]
    pub impressions: i64,
    #[tabled(rename = "Clicks")]
    pub clicks: i64,
    #[tabled(rename = "CTR %")]
    pub ctr: f64,
    #[tabled(rename = "CPC")]
    pub cpc: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// The assembled report. Field names are the export contract; the struct
/// serializes into report.json verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub overall_stats: OverallStats,
    pub weekly_data: Vec<WeeklyBucket>,
    pub daily_data: Vec<DailyRecord>,
    pub date_range: DateRange,
}
