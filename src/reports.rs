use crate::clean::{clean_rows, CleanOutcome};
use crate::columns::normalize_columns;
use crate::error::ReportError;
use crate::types::{DailyRecord, DateRange, DayRow, OverallStats, RawTable, Report, WeeklyBucket};
use crate::util::round_to;
use chrono::{Local, NaiveDate};

/// Weekly analysis stops after this many buckets.
pub const MAX_WEEKS: usize = 4;
pub const DAYS_PER_WEEK: usize = 7;

/// A finished report plus any notes worth surfacing to the operator.
#[derive(Debug, Clone)]
pub struct ProcessedReport {
    pub report: Report,
    pub warnings: Vec<String>,
}

/// Run the full pipeline on an as-ingested table, dating rows against the
/// local calendar.
pub fn process(table: RawTable) -> Result<ProcessedReport, ReportError> {
    process_at(table, Local::now().date_naive())
}

/// Same as [`process`] but with an explicit processing date, so results are
/// reproducible for a recorded feed.
pub fn process_at(mut table: RawTable, today: NaiveDate) -> Result<ProcessedReport, ReportError> {
    normalize_columns(&mut table)?;
    let CleanOutcome {
        rows,
        date_fallback,
    } = clean_rows(&table, today);

    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Err(ReportError::Processing("dataset has no rows".to_string()));
    };
    let date_range = DateRange {
        start: first.date.clone(),
        end: last.date.clone(),
    };

    let mut warnings = Vec::new();
    if date_fallback {
        warnings.push(
            "date column could not be parsed; every row was dated with the processing date"
                .to_string(),
        );
    }

    let report = Report {
        overall_stats: overall_stats(&rows),
        weekly_data: weekly_data(&rows),
        daily_data: daily_data(&rows),
        date_range,
    };
    Ok(ProcessedReport { report, warnings })
}

/// Whole-period totals and averages. Impression and click totals truncate
/// to whole counts, and the rate fields are computed from those truncated
/// totals, not from the raw float sums.
fn overall_stats(rows: &[DayRow]) -> OverallStats {
    let total_cost: f64 = rows.iter().map(|r| r.cost).sum();
    let total_impressions = rows.iter().map(|r| r.impressions).sum::<f64>() as i64;
    let total_clicks = rows.iter().map(|r| r.clicks).sum::<f64>() as i64;
    let avg_ctr = if total_impressions > 0 {
        total_clicks as f64 / total_impressions as f64 * 100.0
    } else {
        0.0
    };
    let avg_cpc = if total_clicks > 0 {
        total_cost / total_clicks as f64
    } else {
        0.0
    };
    let days_count = rows.len();

    OverallStats {
        total_cost: total_cost.round() as i64,
        total_impressions,
        total_clicks,
        avg_ctr: round_to(avg_ctr, 2),
        avg_cpc: round_to(avg_cpc, 2),
        avg_daily_cost: if days_count > 0 {
            (total_cost / days_count as f64).round() as i64
        } else {
            0
        },
        avg_daily_impressions: if days_count > 0 {
            (total_impressions as f64 / days_count as f64).round() as i64
        } else {
            0
        },
        avg_daily_clicks: if days_count > 0 {
            round_to(total_clicks as f64 / days_count as f64, 1)
        } else {
            0.0
        },
        days_count,
    }
}

/// Group the chronological rows into at most four seven-day buckets. Rows
/// past the 28th day appear in the overall and daily views only.
fn weekly_data(rows: &[DayRow]) -> Vec<WeeklyBucket> {
    let mut weeks = Vec::new();
    for week_num in 0..MAX_WEEKS {
        let start = week_num * DAYS_PER_WEEK;
        if start >= rows.len() {
            break;
        }
        let bucket = &rows[start..(start + DAYS_PER_WEEK).min(rows.len())];

        let impressions = bucket.iter().map(|r| r.impressions).sum::<f64>() as i64;
        let clicks = bucket.iter().map(|r| r.clicks).sum::<f64>() as i64;
        let ctr = if impressions > 0 {
            clicks as f64 / impressions as f64 * 100.0
        } else {
            0.0
        };
        let days = bucket.len();

        weeks.push(WeeklyBucket {
            week_number: week_num + 1,
            impressions,
            clicks,
            ctr: round_to(ctr, 2),
            avg_daily_impressions: if days > 0 {
                (impressions as f64 / days as f64).round() as i64
            } else {
                0
            },
            cost: bucket.iter().map(|r| r.cost).sum::<f64>().round() as i64,
            days,
        });
    }
    weeks
}

/// Per-day records for the chart and table views, oldest first.
fn daily_data(rows: &[DayRow]) -> Vec<DailyRecord> {
    rows.iter()
        .map(|r| {
            let impressions = r.impressions as i64;
            let clicks = r.clicks as i64;
            let ctr = if impressions > 0 {
                clicks as f64 / impressions as f64 * 100.0
            } else {
                0.0
            };
            DailyRecord {
                date: r.date.clone(),
                cost: r.cost.round() as i64,
                impressions,
                clicks,
                ctr: round_to(ctr, 2),
                cpc: round_to(r.cost_per_click, 2),
            }
        })
        .collect()
}
