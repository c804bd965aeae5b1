use crate::columns::{CLICKS, COST, COST_PER_CLICK, DATE, IMPRESSIONS};
use crate::types::{Cell, DayRow, RawTable};
use crate::util::coerce_number;
use chrono::{Datelike, NaiveDate};

/// Output of the cleaning stage: rows in oldest-first order, plus whether
/// date reconstruction fell back to the processing-date sentinel.
#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub rows: Vec<DayRow>,
    pub date_fallback: bool,
}

/// Turn a column-normalized table into typed day rows.
///
/// The source feed lists the newest day first, so the sequence is reversed
/// into chronological order. Each partial "MM-DD" date is then completed
/// with the current year and parsed; if any row fails to parse, every row
/// falls back to `today`. The feed is dated as one unit, not row by row.
pub fn clean_rows(table: &RawTable, today: NaiveDate) -> CleanOutcome {
    // normalize_columns has already verified the required set.
    let (Some(date_idx), Some(cost_idx), Some(impressions_idx), Some(clicks_idx)) = (
        table.column_index(DATE),
        table.column_index(COST),
        table.column_index(IMPRESSIONS),
        table.column_index(CLICKS),
    ) else {
        return CleanOutcome {
            rows: Vec::new(),
            date_fallback: false,
        };
    };
    let cpc_idx = table.column_index(COST_PER_CLICK);

    let mut rows: Vec<DayRow> = table
        .rows
        .iter()
        .map(|cells| {
            let cell_at = |idx: usize| cells.get(idx).unwrap_or(&Cell::Empty);
            let cost = coerce_number(cell_at(cost_idx));
            let clicks = coerce_number(cell_at(clicks_idx));
            // A supplied cost-per-click column is coerced like any other
            // numeric column; it is only computed when the column is absent.
            let cost_per_click = match cpc_idx {
                Some(idx) => coerce_number(cell_at(idx)),
                None if clicks > 0.0 => cost / clicks,
                None => 0.0,
            };
            DayRow {
                date: cell_at(date_idx).to_string(),
                cost,
                impressions: coerce_number(cell_at(impressions_idx)),
                clicks,
                cost_per_click,
                day: today,
            }
        })
        .collect();

    rows.reverse();

    let date_fallback = !assign_days(&mut rows, today);
    CleanOutcome {
        rows,
        date_fallback,
    }
}

/// Reconstruct full calendar dates by prefixing the current year to each
/// partial date. All-or-nothing: the parsed dates are applied only when
/// every row parses; otherwise every row keeps the `today` sentinel.
/// Returns `false` when the fallback was taken.
fn assign_days(rows: &mut [DayRow], today: NaiveDate) -> bool {
    let year = today.year();
    let mut parsed = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let composed = format!("{}-{}", year, row.date.trim());
        match NaiveDate::parse_from_str(&composed, "%Y-%m-%d") {
            Ok(day) => parsed.push(day),
            Err(_) => return false,
        }
    }
    for (row, day) in rows.iter_mut().zip(parsed) {
        row.day = day;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn text_row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|c| Cell::Text(c.to_string())).collect()
    }

    /// Table in canonical vocabulary without a cost-per-click column, rows
    /// given newest-first as the feed delivers them.
    fn table(rows: &[(&str, &str, &str, &str)]) -> RawTable {
        RawTable {
            columns: vec![
                DATE.to_string(),
                COST.to_string(),
                IMPRESSIONS.to_string(),
                CLICKS.to_string(),
            ],
            rows: rows
                .iter()
                .map(|&(d, c, i, k)| text_row(&[d, c, i, k]))
                .collect(),
        }
    }

    #[test]
    fn reverses_the_feed_into_chronological_order() {
        let table = table(&[
            ("12-03", "30", "300", "3"),
            ("12-02", "20", "200", "2"),
            ("12-01", "10", "100", "1"),
        ]);
        let outcome = clean_rows(&table, fixed_today());
        let dates: Vec<&str> = outcome.rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["12-01", "12-02", "12-03"]);
        assert!(!outcome.date_fallback);
    }

    #[test]
    fn completes_partial_dates_with_the_current_year() {
        let table = table(&[("12-02", "1", "1", "1"), ("12-01", "1", "1", "1")]);
        let outcome = clean_rows(&table, fixed_today());
        assert_eq!(outcome.rows[0].day, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(outcome.rows[1].day, NaiveDate::from_ymd_opt(2025, 12, 2).unwrap());
    }

    #[test]
    fn one_bad_date_sends_every_row_to_the_sentinel() {
        let table = table(&[
            ("12-02", "1", "1", "1"),
            ("02-30", "1", "1", "1"),
            ("12-01", "1", "1", "1"),
        ]);
        let outcome = clean_rows(&table, fixed_today());
        assert!(outcome.date_fallback);
        assert!(outcome.rows.iter().all(|r| r.day == fixed_today()));
        // The partial date strings from the feed are untouched by the fallback.
        assert_eq!(outcome.rows[1].date, "02-30");
    }

    #[test]
    fn derives_cost_per_click_when_the_column_is_absent() {
        let table = table(&[("12-02", "50", "1000", "0"), ("12-01", "100", "1000", "40")]);
        let outcome = clean_rows(&table, fixed_today());
        assert_eq!(outcome.rows[0].cost_per_click, 2.5);
        // No clicks means no meaningful rate, not a division by zero.
        assert_eq!(outcome.rows[1].cost_per_click, 0.0);
    }

    #[test]
    fn supplied_cost_per_click_is_coerced_not_recomputed() {
        let table = RawTable {
            columns: vec![
                DATE.to_string(),
                COST.to_string(),
                IMPRESSIONS.to_string(),
                CLICKS.to_string(),
                COST_PER_CLICK.to_string(),
            ],
            rows: vec![text_row(&["12-01", "100", "1000", "50", "2,5"])],
        };
        let outcome = clean_rows(&table, fixed_today());
        // "2,5" reads as twenty-five under the thousands-separator rule,
        // even though cost/clicks would give 2.0.
        assert_eq!(outcome.rows[0].cost_per_click, 25.0);
    }

    #[test]
    fn coerces_separator_formatted_metrics() {
        let table = table(&[("12-01", "1,234.5", "10,000", "2,5")]);
        let outcome = clean_rows(&table, fixed_today());
        assert_eq!(outcome.rows[0].cost, 1234.5);
        assert_eq!(outcome.rows[0].impressions, 10_000.0);
        assert_eq!(outcome.rows[0].clicks, 25.0);
    }

    #[test]
    fn short_rows_read_missing_cells_as_empty() {
        let mut table = table(&[("12-01", "10", "100", "5")]);
        table.rows.push(text_row(&["12-02", "20"]));
        let outcome = clean_rows(&table, fixed_today());
        assert_eq!(outcome.rows[0].impressions, 0.0);
        assert_eq!(outcome.rows[0].clicks, 0.0);
    }
}
