use crate::error::ReportError;
use crate::types::RawTable;
use once_cell::sync::Lazy;
use std::collections::HashMap;

// Canonical (Korean) column names. The four in REQUIRED_COLUMNS must all be
// resolvable after translation; COST_PER_CLICK is derived when absent.
pub const DATE: &str = "날짜";
pub const COST: &str = "비용";
pub const IMPRESSIONS: &str = "노출수";
pub const CLICKS: &str = "클릭수";
pub const COST_PER_CLICK: &str = "클릭당비용";

const REQUIRED_COLUMNS: [&str; 4] = [DATE, COST, IMPRESSIONS, CLICKS];

/// Fixed translation table from the ad platform's export labels (Chinese)
/// to the canonical vocabulary the pipeline works in. Read-only; labels not
/// in the table pass through untouched.
static COLUMN_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("日期", DATE),
        ("花费（元）", COST),
        ("曝光（次）", IMPRESSIONS),
        ("点击（次）", CLICKS),
        ("点击均价（元）", COST_PER_CLICK),
        ("收藏（次）", "즐겨찾기"),
        ("分享（次）", "공유"),
        ("查看团购（次）", "단체구매조회"),
        ("订单量（个）", "주문수"),
        ("团购订单量（个）", "단체구매주문수"),
        ("7日团购订单量（次）", "7일단체구매주문수"),
        ("7日收藏量（次）", "7일즐겨찾기수"),
        ("7日分享量（次）", "7일공유수"),
    ])
});

/// Rename every recognized source label to its canonical name, then verify
/// the required set is present. This is the row set's only validation gate;
/// nothing downstream re-checks the schema.
pub fn normalize_columns(table: &mut RawTable) -> Result<(), ReportError> {
    for name in table.columns.iter_mut() {
        if let Some(canonical) = COLUMN_MAP.get(name.as_str()) {
            *name = (*canonical).to_string();
        }
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| table.column_index(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::MissingColumns(missing));
    }
    Ok(())
}
