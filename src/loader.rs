use crate::error::ReportError;
use crate::types::{Cell, RawTable};
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::io;
use std::path::Path;

/// Ingest a spreadsheet by extension: `.csv` through the CSV reader,
/// `.xlsx` and `.xls` through the workbook reader. Anything else is
/// rejected before a byte is read.
pub fn load_table(path: &Path) -> Result<RawTable, ReportError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => read_csv(File::open(path)?),
        "xlsx" | "xls" => read_excel(path),
        _ => {
            let shown = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            Err(ReportError::UnsupportedFile(shown))
        }
    }
}

/// The merchant label for a feed is its file name without the extension.
pub fn store_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload")
        .to_string()
}

/// Read delimited text into an untyped table. Headers are trimmed and the
/// first one loses any UTF-8 BOM that spreadsheet exports like to prepend.
/// Cells stay text; nothing is interpreted until the cleaning stage.
pub fn read_csv<R: io::Read>(reader: R) -> Result<RawTable, ReportError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut columns: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if let Some(first) = columns.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.trim().to_string();
        }
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    let field = field.trim();
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(RawTable { columns, rows })
}

/// Read the first sheet of a workbook into an untyped table. Row 0 is the
/// header row, matching the text exports.
pub fn read_excel(path: &Path) -> Result<RawTable, ReportError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_vec();
    let Some(sheet_name) = sheet_names.first() else {
        return Err(ReportError::Processing("workbook has no sheets".to_string()));
    };
    let range = workbook.worksheet_range(sheet_name)?;

    let mut sheet_rows = range.rows();
    let columns: Vec<String> = match sheet_rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| match cell {
                Data::String(s) => s.trim().to_string(),
                Data::Empty => String::new(),
                other => format!("{}", other),
            })
            .collect(),
        None => Vec::new(),
    };
    let rows = sheet_rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();
    Ok(RawTable { columns, rows })
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.to_string())
            }
        }
        // Dates, booleans and error cells come through as their display
        // text and fall out of the numeric coercion as zero.
        other => Cell::Text(format!("{}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_text_cells_from_csv() {
        let data = "日期,花费（元）,曝光（次）,点击（次）\n12-02,\"1,250\",3400,120\n12-01,800,2100,95\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(
            table.columns,
            vec!["日期", "花费（元）", "曝光（次）", "点击（次）"]
        );
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], Cell::Text("1,250".to_string()));
    }

    #[test]
    fn strips_a_bom_from_the_first_header() {
        let data = "\u{feff}날짜,비용\n12-01,5\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.columns[0], "날짜");
    }

    #[test]
    fn blank_fields_become_empty_cells() {
        let data = "날짜,비용,노출수\n12-01,,  \n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.rows[0][1], Cell::Empty);
        assert_eq!(table.rows[0][2], Cell::Empty);
    }

    #[test]
    fn tolerates_rows_shorter_than_the_header() {
        let data = "날짜,비용,노출수\n12-01,10\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.rows[0].len(), 2);
    }

    #[test]
    fn maps_workbook_cells_onto_table_cells() {
        assert_eq!(cell_from_data(&Data::Float(1234.5)), Cell::Number(1234.5));
        assert_eq!(cell_from_data(&Data::Int(42)), Cell::Number(42.0));
        assert_eq!(
            cell_from_data(&Data::String(" 12-01 ".to_string())),
            Cell::Text("12-01".to_string())
        );
        assert_eq!(cell_from_data(&Data::String("   ".to_string())), Cell::Empty);
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        // Variants without a direct mapping carry their display text.
        assert_eq!(
            cell_from_data(&Data::Bool(true)),
            Cell::Text("true".to_string())
        );
    }

    #[test]
    fn rejects_extensions_other_than_spreadsheets() {
        let err = load_table(Path::new("numbers.pdf")).unwrap_err();
        match err {
            ReportError::UnsupportedFile(name) => assert_eq!(name, "numbers.pdf"),
            other => panic!("expected UnsupportedFile, got {:?}", other),
        }
    }

    #[test]
    fn store_name_drops_only_the_final_extension() {
        assert_eq!(store_name(Path::new("멍탕국밥.xlsx")), "멍탕국밥");
        assert_eq!(store_name(Path::new("report.v2.csv")), "report.v2");
    }
}
