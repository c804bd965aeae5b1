use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    /// One or more required canonical columns could not be resolved after
    /// header translation. The only validation failure a caller can act on.
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("unsupported file type '{0}': only .xlsx, .xls or .csv uploads are accepted")]
    UnsupportedFile(String),

    #[error("CSV read error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("workbook read error: {source}")]
    Excel {
        #[from]
        source: calamine::Error,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Catch-all for internal failures that are not schema problems, e.g. a
    /// dataset with no rows reaching the assembler.
    #[error("report processing failed: {0}")]
    Processing(String),
}
