use thiserror::Error;

/// Statement problems worth showing to the user. Anything else odd in a
/// statement is tolerated and left for the ledger engine to skip.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("statement is empty")]
    EmptyStatement,

    #[error("workbook has no sheets")]
    NoSheet,

    #[error("sheet {0:?} is empty")]
    EmptyWorkbook(String),

    #[error("failed to open workbook: {0}")]
    Workbook(String),

    #[error("failed to read statement: {0}")]
    Csv(#[from] csv::Error),
}
