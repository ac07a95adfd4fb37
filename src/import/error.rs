use thiserror::Error;

/// Errors that abort an import run. Nothing is committed when one is returned.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV is missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),
}
