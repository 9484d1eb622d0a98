use thiserror::Error;

#[derive(Debug, Error)]
pub enum EstanteError {
    /// The catalog source is unreachable or malformed. Fatal at
    /// startup; no partial index is ever built.
    #[error("catalog load failed: {0}")]
    CatalogLoad(String),

    #[error("catalog parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
