use thiserror::Error;

/// Failures loading a mission description. The control core itself never
/// fails; only the file surfaces do.
#[derive(Debug, Error)]
pub enum MissionError {
    #[error("cannot read mission file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid mission document: {0}")]
    Parse(#[from] serde_json::Error),
}
