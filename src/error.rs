use thiserror::Error;

#[derive(Debug, Error)]
pub enum GradeBookError {
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {reason}")]
    Malformed {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("unknown grade column(s): {}", .0.join(", "))]
    UnknownColumn(Vec<String>),

    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    #[error("column '{column}' does not line up with the grade table at '{name}'")]
    JoinMismatch { column: String, name: String },

    #[error("derived column '{0}' has not been computed yet")]
    MissingDerived(&'static str),
}
