use thiserror::Error;

/// Errors raised when building or editing filter clauses
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Unknown operator: '{0}'. Valid operators are: =, !=, <, >, =~, !~")]
    UnknownOperator(String),

    #[error("Clause index {index} is out of range for a filter with {len} clause(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid regex '{pattern}'")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
