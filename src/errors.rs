use thiserror::Error;

/// Custom error type for schema introspection and source generation.
#[derive(Error, Debug)]
pub enum GenError {
    /// Error that occurs during database interactions (e.g., SQL query failure).
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    /// Connection error (e.g., issues with network or database connection).
    #[error("Connection error: {0}")]
    Connection(String),
    /// Configuration error (e.g., invalid database URL or unreadable config file).
    #[error("Configuration error: {0}")]
    Config(String),
    /// An `information_schema.COLUMNS` row did not have the expected shape.
    #[error("Schema row error: {0}")]
    SchemaRow(String),
    #[error("No column found for `{0}`, maybe prefix missing?")]
    TableNotFound(String),
    /// The operator did not re-type the model name before an overwrite.
    #[error("Confirm failed. The answer is `{expected}`")]
    ConfirmFailed { expected: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Prompt error: {0}")]
    Prompt(String),
}
