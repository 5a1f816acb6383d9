use thiserror::Error;

/// Errors that abort a dataset load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Source bytes cannot be decoded under the configured encoding.
    #[error("source is not valid {encoding} text")]
    Encoding {
        /// Name of the encoding that was attempted.
        encoding: &'static str,
    },

    /// A required column is absent under every known spelling.
    #[error("required column '{column}' not found in header (tried: {})", .tried.join(", "))]
    Schema {
        /// Logical column name (e.g. `neighborhood`).
        column: &'static str,
        /// Header names that were looked for, in resolution order.
        tried: Vec<String>,
    },

    /// The header row itself could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Reading the source file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building a [`crate::config::ReportConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown encoding label '{0}'")]
    UnknownEncoding(String),

    #[error("delimiter must be a single ASCII character, got '{0}'")]
    Delimiter(String),
}
