/// Errors that can occur across the Vigil gate.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary crate converts to `miette` diagnostics at the boundary.
///
/// # Examples
///
/// ```
/// use vigil_core::GateError;
///
/// let err = GateError::Config("missing PR_NUMBER".into());
/// assert!(err.to_string().contains("missing PR_NUMBER"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum GateError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// LLM API or response error.
    #[error("LLM error: {0}")]
    Llm(String),

    /// GitHub API error.
    #[error("GitHub error: {0}")]
    Github(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
