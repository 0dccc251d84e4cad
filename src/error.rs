use thiserror::Error;

/// Errors raised while wiring the engine up.
///
/// The matching functions themselves are total; only configuration,
/// vocabulary loading and logging setup can fail.
#[derive(Debug, Error)]
pub enum CastingError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid settings: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Failed to read vocabulary file {path}: {source}")]
    VocabularyIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Vocabulary parse error: {0}")]
    VocabularyParse(#[from] toml::de::Error),

    #[error("Invalid vocabulary: {0}")]
    Vocabulary(String),

    #[error("Marker pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Logging initialisation failed: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, CastingError>;
