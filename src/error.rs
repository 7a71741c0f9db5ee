use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("Invalid filing period '{0}': expected YYYY-MM")]
    InvalidPeriod(String),

    #[error("Unknown filing frequency '{0}': expected monthly, quarterly or annual")]
    InvalidFrequency(String),

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("Invalid compliance rule '{field}': {details}")]
    InvalidRules { field: String, details: String },

    #[error("Character '{0}' is outside the GSTIN checksum alphabet")]
    InvalidIdentifierCharacter(char),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ComplianceError>;
