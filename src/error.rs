use thiserror::Error;

/// Errors produced while resolving an address or orienting geometry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrientError {
    #[error("Invalid {field}: {message}")]
    InvalidInput { field: &'static str, message: String },

    #[error("No location configured: enter an address and enable fetch to resolve it")]
    NotConfigured,

    #[error("No geocoding results for '{address}'; try a more specific address")]
    NoResults { address: String },

    #[error("Geocoding '{address}' failed: {message}")]
    Geocoding { address: String, message: String },

    #[error("Invalid coordinate value: {value}")]
    InvalidCoordinate { value: String },

    #[error("Invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

/// Error classes reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Resolution,
    NotConfigured,
    DateConstruction,
}

impl ErrorKind {
    /// Everything except a missing configuration aborts with an error message.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ErrorKind::NotConfigured)
    }
}

impl OrientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrientError::InvalidInput { .. } => ErrorKind::Validation,
            OrientError::NotConfigured => ErrorKind::NotConfigured,
            OrientError::NoResults { .. }
            | OrientError::Geocoding { .. }
            | OrientError::InvalidCoordinate { .. } => ErrorKind::Resolution,
            OrientError::InvalidDate { .. } => ErrorKind::DateConstruction,
        }
    }
}
