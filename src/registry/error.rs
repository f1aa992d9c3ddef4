use std::path::PathBuf;

/// Errors raised while loading research data, building the registry,
/// or writing its outputs.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Research data must be a mapping of year to papers")]
    InvalidFormat,

    #[error("Invalid year: {0} (expected 1900..={1})")]
    InvalidYear(i64, i32),

    #[error("Invalid year format: {0}")]
    InvalidYearFormat(String),

    #[error("Year {0} appears more than once")]
    DuplicateYear(i32),

    #[error("Papers for year {0} must be a list")]
    PapersNotList(i32),

    #[error("Invalid paper entry #{index} in year {year}: expected a mapping")]
    InvalidPaperEntry { year: i32, index: usize },

    #[error("Paper in year {year} missing required fields: {}", .fields.join(", "))]
    MissingFields { year: i32, fields: Vec<String> },

    #[error("Paper '{paper}' in year {year} has an invalid field: {reason}")]
    InvalidField {
        year: i32,
        paper: String,
        reason: String,
    },

    #[error("Invalid registry document: {0}")]
    InvalidRegistry(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RegistryError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = RegistryError> = std::result::Result<T, E>;
