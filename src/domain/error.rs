//! Domain error types.

/// Top-level error type for rotatrader.
#[derive(Debug, thiserror::Error)]
pub enum RotatraderError {
    #[error("file not found: {path}")]
    NotFound { path: String },

    #[error("missing columns {} in {path}", .missing.join(", "))]
    Schema { path: String, missing: Vec<String> },

    #[error("no overlapping months between {asset1} and {asset2}")]
    EmptyIntersection { asset1: String, asset2: String },

    #[error("CSV error in {path}: {reason}")]
    Csv { path: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&RotatraderError> for std::process::ExitCode {
    fn from(err: &RotatraderError) -> Self {
        let code: u8 = match err {
            RotatraderError::Io(_)
            | RotatraderError::NotFound { .. }
            | RotatraderError::Csv { .. } => 1,
            RotatraderError::ConfigParse { .. }
            | RotatraderError::ConfigMissing { .. }
            | RotatraderError::ConfigInvalid { .. } => 2,
            RotatraderError::Schema { .. } => 3,
            RotatraderError::EmptyIntersection { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
