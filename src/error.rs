use thiserror::Error;

#[derive(Error, Debug)]
pub enum BanksortError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Row {line} has {found} fields, header has {expected}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Cannot load mapping table {path}: {reason}")]
    ConfigLoad { path: String, reason: String },

    #[error("Invalid {role} directory: {path}")]
    InvalidDirectory { role: &'static str, path: String },

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

impl BanksortError {
    /// Errors that invalidate the whole run rather than a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BanksortError::ConfigLoad { .. } | BanksortError::InvalidDirectory { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BanksortError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_config_errors_are_fatal() {
        let config = BanksortError::ConfigLoad {
            path: "mappings/reference-text.config.csv".to_string(),
            reason: "not found".to_string(),
        };
        assert!(config.is_fatal());
        assert!(BanksortError::InvalidDirectory { role: "input", path: "x".into() }.is_fatal());
        assert!(!BanksortError::MissingColumn("Buchungstag".into()).is_fatal());
        let malformed = BanksortError::MalformedRow { line: 3, expected: 2, found: 4 };
        assert!(!malformed.is_fatal());
    }

    #[test]
    fn test_missing_column_message() {
        let e = BanksortError::MissingColumn("Buchungstag".to_string());
        assert_eq!(e.to_string(), "Missing column 'Buchungstag'");
    }
}
