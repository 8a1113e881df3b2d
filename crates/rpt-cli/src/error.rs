//! Run-level errors and their process exit codes.

use std::path::PathBuf;

use rpt_ingest::IngestError;
use rpt_notify::NotifyError;
use thiserror::Error;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_NOT_FOUND: i32 = 3;
pub const EXIT_SCHEMA: i32 = 4;
pub const EXIT_CONFIG: i32 = 5;
pub const EXIT_DATA_INTEGRITY: i32 = 6;
pub const EXIT_TRANSPORT: i32 = 7;
pub const EXIT_AUTH: i32 = 8;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("failed to read configuration {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: String, value: String },

    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read the reference period: {0}")]
    Prompt(#[source] std::io::Error),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("mail failed: {0}")]
    Notify(#[from] NotifyError),
}

impl RunError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigNotFound { .. } => EXIT_NOT_FOUND,
            Self::ConfigParse { .. } | Self::InvalidEnv { .. } => EXIT_CONFIG,
            Self::ConfigRead { .. } | Self::CreateDir { .. } | Self::Prompt(_) => EXIT_FAILURE,
            Self::Ingest(err) => match err {
                IngestError::FileNotFound { .. } | IngestError::DefinitionsNotFound { .. } => {
                    EXIT_NOT_FOUND
                }
                IngestError::MissingColumn { .. } | IngestError::ConflictingColumn { .. } => {
                    EXIT_SCHEMA
                }
                IngestError::DefinitionsParse { .. } => EXIT_CONFIG,
                IngestError::EmptyPrimaryTable { .. } => EXIT_DATA_INTEGRITY,
                _ => EXIT_FAILURE,
            },
            Self::Notify(err) => match err {
                NotifyError::Auth { .. } => EXIT_AUTH,
                NotifyError::Transport { .. } => EXIT_TRANSPORT,
                NotifyError::InvalidAddress { .. } => EXIT_CONFIG,
                NotifyError::Build { .. } => EXIT_FAILURE,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, RunError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_exit_codes() {
        let not_found = RunError::from(IngestError::FileNotFound {
            path: PathBuf::from("input/transactions_2025_06.xlsx"),
        });
        assert_eq!(not_found.exit_code(), EXIT_NOT_FOUND);

        let schema = RunError::from(IngestError::MissingColumn {
            table: "customers".to_string(),
            field: "segment".to_string(),
            aliases: vec!["Segment".to_string()],
        });
        assert_eq!(schema.exit_code(), EXIT_SCHEMA);

        let conflict = RunError::from(IngestError::ConflictingColumn {
            table: "transactions".to_string(),
            field: "customer_id".to_string(),
            column: "Client ID".to_string(),
        });
        assert_eq!(conflict.exit_code(), EXIT_SCHEMA);

        let empty = RunError::from(IngestError::EmptyPrimaryTable {
            table: "transactions".to_string(),
        });
        assert_eq!(empty.exit_code(), EXIT_DATA_INTEGRITY);

        let parse = RunError::from(IngestError::DefinitionsParse {
            path: PathBuf::from("report_definitions.yaml"),
            message: "bad indent".to_string(),
        });
        assert_eq!(parse.exit_code(), EXIT_CONFIG);
    }

    #[test]
    fn test_messages() {
        let schema = RunError::from(IngestError::MissingColumn {
            table: "customers".to_string(),
            field: "segment".to_string(),
            aliases: vec!["Segment".to_string(), "Segmento".to_string()],
        });
        insta::assert_snapshot!(
            schema.to_string(),
            @"table 'customers' has no column for 'segment' (looked for: Segment, Segmento)"
        );
        let auth = RunError::from(NotifyError::Auth {
            message: "535 5.7.8 rejected".to_string(),
        });
        assert!(auth.to_string().starts_with("mail failed: "));
    }

    #[test]
    fn test_mail_exit_codes() {
        let auth = RunError::from(NotifyError::Auth {
            message: "535".to_string(),
        });
        assert_eq!(auth.exit_code(), EXIT_AUTH);
        let transport = RunError::from(NotifyError::Transport {
            message: "connection refused".to_string(),
        });
        assert_eq!(transport.exit_code(), EXIT_TRANSPORT);
    }

    #[test]
    fn test_config_exit_codes() {
        let missing = RunError::ConfigNotFound {
            path: PathBuf::from("custom.toml"),
        };
        assert_eq!(missing.exit_code(), EXIT_NOT_FOUND);
        let env = RunError::InvalidEnv {
            name: "REPORTS_SMTP_PORT".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(env.exit_code(), EXIT_CONFIG);
        assert!(env.to_string().contains("REPORTS_SMTP_PORT"));
    }
}
