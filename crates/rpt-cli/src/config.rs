//! Run configuration: `reports.toml`, environment overrides and defaults.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rpt_ingest::SourceFile;
use rpt_model::{AliasTable, ReferencePeriod, default_customer_aliases, default_transaction_aliases};
use rpt_notify::{DEFAULT_BODY, DEFAULT_SUBJECT, MailSettings};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, RunError};

/// Configuration file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "reports.toml";

pub const ENV_MAIL_SENDER: &str = "REPORTS_MAIL_SENDER";
pub const ENV_MAIL_PASSWORD: &str = "REPORTS_MAIL_PASSWORD";
pub const ENV_MAIL_RECIPIENTS: &str = "REPORTS_MAIL_RECIPIENTS";
pub const ENV_SMTP_HOST: &str = "REPORTS_SMTP_HOST";
pub const ENV_SMTP_PORT: &str = "REPORTS_SMTP_PORT";

/// Everything a run needs to know besides the reference period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub files: FilesConfig,
    /// Input sources by table name.
    pub sources: BTreeMap<String, SourceConfig>,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub definitions: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    pub input_extension: String,
    pub output_extension: String,
    /// Table that must hold rows for a run to proceed.
    pub primary_source: String,
}

/// One input source; without `columns` the table is used as read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub columns: Option<AliasTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender: String,
    pub sender_name: String,
    pub password: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut sources = BTreeMap::new();
        sources.insert(
            "transactions".to_string(),
            SourceConfig {
                columns: Some(default_transaction_aliases()),
            },
        );
        sources.insert(
            "customers".to_string(),
            SourceConfig {
                columns: Some(default_customer_aliases()),
            },
        );
        Self {
            paths: PathsConfig::default(),
            files: FilesConfig::default(),
            sources,
            mail: MailConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            definitions: PathBuf::from("report_definitions.yaml"),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            input_extension: "xlsx".to_string(),
            output_extension: "xlsx".to_string(),
            primary_source: "transactions".to_string(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 465,
            sender: String::new(),
            sender_name: "Report Automation Team".to_string(),
            password: String::new(),
            recipients: Vec::new(),
            subject: DEFAULT_SUBJECT.to_string(),
            body: DEFAULT_BODY.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration file.
    ///
    /// With `path == None` the default file is tried and its absence yields
    /// the built-in defaults. An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if explicit {
                    return Err(RunError::ConfigNotFound {
                        path: path.to_path_buf(),
                    });
                }
                info!(path = %path.display(), "no configuration file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(RunError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = Self::parse(&text).map_err(|message| RunError::ConfigParse {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(path = %path.display(), sources = config.sources.len(), "configuration loaded");
        Ok(config)
    }

    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Applies `REPORTS_*` variables from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Applies overrides read through `lookup`. Empty values are ignored.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(sender) = get(ENV_MAIL_SENDER) {
            self.mail.sender = sender.trim().to_string();
        }
        if let Some(password) = get(ENV_MAIL_PASSWORD) {
            self.mail.password = password;
        }
        if let Some(recipients) = get(ENV_MAIL_RECIPIENTS) {
            self.mail.recipients = split_recipients(&recipients);
        }
        if let Some(host) = get(ENV_SMTP_HOST) {
            self.mail.smtp_host = host.trim().to_string();
        }
        if let Some(port) = get(ENV_SMTP_PORT) {
            self.mail.smtp_port = port.trim().parse().map_err(|_| RunError::InvalidEnv {
                name: ENV_SMTP_PORT.to_string(),
                value: port.clone(),
            })?;
        }
        Ok(())
    }

    /// Input files of a run, one per configured source.
    pub fn source_files(&self, period: ReferencePeriod) -> Vec<SourceFile> {
        self.sources
            .iter()
            .map(|(name, source)| {
                let path = self
                    .paths
                    .input_dir
                    .join(period.file_name(name, &self.files.input_extension));
                let file = SourceFile::new(name.clone(), path);
                match &source.columns {
                    Some(aliases) => file.with_aliases(aliases.clone()),
                    None => file,
                }
            })
            .collect()
    }

    pub fn mail_settings(&self) -> MailSettings {
        MailSettings {
            sender: self.mail.sender.clone(),
            sender_name: self.mail.sender_name.clone(),
        }
    }
}

/// Splits a comma-separated address list, dropping blanks.
pub fn split_recipients(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.files.primary_source, "transactions");
        assert_eq!(config.mail.smtp_port, 465);
        let transactions = config.sources["transactions"].columns.as_ref().unwrap();
        assert!(transactions.contains("customer_id"));
        assert!(transactions.contains("amount"));
        assert!(transactions.contains("date"));
        let customers = config.sources["customers"].columns.as_ref().unwrap();
        assert!(customers.contains("segment"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = AppConfig::parse(
            r#"
[paths]
input_dir = "data/in"

[mail]
recipients = ["ops@example.com"]
"#,
        )
        .unwrap();
        assert_eq!(config.paths.input_dir, PathBuf::from("data/in"));
        assert_eq!(config.paths.output_dir, PathBuf::from("output"));
        assert_eq!(config.mail.recipients, vec!["ops@example.com"]);
        assert_eq!(config.mail.subject, DEFAULT_SUBJECT);
        assert_eq!(config.sources.len(), 2);
    }

    #[test]
    fn test_source_columns_parse_in_order() {
        let config = AppConfig::parse(
            r#"
[sources.orders.columns]
customer_id = ["Buyer", "Client"]
amount = ["Net"]

[sources.regions]
"#,
        )
        .unwrap();
        let orders = config.sources["orders"].columns.as_ref().unwrap();
        let fields: Vec<&str> = orders.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["customer_id", "amount"]);
        assert_eq!(orders.aliases("customer_id").unwrap(), ["Buyer", "Client"]);
        assert!(config.sources["regions"].columns.is_none());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = AppConfig::parse("[paths]\ninput = \"x\"\n").unwrap_err();
        assert!(err.contains("input"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_MAIL_SENDER, " reports@example.com "),
            (ENV_MAIL_RECIPIENTS, "a@example.com, ,b@example.com"),
            (ENV_SMTP_PORT, "587"),
            (ENV_SMTP_HOST, ""),
        ]
        .into_iter()
        .collect();
        let mut config = AppConfig::default();
        config
            .apply_env_with(|name| vars.get(name).map(|v| (*v).to_string()))
            .unwrap();
        assert_eq!(config.mail.sender, "reports@example.com");
        assert_eq!(config.mail.recipients, vec!["a@example.com", "b@example.com"]);
        assert_eq!(config.mail.smtp_port, 587);
        assert_eq!(config.mail.smtp_host, "smtp.gmail.com");
    }

    #[test]
    fn test_bad_port_rejected() {
        let mut config = AppConfig::default();
        let err = config
            .apply_env_with(|name| (name == ENV_SMTP_PORT).then(|| "smtp".to_string()))
            .unwrap_err();
        assert!(matches!(err, RunError::InvalidEnv { .. }));
    }

    #[test]
    fn test_source_files() {
        let config = AppConfig::default();
        let period = ReferencePeriod::new(2025, 6).unwrap();
        let files = config.source_files(period);
        let paths: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
        assert!(paths.contains(&PathBuf::from("input/transactions_2025_06.xlsx")));
        assert!(paths.contains(&PathBuf::from("input/customers_2025_06.xlsx")));
        assert!(files.iter().all(|f| f.aliases.is_some()));
    }
}
