use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::matching::{DEFAULT_THRESHOLD, IndexPolicy, ScorerKind};

#[derive(Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConfig {
    pub fn to_url(&self) -> String {
        format!(
            "mysql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

/// Where the two name collections are read from.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SourceConfig {
    /// Collection A, read with SELECT DISTINCT.
    pub source_table: String,
    pub source_column: String,
    /// Collection B, the reference list the variant index is built from.
    pub reference_table: String,
    pub reference_column: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            source_table: "stat".into(),
            source_column: "name".into(),
            reference_table: "crm".into(),
            reference_column: "user_name".into(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct MatchingConfig {
    pub threshold: u8,
    pub index_policy: IndexPolicy,
    pub scorer: ScorerKind,
    pub prefilter: bool,
    pub parallel: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            index_policy: IndexPolicy::default(),
            scorer: ScorerKind::default(),
            prefilter: true,
            parallel: false,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SinkConfig {
    pub exact_table: String,
    pub approximate_table: String,
    /// Keep matches in memory instead of writing them to the database.
    pub dry_run: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            exact_table: "name_match_exact".into(),
            approximate_table: "name_match_approx".into(),
            dry_run: false,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct ExportConfig {
    /// CSV path prefix; `<out>_exact.csv` and `<out>_approx.csv` are written.
    pub out_path: Option<String>,
    pub summary_path: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub sources: SourceConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.host.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.host",
            });
        }
        if self.database.username.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.username",
            });
        }
        if self.database.database.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.database",
            });
        }
        if self.database.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "database.port",
                reason: format!("{} is out of range", self.database.port),
            });
        }
        if self.matching.threshold > 100 {
            return Err(ConfigError::InvalidValue {
                field: "matching.threshold",
                reason: format!("{} not in 0..=100", self.matching.threshold),
            });
        }
        let idents = [
            ("sources.source_table", &self.sources.source_table),
            ("sources.source_column", &self.sources.source_column),
            ("sources.reference_table", &self.sources.reference_table),
            ("sources.reference_column", &self.sources.reference_column),
            ("sink.exact_table", &self.sink.exact_table),
            ("sink.approximate_table", &self.sink.approximate_table),
        ];
        for (field, value) in idents {
            if !is_valid_ident(value) {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("'{}' is not a plain SQL identifier", value),
                });
            }
        }
        if self.sink.exact_table == self.sink.approximate_table {
            return Err(ConfigError::InvalidValue {
                field: "sink.approximate_table",
                reason: "must differ from sink.exact_table".into(),
            });
        }
        Ok(())
    }
}

/// `[A-Za-z0-9_]+`
pub fn is_valid_ident(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
