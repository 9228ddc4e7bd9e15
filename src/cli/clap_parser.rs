use clap::{Args, Parser, Subcommand};

use crate::config::{
    AppConfig, DatabaseConfig, ExportConfig, MatchingConfig, SinkConfig, SourceConfig,
};
use crate::error::ConfigError;
use crate::matching::{DEFAULT_THRESHOLD, IndexPolicy, ScorerKind};

#[derive(Parser, Debug)]
#[command(
    name = "name_linker",
    version,
    about = "Person-name record linkage: exact variant join and fuzzy token-sort join",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Link the source collection against the reference collection and persist matches
    Link(LinkArgs),
    /// Print the variant set of each NAME
    Variants {
        #[arg(value_name = "NAME", required = true)]
        names: Vec<String>,
    },
    /// Write a .env.template with every supported variable
    EnvTemplate {
        #[arg(value_name = "PATH", default_value = ".env.template")]
        path: String,
    },
}

#[derive(Args, Debug)]
pub struct LinkArgs {
    /// DB host (env: DB_HOST)
    #[arg(long, env = "DB_HOST")]
    pub host: String,
    /// DB port (env: DB_PORT)
    #[arg(long, env = "DB_PORT", default_value_t = 3306)]
    pub port: u16,
    /// DB user (env: DB_USER)
    #[arg(long, env = "DB_USER")]
    pub user: String,
    /// DB password (env: DB_PASSWORD or DB_PASS)
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,
    /// Database name (env: DB_NAME)
    #[arg(long, env = "DB_NAME")]
    pub database: String,

    /// Table holding the source names (read with SELECT DISTINCT)
    #[arg(long, env = "NAME_LINKER_SOURCE_TABLE", default_value = "stat")]
    pub source_table: String,
    #[arg(long, env = "NAME_LINKER_SOURCE_COLUMN", default_value = "name")]
    pub source_column: String,
    /// Table holding the reference names the variant index is built from
    #[arg(long, env = "NAME_LINKER_REFERENCE_TABLE", default_value = "crm")]
    pub reference_table: String,
    #[arg(long, env = "NAME_LINKER_REFERENCE_COLUMN", default_value = "user_name")]
    pub reference_column: String,

    #[arg(long, env = "NAME_LINKER_EXACT_TABLE", default_value = "name_match_exact")]
    pub exact_table: String,
    #[arg(long, env = "NAME_LINKER_APPROX_TABLE", default_value = "name_match_approx")]
    pub approx_table: String,

    /// Minimum accepted similarity score (0-100)
    #[arg(long, env = "NAME_LINKER_THRESHOLD", default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u8,
    /// last_write_wins | keep_first | reject_ambiguous
    #[arg(long, env = "NAME_LINKER_INDEX_POLICY", default_value_t = IndexPolicy::LastWriteWins)]
    pub index_policy: IndexPolicy,
    /// token_sort | token_sort_jaro_winkler
    #[arg(long, env = "NAME_LINKER_SCORER", default_value_t = ScorerKind::TokenSort)]
    pub scorer: ScorerKind,
    /// Score every pair, even those whose upper bound is below the threshold
    #[arg(long = "no-prefilter")]
    pub no_prefilter: bool,
    /// Score source rows on all cores (output order unchanged)
    #[arg(long, env = "NAME_LINKER_PARALLEL")]
    pub parallel: bool,

    /// Keep matches in memory instead of writing the match tables
    #[arg(long = "dry-run")]
    pub dry_run: bool,
    /// Write <PREFIX>_exact.csv and <PREFIX>_approx.csv
    #[arg(long = "out", value_name = "PREFIX")]
    pub out: Option<String>,
    /// Write a Key/Value summary CSV
    #[arg(long = "summary", value_name = "PATH")]
    pub summary: Option<String>,
}

impl LinkArgs {
    pub fn to_app_config(&self) -> Result<AppConfig, ConfigError> {
        let pass = if self.password.is_empty() {
            std::env::var("DB_PASS").unwrap_or_default()
        } else {
            self.password.clone()
        };

        let cfg = AppConfig {
            database: DatabaseConfig {
                username: self.user.clone(),
                password: pass,
                host: self.host.clone(),
                port: self.port,
                database: self.database.clone(),
            },
            sources: SourceConfig {
                source_table: self.source_table.clone(),
                source_column: self.source_column.clone(),
                reference_table: self.reference_table.clone(),
                reference_column: self.reference_column.clone(),
            },
            matching: MatchingConfig {
                threshold: self.threshold,
                index_policy: self.index_policy,
                scorer: self.scorer,
                prefilter: !self.no_prefilter,
                parallel: self.parallel,
            },
            sink: SinkConfig {
                exact_table: self.exact_table.clone(),
                approximate_table: self.approx_table.clone(),
                dry_run: self.dry_run,
            },
            export: ExportConfig {
                out_path: self.out.clone(),
                summary_path: self.summary.clone(),
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn link_flags_build_config() {
        let cli = parse(&[
            "name_linker",
            "link",
            "--host",
            "db",
            "--user",
            "u",
            "--password",
            "p",
            "--database",
            "linkage",
            "--threshold",
            "80",
            "--index-policy",
            "keep_first",
            "--no-prefilter",
            "--dry-run",
        ]);
        let Command::Link(args) = cli.command else {
            panic!("expected link");
        };
        let cfg = args.to_app_config().unwrap();
        assert_eq!(cfg.database.host, "db");
        assert_eq!(cfg.matching.threshold, 80);
        assert_eq!(cfg.matching.index_policy, IndexPolicy::KeepFirst);
        assert!(!cfg.matching.prefilter);
        assert!(cfg.sink.dry_run);
        assert_eq!(cfg.sources.reference_column, "user_name");
    }

    #[test]
    fn bad_table_name_fails_validation() {
        let cli = parse(&[
            "name_linker",
            "link",
            "--host",
            "db",
            "--user",
            "u",
            "--password",
            "p",
            "--database",
            "linkage",
            "--source-table",
            "stat`x",
        ]);
        let Command::Link(args) = cli.command else {
            panic!("expected link");
        };
        assert!(args.to_app_config().is_err());
    }

    #[test]
    fn variants_subcommand() {
        let cli = parse(&["name_linker", "variants", "John Smith", "Mr. Jan Novak"]);
        match cli.command {
            Command::Variants { names } => assert_eq!(names.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }
}
