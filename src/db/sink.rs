use sqlx::MySqlPool;

use crate::db::schema::{create_approximate_table_sql, create_exact_table_sql};
use crate::error::LinkError;
use crate::models::{ApproximateMatch, ExactMatch};
use crate::sink::{InsertOutcome, MatchSink};

/// MySQL-backed sink. Every insert is its own autocommitted statement.
pub struct MySqlSink {
    pool: MySqlPool,
    exact_sql: String,
    approximate_sql: String,
}

impl MySqlSink {
    /// Create both match tables if missing and prepare the insert statements.
    pub async fn open(
        pool: MySqlPool,
        exact_table: &str,
        approximate_table: &str,
    ) -> Result<Self, LinkError> {
        let ddl_err = |e: anyhow::Error| LinkError::Persistence(e.to_string());
        let ddl = [
            create_exact_table_sql(exact_table).map_err(ddl_err)?,
            create_approximate_table_sql(approximate_table).map_err(ddl_err)?,
        ];
        for stmt in ddl {
            sqlx::query(&stmt).execute(&pool).await?;
        }
        log::info!(
            "Match tables ready: {} (exact), {} (approximate)",
            exact_table,
            approximate_table
        );
        Ok(Self {
            pool,
            exact_sql: format!(
                "INSERT INTO `{}` (name_source, name_canonical) VALUES (?, ?)",
                exact_table
            ),
            approximate_sql: format!(
                "INSERT INTO `{}` (name_source, name_candidate, score) VALUES (?, ?, ?)",
                approximate_table
            ),
        })
    }
}

fn classify(
    result: Result<sqlx::mysql::MySqlQueryResult, sqlx::Error>,
) -> Result<InsertOutcome, LinkError> {
    match result {
        Ok(_) => Ok(InsertOutcome::Inserted),
        // ER_DUP_ENTRY: the pair is already stored
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            Ok(InsertOutcome::Duplicate)
        }
        Err(e) => Err(e.into()),
    }
}

impl MatchSink for MySqlSink {
    async fn insert_exact(&mut self, m: &ExactMatch) -> Result<InsertOutcome, LinkError> {
        let r = sqlx::query(&self.exact_sql)
            .bind(&m.source)
            .bind(&m.canonical)
            .execute(&self.pool)
            .await;
        classify(r)
    }

    async fn insert_approximate(
        &mut self,
        m: &ApproximateMatch,
    ) -> Result<InsertOutcome, LinkError> {
        let r = sqlx::query(&self.approximate_sql)
            .bind(&m.source)
            .bind(&m.candidate)
            .bind(m.score)
            .execute(&self.pool)
            .await;
        classify(r)
    }
}
