use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::LinkError;

/// Matches are written one statement at a time, so a small pool suffices.
const DEFAULT_MAX_CONNS: u32 = 2;

pub async fn make_pool(cfg: &DatabaseConfig) -> Result<MySqlPool, LinkError> {
    make_pool_with_size(cfg, None).await
}

pub async fn make_pool_with_size(
    cfg: &DatabaseConfig,
    max: Option<u32>,
) -> Result<MySqlPool, LinkError> {
    let url = cfg.to_url();
    let max_conn: u32 = match max {
        Some(m) if m > 0 => m,
        _ => env_u32("NAME_LINKER_POOL_SIZE").unwrap_or(DEFAULT_MAX_CONNS),
    };
    let acquire_ms: u64 = std::env::var("NAME_LINKER_ACQUIRE_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(30_000);
    log::debug!(
        "DB pool: host={} db={} max_conns={} acquire_ms={}",
        cfg.host,
        cfg.database,
        max_conn,
        acquire_ms
    );

    let pool = MySqlPoolOptions::new()
        .max_connections(max_conn)
        .min_connections(1)
        .acquire_timeout(Duration::from_millis(acquire_ms))
        .connect(&url)
        .await
        .map_err(|e| {
            LinkError::Persistence(format!(
                "cannot connect to {}:{}/{}: {}",
                cfg.host, cfg.port, cfg.database, e
            ))
        })?;
    Ok(pool)
}

fn env_u32(key: &str) -> Option<u32> {
    let s = std::env::var(key).ok()?;
    match s.parse::<u32>() {
        Ok(v) if v > 0 => Some(v),
        _ => {
            log::warn!("Invalid {}='{}'; using default", key, s);
            None
        }
    }
}
