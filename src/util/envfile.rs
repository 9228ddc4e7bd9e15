use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Parse `KEY=VALUE` lines; blank lines and `#` comments are skipped and
/// surrounding quotes are removed from values.
pub fn parse_env_str(content: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (idx, line) in content.lines().enumerate() {
        let s = line.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        if let Some((key, val)) = s.split_once('=') {
            let key = key.trim();
            let mut val = val.trim().to_string();
            if val.len() >= 2
                && ((val.starts_with('"') && val.ends_with('"'))
                    || (val.starts_with('\'') && val.ends_with('\'')))
            {
                val = val[1..val.len() - 1].to_string();
            }
            map.insert(key.to_string(), val);
        } else {
            log::warn!("ignoring .env line {} without '=': {}", idx + 1, line);
        }
    }
    map
}

/// Parse `.env` in the current working directory, if present.
/// Does not modify the process environment.
pub fn parse_env_file() -> Result<HashMap<String, String>> {
    let path = Path::new(".env");
    if !path.exists() {
        return Ok(HashMap::new());
    }
    Ok(parse_env_str(&fs::read_to_string(path)?))
}

/// Load `.env` into the process environment without overriding variables
/// that are already set. Must run before any other thread is spawned.
pub fn load_dotenv_if_present() -> Result<()> {
    for (k, v) in parse_env_file()? {
        if std::env::var_os(&k).is_none() {
            unsafe {
                std::env::set_var(&k, &v);
            }
        }
    }
    Ok(())
}

pub fn write_env_template(path: &str) -> Result<()> {
    let mut f = fs::File::create(path)?;
    let template = r#"# name_linker environment configuration template
# Copy this file to .env and fill in your database connection settings.
# Any of these variables can also be provided via the system environment.

DB_HOST=127.0.0.1
DB_PORT=3306
DB_USER=root
DB_PASSWORD=secret
DB_NAME=database_name

# Collections (table.column)
#NAME_LINKER_SOURCE_TABLE=stat
#NAME_LINKER_SOURCE_COLUMN=name
#NAME_LINKER_REFERENCE_TABLE=crm
#NAME_LINKER_REFERENCE_COLUMN=user_name

# Match tables
#NAME_LINKER_EXACT_TABLE=name_match_exact
#NAME_LINKER_APPROX_TABLE=name_match_approx

# Matching
#NAME_LINKER_THRESHOLD=70
#NAME_LINKER_INDEX_POLICY=last_write_wins
#NAME_LINKER_SCORER=token_sort

# Pool / logging
#NAME_LINKER_POOL_SIZE=2
#NAME_LINKER_ACQUIRE_MS=30000
#NAME_LINKER_TRACING=1
#RUST_LOG=info
"#;
    f.write_all(template.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quotes_and_comments() {
        let m = parse_env_str(
            "# comment\n\nDB_HOST=localhost\nDB_PASSWORD=\"p=w\"\nDB_USER='root'\nbroken line\n",
        );
        assert_eq!(m.get("DB_HOST").map(String::as_str), Some("localhost"));
        assert_eq!(m.get("DB_PASSWORD").map(String::as_str), Some("p=w"));
        assert_eq!(m.get("DB_USER").map(String::as_str), Some("root"));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn lone_quote_is_kept() {
        let m = parse_env_str("X=\"\n");
        assert_eq!(m.get("X").map(String::as_str), Some("\""));
    }
}
