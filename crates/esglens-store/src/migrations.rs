use ::duckdb::Connection;

struct Migration {
    version: &'static str,
    sql: &'static str,
}

// The `symbol` column holds uppercase-normalized tickers, so the UNIQUE
// index enforces case-insensitive symbol uniqueness at commit time.
// Ids come from a sequence; deleted ids are never handed out again.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "0001_companies",
        sql: r#"
CREATE SEQUENCE IF NOT EXISTS company_ids START 1;

CREATE TABLE IF NOT EXISTS companies (
    id BIGINT PRIMARY KEY,
    name TEXT NOT NULL,
    symbol TEXT NOT NULL,
    industry TEXT NOT NULL,
    sector TEXT NOT NULL,
    market_cap DOUBLE NOT NULL,
    country TEXT NOT NULL,
    revenue DOUBLE NOT NULL,
    esg_score DOUBLE NOT NULL,
    risk_level TEXT NOT NULL,
    created_at TEXT NOT NULL,
    ai_analysis TEXT,
    investment_recommendation TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_companies_symbol ON companies(symbol);
"#,
    },
    Migration {
        version: "0002_lookup_indexes",
        sql: r#"
CREATE INDEX IF NOT EXISTS idx_companies_industry ON companies(industry);
CREATE INDEX IF NOT EXISTS idx_companies_risk_level ON companies(risk_level);
CREATE INDEX IF NOT EXISTS idx_companies_esg_score ON companies(esg_score);
"#,
    },
];

pub fn apply_migrations(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    )?;

    for migration in MIGRATIONS {
        let query = format!(
            "SELECT COUNT(*) FROM schema_migrations WHERE version = '{}'",
            escape_sql_string(migration.version)
        );
        let applied_count: i64 = connection.query_row(query.as_str(), [], |row| row.get(0))?;

        if applied_count == 0 {
            connection.execute_batch(migration.sql)?;
            let insert = format!(
                "INSERT INTO schema_migrations (version) VALUES ('{}')",
                escape_sql_string(migration.version)
            );
            connection.execute_batch(insert.as_str())?;
        }
    }

    Ok(())
}

fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}
