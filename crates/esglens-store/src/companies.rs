//! DuckDB-backed company store and the company domain repository.

use std::cmp::Ordering;
use std::fs;
use std::sync::Arc;

use ::duckdb::types::Value as DuckValue;
use ::duckdb::{Connection, ToSql};

use esglens_core::{Company, CompanyField, Comparator, FieldValue, Filter, Symbol, UtcDateTime};

use crate::duckdb::DuckDbConnectionManager;
use crate::migrations;
use crate::repository::{EntityStore, Repository, StagedOp};
use crate::{StoreConfig, StoreError};

/// Minimum ESG score for an entity to count as a top performer.
pub const ESG_PERFORMER_FLOOR: f64 = 70.0;

const SELECT_COLUMNS: &str = "id, name, symbol, industry, sector, market_cap, country, \
     revenue, esg_score, risk_level, created_at, ai_analysis, investment_recommendation";

/// Durable [`EntityStore`] over a DuckDB database file.
#[derive(Clone)]
pub struct CompanyStore {
    manager: DuckDbConnectionManager,
}

impl CompanyStore {
    /// Open the store with default configuration.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(StoreConfig::default())
    }

    /// Open the store, creating the database file and schema as needed.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let manager = DuckDbConnectionManager::new(&config.db_path, config.max_pool_size);
        let connection = manager.acquire()?;
        migrations::apply_migrations(&connection)?;
        drop(connection);

        tracing::debug!(db_path = %manager.db_path().display(), "company store opened");
        Ok(Self { manager })
    }

    fn fetch_with(
        &self,
        where_sql: &str,
        params: Vec<DuckValue>,
    ) -> Result<Vec<Company>, StoreError> {
        let connection = self.manager.acquire()?;
        let sql = format!("SELECT {SELECT_COLUMNS} FROM companies{where_sql} ORDER BY id");
        let mut statement = connection.prepare(&sql)?;
        let mut rows = statement.query(::duckdb::params_from_iter(params))?;

        let mut companies = Vec::new();
        while let Some(row) = rows.next()? {
            companies.push(read_company(row)?);
        }
        Ok(companies)
    }
}

impl EntityStore<Company> for CompanyStore {
    fn fetch_all(&self) -> Result<Vec<Company>, StoreError> {
        self.fetch_with("", Vec::new())
    }

    fn fetch_by_id(&self, id: i64) -> Result<Option<Company>, StoreError> {
        let rows = self.fetch_with(" WHERE id = ?", vec![DuckValue::BigInt(id)])?;
        Ok(rows.into_iter().next())
    }

    fn fetch_where(&self, filter: &Filter<CompanyField>) -> Result<Vec<Company>, StoreError> {
        let (where_sql, params) = render_where(filter);
        self.fetch_with(&where_sql, params)
    }

    fn count_where(&self, filter: Option<&Filter<CompanyField>>) -> Result<u64, StoreError> {
        let (where_sql, params) = filter.map_or_else(
            || (String::new(), Vec::new()),
            render_where,
        );

        let connection = self.manager.acquire()?;
        let sql = format!("SELECT count(*) FROM companies{where_sql}");
        let count: i64 =
            connection.query_row(&sql, ::duckdb::params_from_iter(params), |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn commit(&self, batch: Vec<StagedOp<Company>>) -> Result<u64, StoreError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let connection = self.manager.acquire()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<u64, StoreError> {
            let mut affected = 0u64;
            for op in &batch {
                affected += match op {
                    StagedOp::Add(company) => insert_company(&connection, company)?,
                    StagedOp::Update(company) => update_company(&connection, company)?,
                    StagedOp::Delete(company) => delete_company(&connection, company)?,
                };
            }
            Ok(affected)
        })();

        finalize_transaction(&connection, result)
    }
}

fn insert_company(connection: &Connection, company: &Company) -> Result<u64, StoreError> {
    let symbol = company.symbol.to_string();
    let created_at = company.created_at.format_rfc3339();
    let params: [&dyn ToSql; 12] = [
        &company.name,
        &symbol,
        &company.industry,
        &company.sector,
        &company.market_cap,
        &company.country,
        &company.revenue,
        &company.esg_score,
        &company.risk_level,
        &created_at,
        &company.ai_analysis,
        &company.investment_recommendation,
    ];

    connection
        .execute(
            "INSERT INTO companies \
             (id, name, symbol, industry, sector, market_cap, country, revenue, \
              esg_score, risk_level, created_at, ai_analysis, investment_recommendation) \
             VALUES (nextval('company_ids'), ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params.as_slice(),
        )
        .map(|count| count as u64)
        .map_err(|error| map_constraint_error(&company.symbol, error))
}

fn update_company(connection: &Connection, company: &Company) -> Result<u64, StoreError> {
    let Some(id) = company.id else {
        return Err(StoreError::MissingId);
    };

    // created_at is write-once and deliberately absent from the SET list.
    let symbol = company.symbol.to_string();
    let params: [&dyn ToSql; 12] = [
        &company.name,
        &symbol,
        &company.industry,
        &company.sector,
        &company.market_cap,
        &company.country,
        &company.revenue,
        &company.esg_score,
        &company.risk_level,
        &company.ai_analysis,
        &company.investment_recommendation,
        &id,
    ];

    connection
        .execute(
            "UPDATE companies SET name = ?, symbol = ?, industry = ?, sector = ?, \
             market_cap = ?, country = ?, revenue = ?, esg_score = ?, risk_level = ?, \
             ai_analysis = ?, investment_recommendation = ? WHERE id = ?",
            params.as_slice(),
        )
        .map(|count| count as u64)
        .map_err(|error| map_constraint_error(&company.symbol, error))
}

fn delete_company(connection: &Connection, company: &Company) -> Result<u64, StoreError> {
    let Some(id) = company.id else {
        return Err(StoreError::MissingId);
    };

    let params: [&dyn ToSql; 1] = [&id];
    let count = connection.execute("DELETE FROM companies WHERE id = ?", params.as_slice())?;
    Ok(count as u64)
}

/// Finalize a transaction, committing on success or rolling back on failure.
fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

fn map_constraint_error(symbol: &Symbol, error: ::duckdb::Error) -> StoreError {
    let message = error.to_string();
    if message.contains("Duplicate key") || message.to_ascii_lowercase().contains("unique") {
        StoreError::Conflict {
            symbol: symbol.as_str().to_owned(),
        }
    } else {
        StoreError::DuckDb(error)
    }
}

fn read_company(row: &::duckdb::Row<'_>) -> Result<Company, StoreError> {
    let symbol_text: String = row.get(2)?;
    let symbol =
        Symbol::parse(&symbol_text).map_err(|error| StoreError::InvalidRow(error.to_string()))?;
    let created_text: String = row.get(10)?;
    let created_at = UtcDateTime::parse(&created_text)
        .map_err(|error| StoreError::InvalidRow(error.to_string()))?;

    Ok(Company {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        symbol,
        industry: row.get(3)?,
        sector: row.get(4)?,
        market_cap: row.get(5)?,
        country: row.get(6)?,
        revenue: row.get(7)?,
        esg_score: row.get(8)?,
        risk_level: row.get(9)?,
        created_at,
        ai_analysis: row.get(11)?,
        investment_recommendation: row.get(12)?,
    })
}

fn render_where(filter: &Filter<CompanyField>) -> (String, Vec<DuckValue>) {
    if filter.is_empty() {
        return (String::new(), Vec::new());
    }

    let mut clauses = Vec::new();
    let mut params = Vec::new();
    for condition in filter.conditions() {
        let column = column_name(condition.field);
        let clause = match condition.comparator {
            Comparator::Eq => format!("{column} = ?"),
            Comparator::EqIgnoreCase => format!("lower({column}) = lower(?)"),
            Comparator::Ne => format!("{column} <> ?"),
            Comparator::Ge => format!("{column} >= ?"),
            Comparator::Gt => format!("{column} > ?"),
            Comparator::Le => format!("{column} <= ?"),
            Comparator::Lt => format!("{column} < ?"),
        };
        clauses.push(clause);
        params.push(bind_value(&condition.value));
    }

    (format!(" WHERE {}", clauses.join(" AND ")), params)
}

fn column_name(field: CompanyField) -> &'static str {
    match field {
        CompanyField::Id => "id",
        CompanyField::Name => "name",
        CompanyField::Symbol => "symbol",
        CompanyField::Industry => "industry",
        CompanyField::Sector => "sector",
        CompanyField::Country => "country",
        CompanyField::RiskLevel => "risk_level",
        CompanyField::MarketCap => "market_cap",
        CompanyField::Revenue => "revenue",
        CompanyField::EsgScore => "esg_score",
    }
}

fn bind_value(value: &FieldValue) -> DuckValue {
    match value {
        FieldValue::Text(text) => DuckValue::Text(text.clone()),
        FieldValue::Number(number) => DuckValue::Double(*number),
        FieldValue::Integer(int) => DuckValue::BigInt(*int),
    }
}

/// Company-specific repository: the generic unit of work plus the named
/// business queries and aggregates.
///
/// Composed over [`Repository`] rather than inheriting from it; one
/// instance is one unit of work.
pub struct CompanyRepository {
    inner: Repository<Company>,
}

impl CompanyRepository {
    pub fn new(store: Arc<dyn EntityStore<Company>>) -> Self {
        Self {
            inner: Repository::new(store),
        }
    }

    // Generic surface, delegated.

    pub fn get_all(&self) -> Result<Vec<Company>, StoreError> {
        self.inner.get_all()
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Company>, StoreError> {
        self.inner.get_by_id(id)
    }

    pub fn find(&self, filter: &Filter<CompanyField>) -> Result<Vec<Company>, StoreError> {
        self.inner.find(filter)
    }

    pub fn first_or_default(
        &self,
        filter: &Filter<CompanyField>,
    ) -> Result<Option<Company>, StoreError> {
        self.inner.first_or_default(filter)
    }

    pub fn add(&mut self, company: Company) {
        self.inner.add(company);
    }

    pub fn add_range(&mut self, companies: impl IntoIterator<Item = Company>) {
        self.inner.add_range(companies);
    }

    pub fn update(&mut self, company: Company) {
        self.inner.update(company);
    }

    pub fn delete(&mut self, company: Company) {
        self.inner.delete(company);
    }

    pub fn delete_range(&mut self, companies: impl IntoIterator<Item = Company>) {
        self.inner.delete_range(companies);
    }

    pub fn save_changes(&mut self) -> Result<u64, StoreError> {
        self.inner.save_changes()
    }

    pub fn exists(&self, filter: &Filter<CompanyField>) -> Result<bool, StoreError> {
        self.inner.exists(filter)
    }

    pub fn count(&self, filter: Option<&Filter<CompanyField>>) -> Result<u64, StoreError> {
        self.inner.count(filter)
    }

    // Domain queries.

    /// Companies with `esg_score >= 70`, best first, truncated to `count`.
    /// Ties keep natural order; no secondary sort key is introduced.
    pub fn top_esg_performers(&self, count: usize) -> Result<Vec<Company>, StoreError> {
        let filter = Filter::where_field(
            CompanyField::EsgScore,
            Comparator::Ge,
            FieldValue::Number(ESG_PERFORMER_FLOOR),
        );
        let mut performers = self.inner.find(&filter)?;
        sort_descending_by(&mut performers, |company| company.esg_score);
        performers.truncate(count);
        Ok(performers)
    }

    /// Case-insensitive industry match, sorted by name.
    pub fn by_industry(&self, industry: &str) -> Result<Vec<Company>, StoreError> {
        self.matched_sorted_by_name(CompanyField::Industry, industry)
    }

    /// Case-insensitive risk level match, sorted by name.
    pub fn by_risk_level(&self, risk_level: &str) -> Result<Vec<Company>, StoreError> {
        self.matched_sorted_by_name(CompanyField::RiskLevel, risk_level)
    }

    /// Case-insensitive country match, sorted by name.
    pub fn by_country(&self, country: &str) -> Result<Vec<Company>, StoreError> {
        self.matched_sorted_by_name(CompanyField::Country, country)
    }

    /// Companies with `esg_score >= min`, highest score first.
    pub fn with_esg_score_above(&self, min: f64) -> Result<Vec<Company>, StoreError> {
        let filter = Filter::where_field(
            CompanyField::EsgScore,
            Comparator::Ge,
            FieldValue::Number(min),
        );
        let mut companies = self.inner.find(&filter)?;
        sort_descending_by(&mut companies, |company| company.esg_score);
        Ok(companies)
    }

    /// Companies with `market_cap >= min`, largest first.
    pub fn with_market_cap_above(&self, min: f64) -> Result<Vec<Company>, StoreError> {
        let filter = Filter::where_field(
            CompanyField::MarketCap,
            Comparator::Ge,
            FieldValue::Number(min),
        );
        let mut companies = self.inner.find(&filter)?;
        sort_descending_by(&mut companies, |company| company.market_cap);
        Ok(companies)
    }

    /// Case-insensitive symbol lookup; the uniqueness invariant guarantees
    /// at most one match.
    pub fn by_symbol(&self, symbol: &str) -> Result<Option<Company>, StoreError> {
        let filter = Filter::where_field(
            CompanyField::Symbol,
            Comparator::EqIgnoreCase,
            FieldValue::Text(symbol.trim().to_owned()),
        );
        self.inner.first_or_default(&filter)
    }

    /// True iff no entity other than `exclude_id` holds the symbol.
    ///
    /// Advisory only: a concurrent writer can still claim the symbol
    /// between this check and `save_changes`. The UNIQUE index on the
    /// symbol column closes that race at commit time.
    pub fn is_symbol_unique(
        &self,
        symbol: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, StoreError> {
        let mut filter = Filter::where_field(
            CompanyField::Symbol,
            Comparator::EqIgnoreCase,
            FieldValue::Text(symbol.trim().to_owned()),
        );
        if let Some(id) = exclude_id {
            filter = filter.and(CompanyField::Id, Comparator::Ne, FieldValue::Integer(id));
        }

        Ok(!self.inner.exists(&filter)?)
    }

    // Aggregates. Averages over an empty dataset return 0.0; callers that
    // must distinguish "empty" use `total_count`.

    pub fn average_esg_score(&self) -> Result<f64, StoreError> {
        Ok(average(&self.inner.get_all()?, |company| company.esg_score))
    }

    pub fn average_market_cap(&self) -> Result<f64, StoreError> {
        Ok(average(&self.inner.get_all()?, |company| company.market_cap))
    }

    pub fn total_count(&self) -> Result<u64, StoreError> {
        self.inner.count(None)
    }

    fn matched_sorted_by_name(
        &self,
        field: CompanyField,
        value: &str,
    ) -> Result<Vec<Company>, StoreError> {
        let filter = Filter::where_field(
            field,
            Comparator::EqIgnoreCase,
            FieldValue::Text(value.trim().to_owned()),
        );
        let mut companies = self.inner.find(&filter)?;
        companies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(companies)
    }
}

fn sort_descending_by(companies: &mut [Company], key: impl Fn(&Company) -> f64) {
    // sort_by is stable, so equal keys keep their natural order.
    companies.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
}

fn average(companies: &[Company], metric: impl Fn(&Company) -> f64) -> f64 {
    if companies.is_empty() {
        return 0.0;
    }
    companies.iter().map(metric).sum::<f64>() / companies.len() as f64
}
