use std::sync::Arc;

use serde_json::{json, Value};

use esglens_core::{Company, CompanyDraft, UtcDateTime};
use esglens_store::{CompanyRepository, EntityStore, StoreError};

use crate::cli::{AddArgs, CompaniesCommand, ListArgs};
use crate::error::CliError;

pub fn run(
    store: Arc<dyn EntityStore<Company>>,
    command: &CompaniesCommand,
) -> Result<Value, CliError> {
    match command {
        CompaniesCommand::List(args) => list(store, args),
        CompaniesCommand::Add(args) => add(store, args),
    }
}

fn list(store: Arc<dyn EntityStore<Company>>, args: &ListArgs) -> Result<Value, CliError> {
    let repository = CompanyRepository::new(store);

    let companies = if let Some(industry) = &args.industry {
        repository.by_industry(industry)?
    } else if let Some(risk) = &args.risk {
        repository.by_risk_level(risk)?
    } else if let Some(country) = &args.country {
        repository.by_country(country)?
    } else if let Some(min_esg) = args.min_esg {
        repository.with_esg_score_above(min_esg)?
    } else {
        repository.get_all()?
    };

    Ok(json!({
        "data": companies,
        "count": companies.len(),
    }))
}

fn add(store: Arc<dyn EntityStore<Company>>, args: &AddArgs) -> Result<Value, CliError> {
    let draft = CompanyDraft {
        name: args.name.clone(),
        symbol: args.symbol.clone(),
        industry: args.industry.clone(),
        sector: args.sector.clone(),
        market_cap: args.market_cap,
        country: args.country.clone(),
        revenue: args.revenue,
        esg_score: args.esg_score,
        risk_level: args.risk_level.clone(),
    };
    let company = draft.into_company(UtcDateTime::now())?;
    let symbol = company.symbol.clone();

    let mut repository = CompanyRepository::new(store);

    // Advisory pre-check; the store's UNIQUE index still guards the commit
    // against a concurrent writer claiming the symbol in between.
    if !repository.is_symbol_unique(symbol.as_str(), None)? {
        return Err(CliError::Store(StoreError::Conflict {
            symbol: symbol.as_str().to_owned(),
        }));
    }

    repository.add(company);
    repository.save_changes()?;

    tracing::info!(symbol = %symbol, "company added");
    let created = repository.by_symbol(symbol.as_str())?;
    Ok(serde_json::to_value(created)?)
}
