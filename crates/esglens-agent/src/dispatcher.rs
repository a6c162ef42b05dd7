//! Stateless tool dispatch against the company store.
//!
//! One dispatcher instance serves any number of calls; each call opens its
//! own repository (one unit of work per dispatch) and terminates with an
//! envelope. This is the single boundary where store failures become error
//! envelopes; nothing here lets an error propagate to the caller.

use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use esglens_core::{Company, UtcDateTime};
use esglens_store::{CompanyRepository, EntityStore, StoreError};

use crate::analysis::AnalysisEngine;
use crate::envelope::{ToolEnvelope, ToolSuccess};
use crate::registry::{Capabilities, ToolRegistry};
use crate::request::{ParamBag, ToolCall};

/// Routes named operations to the company repository.
pub struct Dispatcher {
    store: Arc<dyn EntityStore<Company>>,
    registry: ToolRegistry,
    engine: AnalysisEngine,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn EntityStore<Company>>) -> Self {
        Self {
            store,
            registry: ToolRegistry::builtin(),
            engine: AnalysisEngine::new(),
        }
    }

    /// Describe the server and its registered tools. Pure read; the store
    /// is not touched.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        tracing::debug!("returning server capabilities");
        Capabilities::current()
    }

    /// Execute a registered tool. Always returns an envelope: unknown
    /// names, invalid parameters, missing entities, and store failures all
    /// map to typed error envelopes here.
    pub fn execute_tool(&self, tool_name: &str, params: &ParamBag) -> ToolEnvelope {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("execute_tool", tool = tool_name, %request_id);
        let _guard = span.enter();

        let Some(descriptor) = self.registry.lookup(tool_name) else {
            tracing::warn!("unknown tool requested");
            return ToolEnvelope::unknown_tool(tool_name, self.registry.tool_names());
        };

        // Validation happens before any store access; an invalid bag means
        // the backend is never invoked.
        let call = match ToolCall::parse(descriptor.name, params) {
            Ok(call) => call,
            Err(error) => {
                tracing::warn!(%error, "parameter validation failed");
                return ToolEnvelope::validation(error.to_string());
            }
        };

        match self.run(call) {
            Ok(envelope) => envelope,
            Err(error) => {
                tracing::error!(%error, "tool execution failed");
                error.into_envelope(descriptor.name)
            }
        }
    }

    fn run(&self, call: ToolCall) -> Result<ToolEnvelope, DispatchError> {
        let repository = self.unit_of_work();

        match call {
            ToolCall::GetCompanies => {
                let companies = repository.get_all()?;
                let count = companies.len();
                Ok(ToolEnvelope::Success(
                    ToolSuccess::new()
                        .with_data(serde_json::to_value(&companies)?)
                        .with_count(count),
                ))
            }
            ToolCall::GetCompanyBySymbol { symbol } => {
                match repository.by_symbol(&symbol)? {
                    None => Ok(missing_company(&symbol)),
                    Some(company) => Ok(ToolEnvelope::Success(
                        ToolSuccess::new().with_data(serde_json::to_value(&company)?),
                    )),
                }
            }
            ToolCall::GetEsgPerformers { count } => {
                let performers = repository.top_esg_performers(count)?;
                let returned = performers.len();
                Ok(ToolEnvelope::Success(
                    ToolSuccess::new()
                        .with_data(serde_json::to_value(&performers)?)
                        .with_count(returned)
                        .with_description(format!("Top {count} ESG performing companies")),
                ))
            }
            ToolCall::AnalyzeCompany { symbol } => {
                match repository.by_symbol(&symbol)? {
                    None => Ok(missing_company(&symbol)),
                    Some(company) => {
                        let report = self.engine.analyze(&company);
                        Ok(ToolEnvelope::Success(
                            ToolSuccess::new()
                                .with_company(company_profile(&company))
                                .with_analysis(serde_json::to_value(report)?),
                        ))
                    }
                }
            }
            ToolCall::GetCompaniesByRisk { risk_level } => {
                let companies = repository.by_risk_level(&risk_level)?;
                let count = companies.len();
                Ok(ToolEnvelope::Success(
                    ToolSuccess::new()
                        .with_data(serde_json::to_value(&companies)?)
                        .with_count(count)
                        .with_risk_level(risk_level),
                ))
            }
            ToolCall::GetCompaniesByIndustry { industry } => {
                let companies = repository.by_industry(&industry)?;
                let count = companies.len();
                Ok(ToolEnvelope::Success(
                    ToolSuccess::new()
                        .with_data(serde_json::to_value(&companies)?)
                        .with_count(count)
                        .with_industry(industry),
                ))
            }
            ToolCall::GetMarketAnalytics => self.market_analytics(&repository),
        }
    }

    fn market_analytics(
        &self,
        repository: &CompanyRepository,
    ) -> Result<ToolEnvelope, DispatchError> {
        let total_companies = repository.total_count()?;
        let average_esg = round2(repository.average_esg_score()?);
        let average_cap_billions = round2(repository.average_market_cap()? / 1_000_000_000.0);
        let leaders: Vec<Value> = repository
            .top_esg_performers(3)?
            .iter()
            .map(|company| {
                json!({
                    "name": company.name,
                    "symbol": company.symbol,
                    "esgScore": company.esg_score,
                })
            })
            .collect();

        let analytics = json!({
            "totalCompanies": total_companies,
            "averageESGScore": average_esg,
            "averageMarketCapBillions": average_cap_billions,
            "topESGPerformers": leaders,
            "lastUpdated": UtcDateTime::now(),
        });

        Ok(ToolEnvelope::Success(
            ToolSuccess::new().with_analytics(analytics),
        ))
    }

    fn unit_of_work(&self) -> CompanyRepository {
        CompanyRepository::new(Arc::clone(&self.store))
    }
}

fn missing_company(symbol: &str) -> ToolEnvelope {
    ToolEnvelope::not_found(format!("Company with symbol '{symbol}' not found"))
}

fn company_profile(company: &Company) -> Value {
    json!({
        "name": company.name,
        "symbol": company.symbol,
        "esgScore": company.esg_score,
        "riskLevel": company.risk_level,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

enum DispatchError {
    Store(StoreError),
    Serialization(serde_json::Error),
}

impl DispatchError {
    fn into_envelope(self, tool: &str) -> ToolEnvelope {
        match self {
            Self::Store(StoreError::Conflict { symbol }) => {
                ToolEnvelope::conflict(format!("symbol '{symbol}' is already registered"))
            }
            Self::Store(error) => ToolEnvelope::internal(tool, error.to_string()),
            Self::Serialization(error) => ToolEnvelope::internal(tool, error.to_string()),
        }
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(error) => error.fmt(f),
            Self::Serialization(error) => error.fmt(f),
        }
    }
}

impl From<StoreError> for DispatchError {
    fn from(error: StoreError) -> Self {
        Self::Store(error)
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error)
    }
}
