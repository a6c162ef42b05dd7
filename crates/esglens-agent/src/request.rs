//! Typed tool requests.
//!
//! The dispatcher's wire input is a loosely-typed parameter bag. Parsing
//! turns it into one [`ToolCall`] variant per tool, so handler code never
//! re-reads raw JSON values. Parsing happens before any store access;
//! a failed parse means the backend is never touched.

use serde_json::{Map, Value};
use thiserror::Error;

/// Raw named parameters as received from the transport.
pub type ParamBag = Map<String, Value>;

/// Number of performers returned when `count` is absent.
pub const DEFAULT_PERFORMER_COUNT: usize = 5;

/// A validated, typed request for one registered tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    GetCompanies,
    GetCompanyBySymbol { symbol: String },
    GetEsgPerformers { count: usize },
    AnalyzeCompany { symbol: String },
    GetCompaniesByRisk { risk_level: String },
    GetCompaniesByIndustry { industry: String },
    GetMarketAnalytics,
}

/// Parameter validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("{name} parameter is required")]
    Missing { name: &'static str },

    #[error("{name} parameter must be a non-empty string")]
    NotText { name: &'static str },

    #[error("{name} parameter must be a non-negative integer")]
    NotCount { name: &'static str },
}

impl ToolCall {
    /// Parse the parameter bag for a tool already resolved by the registry.
    ///
    /// `tool` must be the canonical (lowercase) registered name.
    pub fn parse(tool: &str, params: &ParamBag) -> Result<Self, ParamError> {
        match tool {
            "get_companies" => Ok(Self::GetCompanies),
            "get_company_by_symbol" => Ok(Self::GetCompanyBySymbol {
                symbol: require_text(params, "symbol")?,
            }),
            "get_esg_performers" => Ok(Self::GetEsgPerformers {
                count: optional_count(params, "count")?.unwrap_or(DEFAULT_PERFORMER_COUNT),
            }),
            "analyze_company" => Ok(Self::AnalyzeCompany {
                symbol: require_text(params, "symbol")?,
            }),
            "get_companies_by_risk" => Ok(Self::GetCompaniesByRisk {
                risk_level: require_text(params, "riskLevel")?,
            }),
            "get_companies_by_industry" => Ok(Self::GetCompaniesByIndustry {
                industry: require_text(params, "industry")?,
            }),
            "get_market_analytics" => Ok(Self::GetMarketAnalytics),
            other => unreachable!("unregistered tool '{other}' passed to ToolCall::parse"),
        }
    }
}

fn require_text(params: &ParamBag, name: &'static str) -> Result<String, ParamError> {
    let value = params.get(name).ok_or(ParamError::Missing { name })?;
    let text = value.as_str().ok_or(ParamError::NotText { name })?.trim();
    if text.is_empty() {
        return Err(ParamError::NotText { name });
    }
    Ok(text.to_owned())
}

/// Read an optional count, coercing a JSON number or a numeric string.
/// A present-but-unparsable value is an error, not a silent default.
fn optional_count(params: &ParamBag, name: &'static str) -> Result<Option<usize>, ParamError> {
    let Some(value) = params.get(name) else {
        return Ok(None);
    };

    let parsed = match value {
        Value::Number(number) => number
            .as_u64()
            .and_then(|count| usize::try_from(count).ok()),
        Value::String(text) => text.trim().parse::<usize>().ok(),
        _ => None,
    };

    parsed.map(Some).ok_or(ParamError::NotCount { name })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bag(value: Value) -> ParamBag {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn parses_symbol_lookup() {
        let call = ToolCall::parse("get_company_by_symbol", &bag(json!({"symbol": " tsla "})))
            .expect("must parse");
        assert_eq!(
            call,
            ToolCall::GetCompanyBySymbol {
                symbol: "tsla".into()
            }
        );
    }

    #[test]
    fn missing_required_parameter_is_an_error() {
        let err = ToolCall::parse("analyze_company", &bag(json!({}))).expect_err("must fail");
        assert_eq!(err, ParamError::Missing { name: "symbol" });
    }

    #[test]
    fn blank_symbol_is_an_error() {
        let err = ToolCall::parse("get_company_by_symbol", &bag(json!({"symbol": "  "})))
            .expect_err("must fail");
        assert_eq!(err, ParamError::NotText { name: "symbol" });
    }

    #[test]
    fn absent_count_defaults_to_five() {
        let call = ToolCall::parse("get_esg_performers", &bag(json!({}))).expect("must parse");
        assert_eq!(call, ToolCall::GetEsgPerformers { count: 5 });
    }

    #[test]
    fn numeric_string_count_is_coerced() {
        let call = ToolCall::parse("get_esg_performers", &bag(json!({"count": "3"})))
            .expect("must parse");
        assert_eq!(call, ToolCall::GetEsgPerformers { count: 3 });
    }

    #[test]
    fn unparsable_count_is_rejected_not_defaulted() {
        let err = ToolCall::parse("get_esg_performers", &bag(json!({"count": "lots"})))
            .expect_err("must fail");
        assert_eq!(err, ParamError::NotCount { name: "count" });

        let err = ToolCall::parse("get_esg_performers", &bag(json!({"count": -2})))
            .expect_err("must fail");
        assert_eq!(err, ParamError::NotCount { name: "count" });
    }

    #[test]
    fn risk_filter_reads_camel_case_key() {
        let call = ToolCall::parse("get_companies_by_risk", &bag(json!({"riskLevel": "Low"})))
            .expect("must parse");
        assert_eq!(
            call,
            ToolCall::GetCompaniesByRisk {
                risk_level: "Low".into()
            }
        );
    }
}
