use serde::{Deserialize, Serialize};

use crate::filter::{FieldValue, Queryable};
use crate::{Symbol, UtcDateTime, ValidationError};

/// A listed company tracked by the investment dataset.
///
/// `id` is `None` until the entity is committed; the store assigns it from a
/// monotone sequence and it never changes afterwards. `created_at` is set
/// once when the draft is promoted. `ai_analysis` and
/// `investment_recommendation` are written only by the analysis path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub symbol: Symbol,
    pub industry: String,
    pub sector: String,
    pub market_cap: f64,
    pub country: String,
    pub revenue: f64,
    pub esg_score: f64,
    pub risk_level: String,
    pub created_at: UtcDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment_recommendation: Option<String>,
}

/// Creation input for a company, validated when promoted to a [`Company`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDraft {
    pub name: String,
    pub symbol: String,
    pub industry: String,
    pub sector: String,
    pub market_cap: f64,
    pub country: String,
    pub revenue: f64,
    pub esg_score: f64,
    pub risk_level: String,
}

impl CompanyDraft {
    /// Validate the draft and promote it to an entity with a fresh
    /// `created_at` stamp. The entity has no identity until committed.
    pub fn into_company(self, created_at: UtcDateTime) -> Result<Company, ValidationError> {
        let symbol = Symbol::parse(&self.symbol)?;

        Ok(Company {
            id: None,
            name: validate_non_empty("name", self.name)?,
            symbol,
            industry: validate_non_empty("industry", self.industry)?,
            sector: validate_non_empty("sector", self.sector)?,
            market_cap: validate_non_negative("marketCap", self.market_cap)?,
            country: validate_non_empty("country", self.country)?,
            revenue: validate_non_negative("revenue", self.revenue)?,
            esg_score: validate_non_negative("esgScore", self.esg_score)?,
            risk_level: validate_non_empty("riskLevel", self.risk_level)?,
            created_at,
            ai_analysis: None,
            investment_recommendation: None,
        })
    }
}

/// Queryable fields of [`Company`], used by filter specifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyField {
    Id,
    Name,
    Symbol,
    Industry,
    Sector,
    Country,
    RiskLevel,
    MarketCap,
    Revenue,
    EsgScore,
}

impl Queryable for Company {
    type Field = CompanyField;

    fn entity_id(&self) -> Option<i64> {
        self.id
    }

    fn field_value(&self, field: CompanyField) -> FieldValue {
        match field {
            CompanyField::Id => self
                .id
                .map_or(FieldValue::Integer(-1), FieldValue::Integer),
            CompanyField::Name => FieldValue::Text(self.name.clone()),
            CompanyField::Symbol => FieldValue::Text(self.symbol.as_str().to_owned()),
            CompanyField::Industry => FieldValue::Text(self.industry.clone()),
            CompanyField::Sector => FieldValue::Text(self.sector.clone()),
            CompanyField::Country => FieldValue::Text(self.country.clone()),
            CompanyField::RiskLevel => FieldValue::Text(self.risk_level.clone()),
            CompanyField::MarketCap => FieldValue::Number(self.market_cap),
            CompanyField::Revenue => FieldValue::Number(self.revenue),
            CompanyField::EsgScore => FieldValue::Number(self.esg_score),
        }
    }
}

fn validate_non_empty(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(value)
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CompanyDraft {
        CompanyDraft {
            name: "Apple Inc.".into(),
            symbol: "aapl".into(),
            industry: "Technology".into(),
            sector: "Consumer Electronics".into(),
            market_cap: 3_000_000_000_000.0,
            country: "United States".into(),
            revenue: 394_328_000_000.0,
            esg_score: 82.5,
            risk_level: "Low".into(),
        }
    }

    #[test]
    fn promotes_valid_draft() {
        let company = draft()
            .into_company(UtcDateTime::parse("2024-01-01T00:00:00Z").unwrap())
            .expect("draft should promote");

        assert_eq!(company.id, None);
        assert_eq!(company.symbol.as_str(), "AAPL");
        assert_eq!(company.ai_analysis, None);
    }

    #[test]
    fn rejects_blank_required_field() {
        let mut input = draft();
        input.industry = "   ".into();
        let err = input
            .into_company(UtcDateTime::now())
            .expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyField { field: "industry" });
    }

    #[test]
    fn rejects_negative_metric() {
        let mut input = draft();
        input.esg_score = -1.0;
        let err = input
            .into_company(UtcDateTime::now())
            .expect_err("must fail");
        assert_eq!(err, ValidationError::NegativeValue { field: "esgScore" });
    }

    #[test]
    fn serializes_camel_case_wire_shape() {
        let company = draft()
            .into_company(UtcDateTime::parse("2024-01-01T00:00:00Z").unwrap())
            .unwrap();
        let json = serde_json::to_value(&company).unwrap();

        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["esgScore"], 82.5);
        assert_eq!(json["marketCap"], 3_000_000_000_000.0);
        assert!(json.get("aiAnalysis").is_none());
        assert!(json.get("id").is_none());
    }
}
