//! Deterministic company analysis.
//!
//! A pure template-selection engine: given the same company the report is
//! identical apart from the timestamp. The recommendation composite is
//! `trunc(0.6 x esg_score + risk bonus)` with a bonus of 40/25/10 for
//! Low/Medium/other risk levels.

use serde::Serialize;

use esglens_core::{Company, UtcDateTime};

/// Result of analyzing one company.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub risk_assessment: String,
    pub esg_analysis: String,
    pub investment_recommendation: String,
    pub analysis_date: UtcDateTime,
}

/// Stateless analysis engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisEngine;

impl AnalysisEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, company: &Company) -> AnalysisReport {
        AnalysisReport {
            risk_assessment: risk_assessment(company),
            esg_analysis: esg_analysis(company),
            investment_recommendation: recommendation(company),
            analysis_date: UtcDateTime::now(),
        }
    }

    /// Composite recommendation score, truncated to an integer.
    #[must_use]
    pub fn composite_score(&self, company: &Company) -> i32 {
        (company.esg_score * 0.6 + risk_bonus(&company.risk_level)) as i32
    }
}

fn risk_bonus(risk_level: &str) -> f64 {
    if risk_level.eq_ignore_ascii_case("low") {
        40.0
    } else if risk_level.eq_ignore_ascii_case("medium") {
        25.0
    } else {
        10.0
    }
}

fn risk_assessment(company: &Company) -> String {
    let name = &company.name;
    match company.risk_level.to_ascii_lowercase().as_str() {
        "low" => format!("{name} shows strong financial stability with low expected volatility."),
        "medium" => format!("{name} presents moderate risk factors that warrant monitoring."),
        "high" => format!("{name} carries an elevated risk profile requiring careful consideration."),
        _ => format!("{name} requires a detailed risk assessment."),
    }
}

fn esg_analysis(company: &Company) -> String {
    let name = &company.name;
    let score = company.esg_score;
    if score >= 80.0 {
        format!("Excellent ESG performance: {name} scores {score}/100.")
    } else if score >= 70.0 {
        format!("Strong ESG credentials: {name} scores {score}/100.")
    } else if score >= 60.0 {
        format!("Moderate ESG performance: {name} scores {score}/100.")
    } else {
        format!("ESG concerns: {name} scores {score}/100.")
    }
}

fn recommendation(company: &Company) -> String {
    let name = &company.name;
    let score = AnalysisEngine.composite_score(company);
    if score >= 80 {
        format!("STRONG BUY: {name} shows excellent fundamentals.")
    } else if score >= 70 {
        format!("BUY: {name} presents a good investment opportunity.")
    } else if score >= 60 {
        format!("HOLD: {name} shows stable performance.")
    } else {
        format!("REVIEW: {name} requires detailed due diligence.")
    }
}
