//! Fixed tool registry and capabilities document.

use serde::Serialize;

/// Expected parameter type; values are coerced from their JSON
/// representation (a numeric string satisfies `Number`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Text,
    Number,
}

/// One named parameter of a tool.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: ParamKind,
    pub required: bool,
    pub description: &'static str,
}

/// A registered tool.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ParamSpec],
}

const TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "get_companies",
        description: "Retrieve all companies in the investment dataset",
        parameters: &[],
    },
    ToolDescriptor {
        name: "get_company_by_symbol",
        description: "Get detailed company information by stock symbol",
        parameters: &[ParamSpec {
            name: "symbol",
            kind: ParamKind::Text,
            required: true,
            description: "Stock symbol (e.g., AAPL, TSLA)",
        }],
    },
    ToolDescriptor {
        name: "get_esg_performers",
        description: "Get top ESG performing companies",
        parameters: &[ParamSpec {
            name: "count",
            kind: ParamKind::Number,
            required: false,
            description: "Number of companies to return (default: 5)",
        }],
    },
    ToolDescriptor {
        name: "analyze_company",
        description: "Get a deterministic analysis for a specific company",
        parameters: &[ParamSpec {
            name: "symbol",
            kind: ParamKind::Text,
            required: true,
            description: "Stock symbol of the company to analyze",
        }],
    },
    ToolDescriptor {
        name: "get_companies_by_risk",
        description: "Get companies filtered by risk level",
        parameters: &[ParamSpec {
            name: "riskLevel",
            kind: ParamKind::Text,
            required: true,
            description: "Risk level: Low, Medium, High",
        }],
    },
    ToolDescriptor {
        name: "get_companies_by_industry",
        description: "Get companies filtered by industry",
        parameters: &[ParamSpec {
            name: "industry",
            kind: ParamKind::Text,
            required: true,
            description: "Industry name (e.g., Technology, Utilities)",
        }],
    },
    ToolDescriptor {
        name: "get_market_analytics",
        description: "Get dataset-wide analytics and statistics",
        parameters: &[],
    },
];

/// The fixed registry of dispatchable tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolRegistry;

impl ToolRegistry {
    #[must_use]
    pub fn builtin() -> Self {
        Self
    }

    /// Case-insensitive descriptor lookup.
    pub fn lookup(&self, name: &str) -> Option<&'static ToolDescriptor> {
        let normalized = name.trim().to_ascii_lowercase();
        TOOLS.iter().find(|tool| tool.name == normalized)
    }

    pub fn descriptors(&self) -> &'static [ToolDescriptor] {
        TOOLS
    }

    pub fn tool_names(&self) -> Vec<String> {
        TOOLS.iter().map(|tool| tool.name.to_owned()).collect()
    }
}

/// Server identity reported by the capabilities document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub capabilities: &'static [&'static str],
}

/// Capabilities document: server identity plus every tool descriptor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub server_info: ServerInfo,
    pub tools: Vec<ToolDescriptor>,
}

impl Capabilities {
    #[must_use]
    pub fn current() -> Self {
        Self {
            server_info: ServerInfo {
                name: "esglens",
                version: env!("CARGO_PKG_VERSION"),
                description: "Investment analysis service with ESG scoring and deterministic insights",
                capabilities: &[
                    "investment_analysis",
                    "esg_scoring",
                    "company_data",
                    "risk_assessment",
                ],
            },
            tools: TOOLS.to_vec(),
        }
    }
}
