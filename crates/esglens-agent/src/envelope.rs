//! Uniform result envelopes for dispatched tools.
//!
//! Every tool call resolves to exactly one envelope. Success envelopes
//! carry `success: true` plus a tool-specific payload under a stable key
//! (`data`, `analytics`, or `company`/`analysis`); error envelopes carry a
//! typed `code`, a human-readable `error` message, and optional context
//! (the failing tool, the full tool list for unknown names).

use serde::Serialize;
use serde_json::Value;

/// Error taxonomy carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UnknownTool,
    ValidationError,
    NotFound,
    Conflict,
    InternalError,
}

/// Success envelope. Optional fields are tool-specific but stable per tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSuccess {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl ToolSuccess {
    pub fn new() -> Self {
        Self {
            success: true,
            data: None,
            analytics: None,
            company: None,
            analysis: None,
            count: None,
            description: None,
            risk_level: None,
            industry: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_analytics(mut self, analytics: Value) -> Self {
        self.analytics = Some(analytics);
        self
    }

    pub fn with_company(mut self, company: Value) -> Self {
        self.company = Some(company);
        self
    }

    pub fn with_analysis(mut self, analysis: Value) -> Self {
        self.analysis = Some(analysis);
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_risk_level(mut self, risk_level: impl Into<String>) -> Self {
        self.risk_level = Some(risk_level.into());
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }
}

impl Default for ToolSuccess {
    fn default() -> Self {
        Self::new()
    }
}

/// Error envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolFault {
    pub code: ErrorCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_tools: Option<Vec<String>>,
}

/// The single result shape every dispatched tool terminates with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolEnvelope {
    Success(ToolSuccess),
    Fault(ToolFault),
}

impl ToolEnvelope {
    pub fn unknown_tool(name: &str, available_tools: Vec<String>) -> Self {
        Self::Fault(ToolFault {
            code: ErrorCode::UnknownTool,
            error: format!("Unknown tool: {name}"),
            tool: None,
            available_tools: Some(available_tools),
        })
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Fault(ToolFault {
            code: ErrorCode::ValidationError,
            error: message.into(),
            tool: None,
            available_tools: None,
        })
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Fault(ToolFault {
            code: ErrorCode::NotFound,
            error: message.into(),
            tool: None,
            available_tools: None,
        })
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Fault(ToolFault {
            code: ErrorCode::Conflict,
            error: message.into(),
            tool: None,
            available_tools: None,
        })
    }

    pub fn internal(tool: &str, message: impl Into<String>) -> Self {
        Self::Fault(ToolFault {
            code: ErrorCode::InternalError,
            error: message.into(),
            tool: Some(tool.to_owned()),
            available_tools: None,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn fault(&self) -> Option<&ToolFault> {
        match self {
            Self::Fault(fault) => Some(fault),
            Self::Success(_) => None,
        }
    }

    pub fn success(&self) -> Option<&ToolSuccess> {
        match self {
            Self::Success(success) => Some(success),
            Self::Fault(_) => None,
        }
    }
}
