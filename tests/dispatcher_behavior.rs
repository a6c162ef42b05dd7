//! Behavior-driven tests for the tool dispatcher.
//!
//! These tests verify the dispatch algorithm end to end: validation before
//! backend access, uniform envelopes for every outcome, and the analysis
//! pipeline over a seeded dataset.

use serde_json::{json, Map, Value};

use esglens_tests::*;

fn params(value: Value) -> ParamBag {
    value.as_object().cloned().unwrap_or_default()
}

fn seeded_dispatcher() -> Dispatcher {
    let store = Arc::new(MemoryStore::new());
    Seeder::run(store.clone()).expect("seeding must succeed");
    Dispatcher::new(store)
}

// =============================================================================
// Dispatch isolation: rejected calls never reach the store
// =============================================================================

#[test]
fn when_tool_is_unknown_the_envelope_lists_every_tool_and_the_store_is_untouched() {
    // Given: A dispatcher over a call-counting store
    let store = Arc::new(RecordingStore::new());
    let dispatcher = Dispatcher::new(store.clone());

    // When: An unregistered tool is requested
    let envelope = dispatcher.execute_tool("get_weather", &Map::new());

    // Then: The fault names the tool and enumerates the full registry
    let fault = envelope.fault().expect("must be a fault");
    assert_eq!(fault.code, ErrorCode::UnknownTool);
    assert_eq!(fault.error, "Unknown tool: get_weather");
    let tools = fault.available_tools.as_ref().unwrap();
    assert_eq!(
        tools,
        &[
            "get_companies",
            "get_company_by_symbol",
            "get_esg_performers",
            "analyze_company",
            "get_companies_by_risk",
            "get_companies_by_industry",
            "get_market_analytics",
        ]
    );

    // And: The backend was never called
    assert_eq!(store.backend_calls(), 0);
}

#[test]
fn when_a_required_parameter_is_missing_validation_fails_before_the_store() {
    let store = Arc::new(RecordingStore::new());
    let dispatcher = Dispatcher::new(store.clone());

    let envelope = dispatcher.execute_tool("get_company_by_symbol", &Map::new());

    let fault = envelope.fault().expect("must be a fault");
    assert_eq!(fault.code, ErrorCode::ValidationError);
    assert_eq!(fault.error, "symbol parameter is required");
    assert_eq!(store.backend_calls(), 0);
}

#[test]
fn when_a_numeric_parameter_cannot_be_coerced_validation_fails_before_the_store() {
    let store = Arc::new(RecordingStore::new());
    let dispatcher = Dispatcher::new(store.clone());

    let envelope = dispatcher.execute_tool("get_esg_performers", &params(json!({"count": "many"})));

    let fault = envelope.fault().expect("must be a fault");
    assert_eq!(fault.code, ErrorCode::ValidationError);
    assert_eq!(store.backend_calls(), 0);
}

#[test]
fn when_tool_names_differ_only_by_case_they_resolve_to_the_same_tool() {
    let store = Arc::new(RecordingStore::new());
    let dispatcher = Dispatcher::new(store.clone());

    let envelope = dispatcher.execute_tool("GET_COMPANIES", &Map::new());

    assert!(envelope.is_success());
    assert!(store.backend_calls() > 0);
}

// =============================================================================
// Success envelopes
// =============================================================================

#[test]
fn when_listing_companies_the_envelope_carries_data_and_count() {
    let dispatcher = seeded_dispatcher();

    let envelope = dispatcher.execute_tool("get_companies", &Map::new());

    let success = envelope.success().expect("must succeed");
    assert_eq!(success.count, Some(6));
    assert_eq!(success.data.as_ref().unwrap().as_array().unwrap().len(), 6);
}

#[test]
fn when_requesting_performers_without_count_five_is_the_default() {
    let dispatcher = seeded_dispatcher();

    let envelope = dispatcher.execute_tool("get_esg_performers", &Map::new());

    let success = envelope.success().expect("must succeed");
    assert_eq!(
        success.description.as_deref(),
        Some("Top 5 ESG performing companies")
    );
    // Only five of six seed companies clear the 70-point floor.
    assert_eq!(success.count, Some(5));
}

#[test]
fn when_filtering_by_risk_the_envelope_echoes_the_level() {
    let dispatcher = seeded_dispatcher();

    let envelope =
        dispatcher.execute_tool("get_companies_by_risk", &params(json!({"riskLevel": "High"})));

    let success = envelope.success().expect("must succeed");
    assert_eq!(success.risk_level.as_deref(), Some("High"));
    assert_eq!(success.count, Some(1));
    let data = success.data.as_ref().unwrap().as_array().unwrap();
    assert_eq!(data[0]["symbol"], "2222.SR");
}

#[test]
fn when_filtering_by_industry_the_envelope_echoes_the_industry() {
    let dispatcher = seeded_dispatcher();

    let envelope = dispatcher.execute_tool(
        "get_companies_by_industry",
        &params(json!({"industry": "Utilities"})),
    );

    let success = envelope.success().expect("must succeed");
    assert_eq!(success.industry.as_deref(), Some("Utilities"));
    assert_eq!(success.count, Some(1));
}

// =============================================================================
// Analysis pipeline
// =============================================================================

#[test]
fn when_analyzing_tesla_the_composite_lands_in_the_buy_tier() {
    // Given: A dataset containing Tesla (RiskLevel=Medium, ESGScore=78.2)
    let dispatcher = seeded_dispatcher();

    // When: The analysis tool runs end to end
    let envelope = dispatcher.execute_tool("analyze_company", &params(json!({"symbol": "TSLA"})));

    // Then: 0.6 x 78.2 + 25 = 71.92 truncates into the BUY tier
    let success = envelope.success().expect("must succeed");
    let analysis = success.analysis.as_ref().unwrap();
    assert!(analysis["investmentRecommendation"]
        .as_str()
        .unwrap()
        .starts_with("BUY:"));

    // And: The company echo is the trimmed four-field profile
    let profile = success.company.as_ref().unwrap();
    assert_eq!(profile["name"], "Tesla Inc.");
    assert_eq!(profile["symbol"], "TSLA");
    assert_eq!(profile["esgScore"], 78.2);
    assert_eq!(profile["riskLevel"], "Medium");
    assert!(profile.get("marketCap").is_none());
}

#[test]
fn when_analyzing_an_unknown_symbol_the_envelope_is_not_found() {
    let dispatcher = seeded_dispatcher();

    let envelope = dispatcher.execute_tool("analyze_company", &params(json!({"symbol": "ZZZZ"})));

    let fault = envelope.fault().expect("must be a fault");
    assert_eq!(fault.code, ErrorCode::NotFound);
    assert_eq!(fault.error, "Company with symbol 'ZZZZ' not found");
}

// =============================================================================
// Market analytics
// =============================================================================

#[test]
fn when_requesting_analytics_the_snapshot_is_rounded_and_complete() {
    let dispatcher = seeded_dispatcher();

    let envelope = dispatcher.execute_tool("get_market_analytics", &Map::new());

    let analytics = envelope.success().unwrap().analytics.clone().unwrap();
    assert_eq!(analytics["totalCompanies"], 6);
    assert_eq!(analytics["averageESGScore"], 78.53);
    assert_eq!(analytics["averageMarketCapBillions"], 1451.67);

    let leaders = analytics["topESGPerformers"].as_array().unwrap();
    let symbols: Vec<&str> = leaders
        .iter()
        .map(|leader| leader["symbol"].as_str().unwrap())
        .collect();
    assert_eq!(symbols, ["NEE", "UL", "MSFT"]);

    assert!(analytics["lastUpdated"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn when_dataset_is_empty_analytics_render_zeros_instead_of_failing() {
    let dispatcher = Dispatcher::new(Arc::new(MemoryStore::new()));

    let envelope = dispatcher.execute_tool("get_market_analytics", &Map::new());

    let analytics = envelope.success().unwrap().analytics.clone().unwrap();
    assert_eq!(analytics["totalCompanies"], 0);
    assert_eq!(analytics["averageESGScore"], 0.0);
    assert_eq!(analytics["topESGPerformers"].as_array().unwrap().len(), 0);
}

// =============================================================================
// Failure conversion at the dispatch boundary
// =============================================================================

#[test]
fn when_the_store_fails_the_envelope_is_internal_error_with_the_tool_name() {
    let dispatcher = Dispatcher::new(Arc::new(FailingStore));

    let envelope = dispatcher.execute_tool("get_companies", &Map::new());

    let fault = envelope.fault().expect("must be a fault");
    assert_eq!(fault.code, ErrorCode::InternalError);
    assert_eq!(fault.tool.as_deref(), Some("get_companies"));
    assert!(fault.error.contains("synthetic backend failure"));
}

#[test]
fn when_capabilities_are_requested_the_store_is_never_touched() {
    let store = Arc::new(RecordingStore::new());
    let dispatcher = Dispatcher::new(store.clone());

    let capabilities = dispatcher.capabilities();

    assert_eq!(capabilities.server_info.name, "esglens");
    assert_eq!(capabilities.tools.len(), 7);
    assert_eq!(store.backend_calls(), 0);
}

// =============================================================================
// Wire shape
// =============================================================================

#[test]
fn when_envelopes_serialize_success_and_fault_shapes_are_distinct() {
    let dispatcher = seeded_dispatcher();

    let success = dispatcher.execute_tool("get_companies", &Map::new());
    let success_json = serde_json::to_value(&success).unwrap();
    assert_eq!(success_json["success"], true);
    assert!(success_json.get("error").is_none());

    let fault = dispatcher.execute_tool("no_such_tool", &Map::new());
    let fault_json = serde_json::to_value(&fault).unwrap();
    assert_eq!(fault_json["code"], "unknown_tool");
    assert!(fault_json.get("success").is_none());
}
