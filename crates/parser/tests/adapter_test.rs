//! Integration test for the conversion adapter with the built-in strategies

use raml_api_docs_parser::{ConversionError, RamlParser, RamlToOpenApi};
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn test_adapter_converts_raml08() {
    let adapter = RamlToOpenApi::new(Arc::new(RamlParser::new()));
    adapter.request("#%RAML 0.8\ntitle: Test API\n/status:\n  get:\n");

    let state = adapter.settled().await;
    assert!(state.error.is_none());
    let doc: Value = serde_json::from_str(&state.data).unwrap();
    assert_eq!(doc["info"]["title"], "Test API");
    assert!(doc["paths"]["/status"]["get"].is_object());
}

#[tokio::test]
async fn test_adapter_reports_modeling_error() {
    let adapter = RamlToOpenApi::new(Arc::new(RamlParser::new()));
    // no 0.8 marker, so the 1.0 grammar is used and the header check fails
    adapter.request("title: Missing header");

    let state = adapter.settled().await;
    assert_eq!(state.data, "");
    assert!(matches!(
        state.error.as_deref(),
        Some(ConversionError::Modeling(_))
    ));
    assert_eq!(
        state.error.unwrap().to_string(),
        "Parse error: missing '#%RAML 1.0' header"
    );
}

#[tokio::test]
async fn test_adapters_share_the_cache() {
    let parser = Arc::new(RamlParser::new());
    let definition = "#%RAML 1.0\ntitle: Shared";

    let first = RamlToOpenApi::new(Arc::clone(&parser));
    first.request(definition).unwrap().await.unwrap();

    let second = RamlToOpenApi::new(Arc::clone(&parser));
    second.request(definition).unwrap().await.unwrap();

    assert_eq!(first.state().data, second.state().data);
    let stats = parser.cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}
