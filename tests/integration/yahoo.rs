//! Integration tests for the quote provider client

#[path = "test_utils.rs"]
mod test_utils;

use squeezescan::error::ScanError;
use squeezescan::services::market_data::{QuoteProvider, UniverseFilter, UniverseProvider};
use squeezescan::services::yahoo::YahooClient;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use test_utils::{mock_chart, mock_fundamentals, mock_no_fundamentals, squeeze_shape};

fn client(server: &MockServer) -> YahooClient {
    YahooClient::with_client(server.uri(), reqwest::Client::new())
}

#[tokio::test]
async fn quote_parses_price_history_and_fundamentals() {
    let server = MockServer::start().await;
    let (closes, volumes) = squeeze_shape();
    mock_chart(&server, "AAA", &closes, &volumes).await;
    mock_fundamentals(&server, "AAA", 5_000_000.0, 50_000_000.0, 1_500_000.0, 6.0).await;

    let snapshot = client(&server).fetch_quote("AAA").await.unwrap();

    assert_eq!(snapshot.symbol, "AAA");
    assert_eq!(snapshot.history.len(), closes.len());
    assert_eq!(snapshot.price, Some(*closes.last().unwrap()));
    assert_eq!(snapshot.volume, Some(*volumes.last().unwrap()));
    assert_eq!(snapshot.fundamentals.float_shares, Some(5_000_000.0));
    assert_eq!(snapshot.fundamentals.days_to_cover, Some(6.0));
    // Yahoo reports debt/equity as a percentage; the client scales it.
    assert_eq!(snapshot.fundamentals.debt_to_equity, Some(0.4));
}

#[tokio::test]
async fn null_padded_bars_are_skipped() {
    let server = MockServer::start().await;
    let response = serde_json::json!({
        "chart": {
            "result": [{
                "meta": { "regularMarketPrice": 11.0, "chartPreviousClose": 10.0 },
                "timestamp": [1_700_000_000, 1_700_086_400, 1_700_172_800],
                "indicators": {
                    "quote": [{
                        "open": [10.0, null, 11.0],
                        "high": [10.5, null, 11.5],
                        "low": [9.5, null, 10.5],
                        "close": [10.0, null, 11.0],
                        "volume": [1000.0, null, 2000.0]
                    }]
                }
            }],
            "error": null
        }
    });
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/GAP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(&server)
        .await;
    mock_no_fundamentals(&server, "GAP").await;

    let snapshot = client(&server).fetch_quote("GAP").await.unwrap();
    assert_eq!(snapshot.history.len(), 2);
}

#[tokio::test]
async fn missing_fundamentals_do_not_fail_the_quote() {
    let server = MockServer::start().await;
    let (closes, volumes) = squeeze_shape();
    mock_chart(&server, "THIN", &closes, &volumes).await;
    Mock::given(method("GET"))
        .and(path("/v10/finance/quoteSummary/THIN"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let snapshot = client(&server).fetch_quote("THIN").await.unwrap();
    assert!(snapshot.fundamentals.float_shares.is_none());
    assert_eq!(snapshot.history.len(), closes.len());
}

#[tokio::test]
async fn provider_error_is_transient_and_names_the_symbol() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/ERR"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    match client(&server).fetch_quote("ERR").await {
        Err(ScanError::TransientFetch { symbol, .. }) => assert_eq!(symbol, "ERR"),
        other => panic!("expected transient error, got {:?}", other.map(|s| s.symbol)),
    }
}

#[tokio::test]
async fn empty_chart_result_is_a_validation_error() {
    let server = MockServer::start().await;
    let response = serde_json::json!({ "chart": { "result": [], "error": null } });
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/NONE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(&server)
        .await;

    assert!(matches!(
        client(&server).fetch_quote("NONE").await,
        Err(ScanError::Validation { .. })
    ));
}

#[tokio::test]
async fn universe_comes_from_the_predefined_screener() {
    let server = MockServer::start().await;
    let response = serde_json::json!({
        "finance": {
            "result": [{
                "quotes": [
                    { "symbol": "AAA", "regularMarketPrice": 12.0, "regularMarketVolume": 900_000.0 },
                    { "symbol": "BBB", "regularMarketPrice": 3.0, "regularMarketVolume": 500_000.0 },
                    { "symbol": "CCC", "regularMarketPrice": 8.0, "regularMarketVolume": 100.0 }
                ]
            }],
            "error": null
        }
    });
    Mock::given(method("GET"))
        .and(path("/v1/finance/screener/predefined/saved"))
        .and(query_param("scrIds", "most_actives"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(&server)
        .await;

    let filter = UniverseFilter {
        min_price: Some(5.0),
        min_volume: Some(10_000.0),
        ..Default::default()
    };
    let symbols = client(&server).universe(&filter).await.unwrap();
    // BBB fails the price floor, CCC the volume floor.
    assert_eq!(symbols, vec!["AAA".to_string()]);
}

#[tokio::test]
async fn screener_failure_is_pipeline_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/finance/screener/predefined/saved"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(matches!(
        client(&server).universe(&UniverseFilter::default()).await,
        Err(ScanError::PipelineFatal(_))
    ));
}
