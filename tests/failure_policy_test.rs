use anyhow::Result;
use cpf_phone_extractor::{
    BatchFetcher, ExtractorConfig, ExtractorError, FailurePolicy, HttpLookupClient, LookupResult,
    NoProgress,
};
use httpmock::prelude::*;

/// "111" resolves, "500" answers with a bare server error.
fn flaky_server() -> MockServer {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/lookup").query_param("cpf", "111");
        then.status(200).json_body(serde_json::json!({
            "status": "success",
            "result": {"ddd": "11", "telefone": "91234-5678"}
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path("/lookup").query_param("cpf", "500");
        then.status(500).body("Internal Server Error");
    });
    server
}

fn fetcher(server: &MockServer, policy: FailurePolicy) -> Result<BatchFetcher<HttpLookupClient>> {
    let config = ExtractorConfig {
        failure_policy: policy,
        concurrent_requests: 2,
        ..ExtractorConfig::default()
    }
    .with_endpoint(server.url("/lookup"));
    Ok(BatchFetcher::from_config(HttpLookupClient::new(&config)?, &config))
}

#[tokio::test]
async fn test_server_error_becomes_not_found_by_default() -> Result<()> {
    let server = flaky_server();
    let fetcher = fetcher(&server, FailurePolicy::default())?;
    let input = vec!["500".to_string(), "111".to_string()];

    let pairs = fetcher.fetch_all(&input, &NoProgress).await?;

    assert_eq!(
        pairs,
        vec![
            ("500".to_string(), LookupResult::NotFound),
            (
                "111".to_string(),
                LookupResult::Found("11 91234-5678".to_string())
            ),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_server_error_aborts_batch_under_abort_policy() -> Result<()> {
    let server = flaky_server();
    let fetcher = fetcher(&server, FailurePolicy::Abort)?;
    let input = vec!["111".to_string(), "500".to_string()];

    let err = fetcher.fetch_all(&input, &NoProgress).await.unwrap_err();

    assert!(matches!(
        err,
        ExtractorError::LookupTransportError { ref identifier, .. } if identifier == "500"
    ));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_service_is_isolated_per_identifier() -> Result<()> {
    let config = ExtractorConfig {
        timeout_seconds: Some(2),
        ..ExtractorConfig::default()
    }
    .with_endpoint("http://127.0.0.1:1/lookup");
    let fetcher = BatchFetcher::from_config(HttpLookupClient::new(&config)?, &config);
    let input = vec!["1".to_string(), "2".to_string(), "3".to_string()];

    let pairs = fetcher.fetch_all(&input, &NoProgress).await?;

    assert_eq!(pairs.len(), 3);
    assert!(pairs
        .iter()
        .zip(&input)
        .all(|((id, result), expected)| id == expected && *result == LookupResult::NotFound));
    Ok(())
}
