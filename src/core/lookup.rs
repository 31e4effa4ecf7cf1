use crate::domain::model::LookupResult;
use crate::domain::ports::{ConfigProvider, PhoneLookup};
use crate::utils::error::{ExtractorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const SUCCESS_STATUS: &str = "success";

#[derive(Debug, Deserialize)]
struct LookupResponse {
    status: Option<String>,
    result: Option<LookupPayload>,
}

#[derive(Debug, Deserialize)]
struct LookupPayload {
    ddd: Option<String>,
    telefone: Option<String>,
}

/// Decodes a lookup service body. `None` means the body is not the
/// expected JSON shape at all.
pub fn decode_lookup_body(body: &[u8]) -> Option<LookupResult> {
    let response: LookupResponse = serde_json::from_slice(body).ok()?;

    if response.status.as_deref() != Some(SUCCESS_STATUS) {
        return Some(LookupResult::NotFound);
    }

    let found = response.result.and_then(|payload| {
        let ddd = payload.ddd?;
        let phone = payload.telefone?;
        Some(format!("{} {}", ddd.trim(), phone.trim()))
    });

    Some(found.map_or(LookupResult::NotFound, LookupResult::Found))
}

/// Looks up one CPF per GET request against the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpLookupClient {
    client: Client,
    endpoint: String,
    query_param: String,
    timeout: Option<Duration>,
}

impl HttpLookupClient {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client<C: ConfigProvider + ?Sized>(client: Client, config: &C) -> Self {
        Self {
            client,
            endpoint: config.api_endpoint().to_string(),
            query_param: config.query_param().to_string(),
            timeout: config.timeout_seconds().map(Duration::from_secs),
        }
    }

    fn transport_error(identifier: &str, message: impl ToString) -> ExtractorError {
        ExtractorError::LookupTransportError {
            identifier: identifier.to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl PhoneLookup for HttpLookupClient {
    async fn lookup(&self, identifier: &str) -> Result<LookupResult> {
        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[(self.query_param.as_str(), identifier)]);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        tracing::debug!("Looking up {} at {}", identifier, self.endpoint);
        let response = request
            .send()
            .await
            .map_err(|e| Self::transport_error(identifier, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::transport_error(identifier, e))?;

        match decode_lookup_body(&body) {
            Some(result) => {
                tracing::debug!("Lookup for {} answered {}: {:?}", identifier, status, result);
                Ok(result)
            }
            None if status.is_success() => {
                tracing::debug!("Unparsable body for {}, treating as not found", identifier);
                Ok(LookupResult::NotFound)
            }
            None => Err(Self::transport_error(
                identifier,
                format!("HTTP {} without a lookup body", status),
            )),
        }
    }
}
