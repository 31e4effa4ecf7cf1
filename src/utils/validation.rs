use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ExtractorError, Result};
use url::Url;

pub const MAX_TIMEOUT_SECONDS: u64 = 3600;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> ExtractorError {
    ExtractorError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// The lookup service must be reachable over plain HTTP(S) and may not carry
/// its own query string, since the CPF parameter is appended per request.
pub fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint)
        .map_err(|e| invalid("api_endpoint", endpoint, format!("not a lookup URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            "api_endpoint",
            endpoint,
            format!("lookup service must use http or https, not {}", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(invalid("api_endpoint", endpoint, "lookup URL has no host"));
    }
    if url.query().is_some() {
        return Err(invalid(
            "api_endpoint",
            endpoint,
            "put the CPF parameter name in query_param, not in the endpoint",
        ));
    }
    Ok(())
}

pub fn validate_query_param(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(invalid("query_param", name, "the CPF parameter needs a name"));
    }
    if name.chars().any(|c| c.is_whitespace() || c == '=' || c == '&') {
        return Err(invalid(
            "query_param",
            name,
            "parameter names cannot contain spaces, '=' or '&'",
        ));
    }
    Ok(())
}

/// Placeholder and header text end up in worksheet cells.
pub fn validate_cell_label(field: &str, label: &str) -> Result<()> {
    if label.trim().is_empty() {
        return Err(ExtractorError::ConfigValidationError {
            field: field.to_string(),
            message: "report labels cannot be blank".to_string(),
        });
    }
    Ok(())
}

/// Shared checks for every [`ConfigProvider`].
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_endpoint(config.api_endpoint())?;
    validate_query_param(config.query_param())?;

    if config.concurrent_requests() == 0 {
        return Err(invalid(
            "concurrent_requests",
            0,
            "at least one lookup must be allowed in flight",
        ));
    }
    if let Some(timeout) = config.timeout_seconds() {
        if timeout == 0 || timeout > MAX_TIMEOUT_SECONDS {
            return Err(invalid(
                "timeout_seconds",
                timeout,
                format!("lookup timeout must be between 1 and {} seconds", MAX_TIMEOUT_SECONDS),
            ));
        }
    }

    validate_cell_label("not_found_placeholder", config.not_found_placeholder())?;
    validate_cell_label("identifier_header", config.identifier_header())?;
    validate_cell_label("phone_header", config.phone_header())?;
    Ok(())
}
