use crate::config::ExtractorConfig;
use crate::domain::ports::FailurePolicy;
use crate::utils::error::{ExtractorError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file. Every key is optional; missing keys keep the
/// value they already had.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub extract: ExtractConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub endpoint: Option<String>,
    pub query_param: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    pub concurrent_requests: Option<usize>,
    pub failure_policy: Option<FailurePolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub not_found_placeholder: Option<String>,
    pub identifier_header: Option<String>,
    pub phone_header: Option<String>,
}

impl TomlConfig {
    /// Loads settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExtractorError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExtractorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR_NAME}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExtractorError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn apply_to(&self, mut base: ExtractorConfig) -> ExtractorConfig {
        if let Some(endpoint) = &self.source.endpoint {
            base.api_endpoint = endpoint.clone();
        }
        if let Some(query_param) = &self.source.query_param {
            base.query_param = query_param.clone();
        }
        if self.source.timeout_seconds.is_some() {
            base.timeout_seconds = self.source.timeout_seconds;
        }
        if let Some(concurrent) = self.extract.concurrent_requests {
            base.concurrent_requests = concurrent;
        }
        if let Some(policy) = self.extract.failure_policy {
            base.failure_policy = policy;
        }
        if let Some(placeholder) = &self.report.not_found_placeholder {
            base.not_found_placeholder = placeholder.clone();
        }
        if let Some(header) = &self.report.identifier_header {
            base.identifier_header = header.clone();
        }
        if let Some(header) = &self.report.phone_header {
            base.phone_header = header.clone();
        }
        base
    }
}
