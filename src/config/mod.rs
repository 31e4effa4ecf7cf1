pub mod cli;
pub mod toml_config;

use crate::domain::ports::{ConfigProvider, FailurePolicy};
use crate::utils::error::Result;
use crate::utils::validation::{validate_provider, Validate};
use clap::Parser;
use std::path::PathBuf;
use toml_config::TomlConfig;

pub const DEFAULT_ENDPOINT: &str = "https://apiurlexample.com/";
pub const DEFAULT_QUERY_PARAM: &str = "cpf";
pub const DEFAULT_NOT_FOUND_PLACEHOLDER: &str = "Not Found";
pub const DEFAULT_IDENTIFIER_HEADER: &str = "CPF";
pub const DEFAULT_PHONE_HEADER: &str = "PHONE";

/// Number of processing units on this host, falling back to one.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[derive(Debug, Clone, Parser)]
#[command(name = "cpf-phone-extractor", version)]
#[command(about = "Looks up the phone number of every CPF in a text file and saves them to a spreadsheet")]
pub struct CliArgs {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Lookup service endpoint")]
    pub endpoint: Option<String>,

    #[arg(long, help = "Query parameter that carries the CPF")]
    pub query_param: Option<String>,

    #[arg(long, help = "Maximum lookups in flight (defaults to the number of CPUs)")]
    pub concurrent_requests: Option<usize>,

    #[arg(long, help = "What to do when a lookup cannot reach the service: not-found or abort")]
    pub failure_policy: Option<FailurePolicy>,

    #[arg(long, help = "Per-request timeout; the HTTP client default applies when unset")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "First answer to the input file prompt")]
    pub input: Option<String>,

    #[arg(long, help = "First answer to the output file prompt")]
    pub output: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Skip the start-up banner")]
    pub no_banner: bool,
}

impl CliArgs {
    /// Defaults, then the TOML file (if any), then command-line flags.
    pub fn resolve(&self) -> Result<ExtractorConfig> {
        let mut config = ExtractorConfig::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading configuration file {}", path.display());
            let file_config = TomlConfig::from_file(path)?;
            config = file_config.apply_to(config);
        }

        if let Some(endpoint) = &self.endpoint {
            config.api_endpoint = endpoint.clone();
        }
        if let Some(query_param) = &self.query_param {
            config.query_param = query_param.clone();
        }
        if let Some(concurrent) = self.concurrent_requests {
            config.concurrent_requests = concurrent;
        }
        if let Some(policy) = self.failure_policy {
            config.failure_policy = policy;
        }
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = Some(timeout);
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub api_endpoint: String,
    pub query_param: String,
    pub concurrent_requests: usize,
    pub failure_policy: FailurePolicy,
    pub timeout_seconds: Option<u64>,
    pub not_found_placeholder: String,
    pub identifier_header: String,
    pub phone_header: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_ENDPOINT.to_string(),
            query_param: DEFAULT_QUERY_PARAM.to_string(),
            concurrent_requests: default_concurrency(),
            failure_policy: FailurePolicy::default(),
            timeout_seconds: None,
            not_found_placeholder: DEFAULT_NOT_FOUND_PLACEHOLDER.to_string(),
            identifier_header: DEFAULT_IDENTIFIER_HEADER.to_string(),
            phone_header: DEFAULT_PHONE_HEADER.to_string(),
        }
    }
}

impl ExtractorConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }
}

impl ConfigProvider for ExtractorConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn query_param(&self) -> &str {
        &self.query_param
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn not_found_placeholder(&self) -> &str {
        &self.not_found_placeholder
    }

    fn identifier_header(&self) -> &str {
        &self.identifier_header
    }

    fn phone_header(&self) -> &str {
        &self.phone_header
    }
}

impl Validate for ExtractorConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
