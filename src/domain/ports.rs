use crate::domain::model::LookupResult;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::str::FromStr;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    /// Creates `path` with `data`. An existing file is left untouched and
    /// reported as `OutputAlreadyExists`.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// What to do with a lookup whose transport failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Record the identifier as not found and keep going.
    #[default]
    NotFound,
    /// Fail the whole batch on the first transport error.
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "not-found" | "not_found" | "notfound" => Ok(FailurePolicy::NotFound),
            "abort" => Ok(FailurePolicy::Abort),
            other => Err(format!(
                "unknown failure policy '{}' (expected 'not-found' or 'abort')",
                other
            )),
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn query_param(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
    fn failure_policy(&self) -> FailurePolicy;
    fn timeout_seconds(&self) -> Option<u64>;
    fn not_found_placeholder(&self) -> &str;
    fn identifier_header(&self) -> &str;
    fn phone_header(&self) -> &str;
}

#[async_trait]
pub trait PhoneLookup: Send + Sync {
    /// Resolves one identifier. `Err` means the transport failed; a service
    /// answer without a phone is `Ok(LookupResult::NotFound)`.
    async fn lookup(&self, identifier: &str) -> Result<LookupResult>;
}

/// Receives one tick per completed lookup.
pub trait ProgressSink: Send + Sync {
    fn start(&self, _total: u64) {}
    fn advance(&self);
    fn finish(&self) {}
}

pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn advance(&self) {}
}
