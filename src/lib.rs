pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, CliArgs, ExtractorConfig};
pub use core::{
    batch::BatchFetcher,
    lookup::HttpLookupClient,
    report::{ExportSummary, ReportLayout, ReportWriter},
    session::Session,
};
pub use domain::model::{Identifier, LookupResult, ReportRow};
pub use domain::ports::{FailurePolicy, NoProgress, PhoneLookup, ProgressSink, Storage};
pub use utils::error::{ExtractorError, Result};
