pub mod batch;
pub mod lookup;
pub mod report;
pub mod session;

pub use crate::domain::model::{BatchResult, Identifier, LookupResult, ReportRow};
pub use crate::domain::ports::{ConfigProvider, FailurePolicy, PhoneLookup, ProgressSink, Storage};
pub use crate::utils::error::Result;
