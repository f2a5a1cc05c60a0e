//! Scout engine: rate-limited request pipeline and page extraction.
mod email;
mod extract;
mod fetch;
mod pipeline;
mod redact;
mod types;

pub use email::{DeliverabilityValidator, EmailValidator};
pub use extract::{Extractor, PageExtract, TitleEmailExtractor};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use pipeline::{EventSink, PipelineHandle, PipelineSettings};
pub use redact::keyed_email_digest;
pub use types::{FailureKind, FetchError, FetchOutput, PageRecord, PipelineEvent};
