use scout_engine::{EventSink, PipelineEvent};

/// Success records go to stdout as newline-delimited JSON; terminal
/// failures go to stderr. The two streams are independent.
pub struct StdStreamSink;

impl EventSink for StdStreamSink {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::Page(record) => match serde_json::to_string(&record) {
                Ok(line) => println!("{line}"),
                Err(err) => log::error!("failed to serialize record for {}: {err}", record.url),
            },
            PipelineEvent::FailedAfterRetry { url, status } => {
                eprintln!("Failed after retry: {url} ({status})");
            }
            PipelineEvent::FetchErrored { url, detail } => {
                eprintln!("Error fetching {url}: {detail}");
            }
        }
    }
}
