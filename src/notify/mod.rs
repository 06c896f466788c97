pub mod sink;

pub use sink::{FileSink, ReportSink, SinkError, StdoutSink, WebhookSink};
