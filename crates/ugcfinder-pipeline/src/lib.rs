pub mod config;
pub mod error;
pub mod gate;
pub mod orchestrator;
pub mod sink;
pub mod tracker;
pub mod traits;
pub mod xlsx;

pub use config::PipelineConfig;
pub use error::{RunError, SinkError};
pub use gate::{ConcurrencyGate, GatePermit};
pub use orchestrator::{process_all, run, RunSummary};
pub use sink::JsonFileSink;
pub use tracker::CompletionTracker;
pub use traits::{ProfileBrowser, ResultSink, StatsSource};
pub use xlsx::XlsxFileSink;
