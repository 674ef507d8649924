pub mod collector;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod telemetry;
pub mod verifier;

pub use collector::{InputFile, InputFileSet, MergeStats};
pub use config::MergeConfig;
pub use error::*;
pub use pipeline::{PipelineReport, TargetProgress};
pub use report::{ConsoleReporter, MergeEvent, RecordingReporter, Reporter};
pub use telemetry::init_tracing;
pub use verifier::{Discrepancy, VerifyStats};
