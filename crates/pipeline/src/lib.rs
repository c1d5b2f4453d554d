pub mod config;
pub mod error;
pub mod report;
pub mod run;
pub mod services;

pub use config::{PipelineConfig, VisionConfig, WarehouseConfig};
pub use error::{PipelineError, Stage, StageCause};
pub use report::{ConsoleReport, ReportSink};
pub use run::{Pipeline, RunSummary};
pub use services::{Annotator, RecordSink};
