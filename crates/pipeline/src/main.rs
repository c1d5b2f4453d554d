use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use annotate::VisionClient;
use pipeline::config::PipelineConfig;
use pipeline::report::ConsoleReport;
use pipeline::run::Pipeline;
use warehouse::TableSink;

/// Annotate a still image and stream the detected web entities into an
/// analytics warehouse table.
#[derive(Parser, Debug)]
#[command(name = "imgmeta", version, about)]
struct Args {
    /// Path of the image to analyze
    image: PathBuf,

    /// Destination dataset
    #[arg(long)]
    dataset_id: String,

    /// Destination table (must already exist with the record schema)
    #[arg(long)]
    table_id: String,

    /// Warehouse project
    #[arg(long, env = "WAREHOUSE_PROJECT_ID")]
    project_id: String,

    /// Annotation service API key
    #[arg(long, env = "VISION_API_KEY")]
    api_key: Option<String>,

    /// Warehouse bearer token
    #[arg(long, env = "WAREHOUSE_TOKEN")]
    auth_token: Option<String>,

    /// Annotation service endpoint override
    #[arg(long, env = "VISION_ENDPOINT")]
    vision_endpoint: Option<String>,

    /// Warehouse endpoint override
    #[arg(long, env = "WAREHOUSE_ENDPOINT")]
    warehouse_endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Maximum labels to request per image
    #[arg(long, default_value_t = 10)]
    label_max_results: u32,
}

impl Args {
    fn into_config(self) -> (PathBuf, PipelineConfig) {
        let mut config = PipelineConfig::default();

        if let Some(endpoint) = self.vision_endpoint {
            config.vision.endpoint = endpoint;
        }
        config.vision.api_key = self.api_key;
        config.vision.label_max_results = self.label_max_results;
        config.vision.request_timeout_secs = self.timeout_secs;

        if let Some(endpoint) = self.warehouse_endpoint {
            config.warehouse.endpoint = endpoint;
        }
        config.warehouse.project_id = self.project_id;
        config.warehouse.dataset_id = self.dataset_id;
        config.warehouse.table_id = self.table_id;
        config.warehouse.auth_token = self.auth_token;
        config.warehouse.request_timeout_secs = self.timeout_secs;

        (self.image, config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let (image, config) = Args::parse().into_config();

    let vision = VisionClient::new(config.vision.endpoint, config.vision.api_key)
        .with_timeout(Duration::from_secs(config.vision.request_timeout_secs))
        .with_label_max_results(config.vision.label_max_results);

    let sink = TableSink::new(
        config.warehouse.endpoint,
        config.warehouse.project_id,
        config.warehouse.dataset_id,
        config.warehouse.table_id,
    )
    .with_auth_token(config.warehouse.auth_token)
    .with_timeout(Duration::from_secs(config.warehouse.request_timeout_secs));

    let pipeline = Pipeline::new(vision, sink);
    let mut report = ConsoleReport;

    let summary = pipeline.run(&image, &mut report).await?;

    tracing::info!(
        batch_id = %summary.batch_id,
        labels = summary.labels_detected,
        entities = summary.entities_detected,
        records = summary.records_written,
        rejected = summary.row_errors.len(),
        "done"
    );

    Ok(())
}
