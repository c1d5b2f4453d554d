use std::path::Path;
use tracing::{info, warn};

use normalize::{new_batch_id, normalize_web_entities};
use warehouse::{InsertResult, RowError};

use crate::error::{PipelineError, Stage};
use crate::report::ReportSink;
use crate::services::{Annotator, RecordSink};

/// What one completed invocation did, keyed by its batch id.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub batch_id: String,
    pub labels_detected: usize,
    pub entities_detected: usize,
    pub records_written: usize,
    /// Row-level rejects from the warehouse. Reported, never retried:
    /// accepted rows are already in the table and re-sending the batch
    /// would duplicate them.
    pub row_errors: Vec<RowError>,
}

/// One-shot orchestrator wiring the annotation client, the normalizer and
/// the warehouse sink. Stateless across invocations: each run owns its
/// image bytes and its batch id, so whole runs can execute in parallel.
pub struct Pipeline<A, S> {
    annotator: A,
    sink: S,
}

impl<A: Annotator, S: RecordSink> Pipeline<A, S> {
    pub fn new(annotator: A, sink: S) -> Self {
        Self { annotator, sink }
    }

    /// Run the full stage sequence against one image:
    /// read, query labels, query web entities, normalize, persist.
    ///
    /// Any stage failure is terminal. The two query modes are issued
    /// sequentially, so a label-detection failure means web detection is
    /// never attempted.
    pub async fn run(
        &self,
        image_path: &Path,
        report: &mut dyn ReportSink,
    ) -> Result<RunSummary, PipelineError> {
        let batch_id = new_batch_id();
        let source_ref = image_path.to_string_lossy().to_string();
        info!(batch_id = %batch_id, source = %source_ref, "starting annotation run");

        let image = tokio::fs::read(image_path)
            .await
            .map_err(|e| PipelineError::at(Stage::ReadImage, e))?;

        let labels = self
            .annotator
            .detect_labels(&image)
            .await
            .map_err(|e| PipelineError::at(Stage::QueryLabels, e))?;
        report.report_labels(&labels);

        let entities = self
            .annotator
            .detect_web_entities(&image)
            .await
            .map_err(|e| PipelineError::at(Stage::QueryWebEntities, e))?;
        report.report_entities(&entities);

        // Both query modes are done with the blob.
        drop(image);

        let records = normalize_web_entities(&entities, &batch_id, &source_ref);
        info!(
            entities = entities.len(),
            records = records.len(),
            "normalized web entities"
        );

        let mut summary = RunSummary {
            batch_id,
            labels_detected: labels.len(),
            entities_detected: entities.len(),
            records_written: 0,
            row_errors: Vec::new(),
        };

        if records.is_empty() {
            // No web matches survived normalization; a valid outcome with
            // nothing to persist.
            report.report_insert(0, &[]);
            return Ok(summary);
        }

        let result = self
            .sink
            .insert_rows(&records)
            .await
            .map_err(|e| PipelineError::at(Stage::Persist, e))?;

        match result {
            InsertResult::Accepted { rows_sent } => {
                summary.records_written = rows_sent;
                report.report_insert(rows_sent, &[]);
            }
            InsertResult::PartiallyRejected { row_errors } => {
                warn!(
                    rejected = row_errors.len(),
                    submitted = records.len(),
                    "warehouse rejected some rows"
                );
                summary.records_written = records.len() - row_errors.len();
                report.report_insert(records.len(), &row_errors);
                summary.row_errors = row_errors;
            }
        }

        info!(
            batch_id = %summary.batch_id,
            records = summary.records_written,
            "annotation run complete"
        );
        Ok(summary)
    }
}
