use async_trait::async_trait;

use annotate::{AnnotationError, LabelAnnotation, VisionClient, WebEntityAnnotation};
use normalize::EntityRecord;
use warehouse::{InsertResult, TableSink, WarehouseError};

/// The remote annotation capability, one method per query mode. The
/// pipeline depends on this seam rather than the concrete client so tests
/// can substitute doubles.
#[async_trait]
pub trait Annotator {
    async fn detect_labels(
        &self,
        image: &[u8],
    ) -> Result<Vec<LabelAnnotation>, AnnotationError>;

    async fn detect_web_entities(
        &self,
        image: &[u8],
    ) -> Result<Vec<WebEntityAnnotation>, AnnotationError>;
}

#[async_trait]
impl Annotator for VisionClient {
    async fn detect_labels(
        &self,
        image: &[u8],
    ) -> Result<Vec<LabelAnnotation>, AnnotationError> {
        VisionClient::detect_labels(self, image).await
    }

    async fn detect_web_entities(
        &self,
        image: &[u8],
    ) -> Result<Vec<WebEntityAnnotation>, AnnotationError> {
        VisionClient::detect_web_entities(self, image).await
    }
}

/// Destination for normalized rows.
#[async_trait]
pub trait RecordSink {
    async fn insert_rows(
        &self,
        rows: &[EntityRecord],
    ) -> Result<InsertResult, WarehouseError>;
}

#[async_trait]
impl RecordSink for TableSink {
    async fn insert_rows(
        &self,
        rows: &[EntityRecord],
    ) -> Result<InsertResult, WarehouseError> {
        TableSink::insert_rows(self, rows).await
    }
}
