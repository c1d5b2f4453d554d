use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use normalize::EntityRecord;

use crate::error::WarehouseError;

pub const DEFAULT_ENDPOINT: &str = "https://bigquery.googleapis.com/bigquery/v2";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Outcome of one streaming append.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertResult {
    /// Every submitted row was accepted.
    Accepted { rows_sent: usize },
    /// The batch landed but some rows were rejected. Accepted rows are not
    /// rolled back and rejected rows are not retried here: the insert is
    /// at-least-once, so re-sending the whole batch would duplicate.
    PartiallyRejected { row_errors: Vec<RowError> },
}

/// One rejected row, by position in the submitted batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub index: usize,
    pub message: String,
}

/// Appends rows to a pre-existing warehouse table via the streaming-insert
/// API. Never creates or migrates schema; the table must already exist with
/// columns matching `EntityRecord`.
pub struct TableSink {
    endpoint: String,
    project_id: String,
    dataset_id: String,
    table_id: String,
    auth_token: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct InsertAllRequest {
    rows: Vec<InsertRow>,
}

#[derive(Serialize)]
struct InsertRow {
    /// Best-effort dedup handle under the at-least-once insert contract.
    #[serde(rename = "insertId")]
    insert_id: String,
    json: EntityRecord,
}

#[derive(Deserialize)]
struct InsertAllResponse {
    #[serde(rename = "insertErrors", default)]
    insert_errors: Vec<InsertError>,
}

#[derive(Deserialize)]
struct InsertError {
    index: usize,
    #[serde(default)]
    errors: Vec<ErrorProto>,
}

#[derive(Deserialize, Default)]
struct ErrorProto {
    #[serde(default)]
    reason: String,
    #[serde(default)]
    message: String,
}

impl TableSink {
    pub fn new(
        endpoint: String,
        project_id: String,
        dataset_id: String,
        table_id: String,
    ) -> Self {
        Self {
            endpoint,
            project_id,
            dataset_id,
            table_id,
            auth_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Append `rows` to the table in one streaming-insert call.
    ///
    /// Zero rows is a legal no-op: nothing touches the network and the
    /// result is `Accepted` with zero rows sent, which stays observably
    /// distinct from a batch that landed with row errors.
    pub async fn insert_rows(
        &self,
        rows: &[EntityRecord],
    ) -> Result<InsertResult, WarehouseError> {
        if rows.is_empty() {
            return Ok(InsertResult::Accepted { rows_sent: 0 });
        }

        let url = format!(
            "{}/projects/{}/datasets/{}/tables/{}/insertAll",
            self.endpoint, self.project_id, self.dataset_id, self.table_id
        );

        let request = InsertAllRequest {
            rows: rows
                .iter()
                .map(|record| InsertRow {
                    insert_id: Uuid::new_v4().to_string(),
                    json: record.clone(),
                })
                .collect(),
        };

        debug!(rows = rows.len(), table = %self.table_id, "streaming insert");

        let mut builder = self.client.post(&url).timeout(self.timeout).json(&request);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(WarehouseError::Connection)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(WarehouseError::Rejected { status, message });
        }

        let decoded: InsertAllResponse = response
            .json()
            .await
            .map_err(WarehouseError::Connection)?;

        let result = collate_result(rows.len(), decoded);
        if let InsertResult::PartiallyRejected { row_errors } = &result {
            warn!(
                rejected = row_errors.len(),
                submitted = rows.len(),
                "insert completed with row-level errors"
            );
        }
        Ok(result)
    }
}

fn collate_result(rows_sent: usize, response: InsertAllResponse) -> InsertResult {
    if response.insert_errors.is_empty() {
        return InsertResult::Accepted { rows_sent };
    }

    let row_errors = response
        .insert_errors
        .into_iter()
        .map(|insert_error| RowError {
            index: insert_error.index,
            message: insert_error
                .errors
                .into_iter()
                .map(|proto| {
                    if proto.reason.is_empty() {
                        proto.message
                    } else {
                        format!("{}: {}", proto.reason, proto.message)
                    }
                })
                .collect::<Vec<_>>()
                .join("; "),
        })
        .collect();

    InsertResult::PartiallyRejected { row_errors }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(description: &str, score: f32) -> EntityRecord {
        EntityRecord {
            batch_id: "20240101_120000_000000".to_string(),
            source_ref: "/tmp/img.jpg".to_string(),
            description: description.to_string(),
            score,
        }
    }

    #[tokio::test]
    async fn empty_batch_short_circuits_without_network() {
        // Unroutable endpoint: any attempted call would surface as an error.
        let sink = TableSink::new(
            "http://127.0.0.1:1".to_string(),
            "proj".to_string(),
            "video_analysis".to_string(),
            "video_metadata".to_string(),
        );

        let result = sink.insert_rows(&[]).await.unwrap();
        assert_eq!(result, InsertResult::Accepted { rows_sent: 0 });
    }

    #[test]
    fn rows_serialize_with_insert_id_and_column_payload() {
        let request = InsertAllRequest {
            rows: vec![InsertRow {
                insert_id: "11111111-2222-3333-4444-555555555555".to_string(),
                json: record("cat", 0.5),
            }],
        };

        let body = serde_json::to_value(&request).unwrap();
        let row = &body["rows"][0];
        assert_eq!(row["insertId"], "11111111-2222-3333-4444-555555555555");
        assert_eq!(row["json"]["batch_id"], "20240101_120000_000000");
        assert_eq!(row["json"]["source_ref"], "/tmp/img.jpg");
        assert_eq!(row["json"]["description"], "cat");
        assert_eq!(row["json"]["score"], 0.5);
    }

    #[test]
    fn clean_response_collates_to_accepted() {
        let response: InsertAllResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(
            collate_result(3, response),
            InsertResult::Accepted { rows_sent: 3 }
        );
    }

    #[test]
    fn row_errors_collate_to_partially_rejected_with_matching_index() {
        // One row of three rejected.
        let response: InsertAllResponse = serde_json::from_str(
            r#"{"insertErrors":[{"index":1,"errors":[
                {"reason":"invalid","message":"no such field: scor"}
            ]}]}"#,
        )
        .unwrap();

        let result = collate_result(3, response);
        let InsertResult::PartiallyRejected { row_errors } = result else {
            panic!("expected partial rejection");
        };
        assert_eq!(row_errors.len(), 1);
        assert_eq!(row_errors[0].index, 1);
        assert_eq!(row_errors[0].message, "invalid: no such field: scor");
    }

    #[test]
    fn error_protos_without_reason_keep_the_bare_message() {
        let response: InsertAllResponse = serde_json::from_str(
            r#"{"insertErrors":[{"index":0,"errors":[{"message":"stopped"}]}]}"#,
        )
        .unwrap();

        let InsertResult::PartiallyRejected { row_errors } = collate_result(1, response) else {
            panic!("expected partial rejection");
        };
        assert_eq!(row_errors[0].message, "stopped");
    }
}
