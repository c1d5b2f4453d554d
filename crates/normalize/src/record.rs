use serde::{Deserialize, Serialize};

/// One persistence-ready row: a web entity tied to the batch and the image
/// it came from. Field names match the destination table's columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Shared by every record of one pipeline invocation.
    pub batch_id: String,
    /// Path or URI of the analyzed image. Not unique across runs.
    pub source_ref: String,
    pub description: String,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_table_column_names() {
        let record = EntityRecord {
            batch_id: "20240101_120000_000000".to_string(),
            source_ref: "/tmp/img.jpg".to_string(),
            description: "cat".to_string(),
            score: 0.5,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["batch_id"], "20240101_120000_000000");
        assert_eq!(value["source_ref"], "/tmp/img.jpg");
        assert_eq!(value["description"], "cat");
        assert_eq!(value["score"], 0.5);
    }
}
