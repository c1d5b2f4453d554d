use serde::{Deserialize, Serialize};

/// A whole-image semantic tag. Labels are display-only in this pipeline;
/// they never reach the warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// An entity matched against the image by reverse web search.
///
/// Every field is optional on the wire. The service routinely returns
/// entities with an id but no human-readable description, so downstream
/// code must match on presence rather than assume the field is filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebEntityAnnotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Match strength in [0,1], guaranteed by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}
