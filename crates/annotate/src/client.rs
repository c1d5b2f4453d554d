use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{AnnotationError, DetectionMode};
use crate::schema::{LabelAnnotation, WebEntityAnnotation};

pub const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LABEL_MAX_RESULTS: u32 = 10;

/// Client for the remote image-annotation service.
///
/// Owns nothing beyond its connection handle; construct one explicitly and
/// pass it into the pipeline rather than reaching for a global.
#[derive(Clone)]
pub struct VisionClient {
    endpoint: String,
    api_key: Option<String>,
    label_max_results: u32,
    timeout: Duration,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateRequestItem>,
}

#[derive(Serialize)]
struct AnnotateRequestItem {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct ImageContent {
    /// Base64-encoded image bytes.
    content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Feature {
    r#type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
}

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResponseItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResponseItem {
    #[serde(default)]
    label_annotations: Option<Vec<LabelAnnotation>>,
    #[serde(default)]
    web_detection: Option<WebDetection>,
    #[serde(default)]
    error: Option<ServiceStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebDetection {
    #[serde(default)]
    web_entities: Option<Vec<WebEntityAnnotation>>,
}

#[derive(Deserialize)]
struct ServiceStatus {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

impl VisionClient {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            endpoint,
            api_key,
            label_max_results: DEFAULT_LABEL_MAX_RESULTS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            client: reqwest::Client::new(),
        }
    }

    pub fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT.to_string(), None)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_label_max_results(mut self, max_results: u32) -> Self {
        self.label_max_results = max_results;
        self
    }

    /// Detect whole-image labels. Returns whatever the service returned,
    /// in service order, possibly empty.
    pub async fn detect_labels(
        &self,
        image: &[u8],
    ) -> Result<Vec<LabelAnnotation>, AnnotationError> {
        let item = self.annotate(image, DetectionMode::Label).await?;
        Ok(item.label_annotations.unwrap_or_default())
    }

    /// Detect entities matched by reverse web search. An empty result means
    /// the service found no web matches for the image, not a failure. No
    /// ordering guarantee: the service does not document score order and the
    /// sequence is never re-sorted here.
    pub async fn detect_web_entities(
        &self,
        image: &[u8],
    ) -> Result<Vec<WebEntityAnnotation>, AnnotationError> {
        let item = self.annotate(image, DetectionMode::WebEntity).await?;
        Ok(item
            .web_detection
            .and_then(|web| web.web_entities)
            .unwrap_or_default())
    }

    async fn annotate(
        &self,
        image: &[u8],
        mode: DetectionMode,
    ) -> Result<AnnotateResponseItem, AnnotationError> {
        if image.is_empty() {
            return Err(AnnotationError::EmptyImage);
        }

        let url = match &self.api_key {
            Some(key) => format!("{}/images:annotate?key={}", self.endpoint, key),
            None => format!("{}/images:annotate", self.endpoint),
        };

        let request = build_request(image, mode, self.label_max_results);

        debug!(mode = %mode, bytes = image.len(), "sending annotate request");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|source| AnnotationError::Transport { mode, source })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AnnotationError::Service {
                mode,
                status,
                message,
            });
        }

        let decoded: AnnotateResponse = response
            .json()
            .await
            .map_err(|source| AnnotationError::Transport { mode, source })?;

        // One image in, one response item out.
        let item = decoded
            .responses
            .into_iter()
            .next()
            .ok_or_else(|| AnnotationError::Malformed {
                mode,
                detail: "empty responses array".to_string(),
            })?;

        if let Some(status) = item.error {
            return Err(AnnotationError::Service {
                mode,
                status: status.code,
                message: status.message,
            });
        }

        Ok(item)
    }
}

fn build_request(image: &[u8], mode: DetectionMode, label_max_results: u32) -> AnnotateRequest {
    let max_results = match mode {
        DetectionMode::Label => Some(label_max_results),
        DetectionMode::WebEntity => None,
    };

    AnnotateRequest {
        requests: vec![AnnotateRequestItem {
            image: ImageContent {
                content: BASE64.encode(image),
            },
            features: vec![Feature {
                r#type: mode.feature_type(),
                max_results,
            }],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_image_is_rejected_before_any_network_call() {
        // Unroutable endpoint: reaching the network would fail loudly.
        let client = VisionClient::new("http://127.0.0.1:1".to_string(), None);

        let err = client.detect_labels(&[]).await.unwrap_err();
        assert!(matches!(err, AnnotationError::EmptyImage));
        assert_eq!(err.mode(), None);

        let err = client.detect_web_entities(&[]).await.unwrap_err();
        assert!(matches!(err, AnnotationError::EmptyImage));
    }

    #[test]
    fn label_request_carries_feature_type_and_max_results() {
        let request = build_request(b"img", DetectionMode::Label, 10);
        let body = serde_json::to_value(&request).unwrap();

        let feature = &body["requests"][0]["features"][0];
        assert_eq!(feature["type"], "LABEL_DETECTION");
        assert_eq!(feature["maxResults"], 10);
        assert_eq!(body["requests"][0]["image"]["content"], "aW1n");
    }

    #[test]
    fn web_request_omits_max_results() {
        let request = build_request(b"img", DetectionMode::WebEntity, 10);
        let body = serde_json::to_value(&request).unwrap();

        let feature = &body["requests"][0]["features"][0];
        assert_eq!(feature["type"], "WEB_DETECTION");
        assert!(feature.get("maxResults").is_none());
    }

    #[test]
    fn response_decodes_label_annotations() {
        let decoded: AnnotateResponse = serde_json::from_str(
            r#"{"responses":[{"labelAnnotations":[
                {"description":"Cat","score":0.98},
                {"description":"Whiskers"}
            ]}]}"#,
        )
        .unwrap();

        let labels = decoded.responses[0].label_annotations.as_ref().unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].description.as_deref(), Some("Cat"));
        assert_eq!(labels[1].score, None);
    }

    #[test]
    fn response_decodes_web_entities_under_web_detection() {
        let decoded: AnnotateResponse = serde_json::from_str(
            r#"{"responses":[{"webDetection":{"webEntities":[
                {"entityId":"/m/01yrx","score":0.5}
            ]}}]}"#,
        )
        .unwrap();

        let web = decoded.responses[0].web_detection.as_ref().unwrap();
        let entities = web.web_entities.as_ref().unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].description, None);
    }

    #[test]
    fn response_without_annotations_decodes_empty() {
        // No web matches at all is a valid service answer.
        let decoded: AnnotateResponse = serde_json::from_str(r#"{"responses":[{}]}"#).unwrap();
        let item = &decoded.responses[0];
        assert!(item.label_annotations.is_none());
        assert!(item.web_detection.is_none());
        assert!(item.error.is_none());
    }

    #[test]
    fn per_image_error_decodes_as_service_status() {
        let decoded: AnnotateResponse = serde_json::from_str(
            r#"{"responses":[{"error":{"code":3,"message":"Bad image data"}}]}"#,
        )
        .unwrap();

        let status = decoded.responses[0].error.as_ref().unwrap();
        assert_eq!(status.code, 3);
        assert_eq!(status.message, "Bad image data");
    }
}
