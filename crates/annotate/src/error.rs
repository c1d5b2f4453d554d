use thiserror::Error;

/// Which query mode a call was issued in. Carried by every service-side
/// error so the orchestrator can report the failing stage precisely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMode {
    Label,
    WebEntity,
}

impl DetectionMode {
    /// Feature type string the annotation service expects.
    pub(crate) fn feature_type(self) -> &'static str {
        match self {
            DetectionMode::Label => "LABEL_DETECTION",
            DetectionMode::WebEntity => "WEB_DETECTION",
        }
    }
}

impl std::fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionMode::Label => f.write_str("label"),
            DetectionMode::WebEntity => f.write_str("web-entity"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AnnotationError {
    /// Rejected locally before any network call is made.
    #[error("refusing to annotate an empty image payload")]
    EmptyImage,

    /// The request never produced a usable response: connect failure,
    /// timeout, or an unreadable body.
    #[error("{mode} detection request failed: {source}")]
    Transport {
        mode: DetectionMode,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered and refused: auth failure, quota, malformed
    /// image, or a per-image error object in an otherwise 2xx response.
    #[error("{mode} detection rejected by service (status {status}): {message}")]
    Service {
        mode: DetectionMode,
        status: u16,
        message: String,
    },

    /// The response decoded but violates the expected shape.
    #[error("{mode} detection returned a malformed response: {detail}")]
    Malformed {
        mode: DetectionMode,
        detail: String,
    },
}

impl AnnotationError {
    /// The query mode of the failed call, when one was reached.
    pub fn mode(&self) -> Option<DetectionMode> {
        match self {
            AnnotationError::EmptyImage => None,
            AnnotationError::Transport { mode, .. }
            | AnnotationError::Service { mode, .. }
            | AnnotationError::Malformed { mode, .. } => Some(*mode),
        }
    }
}
