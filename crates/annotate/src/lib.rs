pub mod client;
pub mod error;
pub mod schema;

pub use client::VisionClient;
pub use error::{AnnotationError, DetectionMode};
pub use schema::{LabelAnnotation, WebEntityAnnotation};
