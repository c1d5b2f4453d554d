pub mod batch;
pub mod normalizer;
pub mod record;

pub use batch::new_batch_id;
pub use normalizer::normalize_web_entities;
pub use record::EntityRecord;
