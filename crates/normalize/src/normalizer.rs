use annotate::WebEntityAnnotation;

use crate::record::EntityRecord;

/// Flatten web-entity annotations into persistence-ready rows.
///
/// An entity with no usable description is dropped silently: the service
/// routinely returns entity ids without a human-readable description, and
/// such a row would be meaningless in the destination table. An absent
/// score drops the entity for the same reason; the record's score column is
/// mandatory and defaulting it would fabricate a confidence. Input order is
/// preserved and duplicate descriptions are all retained (they can come
/// from different matched pages).
pub fn normalize_web_entities(
    entities: &[WebEntityAnnotation],
    batch_id: &str,
    source_ref: &str,
) -> Vec<EntityRecord> {
    entities
        .iter()
        .filter_map(|entity| match (&entity.description, entity.score) {
            (Some(description), Some(score)) if !description.is_empty() => Some(EntityRecord {
                batch_id: batch_id.to_string(),
                source_ref: source_ref.to_string(),
                description: description.clone(),
                score,
            }),
            _ => None,
        })
        .collect()
}
