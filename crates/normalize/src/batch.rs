use chrono::Utc;

/// Generate the identifier shared by every record of one pipeline
/// invocation: a sortable UTC timestamp like `20240101_120000_000000`.
///
/// Uniqueness is best effort. Two invocations starting in the same
/// microsecond tick collide, which callers tolerate the same way they
/// tolerate non-unique source refs.
pub fn new_batch_id() -> String {
    Utc::now().format("%Y%m%d_%H%M%S_%6f").to_string()
}
