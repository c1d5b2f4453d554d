pub mod error;
pub mod sink;

pub use error::WarehouseError;
pub use sink::{InsertResult, RowError, TableSink};
