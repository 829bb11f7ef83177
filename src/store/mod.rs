mod memory;
mod source;
mod sqlite;

pub use memory::InMemoryRecordStore;
pub use source::RecordStore;
pub use sqlite::SqliteRecordStore;
