pub mod engine;
pub mod memory;

pub use engine::RecordStore;
pub use memory::InMemoryRecordStore;
