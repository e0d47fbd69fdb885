//! 存储层：共享原子计数器与持久化记录存储的抽象及其实现

pub mod counter_store;
pub mod guarded_counter;
pub mod memory_counter;
pub mod memory_record;
pub mod record_store;

#[cfg(feature = "redb")]
pub mod redb_counter;
#[cfg(feature = "redb")]
pub mod redb_record;
#[cfg(feature = "redb")]
pub mod redb_types;

pub use counter_store::CounterStore;
pub use guarded_counter::GuardedCounterStore;
pub use memory_counter::MemoryCounterStore;
pub use memory_record::MemoryRecordStore;
pub use record_store::{RecordStore, UrlRecord};

#[cfg(feature = "redb")]
pub use redb_counter::RedbCounterStore;
#[cfg(feature = "redb")]
pub use redb_record::RedbRecordStore;
#[cfg(feature = "redb")]
pub use redb_types::open_database;
