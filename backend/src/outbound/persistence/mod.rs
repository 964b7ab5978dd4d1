//! Storage adapters implementing the keyed-store port.

mod memory_kv;

pub use memory_kv::MemoryKvStore;
