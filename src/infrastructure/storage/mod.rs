pub mod local;
pub mod memory;

pub use local::LocalKeyValueStore;
pub use memory::InMemoryKeyValueStore;
