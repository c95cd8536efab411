// Adapters layer: concrete implementations for external systems (filesystem, CSV codec).

pub mod csv_io;
pub mod storage;

pub use storage::LocalStorage;
