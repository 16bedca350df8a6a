//! Store domain - Key-value store abstraction shared by the cache layers

mod repository;

pub use repository::KeyValueStore;

#[cfg(test)]
pub use repository::mock::MockStore;
