//! Cache service and read-through helpers

pub mod cached_operation;
pub mod service;

pub use cached_operation::CachedOperation;
pub use service::CacheService;
