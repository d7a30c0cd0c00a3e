//! Cache providers
//!
//! - [`MemoryCacheProvider`]: process-local, fastest tier
//! - [`FileCacheProvider`]: survives restarts, one file per key

mod file;
mod memory;

pub use file::{FileCacheProvider, default_cache_dir};
pub use memory::MemoryCacheProvider;
