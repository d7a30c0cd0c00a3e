//! Cache domain module
//!
//! Defines the [`CacheEntry`] stored by every provider, the composite
//! [`CacheKey`], the [`CacheProvider`] abstraction and the [`Clock`] used
//! for expiration.

pub mod clock;
pub mod entities;
pub mod provider;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entities::{CacheEntry, CacheKey};
pub use provider::{CacheError, CacheProvider};
