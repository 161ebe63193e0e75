//! Result cache
//!
//! Completed multi-year fetches are kept in memory under a [`QueryKey`] for a
//! fixed TTL. Time comes from an injected [`Clock`] so expiry can be tested.

pub mod clock;
pub mod key;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use key::QueryKey;
pub use store::{CachedResult, ResultCache};
