//! Cache domain - Entries, policies and key generation

mod entry;
mod key;

pub use entry::{CacheEntry, CachePolicy, EntryState, LookupOutcome};
pub use key::CacheKeyParams;
