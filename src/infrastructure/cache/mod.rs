//! Cache infrastructure - Policy-aware stores and the background sweeper

mod store;
mod sweeper;

pub use store::{CacheStore, Lookup};
pub use sweeper::{spawn_sweeper, sweep_interval, SweeperHandle};
