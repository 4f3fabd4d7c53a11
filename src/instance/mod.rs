//! Per-key lifecycle
//!
//! Each visible key owns one `Instance` record in the registry, created when
//! the key appears and dropped when it disappears. Dropping the record aborts
//! the key's worker.

pub mod registry;
pub mod worker;

pub use registry::{InstanceRegistry, KeyPress};
