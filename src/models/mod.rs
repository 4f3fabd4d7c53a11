//! Data models for the ticker plugin
//!
//! Market data handed to the renderer, the derived trend styling, per-instance
//! settings and the cached values of the last good frame.

pub mod ticker;
pub mod trend;
pub mod frame;
pub mod settings;

// Re-export commonly used types for convenience
pub use ticker::{MarketSnapshot, TickerSummary};
pub use trend::{Trend, TrendStyle};
pub use frame::{FrameValues, RenderStyle};
pub use settings::InstanceSettings;
