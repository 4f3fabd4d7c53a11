pub mod errors;
pub mod ratelimit;

pub use ratelimit::KeyCooldown;
