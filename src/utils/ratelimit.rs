use std::time::{Duration, Instant};

/// Key press cooldown for a single instance
///
/// A press inside the window is dropped instead of queued.
#[derive(Debug, Default)]
pub struct KeyCooldown {
    last_press: Option<Instant>,
}

impl KeyCooldown {
    pub fn new() -> Self {
        Self { last_press: None }
    }

    /// Check if a press at `now` may run.
    /// Returns Ok(()) and records the press if the cooldown has passed,
    /// Err(remaining) if it is still active.
    pub fn check(&mut self, now: Instant, cooldown: Duration) -> Result<(), Duration> {
        if let Some(last) = self.last_press {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < cooldown {
                return Err(cooldown - elapsed);
            }
        }

        self.last_press = Some(now);
        Ok(())
    }
}
