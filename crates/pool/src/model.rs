//! Per-model availability state with lazy cooldown expiry.

use std::time::{Duration, Instant};

use tracing::{info, warn};

/// Availability state for one backend model.
///
/// A model is usable unless a rate-limit response put it into cooldown.
/// The deadline is checked lazily: the first availability query at or past
/// it clears the cooldown. Between the deadline and that query the model
/// is still reported unavailable, which is fine — the only observer is the
/// next dispatch attempt.
#[derive(Debug, Clone)]
pub struct ModelState {
    id: String,
    disabled_until: Option<Instant>,
}

impl ModelState {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            disabled_until: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the model can be used right now, clearing an expired cooldown.
    pub fn is_available(&mut self) -> bool {
        self.is_available_at(Instant::now())
    }

    /// Availability at an explicit point in time.
    ///
    /// The boundary is inclusive: a deadline equal to `now` counts as
    /// expired, so a zero-second cooldown leaves the model usable.
    pub fn is_available_at(&mut self, now: Instant) -> bool {
        match self.disabled_until {
            None => true,
            Some(deadline) if now >= deadline => {
                self.disabled_until = None;
                info!(model = %self.id, "model is usable again");
                true
            },
            Some(_) => false,
        }
    }

    /// Put the model into cooldown for `retry_after_secs` from now.
    pub fn disable(&mut self, retry_after_secs: u64) {
        self.disable_at(Instant::now(), retry_after_secs);
    }

    /// Cooldown from an explicit starting point.
    ///
    /// A call while already disabled overwrites the previous deadline: the
    /// cooldown is exactly as long as the upstream's most recent hint, with
    /// no accumulation and no cap.
    pub fn disable_at(&mut self, now: Instant, retry_after_secs: u64) {
        self.disabled_until = Some(now + Duration::from_secs(retry_after_secs));
        warn!(
            model = %self.id,
            retry_after_secs,
            "model rate-limited, entering cooldown"
        );
    }

    /// Time left until the deadline, if one is set and still ahead of `now`.
    ///
    /// Read-only: does not apply lazy expiry.
    #[must_use]
    pub fn cooldown_remaining_at(&self, now: Instant) -> Option<Duration> {
        self.disabled_until
            .and_then(|deadline| deadline.checked_duration_since(now))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_model_is_available() {
        let mut state = ModelState::new("m");
        assert!(state.is_available());
    }

    #[test]
    fn zero_second_cooldown_expires_immediately() {
        let now = Instant::now();
        let mut state = ModelState::new("m");
        state.disable_at(now, 0);
        assert!(state.is_available_at(now));
    }

    #[test]
    fn unavailable_strictly_before_deadline() {
        let now = Instant::now();
        let mut state = ModelState::new("m");
        state.disable_at(now, 10);
        assert!(!state.is_available_at(now));
        assert!(!state.is_available_at(now + Duration::from_secs(9)));
    }

    #[test]
    fn available_at_exact_deadline() {
        let now = Instant::now();
        let mut state = ModelState::new("m");
        state.disable_at(now, 10);
        assert!(state.is_available_at(now + Duration::from_secs(10)));
    }

    #[test]
    fn expiry_clears_the_deadline() {
        let now = Instant::now();
        let mut state = ModelState::new("m");
        state.disable_at(now, 1);
        assert!(state.is_available_at(now + Duration::from_secs(1)));
        // Cleared on the check above, so an earlier instant is fine too.
        assert!(state.is_available_at(now));
    }

    #[test]
    fn later_disable_overwrites_earlier_deadline() {
        let now = Instant::now();
        let mut state = ModelState::new("m");
        state.disable_at(now, 60);
        state.disable_at(now, 2);
        assert!(state.is_available_at(now + Duration::from_secs(2)));
    }

    #[test]
    fn cooldown_remaining_counts_down() {
        let now = Instant::now();
        let mut state = ModelState::new("m");
        assert_eq!(state.cooldown_remaining_at(now), None);

        state.disable_at(now, 10);
        assert_eq!(
            state.cooldown_remaining_at(now + Duration::from_secs(4)),
            Some(Duration::from_secs(6))
        );
        assert_eq!(
            state.cooldown_remaining_at(now + Duration::from_secs(10)),
            None
        );
    }
}
