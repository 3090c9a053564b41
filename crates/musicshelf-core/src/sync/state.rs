//! Session state held by the sync engine

/// Engine session flags
///
/// Owned and mutated only by the engine task. A copy is published after
/// every transition for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    /// Cache stream has been subscribed (never goes back to false)
    pub cache_subscribed: bool,
    /// A network fetch is outstanding
    pub network_in_flight: bool,
    /// No sink has been attached yet
    pub is_first_attach: bool,
    /// The outstanding (or last failed) refresh came from a user retry
    pub retry_pending: bool,
    /// Bumped by every refresh; results tagged with an older value are stale
    pub generation: u64,
    /// A sink is currently attached
    pub attached: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            cache_subscribed: false,
            network_in_flight: false,
            is_first_attach: true,
            retry_pending: false,
            generation: 0,
            attached: false,
        }
    }
}

impl SessionState {
    /// Start a new refresh, returning its generation
    pub(crate) fn begin_refresh(&mut self, from_retry: bool) -> u64 {
        self.generation += 1;
        self.network_in_flight = true;
        self.retry_pending = from_retry;
        self.generation
    }

    /// Whether a result tagged with `generation` belongs to the live refresh
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.network_in_flight && generation == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = SessionState::default();
        assert!(state.is_first_attach);
        assert!(!state.cache_subscribed);
        assert!(!state.network_in_flight);
        assert_eq!(state.generation, 0);
    }

    #[test]
    fn test_newer_refresh_makes_older_stale() {
        let mut state = SessionState::default();
        let first = state.begin_refresh(false);
        let second = state.begin_refresh(true);

        assert!(!state.is_current(first));
        assert!(state.is_current(second));
        assert!(state.retry_pending);
    }

    #[test]
    fn test_completed_refresh_is_not_current() {
        let mut state = SessionState::default();
        let generation = state.begin_refresh(false);
        state.network_in_flight = false;

        assert!(!state.is_current(generation));
    }
}
