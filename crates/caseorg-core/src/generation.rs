//! Request generations.
//!
//! Each state-changing async call carries a token; on completion its result
//! is applied only if the token is still the current generation. Nothing is
//! cancelled, superseded responses are just ignored.

/// Token issued when a request starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: u64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation; every earlier token becomes stale
    pub fn next(&mut self) -> RequestToken {
        self.current += 1;
        RequestToken(self.current)
    }

    /// Make every outstanding token stale without issuing a new one
    pub fn invalidate(&mut self) {
        self.current += 1;
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.current
    }
}

/// Whether a completed request changed any state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Discarded,
}

impl Applied {
    pub fn was_applied(&self) -> bool {
        matches!(self, Applied::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_token_is_current() {
        let mut generation = GenerationCounter::new();
        let first = generation.next();
        assert!(generation.is_current(first));

        let second = generation.next();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert!(second.value() > first.value());
    }

    #[test]
    fn test_invalidate_stales_everything() {
        let mut generation = GenerationCounter::new();
        let token = generation.next();
        generation.invalidate();
        assert!(!generation.is_current(token));
    }
}
