//! Per-call resolution options.

use std::time::Duration;

/// Overall time budget of one resolve call unless the caller sets one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Immutable options for a single resolve call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Bound on the whole call; outstanding store queries are dropped on expiry
    pub timeout: Duration,
    /// Attach a `ResolveTrace` to the result
    pub trace: bool,
}

impl ResolveOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    pub fn traced(mut self) -> Self {
        self.trace = true;
        self
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            trace: false,
        }
    }
}
