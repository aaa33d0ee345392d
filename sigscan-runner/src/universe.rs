//! Symbol Universe Provider: retrying, caching front for a `UniverseSource`.
//!
//! Construct one per run. The first successful fetch is kept for the life of
//! the provider; later calls never touch the source again. When every retry
//! fails the caller gets an empty universe, which is not cached.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use sigscan_core::data::{DataError, SymbolUniverse, UniverseSource};

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Single attempt, no sleeping.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

pub struct UniverseProvider {
    source: Box<dyn UniverseSource>,
    retry: RetryPolicy,
    cache: Mutex<Option<SymbolUniverse>>,
}

impl UniverseProvider {
    pub fn new(source: Box<dyn UniverseSource>) -> Self {
        Self {
            source,
            retry: RetryPolicy::default(),
            cache: Mutex::new(None),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn is_cached(&self) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// The universe for this run.
    ///
    /// Concurrent callers wait on the first fetch rather than starting their
    /// own. Never fails: exhausted retries degrade to an empty universe.
    pub fn symbols(&self) -> SymbolUniverse {
        let mut slot = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(universe) = slot.as_ref() {
            debug!(source = self.source.name(), "universe cache hit");
            return universe.clone();
        }

        match self.fetch_with_retry() {
            Ok(universe) => {
                *slot = Some(universe.clone());
                universe
            }
            Err(e) => {
                error!(
                    source = self.source.name(),
                    attempts = self.retry.max_attempts,
                    error = %e,
                    "universe unavailable, scanning nothing"
                );
                SymbolUniverse::empty()
            }
        }
    }

    fn fetch_with_retry(&self) -> Result<SymbolUniverse, DataError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.source.list_symbols() {
                Ok(universe) => {
                    info!(
                        source = self.source.name(),
                        symbols = universe.len(),
                        attempt,
                        "universe loaded"
                    );
                    return Ok(universe);
                }
                Err(e) => {
                    warn!(
                        source = self.source.name(),
                        attempt,
                        error = %e,
                        "universe fetch failed"
                    );
                    last_error = Some(e);
                    if attempt < attempts && !self.retry.delay.is_zero() {
                        std::thread::sleep(self.retry.delay);
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("no fetch attempted".into())))
    }
}
