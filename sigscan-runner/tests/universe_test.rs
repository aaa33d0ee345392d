//! Universe provider caching and retry behaviour.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sigscan_core::data::{DataError, SymbolUniverse, UniverseSource};
use sigscan_runner::{RetryPolicy, UniverseProvider};

/// Fails the first `failures` calls, then lists `symbols`.
struct FlakySource {
    failures: usize,
    calls: Arc<AtomicUsize>,
    symbols: Vec<&'static str>,
}

impl FlakySource {
    fn new(failures: usize, symbols: Vec<&'static str>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Self {
            failures,
            calls: calls.clone(),
            symbols,
        };
        (source, calls)
    }
}

impl UniverseSource for FlakySource {
    fn name(&self) -> &str {
        "flaky"
    }

    fn list_symbols(&self) -> Result<SymbolUniverse, DataError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            return Err(DataError::NetworkUnreachable("listing offline".into()));
        }
        Ok(SymbolUniverse::new(&self.symbols))
    }
}

fn fast_retry(attempts: u32) -> RetryPolicy {
    RetryPolicy::new(attempts, Duration::from_millis(1))
}

#[test]
fn repeated_calls_do_not_refetch() {
    let (source, calls) = FlakySource::new(0, vec!["AAPL", "MSFT"]);
    let provider = UniverseProvider::new(Box::new(source)).with_retry(fast_retry(3));

    let first = provider.symbols();
    let second = provider.symbols();
    assert_eq!(first, second);
    assert_eq!(first.as_slice(), &["AAPL", "MSFT"]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn transient_failures_are_retried() {
    let (source, calls) = FlakySource::new(2, vec!["XOM"]);
    let provider = UniverseProvider::new(Box::new(source)).with_retry(fast_retry(3));

    assert_eq!(provider.symbols().as_slice(), &["XOM"]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(provider.is_cached());
}

#[test]
fn exhausted_retries_give_empty_universe_uncached() {
    let (source, calls) = FlakySource::new(usize::MAX, vec!["XOM"]);
    let provider = UniverseProvider::new(Box::new(source)).with_retry(fast_retry(3));

    assert!(provider.symbols().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(!provider.is_cached());

    // a later call tries again
    assert!(provider.symbols().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 6);
}

#[test]
fn zero_attempts_still_tries_once() {
    let (source, calls) = FlakySource::new(0, vec!["A"]);
    let provider =
        UniverseProvider::new(Box::new(source)).with_retry(RetryPolicy::new(0, Duration::ZERO));
    assert_eq!(provider.symbols().len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_callers_share_one_fetch() {
    let (source, calls) = FlakySource::new(0, vec!["A", "B", "C"]);
    let provider = UniverseProvider::new(Box::new(source)).with_retry(RetryPolicy::none());

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| assert_eq!(provider.symbols().len(), 3));
        }
    });
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
