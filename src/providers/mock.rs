/*!
 * Mock providers for testing.
 *
 * The mock translator turns its input uppercase so tests can tell a
 * "translated" unit from a passed-through one without any network, and it
 * counts calls so skip rules and cache hits are observable.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::providers::{MarkerStyle, ProviderResult, Refiner, TranslateRequest, Translator};

/// Behavior of the mock translator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Return the input uppercased, as a visible translation stand-in
    Uppercase,
    /// Fail every call, echoing the input
    Failing,
    /// Fail the first N calls, then uppercase
    FlakyThenUppercase(usize),
}

/// Scriptable translator for tests
#[derive(Debug)]
pub struct MockTranslator {
    behavior: MockBehavior,
    marker: MarkerStyle,
    calls: Arc<AtomicUsize>,
}

impl MockTranslator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            marker: MarkerStyle::KeepTag,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn uppercase() -> Self {
        Self::new(MockBehavior::Uppercase)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn flaky(fail_first: usize) -> Self {
        Self::new(MockBehavior::FlakyThenUppercase(fail_first))
    }

    pub fn with_marker(mut self, marker: MarkerStyle) -> Self {
        self.marker = marker;
        self
    }

    /// Number of translate calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared call counter, usable after the translator moved into the
    /// pipeline.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, request: TranslateRequest) -> ProviderResult {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            MockBehavior::Uppercase => ProviderResult::ok(request.text.to_uppercase()),
            MockBehavior::Failing => ProviderResult::fallback(request.text),
            MockBehavior::FlakyThenUppercase(fail_first) => {
                if call < fail_first {
                    ProviderResult::fallback(request.text)
                } else {
                    ProviderResult::ok(request.text.to_uppercase())
                }
            }
        }
    }

    fn marker_style(&self) -> MarkerStyle {
        self.marker
    }
}

/// Scriptable refiner appending a fixed suffix, with call counting
#[derive(Debug)]
pub struct MockRefiner {
    suffix: String,
    calls: Arc<AtomicUsize>,
}

impl MockRefiner {
    pub fn appending(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Refiner for MockRefiner {
    async fn refine(&self, _key_hint: &str, text: &str) -> ProviderResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ProviderResult::ok(format!("{}{}", text, self.suffix))
    }
}
