/*!
 * Tests for the retry policy and delay seam
 */

use std::time::{Duration, Instant};

use autoloc::translation::retry::{Delay, NoDelay, RetryPolicy};

#[test]
fn test_retryPolicy_delays_shouldDoublePerRetry() {
    let policy = RetryPolicy::new(5, 1000);
    let delays: Vec<Duration> = policy.delays().collect();
    assert_eq!(
        delays,
        vec![
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            Duration::from_millis(4000),
            Duration::from_millis(8000),
        ]
    );
}

#[test]
fn test_retryPolicy_delays_withSingleAttempt_shouldBeEmpty() {
    let policy = RetryPolicy::new(1, 1000);
    assert_eq!(policy.delays().count(), 0);
}

#[test]
fn test_retryPolicy_new_withZeroAttempts_shouldClampToOne() {
    let policy = RetryPolicy::new(0, 1000);
    assert_eq!(policy.max_attempts(), 1);
}

#[test]
fn test_retryPolicy_delayFor_withOversizedOrdinal_shouldNotOverflow() {
    let policy = RetryPolicy::new(100, u64::MAX / 2);
    // Saturates instead of panicking
    let _ = policy.delay_for(90);
}

#[test]
fn test_retryPolicy_default_shouldMatchProviderDefaults() {
    assert_eq!(RetryPolicy::default(), RetryPolicy::new(5, 1000));
}

#[tokio::test]
async fn test_noDelay_sleep_shouldReturnImmediately() {
    let start = Instant::now();
    NoDelay.sleep(Duration::from_secs(60)).await;
    assert!(start.elapsed() < Duration::from_secs(1));
}
