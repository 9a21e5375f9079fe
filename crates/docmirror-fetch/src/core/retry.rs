use std::time::Duration;

/// Delay to sleep after failed attempt `attempt` (0-indexed).
///
/// The delay formula is `base * 2^attempt`, clamped to `cap` when one is given.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use docmirror_fetch::backoff_delay;
///
/// let base = Duration::from_secs(1);
/// assert_eq!(backoff_delay(0, base, None), Duration::from_secs(1));
/// assert_eq!(backoff_delay(2, base, None), Duration::from_secs(4));
/// assert_eq!(backoff_delay(5, base, Some(Duration::from_secs(10))), Duration::from_secs(10));
/// ```
pub fn backoff_delay(attempt: u32, base: Duration, cap: Option<Duration>) -> Duration {
    let multiplier = 2_u32.saturating_pow(attempt);
    let delay = base.saturating_mul(multiplier);

    match cap {
        Some(cap) => delay.min(cap),
        None => delay,
    }
}
