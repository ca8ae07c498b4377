//! Simulated processing time before the endpoint answers.

use std::time::Duration;

use rand_core::{OsRng, RngCore as _};

/// A uniformly distributed delay between `min` and `max`, with millisecond
/// granularity. The default is no delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latency {
  min: Duration,
  max: Duration,
}

impl Latency {
  pub fn none() -> Self { Self::default() }

  /// A delay in `[min, max]`; the bounds are swapped if given backwards.
  pub fn between(min: Duration, max: Duration) -> Self {
    if min <= max {
      Self { min, max }
    } else {
      Self { min: max, max: min }
    }
  }

  pub fn from_millis(min_ms: u64, max_ms: u64) -> Self {
    Self::between(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
  }

  pub fn sample(&self) -> Duration {
    let span = (self.max - self.min).as_millis() as u64;
    if span == 0 {
      return self.min;
    }
    // A span covering all of u64 takes the raw sample.
    let offset = match span.checked_add(1) {
      Some(n) => OsRng.next_u64() % n,
      None => OsRng.next_u64(),
    };
    self.min.saturating_add(Duration::from_millis(offset))
  }

  pub async fn wait(&self) {
    let delay = self.sample();
    if !delay.is_zero() {
      tracing::debug!(?delay, "simulating processing time");
      tokio::time::sleep(delay).await;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn samples_stay_within_bounds() {
    let latency = Latency::from_millis(1000, 3000);
    for _ in 0..200 {
      let d = latency.sample();
      assert!(d >= Duration::from_millis(1000) && d <= Duration::from_millis(3000), "{d:?}");
    }
  }

  #[test]
  fn reversed_bounds_are_swapped() {
    assert_eq!(Latency::from_millis(30, 10), Latency::from_millis(10, 30));
  }

  #[test]
  fn widest_range_does_not_overflow() {
    let latency = Latency::from_millis(0, u64::MAX);
    for _ in 0..50 {
      assert!(latency.sample() <= Duration::from_millis(u64::MAX));
    }
    let latency = Latency::from_millis(1, u64::MAX);
    assert!(latency.sample() >= Duration::from_millis(1));
  }

  #[test]
  fn none_is_zero() {
    assert!(Latency::none().sample().is_zero());
    assert_eq!(Latency::from_millis(5, 5).sample(), Duration::from_millis(5));
  }
}
