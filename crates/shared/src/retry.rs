use std::{fmt::Display, future::Future, time::Duration};

/// Bounded retry with exponential backoff.
///
/// After failed attempt `n` (1-based) the policy sleeps `backoff ^ n` seconds,
/// unless that attempt was the last one. With the defaults (3 attempts, 1.5)
/// the schedule is 1.5s, 2.25s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
  max_attempts: u32,
  backoff: f64,
}

impl RetryPolicy {
  #[must_use]
  pub fn new(max_attempts: u32, backoff: f64) -> Self {
    let backoff = if backoff.is_finite() && backoff >= 0.0 {
      backoff
    } else {
      0.0
    };
    Self {
      max_attempts: max_attempts.max(1),
      backoff,
    }
  }

  /// Delay slept after the given failed attempt.
  #[must_use]
  pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    Duration::try_from_secs_f64(self.backoff.powi(exponent)).unwrap_or(Duration::MAX)
  }

  /// Run `operation` until it succeeds or attempts run out, returning the last error.
  pub async fn run<T, E, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, E>
  where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
  {
    let mut attempt = 1;
    loop {
      match operation().await {
        Ok(value) => return Ok(value),
        Err(err) => {
          tracing::warn!(
            operation = label,
            attempt,
            max_attempts = self.max_attempts,
            "call failed: {err}"
          );
          if attempt >= self.max_attempts {
            return Err(err);
          }
          tokio::time::sleep(self.delay_for_attempt(attempt)).await;
          attempt += 1;
        }
      }
    }
  }
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self::new(3, 1.5)
  }
}
