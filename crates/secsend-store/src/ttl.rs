//! TTL bookkeeping: `timeout_s` (requested lifetime) to `timeout_ts`
//! (absolute UTC expiry), and the expiry check.

use std::time::{SystemTime, UNIX_EPOCH};

fn now_unix() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_secs_f64()
}

/// Absolute expiry timestamp for a TTL requested at this instant.
/// `timeout_s == 0` means "never expires", represented as `0.0`.
pub fn timeout_ts(timeout_s: u64) -> f64 {
    if timeout_s == 0 {
        0.0
    } else {
        now_unix() + timeout_s as f64
    }
}

/// Whether an absolute expiry timestamp has passed
pub fn ts_has_expired(timeout_ts: f64) -> bool {
    now_unix() >= timeout_ts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_s_never_expires() {
        assert_eq!(timeout_ts(0), 0.0);
    }

    #[test]
    fn future_timestamp_has_not_expired() {
        let ts = timeout_ts(3600);
        assert!(!ts_has_expired(ts));
    }

    #[test]
    fn past_timestamp_has_expired() {
        assert!(ts_has_expired(now_unix() - 1.0));
    }
}
