//! Unix timestamp helper.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix time in seconds. Falls back to 0 if the system clock
/// is before the epoch rather than panicking.
pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_unix_is_recent() {
        // 2024-01-01 as a sanity lower bound
        assert!(now_unix() > 1_704_067_200);
    }
}
