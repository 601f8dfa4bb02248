/// Current UTC timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER so ids
/// survive the web and mobile storefront clients unquoted):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: wrapping sequence, randomly seeded per process
///
/// The sequence keeps ids generated in the same millisecond distinct (up
/// to 4096 per ms), so a batch of rows created together never collides on
/// its keys. Ids are roughly time-ordered, which keeps order listings
/// sorted by record key close to creation order.
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    use std::sync::OnceLock;
    use std::sync::atomic::{AtomicU16, Ordering};

    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;

    static SEQUENCE: OnceLock<AtomicU16> = OnceLock::new();
    let sequence =
        SEQUENCE.get_or_init(|| AtomicU16::new(rand::thread_rng().gen_range(0..0x1000)));

    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let seq = (sequence.fetch_add(1, Ordering::Relaxed) & 0x0FFF) as i64; // 12 bits
    (ts << 12) | seq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_fits_in_53_bits() {
        for _ in 0..1000 {
            let id = snowflake_id();
            assert!(id > 0);
            assert!(id < (1_i64 << 53));
        }
    }

    #[test]
    fn snowflake_is_time_ordered_across_millis() {
        let a = snowflake_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = snowflake_id();
        assert!(b > a);
    }

    #[test]
    fn snowflake_is_unique_within_a_batch() {
        let ids: std::collections::HashSet<i64> = (0..1000).map(|_| snowflake_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn now_millis_is_recent() {
        // 2024-01-01 UTC
        assert!(now_millis() > 1_704_067_200_000);
    }
}
