use nc_domain::config::reliability::BackoffStrategy;

/// Delay before the attempt at index `attempt` (0 = the first retry,
/// not the initial call). `multiplier_fp` is a fixed-point multiplier
/// scaled by 1000 (2000 == 2.0x) and only affects the exponential
/// strategy; constant and linear ignore it.
///
/// `nc-orchestrator`'s step retry policy drives the identical formula —
/// this is the one place the math lives.
pub fn delay_for_attempt(
    strategy: BackoffStrategy,
    base_delay_ms: u64,
    max_delay_ms: u64,
    multiplier_fp: u64,
    attempt: u32,
) -> u64 {
    let capped_attempt = attempt.min(63);
    let raw: u128 = match strategy {
        BackoffStrategy::Constant => base_delay_ms as u128,
        BackoffStrategy::Linear => {
            (base_delay_ms as u128).saturating_mul(capped_attempt as u128 + 1)
        }
        BackoffStrategy::Exponential => {
            let mut acc = base_delay_ms as u128;
            for _ in 0..capped_attempt {
                acc = acc.saturating_mul(multiplier_fp as u128) / 1000;
            }
            acc
        }
    };
    raw.min(max_delay_ms as u128) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_ignores_attempt() {
        assert_eq!(delay_for_attempt(BackoffStrategy::Constant, 100, 30_000, 2000, 0), 100);
        assert_eq!(delay_for_attempt(BackoffStrategy::Constant, 100, 30_000, 2000, 5), 100);
    }

    #[test]
    fn linear_grows_by_attempt_plus_one() {
        assert_eq!(delay_for_attempt(BackoffStrategy::Linear, 100, 30_000, 2000, 0), 100);
        assert_eq!(delay_for_attempt(BackoffStrategy::Linear, 100, 30_000, 2000, 2), 300);
    }

    #[test]
    fn exponential_doubles_with_default_multiplier() {
        assert_eq!(delay_for_attempt(BackoffStrategy::Exponential, 100, 30_000, 2000, 0), 100);
        assert_eq!(delay_for_attempt(BackoffStrategy::Exponential, 100, 30_000, 2000, 1), 200);
        assert_eq!(delay_for_attempt(BackoffStrategy::Exponential, 100, 30_000, 2000, 3), 800);
    }

    #[test]
    fn exponential_is_capped_at_max_delay() {
        let delay = delay_for_attempt(BackoffStrategy::Exponential, 100, 1_000, 2000, 20);
        assert_eq!(delay, 1_000);
    }

    #[test]
    fn large_attempt_index_does_not_overflow() {
        let delay = delay_for_attempt(BackoffStrategy::Exponential, 100, 30_000, 2000, u32::MAX);
        assert_eq!(delay, 30_000);
    }

    #[test]
    fn monotonically_non_decreasing_until_capped() {
        let mut prev = 0u64;
        for attempt in 0..10 {
            let delay = delay_for_attempt(BackoffStrategy::Exponential, 50, 30_000, 2000, attempt);
            assert!(delay >= prev);
            prev = delay;
        }
    }
}
