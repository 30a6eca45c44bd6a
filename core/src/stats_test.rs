mod tests {
    use crate::stats::{StatsError, Summary, fastest, saturating_u64};
    use std::time::Duration;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn summary_with_median(median: u64) -> Summary {
        Summary {
            iterations: 1,
            min: ms(median),
            max: ms(median),
            median: ms(median),
            mean: ms(median),
        }
    }

    #[test]
    fn test_summary_of_unsorted_samples() {
        let s = Summary::from_durations(&[ms(30), ms(10), ms(50), ms(20), ms(40)]).expect("summary");
        assert_eq!(s.iterations, 5);
        assert_eq!(s.min, ms(10));
        assert_eq!(s.max, ms(50));
        assert_eq!(s.median, ms(30));
        assert_eq!(s.mean, ms(30));
    }

    #[test]
    fn test_even_count_uses_upper_median() {
        let s = Summary::from_durations(&[ms(4), ms(1), ms(3), ms(2)]).expect("summary");
        assert_eq!(s.median, ms(3));
        assert_eq!(s.mean, Duration::from_micros(2_500));
    }

    #[test]
    fn test_single_sample() {
        let s = Summary::from_durations(&[ms(7)]).expect("summary");
        assert_eq!((s.min, s.max, s.median, s.mean), (ms(7), ms(7), ms(7), ms(7)));
    }

    #[test]
    fn test_empty_samples_are_an_error() {
        let err = Summary::from_durations(&[]).unwrap_err();
        assert_eq!(err, StatsError::Empty);
        assert_eq!(err.to_string(), "no samples were collected");
    }

    #[test]
    fn test_fastest_picks_lowest_median_first_on_ties() {
        let summaries = [summary_with_median(20), summary_with_median(10), summary_with_median(10)];
        assert_eq!(fastest(&summaries), Some(1));
        assert_eq!(fastest(&[]), None);
    }

    #[test]
    fn test_relative_delta() {
        let fast = summary_with_median(100);
        let slow = summary_with_median(150);
        assert!((slow.relative_delta(&fast) - 50.0).abs() < 1e-9);
        assert_eq!(fast.relative_delta(&fast), 0.0);
    }

    #[test]
    fn test_relative_delta_with_zero_fastest() {
        let zero = Summary {
            iterations: 1,
            min: Duration::ZERO,
            max: Duration::ZERO,
            median: Duration::ZERO,
            mean: Duration::ZERO,
        };
        assert_eq!(zero.relative_delta(&zero), 0.0);
        let slow = Summary {
            median: Duration::from_nanos(3),
            ..zero
        };
        assert!((slow.relative_delta(&zero) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_saturating_u64_clamps_long_durations() {
        assert_eq!(saturating_u64(5), 5);
        assert_eq!(saturating_u64(u128::from(u64::MAX)), u64::MAX);
        assert_eq!(saturating_u64(Duration::MAX.as_nanos()), u64::MAX);
    }
}
