mod tests {
    use crate::fixture::Fixture;
    use crate::perf::scenarios::prepare_loop_scenarios;
    use crate::runtime::BenchTarget;
    use crate::sampler::{Progress, Sampler, SamplerConfig};
    use std::sync::Arc;
    use std::time::Duration;

    struct CountingTarget {
        runs: usize,
        fail_on: Option<usize>,
        sleep: Duration,
    }

    impl CountingTarget {
        fn new() -> Self {
            Self {
                runs: 0,
                fail_on: None,
                sleep: Duration::ZERO,
            }
        }
    }

    impl BenchTarget for CountingTarget {
        fn label(&self) -> &str {
            "counting"
        }

        fn run_once(&mut self) -> anyhow::Result<()> {
            self.runs += 1;
            if Some(self.runs) == self.fail_on {
                anyhow::bail!("boom");
            }
            if !self.sleep.is_zero() {
                std::thread::sleep(self.sleep);
            }
            Ok(())
        }
    }

    fn config(duration: Duration, min_samples: usize, max_samples: Option<usize>) -> SamplerConfig {
        SamplerConfig {
            duration,
            min_samples,
            max_samples,
        }
    }

    #[test]
    fn test_max_samples_caps_the_run() {
        let sampler = Sampler::new(config(Duration::from_secs(60), 1, Some(5)));
        let mut target = CountingTarget::new();
        let mut reported = 0;
        let samples = sampler
            .measure(&mut target, &mut |p| {
                if let Progress::Sample { count, .. } = p {
                    reported = count;
                }
            })
            .expect("measure");
        assert_eq!(samples.len(), 5);
        assert_eq!(target.runs, 5);
        assert_eq!(reported, 5);
    }

    #[test]
    fn test_min_samples_outlast_zero_duration() {
        let sampler = Sampler::new(config(Duration::ZERO, 3, None));
        let mut target = CountingTarget::new();
        let samples = sampler.measure(&mut target, &mut |_| {}).expect("measure");
        assert_eq!(samples.len(), 3);
        let summary = samples.summarize().expect("summary");
        assert_eq!(summary.iterations, 3);
    }

    #[test]
    fn test_duration_bounds_sampling_and_ticks() {
        let sampler = Sampler::new(config(Duration::from_millis(1_100), 1, None));
        let mut target = CountingTarget::new();
        target.sleep = Duration::from_millis(20);
        let mut ticks = Vec::new();
        let samples = sampler
            .measure(&mut target, &mut |p| {
                if let Progress::Tick { elapsed_secs } = p {
                    ticks.push(elapsed_secs);
                }
            })
            .expect("measure");
        assert!(samples.len() >= 2, "only {} samples", samples.len());
        assert!(samples.wall() >= Duration::from_millis(1_100));
        assert_eq!(ticks, vec![1]);
        assert!(samples.durations().iter().all(|d| *d >= Duration::from_millis(20)));
    }

    #[test]
    fn test_failed_sample_aborts_with_context() {
        let sampler = Sampler::new(config(Duration::from_secs(60), 1, Some(10)));
        let mut target = CountingTarget::new();
        target.fail_on = Some(3);
        let err = sampler.measure(&mut target, &mut |_| {}).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("benchmark 'counting' failed on sample 3"), "{msg}");
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut target = CountingTarget::new();
        let zero_min = Sampler::new(config(Duration::ZERO, 0, None));
        assert!(zero_min.measure(&mut target, &mut |_| {}).is_err());
        let inverted = Sampler::new(config(Duration::ZERO, 4, Some(2)));
        let err = inverted.measure(&mut target, &mut |_| {}).unwrap_err();
        assert!(err.to_string().contains("must not be lower than"));
        assert_eq!(target.runs, 0);
    }

    #[test]
    fn test_loop_scenarios_sample_over_shared_fixture() {
        let fixture = Arc::new(Fixture::random(1_000, 5));
        let scenarios = prepare_loop_scenarios(Arc::clone(&fixture));
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].key(), "for_index");
        assert_eq!(scenarios[1].key(), "for_of");
        assert_eq!(scenarios[0].bench_case_name(), "for_index_1000");

        let sampler = Sampler::new(config(Duration::ZERO, 4, Some(4)));
        for mut scenario in scenarios {
            assert_eq!(scenario.run_checked().expect("traversal"), 1_000);
            let samples = sampler.measure(&mut scenario, &mut |_| {}).expect("measure");
            assert_eq!(samples.len(), 4);
        }
        assert_eq!(fixture.len(), 1_000);
    }
}
