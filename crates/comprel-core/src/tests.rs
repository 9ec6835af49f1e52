#[cfg(test)]
mod estimator_scenarios {
    use approx::assert_relative_eq;

    use crate::box_filter::BoxFilter;
    use crate::estimator::{completeness, reliability, estimate_all_modes, CompletenessEstimator};
    use crate::types::*;
    use crate::QueryError;

    /// Helper: a catalog row with every observable present.
    fn star(period: f64, power: f64, tmag: f64, snr: f64, status: &str) -> CatalogRow {
        CatalogRow {
            true_period: period,
            power: Some(power),
            magnitude: Some(tmag),
            snr: Some(snr),
            status: Status::from(status),
        }
    }

    /// Helper: five stars, four of them in the 9 +/- 1 day box at ls ~ 0.1.
    fn five_star_catalog() -> Catalog {
        vec![
            star(8.5, 0.10, 10.0, 5.0, "match"),
            star(9.0, 0.11, 10.5, 6.0, "match"),
            star(9.4, 0.09, 11.0, 7.0, "match"),
            star(9.6, 0.12, 11.5, 3.0, "not_recovered"),
            star(15.0, 0.10, 12.0, 9.0, "match"),
        ]
        .into_iter()
        .collect()
    }

    fn rand_like(seed: u64) -> f64 {
        (seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407) >> 33) as f64
            / (1u64 << 31) as f64
    }

    /// Helper: a deterministic pseudo-random catalog of `n` stars.
    fn synthetic_catalog(n: u64) -> Catalog {
        let labels = ["match", "alias", "not_recovered", "half_alias"];
        (0..n)
            .map(|i| CatalogRow {
                true_period: 0.2 + rand_like(i) * 20.0,
                power: if i % 7 == 0 { None } else { Some(rand_like(i + 1000)) },
                magnitude: Some(6.0 + rand_like(i + 2000) * 10.0),
                snr: if i % 11 == 0 { Some(f64::NAN) } else { Some(rand_like(i + 3000) * 30.0) },
                status: Status::from(labels[(i % 4) as usize]),
            })
            .collect()
    }

    #[test]
    fn test_five_star_reliability_by_mode() {
        let catalog = five_star_catalog();
        let query = Query::new(9.0, Mode::Match).with_power(0.1, Window::new(0.05, 0.05));

        assert_eq!(BoxFilter::full(&query).apply(&catalog).len(), 4);

        let r_match = reliability(&catalog, &query).unwrap().unwrap();
        let r_recovery = reliability(&catalog, &query.clone().with_mode(Mode::Recovery))
            .unwrap()
            .unwrap();
        let r_alias = reliability(&catalog, &query.clone().with_mode(Mode::Alias))
            .unwrap()
            .unwrap();

        assert_relative_eq!(r_match, 0.75);
        assert_relative_eq!(r_recovery, 0.75);
        assert_relative_eq!(r_alias, 0.0);
    }

    #[test]
    fn test_invalid_period_rejected() {
        let catalog = five_star_catalog();
        let query = Query::new(0.1, Mode::Match).with_power(0.1, Window::symmetric(0.05));
        assert_eq!(reliability(&catalog, &query), Err(QueryError::InvalidPeriod(0.1)));
        assert_eq!(completeness(&catalog, &query), Err(QueryError::InvalidPeriod(0.1)));
    }

    #[test]
    fn test_no_auxiliary_rejected() {
        let catalog = five_star_catalog();
        let query = Query::new(9.0, Mode::Match);
        assert_eq!(reliability(&catalog, &query), Err(QueryError::NoAuxiliaryParameter));
        assert_eq!(completeness(&catalog, &query), Err(QueryError::NoAuxiliaryParameter));
    }

    #[test]
    fn test_box_size_floor() {
        let two = vec![
            star(9.0, 0.1, 10.0, 5.0, "match"),
            star(9.1, 0.1, 10.0, 5.0, "match"),
        ];
        let mut three = two.clone();
        three.push(star(9.2, 0.1, 10.0, 5.0, "alias"));

        let query = Query::new(9.0, Mode::Match).with_power(0.1, Window::symmetric(0.05));

        let two: Catalog = two.into_iter().collect();
        assert_eq!(reliability(&two, &query).unwrap(), None);
        assert_eq!(completeness(&two, &query).unwrap(), None);

        let three: Catalog = three.into_iter().collect();
        assert_relative_eq!(reliability(&three, &query).unwrap().unwrap(), 2.0 / 3.0);
        assert_relative_eq!(completeness(&three, &query).unwrap().unwrap(), 2.0 / 3.0);
    }

    #[test]
    fn test_wide_auxiliary_window_makes_estimators_agree() {
        let catalog = synthetic_catalog(400);
        for period in [1.0, 4.5, 9.0, 13.0, 18.5] {
            for mode in Mode::ALL {
                let query = Query::new(period, mode).with_magnitude(11.0, Window::symmetric(1e6));
                assert_eq!(
                    reliability(&catalog, &query).unwrap(),
                    completeness(&catalog, &query).unwrap(),
                    "period {period} mode {mode}"
                );
            }
        }
    }

    #[test]
    fn test_results_are_bounded_ratios() {
        let catalog = synthetic_catalog(500);
        for i in 1..40 {
            let period = 0.5 * i as f64;
            if period >= MAX_INPUT_PERIOD {
                break;
            }
            let template = Query::new(period, Mode::Match)
                .with_power(0.5, Window::symmetric(0.3))
                .with_snr(15.0, Window::new(10.0, 5.0));

            for triple in [
                estimate_all_modes(&crate::ReliabilityEstimator, &catalog, &template).unwrap(),
                estimate_all_modes(&CompletenessEstimator, &catalog, &template).unwrap(),
            ] {
                for mode in Mode::ALL {
                    if let Some(v) = triple.get(mode) {
                        assert!(!v.is_nan());
                        assert!((0.0..=1.0).contains(&v), "{v} out of range");
                    }
                }
            }
        }
    }

    #[test]
    fn test_widening_windows_never_shrinks_box() {
        let catalog = synthetic_catalog(300);
        let mut previous = 0;
        for step in 0..20 {
            let w = 0.05 * step as f64;
            let query = Query::new(10.0, Mode::Match)
                .with_period_window(Window::new(w * 4.0, w * 3.0))
                .with_power(0.5, Window::new(w, w / 2.0))
                .with_magnitude(11.0, Window::symmetric(w * 10.0));
            let size = BoxFilter::full(&query).apply(&catalog).len();
            assert!(size >= previous, "box shrank from {previous} to {size} at step {step}");
            previous = size;
        }
        assert!(previous > 0);
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let catalog = synthetic_catalog(200);
        let query = Query::new(7.0, Mode::Recovery)
            .with_power(0.4, Window::symmetric(0.4))
            .with_magnitude(11.0, Window::symmetric(5.0));

        let first = (reliability(&catalog, &query), completeness(&catalog, &query));
        let second = (reliability(&catalog, &query), completeness(&catalog, &query));
        assert_eq!(first, second);
        assert!(first.0.unwrap().is_some());
    }

    #[test]
    fn test_completeness_never_exceeds_recovery_in_period() {
        let catalog = synthetic_catalog(400);
        let query = Query::new(12.0, Mode::Recovery).with_snr(12.0, Window::symmetric(6.0));
        let all_in_period = BoxFilter::period(&query).apply(&catalog);
        let recovered = all_in_period
            .iter()
            .filter(|r| r.status != Status::NotRecovered)
            .count();
        let c = completeness(&catalog, &query).unwrap().unwrap();
        assert!(c <= recovered as f64 / all_in_period.len() as f64);
    }
}
