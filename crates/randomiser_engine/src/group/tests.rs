//! Unit tests for randomisation groups.
//!
//! This module contains tests verifying:
//! - Construction validation
//! - Coverage and minimum usage across M:N regimes
//! - Validator satisfaction and failure modes of both validated paths
//! - Exact attempt counting under retry exhaustion
//! - Uniformity of unconstrained and accepted (rejection-sampled) results

use super::*;
use crate::validator::{AcceptAll, RejectAll};
use randomiser_core::rng::StreamRng;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn group(targets: Vec<TargetId>, replacements: Vec<ReplacementId>) -> RandomisationGroup {
    RandomisationGroup::new(targets, replacements).unwrap()
}

#[test]
fn test_construction_rejects_empty_inputs() {
    assert_eq!(
        RandomisationGroup::new(vec![], vec![1]).unwrap_err(),
        RandomiserError::Configuration(ConfigurationError::EmptyTargets)
    );
    assert_eq!(
        RandomisationGroup::new(vec![1], vec![]).unwrap_err(),
        RandomiserError::Configuration(ConfigurationError::EmptyReplacements)
    );
    assert!(RandomisationGroup::with_validator(vec![], vec![1], AcceptAll).is_err());
}

#[test]
fn test_accessors() {
    let g = RandomisationGroup::with_validator(vec![1, 2], vec![3, 4, 5], AcceptAll).unwrap();
    assert_eq!(g.targets(), &[1, 2]);
    assert_eq!(g.replacements(), &[3, 4, 5]);
    assert!(g.has_validator());
    assert_eq!(g.cardinality(), Cardinality::Fewer);
    assert!(format!("{:?}", g).contains("has_validator: true"));
}

/// Targets=[1,2,3], Replacements=[10,20,30], seed 42 reproduces exactly.
#[test]
fn test_fixed_seed_reproduces_mapping() {
    let g = group(vec![1, 2, 3], vec![10, 20, 30]);

    let first = g.randomise(&mut StreamRng::from_seed(42)).unwrap();
    let second = g.randomise(&mut StreamRng::from_seed(42)).unwrap();
    assert_eq!(first, second);

    let mut used = first.replacements().to_vec();
    used.sort_unstable();
    assert_eq!(used, vec![10, 20, 30]);
    assert_eq!(first.targets(), &[1, 2, 3]);
}

#[test]
fn test_single_slot_groups() {
    let g = group(vec![7], vec![70]);
    let mapping = g.randomise(&mut StreamRng::from_seed(1)).unwrap();
    assert_eq!(mapping.get(7), Some(70));

    let g = group(vec![1, 2, 3], vec![9]);
    let mapping = g.randomise(&mut StreamRng::from_seed(1)).unwrap();
    assert_eq!(mapping.replacements(), &[9, 9, 9]);
}

#[test]
fn test_fewer_targets_draw_distinct_replacements() {
    let g = group(vec![1, 2, 3], (100..110).collect());
    let mut rng = StreamRng::from_seed(3);

    for _ in 0..200 {
        let mapping = g.randomise(&mut rng).unwrap();
        let mut used = mapping.replacements().to_vec();
        used.sort_unstable();
        used.dedup();
        assert_eq!(used.len(), 3);
        assert!(used.iter().all(|r| (100..110).contains(r)));
    }
}

/// Targets=[1..=5], Replacements=[10,20]: both used twice, one a third time.
#[test]
fn test_more_targets_minimum_usage() {
    let g = group(vec![1, 2, 3, 4, 5], vec![10, 20]);
    let mut rng = StreamRng::from_seed(17);
    let mut third_use: HashMap<ReplacementId, usize> = HashMap::new();
    let trials = 20_000;

    for _ in 0..trials {
        let counts = g.randomise(&mut rng).unwrap().usage_counts();
        assert!(counts[&10] >= 2 && counts[&20] >= 2);
        assert_eq!(counts[&10] + counts[&20], 5);

        let extra = if counts[&10] == 3 { 10 } else { 20 };
        *third_use.entry(extra).or_insert(0) += 1;
    }

    for &count in third_use.values() {
        approx::assert_relative_eq!(count as f64, trials as f64 / 2.0, max_relative = 0.05);
    }
}

/// With an accept-all validator every path consumes the stream identically.
#[test]
fn test_validated_paths_match_unconstrained_when_everything_passes() {
    for (targets, pool) in [
        (vec![1, 2, 3], vec![10, 20, 30, 40, 50]),
        (vec![1, 2, 3, 4], vec![10, 20, 30, 40]),
        (vec![1, 2, 3, 4, 5, 6, 7], vec![10, 20, 30]),
    ] {
        let g = RandomisationGroup::with_validator(targets, pool, AcceptAll).unwrap();

        let plain = g.randomise(&mut StreamRng::from_seed(5)).unwrap();
        let validated = g.validated_randomise(&mut StreamRng::from_seed(5)).unwrap();
        let retrying = g
            .retrying_validated_randomise(&mut StreamRng::from_seed(5), 3)
            .unwrap();

        assert_eq!(plain, validated);
        assert_eq!(plain, retrying);
    }
}

#[test]
fn test_validated_paths_require_validator() {
    let g = group(vec![1, 2], vec![3, 4]);
    let mut rng = StreamRng::from_seed(0);

    let expected = RandomiserError::Configuration(ConfigurationError::MissingValidator);
    assert_eq!(g.validated_randomise(&mut rng).unwrap_err(), expected);
    assert_eq!(
        g.retrying_validated_randomise(&mut rng, 10).unwrap_err(),
        expected
    );
}

#[test]
fn test_zero_attempt_budget_is_rejected() {
    let g = RandomisationGroup::with_validator(vec![1], vec![2], AcceptAll).unwrap();
    assert_eq!(
        g.retrying_validated_randomise(&mut StreamRng::from_seed(0), 0)
            .unwrap_err(),
        RandomiserError::Configuration(ConfigurationError::InvalidAttemptBudget(0))
    );
}

/// A reject-all validator fails the single-attempt path on its first pair.
#[test]
fn test_validated_randomise_fails_on_first_violation() {
    let g = RandomisationGroup::with_validator(vec![1, 2, 3], vec![10, 20, 30], RejectAll)
        .unwrap();

    match g.validated_randomise(&mut StreamRng::from_seed(42)) {
        Err(RandomiserError::ConstraintViolation(violation)) => {
            assert_eq!(violation.position, 0);
            assert_eq!(violation.target, 1);
        }
        other => panic!("expected constraint violation, got {:?}", other),
    }
}

/// Always-false validator with a budget of 5 fails after exactly 5 attempts.
#[test]
fn test_retry_exhaustion_counts_attempts_exactly() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let g = RandomisationGroup::with_validator(
        vec![1, 2, 3],
        vec![10, 20, 30],
        move |_: TargetId, _: ReplacementId| {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        },
    )
    .unwrap();

    let err = g
        .retrying_validated_randomise(&mut StreamRng::from_seed(42), 5)
        .unwrap_err();

    assert_eq!(err.attempts(), Some(5));
    assert!(matches!(
        err,
        RandomiserError::RetryBudgetExhausted {
            attempts: 5,
            last_violation: ConstraintViolation { position: 0, .. },
        }
    ));
    // Each attempt stops at its first position
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

#[test]
fn test_retrying_finds_derangement() {
    let ids: Vec<i64> = (1..=8).collect();
    let g = RandomisationGroup::with_validator(ids.clone(), ids, |t: i64, r: i64| t != r)
        .unwrap();
    let mut rng = StreamRng::from_seed(2024);

    for _ in 0..100 {
        let mapping = g
            .retrying_validated_randomise(&mut rng, DEFAULT_MAX_ATTEMPTS)
            .unwrap();
        assert!(mapping.iter().all(|(t, r)| t != r));
        let mut used = mapping.replacements().to_vec();
        used.sort_unstable();
        assert_eq!(used, (1..=8).collect::<Vec<_>>());
    }
}

/// Overflow slots are validated like any other; a call whose remainder
/// cannot satisfy the validator exhausts instead of returning a partial result.
#[test]
fn test_overflow_slots_are_validated() {
    // Odd targets must receive 10
    let g = RandomisationGroup::with_validator(
        vec![1, 2, 3, 4, 5],
        vec![10, 20],
        |t: i64, r: i64| t % 2 == 0 || r == 10,
    )
    .unwrap();

    let mut accepted = 0;
    let mut exhausted = 0;
    for seed in 0..60 {
        match g.retrying_validated_randomise(&mut StreamRng::from_seed(seed), DEFAULT_MAX_ATTEMPTS)
        {
            Ok(mapping) => {
                accepted += 1;
                for (t, r) in mapping.iter() {
                    assert!(t % 2 == 0 || r == 10);
                }
                assert_eq!(mapping.usage_counts()[&10], 3);
            }
            Err(RandomiserError::RetryBudgetExhausted { .. }) => exhausted += 1,
            Err(other) => panic!("unexpected error {:?}", other),
        }
    }
    assert!(accepted > 0);
    assert!(exhausted > 0);
}

#[test]
fn test_pool_untouched_by_randomisation() {
    let g = RandomisationGroup::with_validator(vec![1, 2, 3, 4, 5], vec![10, 20], AcceptAll)
        .unwrap();
    let mut rng = StreamRng::from_seed(8);
    for _ in 0..10 {
        g.randomise(&mut rng).unwrap();
        g.retrying_validated_randomise(&mut rng, 2).unwrap();
    }
    assert_eq!(g.replacements(), &[10, 20]);
    assert_eq!(g.targets(), &[1, 2, 3, 4, 5]);
}

/// Chi-square on the marginals of M = N = 4 over many seeds.
#[test]
fn test_unconstrained_marginals_are_uniform() {
    let pool = vec![10, 20, 30, 40];
    let g = group(vec![1, 2, 3, 4], pool.clone());
    let trials = 8_000;
    let mut counts = [[0usize; 4]; 4];

    for seed in 0..trials {
        let mapping = g.randomise(&mut StreamRng::from_seed(seed)).unwrap();
        for (i, &r) in mapping.replacements().iter().enumerate() {
            let j = pool.iter().position(|&p| p == r).unwrap();
            counts[i][j] += 1;
        }
    }

    let expected = trials as f64 / 4.0;
    for row in counts {
        let chi_square: f64 = row
            .iter()
            .map(|&observed| (observed as f64 - expected).powi(2) / expected)
            .sum();
        // 3 degrees of freedom; 0.9999 quantile is about 21.1
        assert!(chi_square < 21.1, "chi-square {} too large", chi_square);
    }
}

/// Retrying must not bias accepted results: forbidding 1 -> 10 leaves four
/// bijections of {1,2,3} onto {10,20,30}, each accepted equally often.
#[test]
fn test_rejection_sampling_is_unbiased() {
    let g = RandomisationGroup::with_validator(
        vec![1, 2, 3],
        vec![10, 20, 30],
        |t: i64, r: i64| !(t == 1 && r == 10),
    )
    .unwrap();
    let mut rng = StreamRng::from_seed(99);
    let trials = 24_000;
    let mut counts: HashMap<Vec<ReplacementId>, usize> = HashMap::new();

    for _ in 0..trials {
        let mapping = g
            .retrying_validated_randomise(&mut rng, DEFAULT_MAX_ATTEMPTS)
            .unwrap();
        *counts.entry(mapping.replacements().to_vec()).or_insert(0) += 1;
    }

    assert_eq!(counts.len(), 4);
    for &count in counts.values() {
        approx::assert_relative_eq!(count as f64, trials as f64 / 4.0, max_relative = 0.05);
    }
}
