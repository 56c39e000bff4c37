//! Property tests for literal and probability-table invariants.

use belnet_core::{for_event, Assignments, BeliefNetwork, EventId, Term};
use proptest::prelude::*;

proptest! {
    #[test]
    fn negation_is_involutive(raw in 0u32..1_000_000, asserted in any::<bool>()) {
        let term = Term { event: EventId(raw), asserted };
        prop_assert_eq!(!!term, term);
        prop_assert_eq!((!term).event, term.event);
        prop_assert_ne!((!term).asserted, term.asserted);
    }

    #[test]
    fn marginal_and_complement_sum_to_one(p in 0.0f64..=1.0) {
        let mut net = BeliefNetwork::default();
        let e = net.add_event("e");
        net.commit([for_event(e).assign(p).unwrap()]).unwrap();

        let total = net.marginal_probability(e).unwrap() + net.marginal_probability(!e).unwrap();
        prop_assert!((total - 1.0).abs() <= 1e-12);
    }

    #[test]
    fn percentages_normalize_to_the_same_fraction(p in 0.011f64..1.0) {
        let mut net = BeliefNetwork::default();
        let raw = net.add_event("raw");
        let percent = net.add_event("percent");
        net.commit([
            for_event(raw).assign(p).unwrap(),
            for_event(percent).assign(p * 100.0).unwrap(),
        ]).unwrap();

        let diff = net.marginal_probability(raw).unwrap()
            - net.marginal_probability(percent).unwrap();
        prop_assert!(diff.abs() <= 1e-12);
    }

    #[test]
    fn independent_joint_sums_to_one(
        pa in 0.0f64..=1.0,
        pb in 0.0f64..=1.0,
        pc in 0.0f64..=1.0,
    ) {
        let mut net = BeliefNetwork::default();
        let a = net.add_event("a");
        let b = net.add_event("b");
        let c = net.add_event("c");
        net.commit([
            for_event(a).assign(pa).unwrap(),
            for_event(b).assign(pb).unwrap(),
            for_event(c).assign(pc).unwrap(),
        ]).unwrap();

        let all: Vec<_> = net.event_ids().collect();
        let mut total = 0.0;
        for terms in Assignments::new(&[], &all) {
            total += net.joint_probability(&terms).unwrap();
        }
        prop_assert!((total - 1.0).abs() <= 1e-9);
    }

    #[test]
    fn conditional_posterior_stays_in_unit_interval(
        prior in 0.001f64..0.999,
        on_true in 0.0f64..=1.0,
        on_false in 0.0f64..=1.0,
    ) {
        // Degenerate evidence can make the denominator zero; keep the
        // observation achievable.
        prop_assume!(on_true > 1e-6 || on_false > 1e-6);

        let mut net = BeliefNetwork::default();
        let cause = net.add_event("cause");
        let effect = net.add_event("effect");
        net.commit([
            for_event(cause).assign(prior).unwrap(),
            for_event(effect)
                .given([cause]).assign(on_true).unwrap()
                .given([!cause]).unwrap().assign(on_false).unwrap()
                .build(),
        ]).unwrap();

        let evidence = net.marginal_probability(effect).unwrap();
        prop_assume!(evidence > 1e-9);

        let posterior = net.conditional_probability(&[cause], &[effect]).unwrap();
        prop_assert!((0.0..=1.0 + 1e-12).contains(&posterior));
    }

    #[test]
    fn assignment_enumeration_is_deterministic(free_count in 0usize..6) {
        let free: Vec<EventId> = (0..free_count as u32).map(EventId).collect();

        let first: Vec<Vec<Term>> = Assignments::new(&[], &free).collect();
        let second: Vec<Vec<Term>> = Assignments::new(&[], &free).collect();

        prop_assert_eq!(first.len(), 1 << free_count);
        prop_assert_eq!(first, second);
    }
}
