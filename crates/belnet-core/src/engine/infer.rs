//! Exact inference over a belief network.
//!
//! Joint probabilities of fully specified assignments are products of table
//! lookups; conditional and marginal queries are answered by Bayes' rule,
//! summing joint probabilities over every truth assignment of the unbound
//! ("nuisance") variables.
//!
//! Enumeration is exponential: a query with `n` unbound variables costs
//! `O(2^n)` joint-probability evaluations, each linear in the number of terms.
//! The engine is exact and simple, not scalable — there is no pruning or
//! variable elimination. Assignments are visited in ascending counter order,
//! so floating-point summation is deterministic across runs.
//!
//! The engine holds no state of its own: every query reads the network
//! through `&self` and leaves it untouched.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::engine::errors::ModelError;
use crate::engine::network::{
    row_index, BeliefNetwork, EventId, ProbabilityData, Term, INLINE_PARENTS,
};

/// Enumerates every truth assignment of a set of free events.
///
/// Yields one term list per assignment: the fixed `prefix` followed by one
/// literal per free event. For assignment index `i`, the `j`-th free event is
/// asserted true iff bit `j` of `i` is set, and indices are visited in
/// ascending order — the sequence is finite, restartable (it is `Clone` and
/// cheap to rebuild), and independent of any shared state.
#[derive(Debug, Clone)]
pub struct Assignments {
    prefix: Vec<Term>,
    free: Vec<EventId>,
    next: usize,
    end: usize,
}

impl Assignments {
    /// Builds the assignment sequence for `free` events appended to `prefix`.
    pub fn new(prefix: &[Term], free: &[EventId]) -> Self {
        Assignments {
            prefix: prefix.to_vec(),
            free: free.to_vec(),
            next: 0,
            end: 1usize << free.len(),
        }
    }
}

impl Iterator for Assignments {
    type Item = Vec<Term>;

    fn next(&mut self) -> Option<Vec<Term>> {
        if self.next == self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let mut terms = Vec::with_capacity(self.prefix.len() + self.free.len());
        terms.extend_from_slice(&self.prefix);
        for (bit, &event) in self.free.iter().enumerate() {
            terms.push(Term {
                event,
                asserted: (index >> bit) & 1 == 1,
            });
        }
        Some(terms)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Assignments {}

impl BeliefNetwork {
    /// P(all `terms` hold), assuming every parent of every involved event is
    /// itself present among `terms`.
    ///
    /// Each term contributes the stored probability at the table row selected
    /// by its parents' polarities, re-derived from the term list: a negated
    /// occurrence of a parent forces it false, a positive occurrence forces
    /// it true, and a parent present in neither polarity is a fail-fast
    /// [`ModelError::UnresolvedDependency`]. A negated term contributes the
    /// complement `1 - p`.
    pub fn joint_probability(&self, terms: &[Term]) -> Result<f64, ModelError> {
        // Polarity per mentioned event; a negated occurrence wins over a
        // positive one, matching how conflicting term lists resolve.
        let mut polarity: FxHashMap<EventId, bool> = FxHashMap::default();
        for term in terms {
            polarity
                .entry(term.event)
                .and_modify(|asserted| *asserted = *asserted && term.asserted)
                .or_insert(term.asserted);
        }

        let mut probability = 1.0;
        for &term in terms {
            probability *= self.term_probability(term, &polarity)?;
        }
        Ok(probability)
    }

    /// P(targets | observations) by Bayes' rule.
    ///
    /// A single target whose declared parent list exactly matches the
    /// observations (same events, same order, all asserted) is answered by a
    /// direct table lookup. Every other query marginalizes: the numerator
    /// sums the joint probability of targets, observations and each
    /// assignment of the nuisance variables; the denominator repeats the sum
    /// with the targets freed as well.
    pub fn conditional_probability(
        &self,
        targets: &[Term],
        observations: &[Term],
    ) -> Result<f64, ModelError> {
        if targets.is_empty() {
            return Err(ModelError::InvalidArgument(
                "query needs at least one target event".into(),
            ));
        }

        if let [target] = targets {
            if self.exact_match(*target, observations) {
                return self.lookup_probability(*target, observations);
            }
        }

        let mentioned: FxHashSet<EventId> = targets
            .iter()
            .chain(observations)
            .map(|t| t.event)
            .collect();
        let nuisance: Vec<EventId> = self
            .event_ids()
            .filter(|id| !mentioned.contains(id))
            .collect();

        let mut bound = Vec::with_capacity(targets.len() + observations.len());
        bound.extend_from_slice(targets);
        bound.extend_from_slice(observations);

        let mut numerator = 0.0;
        for terms in Assignments::new(&bound, &nuisance) {
            numerator += self.joint_probability(&terms)?;
        }

        // Same sum with the targets unbound as well.
        let mut free = nuisance;
        free.extend(targets.iter().map(|t| t.event));
        let mut denominator = 0.0;
        for terms in Assignments::new(observations, &free) {
            denominator += self.joint_probability(&terms)?;
        }

        Ok(numerator / denominator)
    }

    /// P(term): shorthand for a single-target query with no observations.
    pub fn marginal_probability(&self, term: impl Into<Term>) -> Result<f64, ModelError> {
        self.conditional_probability(&[term.into()], &[])
    }

    /// Whether `observations` is exactly the declared parent list of
    /// `target`'s event: same events, same order, all asserted. Unconditional
    /// events match exactly the empty observation list.
    fn exact_match(&self, target: Term, observations: &[Term]) -> bool {
        let Some(event) = self.event(target.event) else {
            return false;
        };
        let parents = event.data.parents();
        parents.len() == observations.len()
            && parents
                .iter()
                .zip(observations)
                .all(|(&parent, obs)| obs.asserted && obs.event == parent)
    }

    /// Direct table lookup for a term whose parent polarities are fully
    /// specified by `observations` (positionally, per the declared order).
    fn lookup_probability(&self, term: Term, observations: &[Term]) -> Result<f64, ModelError> {
        let event = self
            .event(term.event)
            .ok_or_else(|| ModelError::UnknownEvent(format!("event #{}", term.event.0)))?;

        let stored = match &event.data {
            ProbabilityData::Unset => return Err(self.missing_probability(term, observations)),
            ProbabilityData::Marginal(p) => *p,
            ProbabilityData::Conditional { rows, .. } => {
                let polarities: SmallVec<[bool; INLINE_PARENTS]> =
                    observations.iter().map(|o| o.asserted).collect();
                rows[row_index(&polarities)]
                    .ok_or_else(|| self.missing_probability(term, observations))?
            }
        };
        Ok(oriented(stored, term))
    }

    /// Probability contributed by one term of a joint query, with parent
    /// polarities taken from the query-wide `polarity` map.
    fn term_probability(
        &self,
        term: Term,
        polarity: &FxHashMap<EventId, bool>,
    ) -> Result<f64, ModelError> {
        let event = self
            .event(term.event)
            .ok_or_else(|| ModelError::UnknownEvent(format!("event #{}", term.event.0)))?;

        let stored = match &event.data {
            ProbabilityData::Unset => return Err(self.missing_probability(term, &[])),
            ProbabilityData::Marginal(p) => *p,
            ProbabilityData::Conditional { parents, rows } => {
                let mut conditions: SmallVec<[Term; INLINE_PARENTS]> = SmallVec::new();
                for &parent in parents.iter() {
                    let Some(&asserted) = polarity.get(&parent) else {
                        return Err(ModelError::UnresolvedDependency(format!(
                            "P({}) depends on {}, which appears in neither polarity \
                             among the query terms",
                            self.term_name(term),
                            self.term_name(Term::positive(parent)),
                        )));
                    };
                    conditions.push(Term { event: parent, asserted });
                }
                let polarities: SmallVec<[bool; INLINE_PARENTS]> =
                    conditions.iter().map(|c| c.asserted).collect();
                rows[row_index(&polarities)]
                    .ok_or_else(|| self.missing_probability(term, &conditions))?
            }
        };
        Ok(oriented(stored, term))
    }

    /// Missing-data error naming the event and the dependency polarities,
    /// e.g. `no probability assigned for P(grass_wet | rain, ~sprinkler)`.
    fn missing_probability(&self, term: Term, conditions: &[Term]) -> ModelError {
        let target = self.term_name(term);
        if conditions.is_empty() {
            ModelError::MissingProbability(format!("P({})", target))
        } else {
            let conds: Vec<String> = conditions.iter().map(|&c| self.term_name(c)).collect();
            ModelError::MissingProbability(format!("P({} | {})", target, conds.join(", ")))
        }
    }
}

/// Complements the stored value when the term itself was requested negated.
fn oriented(p: f64, term: Term) -> f64 {
    if term.asserted {
        p
    } else {
        1.0 - p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::builder::for_event;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {:.12}, got {:.12}",
            expected,
            actual
        );
    }

    /// a -> b with P(a)=0.3, P(b|a)=0.8, P(b|~a)=0.4.
    fn two_event_net() -> (BeliefNetwork, Term, Term) {
        let mut net = BeliefNetwork::default();
        let a = net.add_event("a");
        let b = net.add_event("b");
        net.commit([
            for_event(a).assign(0.3).unwrap(),
            for_event(b)
                .given([a])
                .assign(0.8)
                .unwrap()
                .given([!a])
                .unwrap()
                .assign(0.4)
                .unwrap()
                .build(),
        ])
        .unwrap();
        (net, a, b)
    }

    #[test]
    fn assignments_count_and_order() {
        let free = [EventId(0), EventId(1)];
        let all: Vec<Vec<Term>> = Assignments::new(&[], &free).collect();

        assert_eq!(all.len(), 4);
        // Bit j of the counter drives the j-th free event.
        assert_eq!(all[0], vec![Term::negative(free[0]), Term::negative(free[1])]);
        assert_eq!(all[1], vec![Term::positive(free[0]), Term::negative(free[1])]);
        assert_eq!(all[2], vec![Term::negative(free[0]), Term::positive(free[1])]);
        assert_eq!(all[3], vec![Term::positive(free[0]), Term::positive(free[1])]);
    }

    #[test]
    fn assignments_keep_the_fixed_prefix() {
        let prefix = [Term::positive(EventId(7))];
        for terms in Assignments::new(&prefix, &[EventId(0)]) {
            assert_eq!(terms[0], prefix[0]);
            assert_eq!(terms.len(), 2);
        }
    }

    #[test]
    fn assignments_are_independently_restartable() {
        let free = [EventId(0), EventId(1), EventId(2)];
        let first: Vec<_> = Assignments::new(&[], &free).collect();
        let second: Vec<_> = Assignments::new(&[], &free).collect();

        assert_eq!(first, second);
        assert_eq!(Assignments::new(&[], &free).len(), 8);
    }

    #[test]
    fn joint_probability_multiplies_terms() {
        let (net, a, b) = two_event_net();

        // P(a, b) = 0.3 * 0.8
        assert_close(net.joint_probability(&[a, b]).unwrap(), 0.24, 1e-12);
        // P(~a, b) = 0.7 * 0.4
        assert_close(net.joint_probability(&[!a, b]).unwrap(), 0.28, 1e-12);
        // P(~a, ~b) = 0.7 * 0.6
        assert_close(net.joint_probability(&[!a, !b]).unwrap(), 0.42, 1e-12);
    }

    #[test]
    fn joint_probability_requires_resolvable_parents() {
        let (net, _, b) = two_event_net();

        let err = net.joint_probability(&[b]).unwrap_err();
        assert!(matches!(err, ModelError::UnresolvedDependency(_)));
    }

    #[test]
    fn negated_occurrence_wins_on_conflict() {
        let (net, a, b) = two_event_net();

        // With both polarities of `a` present, b's table row is the ~a one.
        let p = net.joint_probability(&[a, !a, b]).unwrap();
        assert_close(p, 0.3 * 0.7 * 0.4, 1e-12);
    }

    #[test]
    fn marginal_sums_out_unbound_parents() {
        let (net, _, b) = two_event_net();

        // P(b) = 0.3*0.8 + 0.7*0.4
        assert_close(net.marginal_probability(b).unwrap(), 0.52, 1e-12);
        assert_close(net.marginal_probability(!b).unwrap(), 0.48, 1e-12);
    }

    #[test]
    fn conditional_probability_inverts_by_bayes_rule() {
        let (net, a, b) = two_event_net();

        // P(a | b) = 0.24 / 0.52
        let p = net.conditional_probability(&[a], &[b]).unwrap();
        assert_close(p, 0.24 / 0.52, 1e-12);
    }

    #[test]
    fn exact_match_skips_enumeration() {
        let (mut net, a, b) = two_event_net();
        // An unset event anywhere in the network poisons every enumeration.
        net.add_event("unset");

        // Direct lookup still answers the exactly-specified query.
        let p = net.conditional_probability(&[b], &[a]).unwrap();
        assert_close(p, 0.8, 1e-12);

        // The same query off the fast path fails on the unset event.
        let err = net.conditional_probability(&[b], &[!a]).unwrap_err();
        assert!(matches!(err, ModelError::MissingProbability(_)));
    }

    #[test]
    fn exact_match_honours_negated_targets() {
        let (net, a, b) = two_event_net();

        let p = net.conditional_probability(&[!b], &[a]).unwrap();
        assert_close(p, 0.2, 1e-12);
    }

    #[test]
    fn empty_targets_are_rejected() {
        let (net, _, b) = two_event_net();

        let err = net.conditional_probability(&[], &[b]).unwrap_err();
        assert!(matches!(err, ModelError::InvalidArgument(_)));
    }

    #[test]
    fn unset_event_query_reports_missing_data() {
        let mut net = BeliefNetwork::default();
        let a = net.add_event("a");

        let err = net.marginal_probability(a).unwrap_err();
        assert!(matches!(err, ModelError::MissingProbability(_)));
    }

    #[test]
    fn missing_row_reports_the_combination() {
        let mut net = BeliefNetwork::default();
        let a = net.add_event("a");
        let b = net.add_event("b");
        net.commit([
            for_event(a).assign(0.5).unwrap(),
            // Only the ~a row is supplied.
            for_event(b).given([!a]).assign(0.4).unwrap().build(),
        ])
        .unwrap();

        let err = net.marginal_probability(b).unwrap_err();
        match err {
            ModelError::MissingProbability(what) => {
                assert_eq!(what, "P(b | a)");
            }
            other => panic!("expected missing probability, got {:?}", other),
        }
    }

    #[test]
    fn unknown_event_in_query_is_reported() {
        let (net, _, _) = two_event_net();
        let ghost = Term::positive(EventId(99));

        let err = net.joint_probability(&[ghost]).unwrap_err();
        assert!(matches!(err, ModelError::UnknownEvent(_)));
    }
}
