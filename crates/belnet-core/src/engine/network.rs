//! # Belief Network
//!
//! This module implements the event registry and probability store that back
//! the inference engine.
//!
//! ## Key Components
//!
//! - **EventId**: unique handle for a boolean random variable, assigned in
//!   creation order and never reused
//!
//! - **Term**: a signed literal pairing an event with an asserted truth
//!   value; `!term` flips the polarity and is involutive
//!
//! - **ProbabilityData**: per-event storage of either a single unconditional
//!   probability or a table of conditional probabilities indexed by the
//!   truth-assignment of the event's parents
//!
//! - **BeliefNetwork**: owner of the event table; declarations mutate it
//!   through `&mut self`, queries only ever read it
//!
//! ## Design
//!
//! Parent lists are stored normalized (positive events only); truth polarity
//! travels separately in [`Term`]. A conditional table for `k` parents has
//! `2^k` slots, and a slot that was never supplied is `None` — distinguishable
//! from a stored probability of zero, so that querying it fails instead of
//! returning a silently wrong answer.
//!
//! ## Example
//!
//! ```rust,ignore
//! use belnet_core::{for_event, BeliefNetwork};
//!
//! let mut net = BeliefNetwork::default();
//! let rain = net.add_event("rain");
//! net.commit([for_event(rain).assign(0.2)?])?;
//! ```

use std::ops::Not;

use smallvec::SmallVec;

use crate::engine::builder::Probability;
use crate::engine::errors::ModelError;

/// Inline capacity for parent lists; real networks rarely condition an event
/// on more than a handful of parents.
pub(crate) const INLINE_PARENTS: usize = 4;

/// Ordered list of parent events, normalized to positive polarity.
pub(crate) type ParentList = SmallVec<[EventId; INLINE_PARENTS]>;

/// A unique identifier for an event in the belief network.
///
/// EventId implements Ord/PartialOrd for stable, deterministic iteration.
/// The value equals the event's position in creation order.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventId(pub u32);

impl EventId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A signed literal: an event asserted either true or false.
///
/// Negation via `!` is O(1) and involutive (`!!t == t`). Registry indices and
/// parent lists always use the underlying [`EventId`]; the polarity is only
/// ever carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Term {
    /// The event this literal refers to.
    pub event: EventId,
    /// `true` asserts the event holds, `false` asserts it does not.
    pub asserted: bool,
}

impl Term {
    /// The positive literal for `event`.
    pub fn positive(event: EventId) -> Self {
        Term {
            event,
            asserted: true,
        }
    }

    /// The negative literal for `event`.
    pub fn negative(event: EventId) -> Self {
        Term {
            event,
            asserted: false,
        }
    }
}

impl Not for Term {
    type Output = Term;

    fn not(self) -> Term {
        Term {
            event: self.event,
            asserted: !self.asserted,
        }
    }
}

impl From<EventId> for Term {
    fn from(event: EventId) -> Self {
        Term::positive(event)
    }
}

/// Probability data attached to one event.
///
/// `Unset` is distinct from any assigned value: looking it up is a
/// [`ModelError::MissingProbability`], never an implicit zero.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbabilityData {
    /// No probability has been committed for this event yet.
    Unset,
    /// An unconditional probability in `[0, 1]`.
    Marginal(f64),
    /// A conditional table over the declared parents.
    ///
    /// `rows.len() == 2^parents.len()`; row `i` holds P(event is true) for
    /// the parent assignment whose bit pattern is `i` (bit `j` set means the
    /// `j`-th parent is true). A `None` row was never supplied.
    Conditional {
        parents: ParentList,
        rows: Vec<Option<f64>>,
    },
}

impl ProbabilityData {
    /// The declared parent events, empty for unconditional data.
    pub fn parents(&self) -> &[EventId] {
        match self {
            ProbabilityData::Conditional { parents, .. } => parents,
            _ => &[],
        }
    }
}

/// An event registered in the network: a label, a stable handle, and the
/// probability data committed for it.
#[derive(Debug, Clone)]
pub struct EventData {
    /// The unique event handle.
    pub id: EventId,
    /// Caller-supplied label. Metadata only — two events with equal labels
    /// are still distinct.
    pub label: String,
    /// Committed probability data.
    pub data: ProbabilityData,
}

/// The index of the table row selected by one assignment of parent truth
/// values: bit `i` is set iff the `i`-th parent (declared order) is true.
pub(crate) fn row_index(polarities: &[bool]) -> usize {
    polarities
        .iter()
        .enumerate()
        .fold(0, |index, (bit, &on)| index | (usize::from(on) << bit))
}

/// A discrete Bayesian network over boolean events.
///
/// The network exclusively owns its event table. Declarations (registration
/// and [`commit`](BeliefNetwork::commit)) take `&mut self`; inference only
/// takes `&self`, so construction can never interleave with an in-flight
/// query.
#[derive(Debug, Clone, Default)]
pub struct BeliefNetwork {
    events: Vec<EventData>,
    /// Counter used to label events created without an identifier. Shared
    /// across all events of this network and never reset.
    unlabeled_counter: u32,
}

impl BeliefNetwork {
    /// Creates an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new event and returns its positive literal.
    ///
    /// The handle is the event's position in creation order; events are never
    /// removed, so handles are never reused.
    pub fn add_event(&mut self, label: impl Into<String>) -> Term {
        let id = EventId(self.events.len() as u32);
        self.events.push(EventData {
            id,
            label: label.into(),
            data: ProbabilityData::Unset,
        });
        Term::positive(id)
    }

    /// Registers a new event labeled from the internal counter.
    pub fn add_unlabeled(&mut self) -> Term {
        let label = self.unlabeled_counter.to_string();
        self.unlabeled_counter += 1;
        self.add_event(label)
    }

    /// Looks up an event by handle.
    pub fn event(&self, id: EventId) -> Option<&EventData> {
        self.events.get(id.index())
    }

    /// Number of registered events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the network has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All event handles in creation order.
    pub fn event_ids(&self) -> impl Iterator<Item = EventId> + '_ {
        self.events.iter().map(|e| e.id)
    }

    /// The positive literal of the first event with the given label, if any.
    ///
    /// Labels are not unique; callers that need exact identity should hold
    /// the [`Term`] returned at registration instead.
    pub fn find_event(&self, label: &str) -> Option<Term> {
        self.events
            .iter()
            .find(|e| e.label == label)
            .map(|e| Term::positive(e.id))
    }

    /// Copies one or more built probability declarations into the store.
    ///
    /// Fails with [`ModelError::UnknownEvent`] if a declaration references a
    /// handle not present in this network; declarations before the failing
    /// one are already applied.
    pub fn commit(
        &mut self,
        facts: impl IntoIterator<Item = Probability>,
    ) -> Result<(), ModelError> {
        for fact in facts {
            let (event, data) = fact.into_parts();
            match self.events.get_mut(event.index()) {
                Some(entry) => entry.data = data,
                None => {
                    return Err(ModelError::UnknownEvent(format!("event #{}", event.0)));
                }
            }
        }
        Ok(())
    }

    /// Printable form of a literal, `label` or `~label`.
    pub(crate) fn term_name(&self, term: Term) -> String {
        let label = self
            .event(term.event)
            .map(|e| e.label.as_str())
            .unwrap_or("?");
        if term.asserted {
            label.to_string()
        } else {
            format!("~{}", label)
        }
    }
}
