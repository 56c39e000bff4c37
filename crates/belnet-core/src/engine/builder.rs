//! Fluent builder for probability declarations.
//!
//! One declaration describes the full probability data for a single event:
//! either an unconditional probability or a conditional table filled in one
//! `given(...).assign(...)` pair per parent combination. The chain is a small
//! state machine realized as types, so each state only exposes its legal next
//! operations:
//!
//! ```text
//! for_event ── ProbabilityBuilder ── assign ──▶ Probability
//!                     │
//!                   given
//!                     ▼
//!                RowBuilder ◀── given ── TableBuilder ── build ──▶ Probability
//!                     │                      ▲
//!                     └─────── assign ───────┘
//! ```
//!
//! Built [`Probability`] values are inert until passed to
//! [`BeliefNetwork::commit`](crate::engine::network::BeliefNetwork::commit).

use smallvec::SmallVec;

use crate::engine::errors::ModelError;
use crate::engine::network::{row_index, EventId, ParentList, ProbabilityData, Term, INLINE_PARENTS};

/// Accepts a raw probability in `[0, 1]` or a percentage in `(1, 100]`
/// (divided by 100). Anything else, NaN included, is out of range.
fn normalize_probability(value: f64) -> Result<f64, ModelError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ModelError::OutOfRange(value));
    }
    if value > 1.0 {
        Ok(value / 100.0)
    } else {
        Ok(value)
    }
}

/// A fully built probability declaration for one event.
///
/// The declaration always describes P(event is true | ...): building from a
/// negated literal stores the complement of every assigned value against the
/// positive event.
#[derive(Debug, Clone)]
pub struct Probability {
    event: EventId,
    data: ProbabilityData,
}

impl Probability {
    /// The event this declaration is for (normalized, positive form).
    pub fn event(&self) -> EventId {
        self.event
    }

    pub(crate) fn into_parts(self) -> (EventId, ProbabilityData) {
        (self.event, self.data)
    }
}

/// Begins a probability declaration for `target`.
///
/// A negated literal declares the probability of the event being false; the
/// stored table is complemented accordingly.
pub fn for_event(target: impl Into<Term>) -> ProbabilityBuilder {
    ProbabilityBuilder {
        target: target.into(),
    }
}

/// Fresh declaration: nothing assigned yet.
#[derive(Debug)]
pub struct ProbabilityBuilder {
    target: Term,
}

impl ProbabilityBuilder {
    /// Assigns an unconditional probability and finishes the declaration.
    pub fn assign(self, value: f64) -> Result<Probability, ModelError> {
        let p = oriented(normalize_probability(value)?, self.target);
        Ok(Probability {
            event: self.target.event,
            data: ProbabilityData::Marginal(p),
        })
    }

    /// Declares the ordered parent list and opens the first table row.
    ///
    /// The events of `row` (normalized) become the declared parents; the
    /// polarities select which row the following `assign` writes.
    pub fn given<I>(self, row: I) -> RowBuilder
    where
        I: IntoIterator<Item = Term>,
    {
        let mut parents = ParentList::new();
        let mut pending: SmallVec<[bool; INLINE_PARENTS]> = SmallVec::new();
        for term in row {
            parents.push(term.event);
            pending.push(term.asserted);
        }
        let rows = vec![None; 1usize << parents.len()];
        RowBuilder {
            target: self.target,
            parents,
            rows,
            pending,
        }
    }
}

/// A table row selected by `given`, waiting for its `assign`.
#[derive(Debug)]
pub struct RowBuilder {
    target: Term,
    parents: ParentList,
    rows: Vec<Option<f64>>,
    pending: SmallVec<[bool; INLINE_PARENTS]>,
}

impl RowBuilder {
    /// Writes the probability for the selected parent combination.
    ///
    /// Supplying the same combination twice overwrites the earlier value.
    pub fn assign(mut self, value: f64) -> Result<TableBuilder, ModelError> {
        let p = oriented(normalize_probability(value)?, self.target);
        let index = row_index(&self.pending);
        self.rows[index] = Some(p);
        Ok(TableBuilder {
            target: self.target,
            parents: self.parents,
            rows: self.rows,
        })
    }
}

/// A declaration with at least one row assigned; more rows may follow.
///
/// The table does not need to be complete: querying an unsupplied parent
/// combination fails at inference time with
/// [`ModelError::MissingProbability`].
#[derive(Debug)]
pub struct TableBuilder {
    target: Term,
    parents: ParentList,
    rows: Vec<Option<f64>>,
}

impl TableBuilder {
    /// Opens another table row.
    ///
    /// Every row must name the declared parents, in declaration order;
    /// anything else would silently select the wrong slot, so it is rejected.
    pub fn given<I>(self, row: I) -> Result<RowBuilder, ModelError>
    where
        I: IntoIterator<Item = Term>,
    {
        let row: SmallVec<[Term; INLINE_PARENTS]> = row.into_iter().collect();
        if row.len() != self.parents.len() {
            return Err(ModelError::InvalidArgument(format!(
                "given row has {} events, table is conditioned on {}",
                row.len(),
                self.parents.len()
            )));
        }
        for (term, &declared) in row.iter().zip(self.parents.iter()) {
            if term.event != declared {
                return Err(ModelError::InvalidArgument(format!(
                    "given row names event #{}, table is conditioned on event #{} \
                     at that position",
                    term.event.0, declared.0
                )));
            }
        }
        let pending = row.iter().map(|t| t.asserted).collect();
        Ok(RowBuilder {
            target: self.target,
            parents: self.parents,
            rows: self.rows,
            pending,
        })
    }

    /// Finishes the declaration.
    pub fn build(self) -> Probability {
        self.into()
    }
}

impl From<TableBuilder> for Probability {
    fn from(builder: TableBuilder) -> Self {
        Probability {
            event: builder.target.event,
            data: ProbabilityData::Conditional {
                parents: builder.parents,
                rows: builder.rows,
            },
        }
    }
}

/// Complements `p` when the declaration target was a negated literal, so the
/// stored table always reads P(event is true | ...).
fn oriented(p: f64, target: Term) -> f64 {
    if target.asserted {
        p
    } else {
        1.0 - p
    }
}
