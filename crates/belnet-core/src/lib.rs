//! # Belnet Core
//!
//! Exact inference for discrete Bayesian networks over boolean events.
//!
//! A caller registers events, attaches unconditional or conditional
//! probability tables to them through a fluent builder, and then queries the
//! marginal or conditional probability of any conjunction of (possibly
//! negated) events — including queries that require summing out unobserved
//! nuisance variables.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use belnet_core::{for_event, BeliefNetwork};
//!
//! let mut net = BeliefNetwork::default();
//! let rain = net.add_event("rain");
//! let sprinkler = net.add_event("sprinkler");
//!
//! net.commit([
//!     for_event(rain).assign(0.2)?,
//!     for_event(sprinkler)
//!         .given([rain]).assign(0.01)?
//!         .given([!rain])?.assign(0.4)?
//!         .build(),
//! ])?;
//!
//! let p = net.conditional_probability(&[rain], &[sprinkler])?;
//! ```
//!
//! Queries are exact and enumerate every assignment of the unbound
//! variables: cost is `O(2^n)` joint evaluations for `n` unbound events.

#![forbid(unsafe_code)]

pub mod engine;

// Re-export commonly used types
pub use engine::builder::{for_event, Probability};
pub use engine::errors::ModelError;
pub use engine::infer::Assignments;
pub use engine::network::{BeliefNetwork, EventData, EventId, ProbabilityData, Term};
