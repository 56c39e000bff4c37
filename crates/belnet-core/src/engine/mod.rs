//! The exact-inference engine for belief networks.
//!
//! This module provides:
//! - **errors**: Error types for construction and query failures
//! - **network**: Event registry and per-event probability store
//! - **builder**: Fluent, typestate probability declaration builder
//! - **infer**: Joint, conditional and marginal probability queries

pub mod builder;
pub mod errors;
pub mod infer;
pub mod network;
