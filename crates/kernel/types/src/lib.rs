//! Shared type definitions for the Kauri kernel.
//!
//! This crate provides the gate evaluation context and verdict types used by
//! every gate evaluator, the orchestrator, and the transport surface.

pub mod context;
pub mod verdict;

pub use context::GateContext;
pub use verdict::{CompositeVerdict, GateName, GateVerdict, VerdictReason};
