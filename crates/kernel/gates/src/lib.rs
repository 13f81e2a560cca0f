//! The Kauri policy gate battery.
//!
//! Five independent evaluators (non-harm, truthfulness, consent, boundary,
//! diversity) each map a [`GateContext`](kauri_kernel_types::GateContext) to
//! a pass/fail verdict with a score. The [`orchestrator`] runs all five
//! unconditionally, applies the boundary hard veto and the composite
//! threshold, and emits a [`CompositeVerdict`](kauri_kernel_types::CompositeVerdict).
//!
//! Evaluators are pure functions: no side effects, no persistence access, no
//! shared state. Any number of requests may evaluate concurrently.

#![deny(unsafe_code)]

pub mod explain;
pub mod gates;
pub mod orchestrator;
pub mod policy;

pub use orchestrator::GateOrchestrator;
pub use policy::PolicyCharter;
