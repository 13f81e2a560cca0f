//! The Kauri gateway service.
//!
//! HTTP plumbing around the kernel: request bodies normalize into gate
//! contexts, the orchestrator produces verdicts, audits append to the
//! storage collaborator, and every outbound payload passes through the seal
//! layer before leaving the process.

#![deny(unsafe_code)]

pub mod config;
pub mod handlers;
pub mod router;
pub mod seal_layer;
pub mod state;

pub use config::ServiceConfig;
pub use router::create_router;
pub use state::AppState;
