//! Provisioning orchestration for serverless HTTP endpoints.
//!
//! Given a function name, this crate ensures the backing compute function
//! exists (creating it from a code bundle if not), creates an HTTP front door
//! bound to it, wires invocation permissions, and can attach a time-based
//! trigger rule. Remote services are reached through the synchronous trait
//! seams in [`api`]; the AWS-backed adapters live in the CLI crate so the
//! orchestration logic stays testable with recording fakes.

pub mod api;
pub mod bundle;
pub mod config;
pub mod error;
pub mod fetch;
pub mod identifiers;
pub mod provision;
