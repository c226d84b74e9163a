//! Crate-level tests and shared test doubles.

pub(crate) mod support;

mod engine_flow;
