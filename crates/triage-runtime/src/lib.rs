//! Runtime layer for complaint triage.
//!
//! Provides [`ComplaintBackend`], the stateful facade that owns the current
//! dataset snapshot and answers dashboard queries against it.

pub mod backend;

pub use backend::ComplaintBackend;
