// src/engine/mod.rs

//! Orchestration of a job graph.
//!
//! [`Pipeline`] seeds the run from the graph's roots, runs each depth on
//! Tokio, reports results to the nodes and steps to the next depth until
//! nothing is left to run. [`RunReport`] summarises the final node states.

pub mod pipeline;
pub mod report;

pub use pipeline::{Pipeline, Plan};
pub use report::RunReport;
