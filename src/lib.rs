//! # Experiment Tools - agent-callable experiment search and analysis
//!
//! Two tools an LLM agent can call on behalf of a team:
//! - `search_experiments`: case-insensitive name search over the team's active
//!   experiments, newest first
//! - `analyze_experiment`: builds an exposure query for one experiment and hands
//!   it to an external runner
//!
//! ## Architecture
//!
//! ```text
//!   agent layer → ExperimentToolkit ─┬─ SearchExperimentsTool ──┐
//!                 (catalog, checks)  └─ AnalyzeExperimentTool ──┼─→ ExperimentStore
//!                                                               └─→ ExposureQueryRunner
//! ```
//!
//! Handlers never fail. Store and runner faults are reported as messages with
//! an empty artifact; only dispatch contract violations surface as errors.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod experiment;
pub mod ipc;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;

pub use types::{Config, Error, Result};
