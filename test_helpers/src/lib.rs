//! Test helpers shared across crates in the prop-loader workspace.
//!
//! - [`sources`]: scripted property sources that record when they are
//!   invoked and when they emit.
//! - [`store`]: a store wrapper that records every write.
//! - [`tracing`]: opt-in log output for tests.

pub mod sources;
pub mod store;
pub mod tracing;
