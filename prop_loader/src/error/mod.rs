//! Error types produced by the property loader.

mod constructors;
mod conversions;
mod types;

pub use types::{PropError, SourceError};

#[cfg(test)]
mod tests;
