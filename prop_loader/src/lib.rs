//! Runtime property loading for client applications.
//!
//! `prop_loader` gathers properties (arbitrary nested key/value
//! configuration) from several asynchronous sources, merges them into a
//! single [`PropertyStore`] and tells the host application when it is safe
//! to start.
//!
//! The moving parts, leaf first:
//!
//! - [`PropertyStore`] holds the current snapshot; [`MemoryStore`] is the
//!   default reactive implementation.
//! - [`merge`] combines a batch into a snapshot under the
//!   [`MergeStrategy::Merge`] or [`MergeStrategy::Overwrite`] strategy.
//! - [`PropertyService`] applies merges and path mutations to a store.
//! - [`PropertySource`] describes one contributor and its scheduling flags.
//! - [`Loader`] drives a set of sources through the ordered and unordered
//!   lanes and settles a single completion signal.
//! - [`PropertyQuery`] reads values back, with typed conversion and
//!   placeholder interpolation.
//!
//! # Example
//!
//! ```rust
//! use prop_loader::{Loader, PropertyService, SourceOptions, StaticSource};
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> prop_loader::PropResult<()> {
//! let service = PropertyService::in_memory();
//! let loader = Loader::builder(service.clone())
//!     .source(StaticSource::new("defaults", json!({"api": {"retries": 3}})))
//!     .source(
//!         StaticSource::new("overrides", json!({"api": {"timeout_ms": 500}}))
//!             .with_options(
//!                 SourceOptions::default()
//!                     .required_to_load(true)
//!                     .deep_merge_values(true),
//!             ),
//!     )
//!     .build();
//!
//! loader.load().await?;
//! assert_eq!(service.properties()["api"]["timeout_ms"], json!(500));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

mod error;
mod loader;
pub mod merge;
pub mod path;
mod query;
mod result_ext;
mod service;
mod source;
mod store;

pub use error::{PropError, SourceError};
pub use loader::{Loader, LoaderBuilder, LoaderOptions, SubmoduleHooks, TimeoutPolicy};
pub use merge::MergeStrategy;
pub use path::{IntoPropertyPath, PropertyPath};
pub use query::{InterpolationConfig, PropertyQuery};
pub use result_ext::{IntoSourceError, PropResultExt};
pub use service::PropertyService;
pub use source::{
    EnvSource, FileSource, FnSource, PropertySource, SourceLoad, SourceOptions, SourceStream,
    StaticSource,
};
pub use store::{MemoryStore, PropertyStore, SharedStore};

/// A tree of JSON-like configuration values.
pub type Properties = serde_json::Value;

/// Result type used throughout the crate.
///
/// Errors are shared so a single failure can be logged and returned without
/// cloning the underlying cause.
pub type PropResult<T> = Result<T, Arc<PropError>>;
