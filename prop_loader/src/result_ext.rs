//! Extensions for mapping errors to `PropResult` concisely.
//!
//! These helpers reduce repetitive `.map_err(|e| Arc::new(PropError::…(e)))`
//! patterns when converting external error types into the crate's
//! `PropResult<T>` alias (`Result<T, Arc<PropError>>`).
//!
//! # Examples
//!
//! ```
//! use figment::{Figment, providers::Serialized};
//! use prop_loader::{PropResult, PropResultExt};
//!
//! fn extract(figment: &Figment) -> PropResult<serde_json::Value> {
//!     // figment::Error implements Into<PropError>
//!     figment.extract().into_prop()
//! }
//!
//! let figment = Figment::from(Serialized::defaults(serde_json::json!({"a": 1})));
//! assert_eq!(extract(&figment)?, serde_json::json!({"a": 1}));
//! # Ok::<_, std::sync::Arc<prop_loader::PropError>>(())
//! ```

use std::sync::Arc;

use crate::{PropError, PropResult, SourceError};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<PropError>`
/// into a `PropResult<T>`.
pub trait PropResultExt<T, E> {
    /// Convert `Result<T, E>` into `PropResult<T>` using `Into<PropError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<PropError>`.
    fn into_prop(self) -> PropResult<T>;
}

impl<T, E> PropResultExt<T, E> for Result<T, E>
where
    E: Into<PropError>,
{
    fn into_prop(self) -> PropResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}

/// Converts a shared loader error into the boxed form sources emit.
pub trait IntoSourceError<T> {
    /// Map the `Arc<PropError>` into a [`SourceError`].
    ///
    /// # Errors
    ///
    /// Returns the original error boxed as a [`SourceError`].
    fn into_source_error(self) -> Result<T, SourceError>;
}

impl<T> IntoSourceError<T> for PropResult<T> {
    fn into_source_error(self) -> Result<T, SourceError> {
        self.map_err(|e| Box::new(e) as SourceError)
    }
}
