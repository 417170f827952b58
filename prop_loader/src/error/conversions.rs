//! Trait-based conversions between external error types and `PropError`.

use figment::Error as FigmentError;

use super::PropError;

impl From<FigmentError> for PropError {
    fn from(e: FigmentError) -> Self {
        Self::gathering(e)
    }
}
