//! Declarative flags attached to every source.

use crate::merge::MergeStrategy;
use crate::path::{IntoPropertyPath, PropertyPath};

/// Scheduling and merge behaviour of a source.
///
/// All flags default to `false`, the strategy to
/// [`MergeStrategy::Overwrite`] and the path to the root.
///
/// # Examples
///
/// ```
/// use prop_loader::{MergeStrategy, SourceOptions};
///
/// let options = SourceOptions::default()
///     .required_to_load(true)
///     .load_in_order(true)
///     .deep_merge_values(true)
///     .path("remote.settings");
/// assert!(options.required_to_load);
/// assert_eq!(options.strategy, MergeStrategy::Merge);
/// assert_eq!(options.path.map(|p| p.to_string()).as_deref(), Some("remote.settings"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceOptions {
    /// A failure rejects the whole load unless `ignore_error` is set; the
    /// load does not resolve until this source has produced its first batch.
    pub required_to_load: bool,
    /// Join the sequential lane instead of loading concurrently.
    pub load_in_order: bool,
    /// Resolve the load as soon as this source produces its first batch.
    pub load_immediately: bool,
    /// Cancel every other source once this source produces its first batch.
    pub dismiss_other_sources: bool,
    /// How batches are applied to the store.
    pub strategy: MergeStrategy,
    /// Location under which batches are applied; `None` is the root.
    pub path: Option<PropertyPath>,
    /// Clear the store before applying each batch.
    pub reset_environment: bool,
    /// Log failures instead of rejecting the load.
    pub ignore_error: bool,
}

impl SourceOptions {
    /// Sets [`SourceOptions::required_to_load`].
    #[must_use]
    pub const fn required_to_load(mut self, value: bool) -> Self {
        self.required_to_load = value;
        self
    }

    /// Sets [`SourceOptions::load_in_order`].
    #[must_use]
    pub const fn load_in_order(mut self, value: bool) -> Self {
        self.load_in_order = value;
        self
    }

    /// Sets [`SourceOptions::load_immediately`].
    #[must_use]
    pub const fn load_immediately(mut self, value: bool) -> Self {
        self.load_immediately = value;
        self
    }

    /// Sets [`SourceOptions::dismiss_other_sources`].
    #[must_use]
    pub const fn dismiss_other_sources(mut self, value: bool) -> Self {
        self.dismiss_other_sources = value;
        self
    }

    /// Chooses [`MergeStrategy::Merge`] when `true`, otherwise
    /// [`MergeStrategy::Overwrite`].
    #[must_use]
    pub const fn deep_merge_values(mut self, value: bool) -> Self {
        self.strategy = if value {
            MergeStrategy::Merge
        } else {
            MergeStrategy::Overwrite
        };
        self
    }

    /// Sets [`SourceOptions::strategy`].
    #[must_use]
    pub const fn strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Scope batches under `path`.
    ///
    /// An invalid path is logged and the root is used instead.
    #[must_use]
    pub fn path(mut self, path: impl IntoPropertyPath) -> Self {
        self.path = PropertyPath::lenient(path);
        self
    }

    /// Sets [`SourceOptions::reset_environment`].
    #[must_use]
    pub const fn reset_environment(mut self, value: bool) -> Self {
        self.reset_environment = value;
        self
    }

    /// Sets [`SourceOptions::ignore_error`].
    #[must_use]
    pub const fn ignore_error(mut self, value: bool) -> Self {
        self.ignore_error = value;
        self
    }

    /// Whether this source resolves the load on its own first batch.
    #[must_use]
    pub const fn short_circuits(&self) -> bool {
        self.load_immediately || self.dismiss_other_sources
    }
}
