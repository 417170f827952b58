//! Loader-wide configuration.

use std::time::Duration;

use figment::Figment;
use serde::{Deserialize, Deserializer};

use crate::{PropResult, PropResultExt};

/// What happens when a session outlives [`LoaderOptions::max_load_time`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutPolicy {
    /// Resolve the session and let pending sources keep writing.
    #[default]
    Release,
    /// Resolve the session and stop every pending source.
    Cancel,
    /// Reject the session with [`crate::PropError::LoadTimeout`]; sources keep
    /// running.
    Fail,
}

/// Options shared by every session a [`Loader`](crate::Loader) starts.
///
/// Deserialises from a figment provider or any serde format:
///
/// ```toml
/// max_load_time_ms = 2500
/// timeout_policy = "cancel"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Upper bound on how long `load()` waits for the session to settle.
    #[serde(rename = "max_load_time_ms", deserialize_with = "millis")]
    pub max_load_time: Option<Duration>,
    /// Behaviour when `max_load_time` elapses first.
    pub timeout_policy: TimeoutPolicy,
}

impl LoaderOptions {
    /// Sets [`LoaderOptions::max_load_time`].
    #[must_use]
    pub const fn max_load_time(mut self, limit: Duration) -> Self {
        self.max_load_time = Some(limit);
        self
    }

    /// Sets [`LoaderOptions::timeout_policy`].
    #[must_use]
    pub const fn timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.timeout_policy = policy;
        self
    }

    /// Extract options from a figment.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PropError::Gathering`] when the figment holds values of the
    /// wrong shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use figment::{Figment, providers::{Format, Toml}};
    /// use prop_loader::{LoaderOptions, TimeoutPolicy};
    ///
    /// let figment = Figment::from(Toml::string("timeout_policy = \"fail\""));
    /// let options = LoaderOptions::from_figment(&figment)?;
    /// assert_eq!(options.timeout_policy, TimeoutPolicy::Fail);
    /// assert_eq!(options.max_load_time, None);
    /// # Ok::<_, std::sync::Arc<prop_loader::PropError>>(())
    /// ```
    pub fn from_figment(figment: &Figment) -> PropResult<Self> {
        figment.extract().into_prop()
    }
}

fn millis<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u64>::deserialize(deserializer).map(|ms| ms.map(Duration::from_millis))
}
