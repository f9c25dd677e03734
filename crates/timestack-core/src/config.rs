use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::error::Result;
use crate::store::JsonFileStore;

pub const TIMEZONE_VAR: &str = "TIMESTACK_TIMEZONE";
pub const STORE_VAR: &str = "TIMESTACK_STORE";

/// Settings a host application passes to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IANA time zone whose calendar days descriptions are computed in.
    pub timezone: String,

    /// Where custom intervals are kept. `None` means no persistence.
    pub store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            store_path: None,
        }
    }
}

impl Config {
    /// Read `TIMESTACK_TIMEZONE` and `TIMESTACK_STORE`, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`Config::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            timezone: non_empty(TIMEZONE_VAR).unwrap_or(defaults.timezone),
            store_path: non_empty(STORE_VAR).map(PathBuf::from),
        }
    }

    /// # Errors
    ///
    /// Returns [`crate::TimestackError::InvalidTimezone`] if `timezone` is not
    /// a known IANA zone.
    pub fn calendar(&self) -> Result<Calendar> {
        Calendar::new(&self.timezone)
    }

    /// The configured file store, if a path is set.
    pub fn open_store(&self) -> Option<JsonFileStore> {
        self.store_path.as_ref().map(|path| JsonFileStore::new(path))
    }
}
