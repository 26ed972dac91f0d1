// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Marshal options and the named profiles they are loaded from.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::hash::BuildHasher;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Default bound on relationship nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tunables for a [`Marshaler`](crate::Marshaler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarshalOptions {
    /// Maximum relationship nesting below a root resource. Cyclic object
    /// graphs hit this bound instead of recursing forever.
    pub max_depth: usize,
    /// Pretty-print documents written by the writer entry points.
    pub pretty: bool,
    /// Terminate written documents with `\n`.
    pub trailing_newline: bool,
}

impl Default for MarshalOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: false,
            trailing_newline: true,
        }
    }
}

impl MarshalOptions {
    /// Parse a JSON profile. Keys missing from the object keep their defaults;
    /// an empty blob is the all-defaults profile.
    pub fn from_json(profile: &str, bytes: &[u8]) -> Result<Self, OptionsError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes).map_err(|source| OptionsError::Parse {
            profile: profile.to_owned(),
            source,
        })
    }

    /// Load `profile` from `source`, falling back to defaults when the source
    /// has no such profile.
    pub fn load<S: OptionsSource + ?Sized>(source: &S, profile: &str) -> Result<Self, OptionsError> {
        let options = match source.read_profile(profile)? {
            Some(bytes) => Self::from_json(profile, &bytes)?,
            None => Self::default(),
        };
        debug!(profile, ?options, "loaded marshal options");
        Ok(options)
    }
}

/// Errors raised while loading an options profile.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// The profile exists but could not be read.
    #[error("cannot read options profile `{profile}`: {source}")]
    Io {
        /// Profile name.
        profile: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The profile is not a valid options object.
    #[error("options profile `{profile}` is malformed: {source}")]
    Parse {
        /// Profile name.
        profile: String,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Where named options profiles come from.
pub trait OptionsSource {
    /// Raw JSON for `profile`, or `None` when there is no such profile.
    fn read_profile(&self, profile: &str) -> Result<Option<Vec<u8>>, OptionsError>;
}

/// In-memory profiles keyed by name, holding JSON text.
impl<S: BuildHasher> OptionsSource for HashMap<String, String, S> {
    fn read_profile(&self, profile: &str) -> Result<Option<Vec<u8>>, OptionsError> {
        Ok(self.get(profile).map(|json| json.as_bytes().to_vec()))
    }
}

/// Profiles stored as `<profile>.json` files in one directory.
#[derive(Debug, Clone)]
pub struct OptionsDir {
    base: PathBuf,
}

impl OptionsDir {
    /// Source rooted at `base`. The directory need not exist yet.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// File backing `profile`.
    pub fn path_for(&self, profile: &str) -> PathBuf {
        self.base.join(format!("{profile}.json"))
    }
}

impl OptionsSource for OptionsDir {
    fn read_profile(&self, profile: &str) -> Result<Option<Vec<u8>>, OptionsError> {
        match fs::read(self.path_for(profile)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(OptionsError::Io {
                profile: profile.to_owned(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profiles(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn missing_profile_yields_defaults() {
        let source = profiles(&[]);
        assert_eq!(
            MarshalOptions::load(&source, "api").unwrap(),
            MarshalOptions::default()
        );
    }

    #[test]
    fn partial_profile_fills_in_defaults() {
        let source = profiles(&[("api", r#"{"pretty": true}"#)]);
        let options = MarshalOptions::load(&source, "api").unwrap();
        assert!(options.pretty);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert!(options.trailing_newline);
    }

    #[test]
    fn blank_profile_is_the_default_profile() {
        assert_eq!(
            MarshalOptions::from_json("api", b" \n").unwrap(),
            MarshalOptions::default()
        );
    }

    #[test]
    fn malformed_profile_names_itself() {
        let source = profiles(&[("api", "{not json")]);
        let err = MarshalOptions::load(&source, "api").unwrap_err();
        assert!(matches!(err, OptionsError::Parse { ref profile, .. } if profile == "api"));
        assert!(err.to_string().contains("`api`"));
    }

    #[test]
    fn directory_paths_use_the_profile_name() {
        let dir = OptionsDir::new("/etc/jsonapi");
        assert_eq!(dir.path_for("api"), PathBuf::from("/etc/jsonapi/api.json"));
    }
}
