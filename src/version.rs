//! Schema versions: `major.minor.patch` triples with total ordering.
//!
//! Every widget type carries the version of its current persisted layout.
//! Fragments record the version they were written with; configurators compare
//! the two to decide which legacy translations apply.

use std::fmt;
use std::str::FromStr;

/// Version assumed for fragments that carry no `version` attribute.
pub const BASE_WIDGET_VERSION: Version = Version::new(2, 0, 0);

// ---------------------------------------------------------------------------
// VersionError
// ---------------------------------------------------------------------------

/// Errors produced when parsing version text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("empty version text")]
    Empty,
    #[error("invalid version component '{component}' in '{text}'")]
    InvalidComponent { text: String, component: String },
    #[error("too many version components in '{0}'")]
    TooManyComponents(String),
}

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

/// A `major.minor.patch` version. Ordering is lexicographic on the triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a version from its components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse `"1"`, `"1.2"` or `"1.2.3"`. Missing components are zero.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }

        let mut parts = [0u32; 3];
        let mut count = 0;
        for component in trimmed.split('.') {
            if count == parts.len() {
                return Err(VersionError::TooManyComponents(trimmed.to_string()));
            }
            parts[count] = component
                .parse()
                .map_err(|_| VersionError::InvalidComponent {
                    text: trimmed.to_string(),
                    component: component.to_string(),
                })?;
            count += 1;
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
