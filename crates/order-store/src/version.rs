use serde::{Deserialize, Serialize};

/// Version number for an order record, used for optimistic concurrency
/// control.
///
/// Versions start at 1 when a record is created and increment by 1 on each
/// successful write. A writer presents the version it read; a mismatch at
/// write time means another actor got there first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a new version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the initial version (0) for a record that does not exist yet.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the first version (1) assigned on creation.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Version> for i64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ordering() {
        assert!(Version::initial() < Version::first());
        assert!(Version::first() < Version::first().next());
    }

    #[test]
    fn version_next_increments() {
        assert_eq!(Version::new(4).next(), Version::new(5));
    }

    #[test]
    fn version_serialization_is_transparent() {
        let json = serde_json::to_string(&Version::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
