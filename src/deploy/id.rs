//! Deployment identifiers

use std::fmt;

use rand::distr::{Alphanumeric, SampleString};

/// Random identifier naming one deployment directory.
///
/// Drawn uniformly from `[A-Za-z0-9]`, which gives roughly 59.5 bits of
/// entropy at the default length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeploymentId(String);

impl DeploymentId {
    /// Number of characters in a generated identifier
    pub const LEN: usize = 10;

    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Alphanumeric.sample_string(&mut rand::rng(), Self::LEN))
    }

    /// Parses an identifier taken from a request path.
    ///
    /// Returns `None` unless the value looks like something [`generate`]
    /// could have produced.
    ///
    /// [`generate`]: DeploymentId::generate
    pub fn parse(value: &str) -> Option<Self> {
        let valid = value.len() == Self::LEN && value.bytes().all(|b| b.is_ascii_alphanumeric());
        valid.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeploymentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_id_shape() {
        let id = DeploymentId::generate();
        assert_eq!(id.as_str().len(), DeploymentId::LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let ids: HashSet<_> = (0..10_000).map(|_| DeploymentId::generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = DeploymentId::generate();
        assert_eq!(DeploymentId::parse(id.as_str()), Some(id));
    }

    #[test]
    fn test_parse_rejects_foreign_values() {
        for value in ["", "short", "abcdefghijk", "abc/efghij", "../abcdefg", "abcdefghi-"] {
            assert_eq!(DeploymentId::parse(value), None, "Should reject: {}", value);
        }
    }
}
