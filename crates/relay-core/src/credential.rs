//! Upstream credentials.
//!
//! A credential is an opaque API key for one account at the upstream image
//! provider. Credentials are loaded once at startup into an ordered
//! [`CredentialSet`] that is never mutated afterwards; the order defines the
//! failover trial order.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Minimum credential length (in characters) before the tail is shown in hints
const MIN_LEN_FOR_TAIL: usize = 8;

/// Number of trailing characters shown in a hint
const TAIL_LEN: usize = 4;

/// A single upstream API key
#[derive(Clone)]
pub struct Credential {
    secret: SecretString,
}

impl Credential {
    /// Wrap a raw key
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(key.into()),
        }
    }

    /// Expose the raw key for use in an outbound request
    #[must_use]
    pub fn expose(&self) -> &str {
        self.secret.expose_secret()
    }

    /// Redacted form of the key, safe to log
    #[must_use]
    pub fn hint(&self) -> CredentialHint {
        let key = self.expose();
        let len = key.chars().count();

        if len < MIN_LEN_FOR_TAIL {
            return CredentialHint("...****".to_string());
        }

        let tail: String = key.chars().skip(len - TAIL_LEN).collect();
        CredentialHint(format!("...{tail}"))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.hint()).finish()
    }
}

/// Partial, non-reversible display form of a credential used for log correlation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CredentialHint(String);

impl CredentialHint {
    /// Get the hint as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CredentialHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, immutable list of credentials shared across requests
#[derive(Debug, Clone)]
pub struct CredentialSet {
    credentials: Arc<[Credential]>,
}

impl CredentialSet {
    /// Create a set from already-separated keys, preserving order
    ///
    /// Keys are trimmed; empty keys are dropped.
    #[must_use]
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let credentials: Vec<Credential> = keys
            .into_iter()
            .map(|k| k.as_ref().trim().to_string())
            .filter(|k| !k.is_empty())
            .map(Credential::new)
            .collect();

        Self {
            credentials: credentials.into(),
        }
    }

    /// Parse a comma-separated key list (the `STABILITY_API_KEYS` format)
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    /// An empty set
    #[must_use]
    pub fn empty() -> Self {
        Self {
            credentials: Arc::from(Vec::new()),
        }
    }

    /// Number of configured credentials
    #[must_use]
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Whether no credential is configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Iterate in trial order
    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.credentials.iter()
    }
}

impl Default for CredentialSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> IntoIterator for &'a CredentialSet {
    type Item = &'a Credential;
    type IntoIter = std::slice::Iter<'a, Credential>;

    fn into_iter(self) -> Self::IntoIter {
        self.credentials.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_shows_last_four() {
        let credential = Credential::new("sk-abcdefgh1234");
        assert_eq!(credential.hint().as_str(), "...1234");
    }

    #[test]
    fn test_hint_masks_short_keys() {
        assert_eq!(Credential::new("abc").hint().as_str(), "...****");
        assert_eq!(Credential::new("abcd").hint().as_str(), "...****");
        assert_eq!(Credential::new("abcdefg").hint().as_str(), "...****");
    }

    #[test]
    fn test_hint_never_contains_full_key() {
        for key in ["a", "abcd", "abcde", "abcdefgh", "sk-0123456789abcdef"] {
            let hint = Credential::new(key).hint();
            assert!(!hint.as_str().contains(key), "hint leaked {key}");
        }
    }

    #[test]
    fn test_hint_handles_multibyte_chars() {
        let credential = Credential::new("ключ-секрет-ключ");
        assert_eq!(credential.hint().as_str(), "...ключ");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let credential = Credential::new("sk-super-secret-9999");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("...9999"));
    }

    #[test]
    fn test_parse_preserves_order_and_trims() {
        let set = CredentialSet::parse(" key-one-0001 ,key-two-0002,  key-three-0003");
        let keys: Vec<&str> = set.iter().map(Credential::expose).collect();
        assert_eq!(keys, vec!["key-one-0001", "key-two-0002", "key-three-0003"]);
    }

    #[test]
    fn test_parse_drops_empty_entries() {
        let set = CredentialSet::parse("first-key-1,, ,second-key-2,");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_parse_empty_string_is_empty_set() {
        assert!(CredentialSet::parse("").is_empty());
        assert!(CredentialSet::parse(" , ,").is_empty());
        assert!(CredentialSet::empty().is_empty());
    }

    #[test]
    fn test_clone_shares_credentials() {
        let set = CredentialSet::parse("shared-key-0001");
        let clone = set.clone();
        assert_eq!(clone.len(), 1);
        assert_eq!(
            set.iter().next().map(Credential::expose),
            clone.iter().next().map(Credential::expose)
        );
    }
}
