//! Request fingerprints.

use std::fmt;

use http::Uri;
use http::request::Parts;
use smol_str::SmolStr;

/// The key a cached response is stored under.
///
/// The reference derivation is the full request URL. The request method and
/// any `Vary` response header are not part of the key, so a `GET` and a
/// `HEAD` for the same URL share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(SmolStr);

impl Fingerprint {
    /// Creates a fingerprint from an arbitrary string.
    pub fn new(value: impl AsRef<str>) -> Self {
        Fingerprint(SmolStr::new(value))
    }

    /// Derives the reference fingerprint of a request: its full URL.
    pub fn from_request(parts: &Parts) -> Self {
        Self::from(&parts.uri)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&Uri> for Fingerprint {
    fn from(uri: &Uri) -> Self {
        Fingerprint(SmolStr::new(uri.to_string()))
    }
}

impl From<&str> for Fingerprint {
    fn from(value: &str) -> Self {
        Fingerprint::new(value)
    }
}

impl From<String> for Fingerprint {
    fn from(value: String) -> Self {
        Fingerprint(SmolStr::from(value))
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
