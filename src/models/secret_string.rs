//! SecretString - A container for sensitive string data
//!
//! Wraps secret material (the relayer owner key) so it is zeroized on drop
//! and never exposed through logs, serialization, or debug output.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

pub struct SecretString(Zeroizing<Vec<u8>>);

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self(Zeroizing::new(self.0.to_vec()))
    }
}

impl SecretString {
    /// Creates a new SecretString from a regular string.
    pub fn new(s: &str) -> Self {
        Self(Zeroizing::new(s.as_bytes().to_vec()))
    }

    /// Access the secret string content with a provided function, without
    /// creating a copy of the string.
    pub fn as_str<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        // Constructed from &str, so the bytes are always valid UTF-8.
        let s = unsafe { std::str::from_utf8_unchecked(&self.0) };
        f(s)
    }

    /// Create a temporary copy of the string content, securely erased when
    /// dropped. Only use this when a borrowed view is not enough.
    pub fn to_str(&self) -> Zeroizing<String> {
        self.as_str(|s| Zeroizing::new(s.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str("REDACTED")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = Zeroizing::new(String::deserialize(deserializer)?);
        Ok(SecretString::new(&s))
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && subtle::ConstantTimeEq::ct_eq(&self.0[..], &other.0[..]).into()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SecretString(REDACTED)")
    }
}
