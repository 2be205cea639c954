//! The closed set of provider types this build knows about.

use std::fmt;
use std::str::FromStr;

use crate::error::ProviderError;

/// A provider type with a known adapter.
///
/// The backend stores provider types as free-form strings; parsing them into
/// this enum is where an unknown type is detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderType {
    /// The Acme booking REST API.
    AcmeBooking,
}

impl ProviderType {
    /// Every known provider type.
    pub const ALL: &'static [ProviderType] = &[ProviderType::AcmeBooking];

    /// Returns the backend string for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AcmeBooking => "acme_booking",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|ty| ty.as_str() == s.trim())
            .ok_or_else(|| ProviderError::unsupported(s))
    }
}
