//! Strongly-typed identifier value objects.
//!
//! Users and works are keyed by database-assigned integers, so unlike
//! random UUID identifiers these wrap the storage key directly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Unique identifier for a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Creates a UserId from a storage key.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the inner storage key.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ValidationError;

    /// Parses a user id as carried in payment-provider metadata.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ValidationError::invalid_format("user_id", "not a numeric id"))
    }
}

/// Unique identifier for a catalog work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkId(i32);

impl WorkId {
    /// Creates a WorkId from a storage key.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the inner storage key.
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for WorkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WorkId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(Self)
            .map_err(|_| ValidationError::invalid_format("work_id", "not a numeric id"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_parses_numeric_metadata() {
        let id: UserId = "7".parse().unwrap();
        assert_eq!(id.as_i64(), 7);
    }

    #[test]
    fn user_id_parse_trims_whitespace() {
        let id: UserId = " 42 ".parse().unwrap();
        assert_eq!(id, UserId::new(42));
    }

    #[test]
    fn user_id_rejects_non_numeric() {
        let result = "user-abc".parse::<UserId>();
        assert!(matches!(result, Err(ValidationError::InvalidFormat { .. })));
    }

    #[test]
    fn work_id_displays_inner_value() {
        assert_eq!(WorkId::new(42).to_string(), "42");
    }

    #[test]
    fn work_id_serializes_transparently() {
        let json = serde_json::to_string(&WorkId::new(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn work_id_rejects_overflow() {
        assert!("99999999999".parse::<WorkId>().is_err());
    }
}
