//! Strongly-typed identifiers used across the domain.
//!
//! Records are keyed by integer identity assigned by the backend. Workflow
//! commands carry a time-ordered [`CommandId`] so the writes of one command can
//! be correlated in logs.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a vaccine catalog entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaccineId(u64);

/// Identifier of an inventory lot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LotId(u64);

/// Identifier of a shipment receipt.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(u64);

/// Identifier of an administration record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdministrationId(u64);

/// Identifier of a loss record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LossId(u64);

macro_rules! impl_integer_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_integer_newtype!(VaccineId, "VaccineId");
impl_integer_newtype!(LotId, "LotId");
impl_integer_newtype!(ReceiptId, "ReceiptId");
impl_integer_newtype!(AdministrationId, "AdministrationId");
impl_integer_newtype!(LossId, "LossId");

/// Identifier of one workflow command (receive, administer, report loss).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(Uuid);

impl CommandId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CommandId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for CommandId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_form_input_with_whitespace() {
        let id: LotId = " 42 ".parse().unwrap();
        assert_eq!(id.get(), 42);
    }

    #[test]
    fn rejects_non_numeric_identifier() {
        let err = "abc".parse::<VaccineId>().unwrap_err();
        match err {
            DomainError::InvalidId(msg) => assert!(msg.starts_with("VaccineId")),
            other => panic!("expected InvalidId, got {other:?}"),
        }
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&ReceiptId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn command_ids_are_unique() {
        assert_ne!(CommandId::new(), CommandId::new());
    }
}
