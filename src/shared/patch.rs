//! Tri-state field for partial updates.
//!
//! A JSON update body distinguishes three cases per field:
//!
//! | JSON                 | `Patch`          |
//! |----------------------|------------------|
//! | key missing          | `Patch::Absent`  |
//! | `"key": null`        | `Patch::Null`    |
//! | `"key": value`       | `Patch::Value`   |
//!
//! Fields must be annotated with `#[serde(default)]` so a missing key falls
//! back to `Absent`.

use serde::{Deserialize, Deserializer};

use crate::core::error::{AppError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// For fields that must always hold a value: `null` is rejected.
    pub fn into_required(self, field: &str) -> Result<Option<T>> {
        match self {
            Patch::Absent => Ok(None),
            Patch::Null => Err(AppError::Validation(format!("{} cannot be cleared", field))),
            Patch::Value(v) => Ok(Some(v)),
        }
    }

    /// For nullable fields: outer `None` leaves the field alone,
    /// `Some(None)` clears it.
    pub fn into_optional(self) -> Option<Option<T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }
}

impl Patch<String> {
    /// Required text: trimmed, must stay non-empty.
    pub fn into_required_text(self, field: &str) -> Result<Option<String>> {
        match self.into_required(field)? {
            None => Ok(None),
            Some(v) => {
                let trimmed = v.trim();
                if trimmed.is_empty() {
                    return Err(AppError::Validation(format!("{} cannot be empty", field)));
                }
                Ok(Some(trimmed.to_string()))
            }
        }
    }

    /// Optional text: trimmed, an empty string clears the field.
    pub fn into_optional_text(self) -> Option<Option<String>> {
        self.into_optional().map(|value| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
    }
}
