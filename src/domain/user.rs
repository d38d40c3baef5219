//! User records as read by the core.
//!
//! Users are created and updated by the user-management collaborator; the
//! core only ever reads them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;

/// Biological sex, selecting the Widmark distribution ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BiologicalSex {
    /// Male (`r = 0.68`).
    #[serde(alias = "MALE")]
    Male,
    /// Female (`r = 0.55`).
    #[serde(alias = "FEMALE")]
    Female,
}

impl BiologicalSex {
    /// Canonical lowercase storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for BiologicalSex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BiologicalSex {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(ValidationError::new(
                "sex",
                format!("unknown value `{other}`"),
            )),
        }
    }
}

/// A user as seen by drink validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Opaque identifier (e.g. an email address).
    pub user_id: String,
    /// Biological sex.
    pub sex: BiologicalSex,
    /// Body weight in kilograms, always positive.
    pub weight_kg: f64,
    /// Optional guardian / emergency contact reference.
    pub primary_contact: Option<String>,
    /// Service-denial override: when set, no drink is ever accepted.
    pub is_cut_off: bool,
}

impl User {
    /// Builds a user that is not cut off and has no contact.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `user_id` is empty or `weight_kg` is
    /// not strictly positive.
    pub fn new(
        user_id: impl Into<String>,
        sex: BiologicalSex,
        weight_kg: f64,
    ) -> Result<Self, ValidationError> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(ValidationError::new("user_id", "must not be empty"));
        }
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(ValidationError::new(
                "weight_kg",
                "must be greater than zero",
            ));
        }
        Ok(Self {
            user_id,
            sex,
            weight_kg,
            primary_contact: None,
            is_cut_off: false,
        })
    }

    /// Sets the cut-off flag.
    #[must_use]
    pub fn with_cut_off(mut self, is_cut_off: bool) -> Self {
        self.is_cut_off = is_cut_off;
        self
    }

    /// Sets the contact reference.
    #[must_use]
    pub fn with_primary_contact(mut self, contact: impl Into<String>) -> Self {
        self.primary_contact = Some(contact.into());
        self
    }
}
