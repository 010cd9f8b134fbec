//! Partial update of a payment's paid flags
//!
//! Parsing is two-phase: the body must first be a JSON object, then it is
//! decoded into [`PaymentPatch`], whose schema rejects unknown keys, `null`
//! values and non-boolean values. A request that fails either phase is
//! rejected as a whole.

use crate::db::models::Payment;
use crate::errors::Result;
use crate::patch::{self, overwrite, present_bool};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Flags to overwrite on a payment. `None` leaves the stored value as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PaymentPatch {
    #[serde(default, deserialize_with = "present_bool", skip_serializing_if = "Option::is_none")]
    pub is_deposit_paid: Option<bool>,

    #[serde(default, deserialize_with = "present_bool", skip_serializing_if = "Option::is_none")]
    pub is_base_paid: Option<bool>,

    #[serde(default, deserialize_with = "present_bool", skip_serializing_if = "Option::is_none")]
    pub is_additional_paid: Option<bool>,
}

impl PaymentPatch {
    /// Parse a raw request body
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let patch: Self = patch::from_slice(body, "payment patch")?;
        patch.validate()?;
        Ok(patch)
    }

    /// Decode an already-parsed JSON body
    pub fn from_value(body: Value) -> Result<Self> {
        let patch: Self = patch::from_value(body, "payment patch")?;
        patch.validate()?;
        Ok(patch)
    }

    /// No recognized field is present
    pub fn is_empty(&self) -> bool {
        self.is_deposit_paid.is_none()
            && self.is_base_paid.is_none()
            && self.is_additional_paid.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        patch::require_any(self.is_empty())
    }

    /// Overwrite the flags present in the patch. Returns whether any stored
    /// value actually changed.
    pub fn apply_to(&self, payment: &mut Payment) -> bool {
        let mut changed = false;
        changed |= overwrite(&mut payment.is_deposit_paid, self.is_deposit_paid);
        changed |= overwrite(&mut payment.is_base_paid, self.is_base_paid);
        changed |= overwrite(&mut payment.is_additional_paid, self.is_additional_paid);
        changed
    }
}
