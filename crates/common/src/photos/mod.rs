//! Photo delivery status of a session
//!
//! Tracks whether the proofs were sent to the client, whether the client
//! picked their photos, and whether they picked additional ones. Delivery is
//! independent of payment, so these flags stay editable after the contract
//! is finished.

use crate::db::models::Photos;
use crate::errors::Result;
use crate::patch::{self, overwrite, present_bool};
use serde::{Deserialize, Serialize};

/// Photo delivery record as rendered by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotosView {
    pub id: i64,
    pub sent_to_client_for_choose: Option<bool>,
    pub chosen_by_client: Option<bool>,
    pub additional_chosen_by_client: Option<bool>,
}

impl From<&Photos> for PhotosView {
    fn from(photos: &Photos) -> Self {
        Self {
            id: photos.id,
            sent_to_client_for_choose: photos.sent_to_client_for_choose,
            chosen_by_client: photos.chosen_by_client,
            additional_chosen_by_client: photos.additional_chosen_by_client,
        }
    }
}

/// Delivery flags to overwrite. `None` leaves the stored value as is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhotosPatch {
    #[serde(default, deserialize_with = "present_bool", skip_serializing_if = "Option::is_none")]
    pub sent_to_client_for_choose: Option<bool>,

    #[serde(default, deserialize_with = "present_bool", skip_serializing_if = "Option::is_none")]
    pub chosen_by_client: Option<bool>,

    #[serde(default, deserialize_with = "present_bool", skip_serializing_if = "Option::is_none")]
    pub additional_chosen_by_client: Option<bool>,
}

impl PhotosPatch {
    /// Parse a raw request body; an object with no known flag is rejected
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let patch: Self = patch::from_slice(body, "photos patch")?;
        patch::require_any(patch.is_empty())?;
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.sent_to_client_for_choose.is_none()
            && self.chosen_by_client.is_none()
            && self.additional_chosen_by_client.is_none()
    }

    /// Returns whether any stored value changed
    pub fn apply_to(&self, photos: &mut Photos) -> bool {
        let mut changed = false;
        changed |= overwrite(&mut photos.sent_to_client_for_choose, self.sent_to_client_for_choose);
        changed |= overwrite(&mut photos.chosen_by_client, self.chosen_by_client);
        changed |= overwrite(
            &mut photos.additional_chosen_by_client,
            self.additional_chosen_by_client,
        );
        changed
    }
}
