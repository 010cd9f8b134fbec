//! Payment status tracking and contract completion
//!
//! A photo session's contract is `Open` until its payment has the deposit,
//! base and additional amounts all marked paid, at which point it moves to
//! `Finished` for good. Once finished, the payment's flags are frozen.

mod patch;
mod service;

pub use patch::PaymentPatch;
pub use service::PaymentService;

use crate::db::models::{Payment, PhotoSession};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Contract state of a photo session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractState {
    Open,
    Finished,
}

impl ContractState {
    pub fn of(session: &PhotoSession) -> Self {
        if session.is_contract_finished {
            ContractState::Finished
        } else {
            ContractState::Open
        }
    }
}

impl fmt::Display for ContractState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractState::Open => write!(f, "open"),
            ContractState::Finished => write!(f, "finished"),
        }
    }
}

/// Payment as rendered by the API, with its owning session's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub id: i64,
    pub deposit: Option<f64>,
    pub base_payment: Option<f64>,
    pub additional_payment: Option<f64>,
    pub is_deposit_paid: Option<bool>,
    pub is_base_paid: Option<bool>,
    pub is_additional_paid: Option<bool>,
    /// `None` for a payment no session owns
    pub photo_session_id: Option<i64>,
    pub is_contract_finished: Option<bool>,
}

impl PaymentView {
    pub fn new(payment: &Payment, session: Option<&PhotoSession>) -> Self {
        Self {
            id: payment.id,
            deposit: payment.deposit,
            base_payment: payment.base_payment,
            additional_payment: payment.additional_payment,
            is_deposit_paid: payment.is_deposit_paid,
            is_base_paid: payment.is_base_paid,
            is_additional_paid: payment.is_additional_paid,
            photo_session_id: session.map(|s| s.id),
            is_contract_finished: session.map(|s| s.is_contract_finished),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::SessionType;

    #[test]
    fn test_view_serializes_camel_case() {
        let payment = Payment {
            id: 5,
            deposit: Some(50.0),
            base_payment: Some(100.0),
            additional_payment: None,
            is_deposit_paid: Some(true),
            is_base_paid: Some(false),
            is_additional_paid: None,
        };
        let session = PhotoSession {
            id: 9,
            client_id: 1,
            session_date: chrono::NaiveDate::from_ymd_opt(2026, 5, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            session_type: SessionType::Wedding,
            payment_id: 5,
            photos_id: 3,
            is_contract_finished: false,
        };

        let json = serde_json::to_value(PaymentView::new(&payment, Some(&session))).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["basePayment"], 100.0);
        assert_eq!(json["isDepositPaid"], true);
        assert_eq!(json["isAdditionalPaid"], serde_json::Value::Null);
        assert_eq!(json["photoSessionId"], 9);
        assert_eq!(json["isContractFinished"], false);
        assert_eq!(ContractState::of(&session), ContractState::Open);
    }
}
