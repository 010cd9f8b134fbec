//! Payment entity
//!
//! Amounts owed for a photo session plus one tri-state paid flag per amount.
//! The owning session holds `payment_id`; a payment has no column pointing
//! back, so its session is found through [`Relation::PhotoSession`].

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub deposit: Option<f64>,

    pub base_payment: Option<f64>,

    pub additional_payment: Option<f64>,

    pub is_deposit_paid: Option<bool>,

    pub is_base_paid: Option<bool>,

    pub is_additional_paid: Option<bool>,
}

impl Model {
    /// All three amounts are marked paid. Unset flags count as unpaid.
    pub fn is_fully_paid(&self) -> bool {
        self.is_deposit_paid == Some(true)
            && self.is_base_paid == Some(true)
            && self.is_additional_paid == Some(true)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::photo_session::Entity")]
    PhotoSession,
}

impl Related<super::photo_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PhotoSession.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
