//! Photo session entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of photo session, stored as a lowercase string
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    #[sea_orm(string_value = "wedding")]
    Wedding,
    #[sea_orm(string_value = "baptism")]
    Baptism,
    #[sea_orm(string_value = "communion")]
    Communion,
    #[sea_orm(string_value = "family")]
    Family,
    #[sea_orm(string_value = "newborn")]
    Newborn,
    #[sea_orm(string_value = "pregnancy")]
    Pregnancy,
    #[sea_orm(string_value = "portrait")]
    Portrait,
    #[sea_orm(string_value = "business")]
    Business,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photo_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub client_id: i64,

    pub session_date: DateTime,

    pub session_type: SessionType,

    /// Owned payment; one session per payment
    #[sea_orm(unique)]
    pub payment_id: i64,

    /// Owned photo delivery record
    #[sea_orm(unique)]
    pub photos_id: i64,

    /// Set once every payment flag is paid, never cleared
    pub is_contract_finished: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,

    #[sea_orm(
        belongs_to = "super::payment::Entity",
        from = "Column::PaymentId",
        to = "super::payment::Column::Id"
    )]
    Payment,

    #[sea_orm(
        belongs_to = "super::photos::Entity",
        from = "Column::PhotosId",
        to = "super::photos::Column::Id"
    )]
    Photos,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl Related<super::photos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
