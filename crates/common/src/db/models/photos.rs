//! Photo delivery entity, owned by a photo session

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub sent_to_client_for_choose: Option<bool>,

    pub chosen_by_client: Option<bool>,

    pub additional_chosen_by_client: Option<bool>,
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
