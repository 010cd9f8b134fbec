//! SeaORM entity models
//!
//! Database entities for the photo studio

mod client;
mod payment;
mod photo_session;
mod photos;

pub use client::{
    Entity as ClientEntity,
    Model as Client,
    ActiveModel as ClientActiveModel,
    Column as ClientColumn,
};

pub use payment::{
    Entity as PaymentEntity,
    Model as Payment,
    ActiveModel as PaymentActiveModel,
    Column as PaymentColumn,
};

pub use photos::{
    Entity as PhotosEntity,
    Model as Photos,
    ActiveModel as PhotosActiveModel,
    Column as PhotosColumn,
};

pub use photo_session::{
    Entity as PhotoSessionEntity,
    Model as PhotoSession,
    ActiveModel as PhotoSessionActiveModel,
    Column as PhotoSessionColumn,
    SessionType,
};
