//! Schema bootstrap
//!
//! Creates the tables straight from the SeaORM entities. Statements use
//! `IF NOT EXISTS`, so running this against an existing database is a no-op.

use crate::db::models::{ClientEntity, PaymentEntity, PhotoSessionEntity, PhotosEntity};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Schema};
use tracing::info;

/// Create every table in dependency order (owners of foreign keys last)
pub async fn create_tables<C: ConnectionTrait>(conn: &C) -> Result<()> {
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);

    let mut statements = vec![
        schema.create_table_from_entity(ClientEntity),
        schema.create_table_from_entity(PaymentEntity),
        schema.create_table_from_entity(PhotosEntity),
        schema.create_table_from_entity(PhotoSessionEntity),
    ];

    for stmt in statements.iter_mut() {
        stmt.if_not_exists();
        conn.execute(backend.build(&*stmt)).await?;
    }

    info!(tables = statements.len(), "Database schema ready");
    Ok(())
}
