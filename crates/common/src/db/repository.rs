//! Repository pattern for database operations
//!
//! Provides a clean interface for the client, session and photo delivery
//! data access used by the HTTP handlers. Multi-row writes (creating or
//! deleting a session together with its owned records, or any change that
//! depends on a check of another row) run inside one transaction.
//! Payment status changes live in [`crate::payments::PaymentService`].

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use crate::metrics;
use crate::photos::PhotosPatch;
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    ModelTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::HashMap;

/// Input for scheduling a new photo session
#[derive(Debug, Clone)]
pub struct NewSession {
    pub client_id: i64,
    pub session_date: NaiveDateTime,
    pub session_type: SessionType,
    pub deposit: Option<f64>,
    pub base_payment: Option<f64>,
    pub additional_payment: Option<f64>,
}

/// Replacement schedule for an open session; payment flags are not touched
#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub client_id: i64,
    pub session_date: NaiveDateTime,
    pub session_type: SessionType,
}

/// A session with the payment and photo delivery records it owns
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDetails {
    pub session: PhotoSession,
    pub payment: Option<Payment>,
    pub photos: Option<Photos>,
}

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> &DatabaseConnection {
        self.pool.conn()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Client Operations
    // ========================================================================

    /// Create a new client
    pub async fn create_client(
        &self,
        first_name: String,
        last_name: String,
        email: Option<String>,
        phone_number: Option<String>,
    ) -> Result<Client> {
        let client = ClientActiveModel {
            id: NotSet,
            first_name: Set(first_name),
            last_name: Set(last_name),
            email: Set(email),
            phone_number: Set(phone_number),
        };

        client.insert(self.conn()).await.map_err(Into::into)
    }

    /// Find client by ID
    pub async fn find_client_by_id(&self, id: i64) -> Result<Option<Client>> {
        ClientEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }

    /// Replace a client's contact details
    pub async fn update_client(
        &self,
        id: i64,
        first_name: String,
        last_name: String,
        email: Option<String>,
        phone_number: Option<String>,
    ) -> Result<Client> {
        let client = ClientEntity::find_by_id(id)
            .one(self.conn())
            .await?
            .ok_or(AppError::ClientNotFound { id })?;

        let mut active: ClientActiveModel = client.into();
        active.first_name = Set(first_name);
        active.last_name = Set(last_name);
        active.email = Set(email);
        active.phone_number = Set(phone_number);

        active.update(self.conn()).await.map_err(Into::into)
    }

    /// Delete a client that has no sessions left
    pub async fn delete_client(&self, id: i64) -> Result<()> {
        let txn = self.conn().begin().await?;

        let client = ClientEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AppError::ClientNotFound { id })?;

        let sessions = client.find_related(PhotoSessionEntity).count(&txn).await?;
        if sessions > 0 {
            return Err(AppError::ClientHasSessions { id });
        }

        client.delete(&txn).await?;
        txn.commit().await?;

        Ok(())
    }

    /// Clients with at least one session whose contract is still open
    pub async fn list_current_clients(&self) -> Result<Vec<Client>> {
        let client_ids: Vec<i64> = PhotoSessionEntity::find()
            .filter(PhotoSessionColumn::IsContractFinished.eq(false))
            .all(self.conn())
            .await?
            .into_iter()
            .map(|session| session.client_id)
            .collect();

        if client_ids.is_empty() {
            return Ok(Vec::new());
        }

        ClientEntity::find()
            .filter(ClientColumn::Id.is_in(client_ids))
            .order_by_asc(ClientColumn::LastName)
            .order_by_asc(ClientColumn::FirstName)
            .all(self.conn())
            .await
            .map_err(Into::into)
    }

    // ========================================================================
    // Session Operations
    // ========================================================================

    /// Schedule a session with a fresh payment and photo delivery record.
    ///
    /// Payment and delivery flags start out as `false`; the contract starts
    /// open.
    pub async fn create_session(&self, new: NewSession) -> Result<SessionDetails> {
        let txn = self.conn().begin().await?;

        if ClientEntity::find_by_id(new.client_id).one(&txn).await?.is_none() {
            return Err(AppError::ClientNotFound { id: new.client_id });
        }

        let payment = PaymentActiveModel {
            id: NotSet,
            deposit: Set(new.deposit),
            base_payment: Set(new.base_payment),
            additional_payment: Set(new.additional_payment),
            is_deposit_paid: Set(Some(false)),
            is_base_paid: Set(Some(false)),
            is_additional_paid: Set(Some(false)),
        }
        .insert(&txn)
        .await?;

        let photos = PhotosActiveModel {
            id: NotSet,
            sent_to_client_for_choose: Set(Some(false)),
            chosen_by_client: Set(Some(false)),
            additional_chosen_by_client: Set(Some(false)),
        }
        .insert(&txn)
        .await?;

        let session = PhotoSessionActiveModel {
            id: NotSet,
            client_id: Set(new.client_id),
            session_date: Set(new.session_date),
            session_type: Set(new.session_type),
            payment_id: Set(payment.id),
            photos_id: Set(photos.id),
            is_contract_finished: Set(false),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        metrics::record_session_created(&session.session_type.to_value());

        Ok(SessionDetails {
            session,
            payment: Some(payment),
            photos: Some(photos),
        })
    }

    /// Find session by ID together with its payment and photos
    pub async fn find_session_by_id(&self, id: i64) -> Result<Option<SessionDetails>> {
        match PhotoSessionEntity::find_by_id(id).one(self.conn()).await? {
            Some(session) => Ok(Some(load_details(self.conn(), session).await?)),
            None => Ok(None),
        }
    }

    /// Sessions whose contract is still open, earliest first
    pub async fn list_unfinished_sessions(&self) -> Result<Vec<SessionDetails>> {
        let sessions = PhotoSessionEntity::find()
            .filter(PhotoSessionColumn::IsContractFinished.eq(false))
            .order_by_asc(PhotoSessionColumn::SessionDate)
            .find_also_related(PaymentEntity)
            .all(self.conn())
            .await?;

        let photos_ids: Vec<i64> = sessions.iter().map(|(s, _)| s.photos_id).collect();
        let mut photos: HashMap<i64, Photos> = PhotosEntity::find()
            .filter(PhotosColumn::Id.is_in(photos_ids))
            .all(self.conn())
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(sessions
            .into_iter()
            .map(|(session, payment)| SessionDetails {
                photos: photos.remove(&session.photos_id),
                session,
                payment,
            })
            .collect())
    }

    /// Reschedule an open session.
    ///
    /// Fails with `SessionNotFound`, then `SessionUpdateNotAllowed` once the
    /// contract is finished, then `ClientNotFound` for an unknown new client.
    pub async fn update_session(&self, id: i64, update: SessionUpdate) -> Result<SessionDetails> {
        let txn = self.conn().begin().await?;

        let session = PhotoSessionEntity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AppError::SessionNotFound { id })?;

        if session.is_contract_finished {
            return Err(AppError::SessionUpdateNotAllowed { id });
        }

        if ClientEntity::find_by_id(update.client_id).one(&txn).await?.is_none() {
            return Err(AppError::ClientNotFound { id: update.client_id });
        }

        let mut active: PhotoSessionActiveModel = session.into();
        active.client_id = Set(update.client_id);
        active.session_date = Set(update.session_date);
        active.session_type = Set(update.session_type);
        let session = active.update(&txn).await?;

        let details = load_details(&txn, session).await?;
        txn.commit().await?;

        Ok(details)
    }

    /// Overwrite the photo delivery flags present in `patch`
    pub async fn update_photos(
        &self,
        session_id: i64,
        patch: &PhotosPatch,
    ) -> Result<SessionDetails> {
        let txn = self.conn().begin().await?;

        let session = PhotoSessionEntity::find_by_id(session_id)
            .one(&txn)
            .await?
            .ok_or(AppError::SessionNotFound { id: session_id })?;

        let current = PhotosEntity::find_by_id(session.photos_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::Internal {
                message: format!("Photo session {} has no photo delivery record", session_id),
            })?;

        let mut updated = current.clone();
        if patch.apply_to(&mut updated) {
            let mut active: PhotosActiveModel = current.into();
            active.sent_to_client_for_choose = Set(updated.sent_to_client_for_choose);
            active.chosen_by_client = Set(updated.chosen_by_client);
            active.additional_chosen_by_client = Set(updated.additional_chosen_by_client);
            active.update(&txn).await?;
        }

        let details = load_details(&txn, session).await?;
        txn.commit().await?;

        Ok(details)
    }

    /// Delete a session along with its payment and photo delivery record
    pub async fn delete_session(&self, id: i64) -> Result<()> {
        let txn = self.conn().begin().await?;

        let session = PhotoSessionEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(AppError::SessionNotFound { id })?;

        let payment_id = session.payment_id;
        let photos_id = session.photos_id;

        session.delete(&txn).await?;
        PaymentEntity::delete_by_id(payment_id).exec(&txn).await?;
        PhotosEntity::delete_by_id(photos_id).exec(&txn).await?;

        txn.commit().await?;

        Ok(())
    }

    // ========================================================================
    // Payment Operations
    // ========================================================================

    /// Find payment by ID
    pub async fn find_payment_by_id(&self, id: i64) -> Result<Option<Payment>> {
        PaymentEntity::find_by_id(id)
            .one(self.conn())
            .await
            .map_err(Into::into)
    }
}

async fn load_details<C>(conn: &C, session: PhotoSession) -> Result<SessionDetails>
where
    C: ConnectionTrait,
{
    let payment = PaymentEntity::find_by_id(session.payment_id).one(conn).await?;
    let photos = PhotosEntity::find_by_id(session.photos_id).one(conn).await?;

    Ok(SessionDetails {
        session,
        payment,
        photos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::schema::create_tables;

    async fn repository() -> Repository {
        let pool = DbPool::new(&DatabaseConfig::in_memory()).await.unwrap();
        create_tables(pool.conn()).await.unwrap();
        Repository::new(pool)
    }

    fn at(day: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 6, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn new_session(client_id: i64, day: u32) -> NewSession {
        NewSession {
            client_id,
            session_date: at(day),
            session_type: SessionType::Family,
            deposit: Some(50.0),
            base_payment: Some(100.0),
            additional_payment: Some(20.0),
        }
    }

    async fn finish(repo: &Repository, session: PhotoSession) {
        let mut active: PhotoSessionActiveModel = session.into();
        active.is_contract_finished = Set(true);
        active.update(repo.conn()).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_session_creates_owned_records() {
        let repo = repository().await;
        let client = repo
            .create_client("Anna".into(), "Nowak".into(), Some("anna@example.com".into()), None)
            .await
            .unwrap();

        let created = repo.create_session(new_session(client.id, 1)).await.unwrap();
        let payment = created.payment.clone().unwrap();
        let photos = created.photos.clone().unwrap();

        assert_eq!(created.session.client_id, client.id);
        assert_eq!(created.session.payment_id, payment.id);
        assert_eq!(created.session.photos_id, photos.id);
        assert!(!created.session.is_contract_finished);
        assert_eq!(payment.deposit, Some(50.0));
        assert_eq!(payment.is_deposit_paid, Some(false));
        assert_eq!(photos.chosen_by_client, Some(false));

        let found = repo.find_session_by_id(created.session.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_create_session_for_unknown_client_writes_nothing() {
        let repo = repository().await;

        let err = repo.create_session(new_session(42, 1)).await.unwrap_err();
        assert!(matches!(err, AppError::ClientNotFound { id: 42 }));

        let payments = PaymentEntity::find().count(repo.conn()).await.unwrap();
        assert_eq!(payments, 0);
    }

    #[tokio::test]
    async fn test_delete_session_removes_owned_records() {
        let repo = repository().await;
        let client = repo
            .create_client("Jan".into(), "Kowalski".into(), None, Some("600100200".into()))
            .await
            .unwrap();
        let created = repo.create_session(new_session(client.id, 2)).await.unwrap();
        let session = created.session;

        repo.delete_session(session.id).await.unwrap();

        assert!(repo.find_session_by_id(session.id).await.unwrap().is_none());
        assert!(repo.find_payment_by_id(session.payment_id).await.unwrap().is_none());
        let photos = PhotosEntity::find().count(repo.conn()).await.unwrap();
        assert_eq!(photos, 0);

        let err = repo.delete_session(session.id).await.unwrap_err();
        assert!(matches!(err, AppError::SessionNotFound { .. }));
    }

    #[tokio::test]
    async fn test_unfinished_sessions_and_current_clients() {
        let repo = repository().await;
        let open = repo.create_client("Ewa".into(), "Zielinska".into(), None, None).await.unwrap();
        let done = repo.create_client("Adam".into(), "Wisniewski".into(), None, None).await.unwrap();

        let later = repo.create_session(new_session(open.id, 20)).await.unwrap();
        let earlier = repo.create_session(new_session(open.id, 5)).await.unwrap();
        let finished = repo.create_session(new_session(done.id, 10)).await.unwrap();
        finish(&repo, finished.session).await;

        let sessions = repo.list_unfinished_sessions().await.unwrap();
        assert_eq!(sessions, vec![earlier, later]);

        let clients = repo.list_current_clients().await.unwrap();
        assert_eq!(clients, vec![open]);
    }

    #[tokio::test]
    async fn test_update_client() {
        let repo = repository().await;
        let client = repo.create_client("Ola".into(), "Nowak".into(), None, None).await.unwrap();

        let updated = repo
            .update_client(
                client.id,
                "Aleksandra".into(),
                "Nowak".into(),
                Some("ola@example.com".into()),
                None,
            )
            .await
            .unwrap();
        assert_eq!(updated.id, client.id);
        assert_eq!(updated.first_name, "Aleksandra");
        assert_eq!(repo.find_client_by_id(client.id).await.unwrap(), Some(updated));

        let err = repo
            .update_client(99, "A".into(), "B".into(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ClientNotFound { id: 99 }));
    }

    #[tokio::test]
    async fn test_delete_client_refuses_while_sessions_exist() {
        let repo = repository().await;
        let client = repo.create_client("Piotr".into(), "Lis".into(), None, None).await.unwrap();
        let created = repo.create_session(new_session(client.id, 3)).await.unwrap();

        let err = repo.delete_client(client.id).await.unwrap_err();
        assert!(matches!(err, AppError::ClientHasSessions { .. }));
        assert!(repo.find_client_by_id(client.id).await.unwrap().is_some());

        repo.delete_session(created.session.id).await.unwrap();
        repo.delete_client(client.id).await.unwrap();
        assert!(repo.find_client_by_id(client.id).await.unwrap().is_none());

        let err = repo.delete_client(client.id).await.unwrap_err();
        assert!(matches!(err, AppError::ClientNotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_session_leaves_payment_alone() {
        let repo = repository().await;
        let first = repo.create_client("Ewa".into(), "Lis".into(), None, None).await.unwrap();
        let second = repo.create_client("Jan".into(), "Lis".into(), None, None).await.unwrap();
        let created = repo.create_session(new_session(first.id, 1)).await.unwrap();

        let updated = repo
            .update_session(
                created.session.id,
                SessionUpdate {
                    client_id: second.id,
                    session_date: at(15),
                    session_type: SessionType::Wedding,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.session.client_id, second.id);
        assert_eq!(updated.session.session_date, at(15));
        assert_eq!(updated.session.session_type, SessionType::Wedding);
        assert_eq!(updated.payment, created.payment);
        assert_eq!(updated.photos, created.photos);
    }

    #[tokio::test]
    async fn test_update_session_failures() {
        let repo = repository().await;
        let client = repo.create_client("Ewa".into(), "Lis".into(), None, None).await.unwrap();
        let created = repo.create_session(new_session(client.id, 1)).await.unwrap();
        let update = |client_id| SessionUpdate {
            client_id,
            session_date: at(2),
            session_type: SessionType::Portrait,
        };

        let err = repo.update_session(500, update(client.id)).await.unwrap_err();
        assert!(matches!(err, AppError::SessionNotFound { id: 500 }));

        let err = repo.update_session(created.session.id, update(77)).await.unwrap_err();
        assert!(matches!(err, AppError::ClientNotFound { id: 77 }));

        finish(&repo, created.session.clone()).await;
        let err = repo
            .update_session(created.session.id, update(client.id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SessionUpdateNotAllowed { .. }));

        let stored = repo.find_session_by_id(created.session.id).await.unwrap().unwrap();
        assert_eq!(stored.session.session_date, at(1));
    }

    #[tokio::test]
    async fn test_update_photos() {
        let repo = repository().await;
        let client = repo.create_client("Ewa".into(), "Lis".into(), None, None).await.unwrap();
        let created = repo.create_session(new_session(client.id, 1)).await.unwrap();
        let patch = PhotosPatch {
            sent_to_client_for_choose: Some(true),
            ..Default::default()
        };

        let updated = repo.update_photos(created.session.id, &patch).await.unwrap();
        let photos = updated.photos.unwrap();
        assert_eq!(photos.sent_to_client_for_choose, Some(true));
        assert_eq!(photos.chosen_by_client, Some(false));
        assert_eq!(updated.payment, created.payment);

        let err = repo.update_photos(404, &patch).await.unwrap_err();
        assert!(matches!(err, AppError::SessionNotFound { id: 404 }));
    }
}
