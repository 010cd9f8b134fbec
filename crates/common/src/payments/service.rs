//! Payment status updates
//!
//! Every update runs in a single transaction that locks the payment row and
//! its owning session row, so the flags and the contract state are committed
//! together or not at all.

use super::{ContractState, PaymentPatch, PaymentView};
use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::{AppError, Result};
use crate::metrics;
use sea_orm::{
    ActiveModelTrait, DatabaseTransaction, EntityTrait, ModelTrait, QuerySelect, Set,
    TransactionTrait,
};
use tracing::{debug, info};

/// What an update did, beyond the resulting view
struct PatchOutcome {
    view: PaymentView,
    changed: bool,
    finished_now: bool,
}

/// Applies paid-flag updates and closes contracts
#[derive(Clone)]
pub struct PaymentService {
    pool: DbPool,
}

impl PaymentService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Look up a payment and its owning session
    pub async fn find_payment(&self, payment_id: i64) -> Result<PaymentView> {
        let conn = self.pool.conn();

        let payment = PaymentEntity::find_by_id(payment_id)
            .one(conn)
            .await?
            .ok_or(AppError::PaymentNotFound { id: payment_id })?;

        let session = payment.find_related(PhotoSessionEntity).one(conn).await?;

        Ok(PaymentView::new(&payment, session.as_ref()))
    }

    /// Apply `patch` to the payment's flags.
    ///
    /// Fails with `InvalidRequest` for an empty patch, `PaymentNotFound` for an
    /// unknown id and `ContractFinished` when the owning session is already
    /// closed; none of these write anything. When all three flags end up
    /// paid, the session's contract is marked finished in the same
    /// transaction.
    pub async fn update_payment_status(
        &self,
        payment_id: i64,
        patch: &PaymentPatch,
    ) -> Result<PaymentView> {
        let result = self.apply_patch(payment_id, patch).await;

        match &result {
            Ok(outcome) => {
                metrics::record_payment_update(if outcome.changed { "updated" } else { "unchanged" });

                if outcome.finished_now {
                    metrics::record_contract_finished();
                    info!(
                        payment_id,
                        session_id = ?outcome.view.photo_session_id,
                        "Contract finished"
                    );
                }

                debug!(payment_id, changed = outcome.changed, "Payment status updated");
            }
            Err(err) => metrics::record_payment_update(outcome_label(err)),
        }

        result.map(|outcome| outcome.view)
    }

    async fn apply_patch(&self, payment_id: i64, patch: &PaymentPatch) -> Result<PatchOutcome> {
        patch.validate()?;

        let txn = self.pool.conn().begin().await?;

        let current = PaymentEntity::find_by_id(payment_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AppError::PaymentNotFound { id: payment_id })?;

        let session = current
            .find_related(PhotoSessionEntity)
            .lock_exclusive()
            .one(&txn)
            .await?;

        if let Some(ref session) = session {
            if ContractState::of(session) == ContractState::Finished {
                return Err(AppError::ContractFinished { payment_id });
            }
        }

        let mut updated = current.clone();
        let changed = patch.apply_to(&mut updated);

        if changed {
            let mut active: PaymentActiveModel = current.into();
            active.is_deposit_paid = Set(updated.is_deposit_paid);
            active.is_base_paid = Set(updated.is_base_paid);
            active.is_additional_paid = Set(updated.is_additional_paid);
            updated = active.update(&txn).await?;
        }

        // Checked against the stored post-update flags, including the ones
        // the patch left alone
        let (session, finished_now) = match session {
            Some(open) if updated.is_fully_paid() => (Some(finish_contract(&txn, open).await?), true),
            other => (other, false),
        };

        txn.commit().await?;

        Ok(PatchOutcome {
            view: PaymentView::new(&updated, session.as_ref()),
            changed,
            finished_now,
        })
    }
}

async fn finish_contract(txn: &DatabaseTransaction, session: PhotoSession) -> Result<PhotoSession> {
    let mut active: PhotoSessionActiveModel = session.into();
    active.is_contract_finished = Set(true);
    active.update(txn).await.map_err(Into::into)
}

fn outcome_label(err: &AppError) -> &'static str {
    match err {
        AppError::InvalidRequest { .. } => "invalid",
        AppError::PaymentNotFound { .. } => "not_found",
        AppError::ContractFinished { .. } => "conflict",
        _ => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::schema::create_tables;
    use crate::db::{NewSession, Repository};
    use sea_orm::NotSet;
    use tokio_test::assert_err;

    struct Fixture {
        service: PaymentService,
        repo: Repository,
        pool: DbPool,
    }

    async fn fixture() -> Fixture {
        let pool = DbPool::new(&DatabaseConfig::in_memory()).await.unwrap();
        create_tables(pool.conn()).await.unwrap();
        Fixture {
            service: PaymentService::new(pool.clone()),
            repo: Repository::new(pool.clone()),
            pool,
        }
    }

    /// Open session with payment {deposit: 50, base: 100, additional: 20}, all unpaid
    async fn open_session(fx: &Fixture) -> (PhotoSession, Payment) {
        let client = fx
            .repo
            .create_client("Maria".into(), "Lewandowska".into(), None, None)
            .await
            .unwrap();

        let created = fx
            .repo
            .create_session(NewSession {
                client_id: client.id,
                session_date: chrono::NaiveDate::from_ymd_opt(2026, 7, 4)
                    .unwrap()
                    .and_hms_opt(15, 30, 0)
                    .unwrap(),
                session_type: SessionType::Wedding,
                deposit: Some(50.0),
                base_payment: Some(100.0),
                additional_payment: Some(20.0),
            })
            .await
            .unwrap();

        (created.session, created.payment.unwrap())
    }

    async fn stored_session(fx: &Fixture, id: i64) -> PhotoSession {
        fx.repo.find_session_by_id(id).await.unwrap().unwrap().session
    }

    async fn stored_payment(fx: &Fixture, id: i64) -> Payment {
        fx.repo.find_payment_by_id(id).await.unwrap().unwrap()
    }

    fn patch(deposit: Option<bool>, base: Option<bool>, additional: Option<bool>) -> PaymentPatch {
        PaymentPatch {
            is_deposit_paid: deposit,
            is_base_paid: base,
            is_additional_paid: additional,
        }
    }

    #[tokio::test]
    async fn test_partial_patch_leaves_other_flags_and_contract_open() {
        let fx = fixture().await;
        let (session, payment) = open_session(&fx).await;

        let view = fx
            .service
            .update_payment_status(payment.id, &patch(Some(true), None, None))
            .await
            .unwrap();

        assert_eq!(view.is_deposit_paid, Some(true));
        assert_eq!(view.is_base_paid, Some(false));
        assert_eq!(view.is_additional_paid, Some(false));
        assert_eq!(view.deposit, Some(50.0));
        assert_eq!(view.photo_session_id, Some(session.id));
        assert_eq!(view.is_contract_finished, Some(false));

        assert!(!stored_session(&fx, session.id).await.is_contract_finished);
        assert_eq!(stored_payment(&fx, payment.id).await.is_deposit_paid, Some(true));
    }

    #[tokio::test]
    async fn test_all_flags_paid_finishes_contract() {
        let fx = fixture().await;
        let (session, payment) = open_session(&fx).await;

        let view = fx
            .service
            .update_payment_status(payment.id, &patch(Some(true), Some(true), Some(true)))
            .await
            .unwrap();

        assert_eq!(view.is_contract_finished, Some(true));
        assert!(stored_session(&fx, session.id).await.is_contract_finished);
    }

    #[tokio::test]
    async fn test_completion_counts_flags_set_by_earlier_patches() {
        let fx = fixture().await;
        let (session, payment) = open_session(&fx).await;

        fx.service
            .update_payment_status(payment.id, &patch(Some(true), None, None))
            .await
            .unwrap();
        let view = fx
            .service
            .update_payment_status(payment.id, &patch(None, Some(true), None))
            .await
            .unwrap();
        assert_eq!(view.is_contract_finished, Some(false));

        let view = fx
            .service
            .update_payment_status(payment.id, &patch(None, None, Some(true)))
            .await
            .unwrap();
        assert_eq!(view.is_contract_finished, Some(true));
        assert!(stored_session(&fx, session.id).await.is_contract_finished);
    }

    #[tokio::test]
    async fn test_open_contract_allows_unmarking_a_flag() {
        let fx = fixture().await;
        let (_, payment) = open_session(&fx).await;

        fx.service
            .update_payment_status(payment.id, &patch(Some(true), Some(true), None))
            .await
            .unwrap();
        let view = fx
            .service
            .update_payment_status(payment.id, &patch(None, Some(false), None))
            .await
            .unwrap();

        assert_eq!(view.is_deposit_paid, Some(true));
        assert_eq!(view.is_base_paid, Some(false));
    }

    #[tokio::test]
    async fn test_finished_contract_rejects_any_patch() {
        let fx = fixture().await;
        let (session, payment) = open_session(&fx).await;
        fx.service
            .update_payment_status(payment.id, &patch(Some(true), Some(true), Some(true)))
            .await
            .unwrap();

        let err = fx
            .service
            .update_payment_status(payment.id, &patch(Some(false), None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ContractFinished { payment_id } if payment_id == payment.id));

        let stored = stored_payment(&fx, payment.id).await;
        assert!(stored.is_fully_paid());
        assert!(stored_session(&fx, session.id).await.is_contract_finished);
    }

    #[tokio::test]
    async fn test_repeating_full_patch_is_safe() {
        let fx = fixture().await;
        let (session, payment) = open_session(&fx).await;
        let full = patch(Some(true), Some(true), Some(true));

        let first = fx.service.update_payment_status(payment.id, &full).await.unwrap();
        let second = fx.service.update_payment_status(payment.id, &full).await;

        assert!(matches!(second, Err(AppError::ContractFinished { .. })));
        assert_eq!(fx.service.find_payment(payment.id).await.unwrap(), first);
        assert!(stored_session(&fx, session.id).await.is_contract_finished);
    }

    #[tokio::test]
    async fn test_unknown_payment_is_not_found() {
        let fx = fixture().await;
        open_session(&fx).await;

        let err = fx
            .service
            .update_payment_status(99999, &patch(Some(true), None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PaymentNotFound { id: 99999 }));

        assert!(matches!(
            fx.service.find_payment(99999).await,
            Err(AppError::PaymentNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_patch_is_rejected_before_lookup() {
        let fx = fixture().await;
        let (_, payment) = open_session(&fx).await;

        let err = assert_err!(fx.service.update_payment_status(99999, &PaymentPatch::default()).await);
        assert!(matches!(err, AppError::InvalidRequest { .. }));

        let err = assert_err!(fx.service.update_payment_status(payment.id, &PaymentPatch::default()).await);
        assert!(matches!(err, AppError::InvalidRequest { .. }));
        assert_eq!(stored_payment(&fx, payment.id).await, payment);
    }

    #[tokio::test]
    async fn test_identical_values_leave_payment_as_is() {
        let fx = fixture().await;
        let (session, payment) = open_session(&fx).await;

        let view = fx
            .service
            .update_payment_status(payment.id, &patch(Some(false), Some(false), None))
            .await
            .unwrap();

        assert_eq!(view, PaymentView::new(&payment, Some(&session)));
        assert_eq!(stored_payment(&fx, payment.id).await, payment);
    }

    #[tokio::test]
    async fn test_payment_without_session_never_finishes() {
        let fx = fixture().await;
        let orphan = PaymentActiveModel {
            id: NotSet,
            deposit: Set(None),
            base_payment: Set(None),
            additional_payment: Set(None),
            is_deposit_paid: Set(None),
            is_base_paid: Set(None),
            is_additional_paid: Set(None),
        }
        .insert(fx.pool.conn())
        .await
        .unwrap();

        let view = fx
            .service
            .update_payment_status(orphan.id, &patch(Some(true), Some(true), Some(true)))
            .await
            .unwrap();

        assert_eq!(view.is_additional_paid, Some(true));
        assert_eq!(view.photo_session_id, None);
        assert_eq!(view.is_contract_finished, None);
    }

    #[tokio::test]
    async fn test_find_payment_sees_committed_update() {
        let fx = fixture().await;
        let (session, payment) = open_session(&fx).await;

        let updated = fx
            .service
            .update_payment_status(payment.id, &patch(None, Some(true), None))
            .await
            .unwrap();
        let found = fx.service.find_payment(payment.id).await.unwrap();

        assert_eq!(found, updated);
        assert_eq!(found.is_base_paid, Some(true));
        assert_eq!(found.photo_session_id, Some(session.id));
    }
}
