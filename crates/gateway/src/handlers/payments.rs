//! Payment status handlers

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};

use crate::{
    extract::{path_id, RawBody},
    AppState,
};
use photostudio_common::{
    errors::Result,
    payments::{PaymentPatch, PaymentService, PaymentView},
};

/// Get a payment with its session's contract state
pub async fn get_payment(
    State(state): State<AppState>,
    payment_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<PaymentView>> {
    let payment_id = path_id(payment_id, "paymentId")?;
    let service = PaymentService::new(state.db.clone());

    Ok(Json(service.find_payment(payment_id).await?))
}

/// Partially update a payment's paid flags.
///
/// The body is checked before the payment is looked up, so a malformed
/// body is a 400 even for an unknown id.
pub async fn patch_payment(
    State(state): State<AppState>,
    payment_id: std::result::Result<Path<i64>, PathRejection>,
    RawBody(body): RawBody,
) -> Result<Json<PaymentView>> {
    let payment_id = path_id(payment_id, "paymentId")?;
    let patch = PaymentPatch::from_slice(&body)?;

    let service = PaymentService::new(state.db.clone());
    let payment = service.update_payment_status(payment_id, &patch).await?;

    tracing::info!(
        payment_id,
        is_contract_finished = ?payment.is_contract_finished,
        "Payment status patched"
    );

    Ok(Json(payment))
}
