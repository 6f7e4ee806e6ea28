//! Billing webhook handler.
//!
//! Receives signed upgrade confirmations from the payment processor and
//! flips the profile's premium flag. Entirely decoupled from the
//! interactive dashboard, which only ever re-reads the flag.

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::db::ProfileRepository;
use crate::error::AppError;
use crate::services::BillingEvent;
use crate::state::AppState;

/// POST /api/billing/webhook - handle a signed billing event.
///
/// Answers 503 when no webhook secret is configured (billing disabled),
/// 401 for a bad signature with no state change, and `{"received":true}`
/// once the event is processed. Unknown event types are acknowledged and
/// ignored so the processor doesn't retry them forever.
#[instrument(skip(state, headers, body))]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let verifier = state
        .webhook_verifier()
        .ok_or_else(|| AppError::NotConfigured("billing is not configured".into()))?;

    // Extract headers for signature verification
    let timestamp = headers
        .get("X-Proofy-Timestamp")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing timestamp header".into()))?;

    let signature = headers
        .get("X-Proofy-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing signature header".into()))?;

    // Verify signature before parsing anything
    verifier
        .verify_signature(timestamp, &body, signature)
        .map_err(|e| AppError::Unauthorized(e.to_string()))?;

    let event: BillingEvent = serde_json::from_str(&body)
        .map_err(|e| AppError::BadRequest(format!("Failed to parse event: {e}")))?;

    if event.event == BillingEvent::UPGRADE_COMPLETED {
        let profiles = ProfileRepository::new(state.pool());
        profiles.set_premium(event.user_id, true).await?;
        info!(user_id = %event.user_id, "premium upgrade confirmed");
    } else {
        warn!(event = %event.event, "ignoring unknown billing event type");
    }

    Ok(Json(json!({ "received": true })))
}
