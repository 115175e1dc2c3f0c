use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use courier_core_contact_contracts::{ContactFeatureService, ContactSubmitError};
use serde::Serialize;

use crate::{
    errors::internal_server_error,
    extractors::json_or_form::JsonOrForm,
    models::{contact::ApiContactSubmission, ApiMessage},
};

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route("/api/contact/", routing::post(submit))
        .with_state(service)
}

#[derive(Serialize)]
struct ApiSendFailure {
    error: String,
}

async fn submit(
    service: State<Arc<impl ContactFeatureService>>,
    JsonOrForm(submission): JsonOrForm<ApiContactSubmission>,
) -> Response {
    match service.submit(submission.into()).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(ApiMessage {
                message: "Message sent successfully",
            }),
        )
            .into_response(),
        Err(ContactSubmitError::Validation(errors)) => {
            (StatusCode::BAD_REQUEST, Json(errors)).into_response()
        }
        Err(err @ ContactSubmitError::Send(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiSendFailure {
                error: err.to_string(),
            }),
        )
            .into_response(),
        Err(ContactSubmitError::Other(err)) => internal_server_error(err),
    }
}
