use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::Response,
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::errors::error;

/// Request body extractor which accepts both `application/json` and
/// `application/x-www-form-urlencoded` payloads.
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mime = request
            .headers()
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .unwrap_or_default();

        match essence(&mime).as_str() {
            "application/json" => Json::<T>::from_request(request, state)
                .await
                .map(|Json(value)| Self(value))
                .map_err(|err| error(StatusCode::BAD_REQUEST, err.body_text())),
            "application/x-www-form-urlencoded" => Form::<T>::from_request(request, state)
                .await
                .map(|Form(value)| Self(value))
                .map_err(|err| error(StatusCode::BAD_REQUEST, err.body_text())),
            _ => Err(error(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("Unsupported media type \"{mime}\" in request."),
            )),
        }
    }
}

/// Strips parameters like `charset` from a mime type.
fn essence(mime: &str) -> String {
    mime.split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
