use std::sync::Arc;

use axum::{
    body::{self, Body},
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::AppState;

/// `POST /`: every well-formed request gets an empty 200, whether or not the
/// payload was stored.
pub async fn ingest(State(app_state): State<Arc<AppState>>, request: Request) -> Response {
    let (parts, request_body) = request.into_parts();
    let bytes = match body::to_bytes(request_body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("failed to read request body: {err}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    // An empty body reads as an empty object, which has no device id.
    if bytes.is_empty() {
        debug!("ignoring request with an empty body");
        return StatusCode::OK.into_response();
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    let payload = match Json::<Value>::from_request(request, &()).await {
        Ok(Json(payload)) => payload,
        // Non-JSON requests carry no payload to inspect.
        Err(JsonRejection::MissingJsonContentType(_)) => {
            debug!("ignoring request without a JSON content type");
            return StatusCode::OK.into_response();
        }
        Err(rejection) => {
            warn!("rejecting request body: {rejection}");
            return rejection.into_response();
        }
    };

    match app_state.ingestor().ingest(&payload).await {
        Ok(_) => StatusCode::OK.into_response(),
        Err(err) => {
            error!("failed to store payload: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
