use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};

use super::middleware::TraceId;
use crate::application::services::{ContactError, ContactRequest};
use crate::infrastructure::logging::Timer;
use crate::state::AppContext;

/// Contact form submission. Delivery is simulated.
pub async fn submit_contact(
    State(ctx): State<AppContext>,
    Extension(TraceId(trace_id)): Extension<TraceId>,
    Json(payload): Json<ContactRequest>,
) -> impl IntoResponse {
    let timer = Timer::start();
    ctx.logger.request(&trace_id, "POST", "/api/contact", &format!("from={}", payload.email));

    match ctx.contact_service.submit(&trace_id, payload).await {
        Ok(receipt) => {
            ctx.logger.response(&trace_id, "POST", "/api/contact", 200, &timer);
            (StatusCode::OK, Json(serde_json::json!(receipt)))
        }
        Err(e) => {
            ctx.logger.response(&trace_id, "POST", "/api/contact", 400, &timer);
            let field = match &e {
                ContactError::MissingField(field) => Some(*field),
                ContactError::InvalidEmail => Some("email"),
            };
            (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "success": false,
                    "error": "Something went wrong. Please try again later.",
                    "detail": e.to_string(),
                    "field": field,
                })),
            )
        }
    }
}
