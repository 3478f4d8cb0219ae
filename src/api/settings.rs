use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde::Deserialize;

use super::middleware::TraceId;
use crate::application::services::Theme;
use crate::infrastructure::logging::Timer;
use crate::state::AppContext;

#[derive(Debug, Deserialize)]
pub struct SetThemeRequest {
    pub theme: String,
}

pub async fn get_theme(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(serde_json::json!({ "theme": ctx.settings_service.theme().await }))
}

pub async fn set_theme(
    State(ctx): State<AppContext>,
    Extension(TraceId(trace_id)): Extension<TraceId>,
    Json(payload): Json<SetThemeRequest>,
) -> impl IntoResponse {
    let timer = Timer::start();
    ctx.logger.request(&trace_id, "POST", "/api/settings/theme", &format!("theme={}", payload.theme));

    let theme: Theme = match payload.theme.parse() {
        Ok(theme) => theme,
        Err(e) => {
            ctx.logger.response(&trace_id, "POST", "/api/settings/theme", 400, &timer);
            return (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": e })));
        }
    };

    let theme = ctx.settings_service.update_theme(theme).await;

    ctx.logger.response(&trace_id, "POST", "/api/settings/theme", 200, &timer);
    (StatusCode::OK, Json(serde_json::json!({ "success": true, "theme": theme })))
}
