use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde::Serialize;

use super::middleware::TraceId;
use crate::content::Recommendation;
use crate::infrastructure::logging::Timer;
use crate::state::AppContext;

#[derive(Serialize)]
struct RecommendationView<'a> {
    #[serde(flatten)]
    recommendation: &'a Recommendation,
    display_date: String,
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Header/footer/about data: everything except the list sections.
pub async fn get_site(
    State(ctx): State<AppContext>,
    Extension(TraceId(trace_id)): Extension<TraceId>,
) -> impl IntoResponse {
    let timer = Timer::start();
    ctx.logger.request(&trace_id, "GET", "/api/site", "");

    let content = &ctx.content;
    let body = serde_json::json!({
        "name": content.name,
        "title": content.title,
        "description": content.description,
        "main_nav": content.main_nav,
        "social": content.social,
        "contact": content.contact,
        "colors": content.colors,
        "theme": ctx.settings_service.theme().await,
    });

    ctx.logger.response(&trace_id, "GET", "/api/site", 200, &timer);
    (StatusCode::OK, Json(body))
}

pub async fn get_experience(
    State(ctx): State<AppContext>,
    Extension(TraceId(trace_id)): Extension<TraceId>,
) -> impl IntoResponse {
    let timer = Timer::start();
    ctx.logger.request(&trace_id, "GET", "/api/experience", "");

    let body = serde_json::json!({ "experience": ctx.content.experience });

    ctx.logger.response(&trace_id, "GET", "/api/experience", 200, &timer);
    (StatusCode::OK, Json(body))
}

pub async fn get_skills(
    State(ctx): State<AppContext>,
    Extension(TraceId(trace_id)): Extension<TraceId>,
) -> impl IntoResponse {
    let timer = Timer::start();
    ctx.logger.request(&trace_id, "GET", "/api/skills", "");

    let body = serde_json::json!({
        "skills": ctx.content.skills,
        "tech_icons": ctx.content.tech_icons,
    });

    ctx.logger.response(&trace_id, "GET", "/api/skills", 200, &timer);
    (StatusCode::OK, Json(body))
}

pub async fn get_recommendations(
    State(ctx): State<AppContext>,
    Extension(TraceId(trace_id)): Extension<TraceId>,
) -> impl IntoResponse {
    let timer = Timer::start();
    ctx.logger.request(&trace_id, "GET", "/api/recommendations", "");

    let recommendations: Vec<RecommendationView> = ctx
        .content
        .recommendations
        .iter()
        .map(|recommendation| RecommendationView {
            recommendation,
            display_date: recommendation.display_date(),
        })
        .collect();
    let body = serde_json::json!({ "recommendations": recommendations });

    ctx.logger.response(&trace_id, "GET", "/api/recommendations", 200, &timer);
    (StatusCode::OK, Json(body))
}
