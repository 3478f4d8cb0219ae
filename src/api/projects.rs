use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use super::middleware::TraceId;
use crate::application::services::ShowcaseFilter;
use crate::domain::Category;
use crate::infrastructure::logging::Timer;
use crate::state::AppContext;

pub fn projects_routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(list_projects))
        .route("/featured", get(featured_projects))
        .route("/repositories", get(list_repositories))
        .route("/technologies", get(list_technologies))
        .route("/languages", get(list_languages))
}

#[derive(Debug, Deserialize)]
pub struct ProjectsQuery {
    pub category: Option<String>,
    pub technology: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoriesQuery {
    pub language: Option<String>,
}

#[derive(Serialize)]
struct CategoryEntry {
    label: &'static str,
    slug: &'static str,
}

/// Blank and "all" mean no filter.
fn parse_value(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        .map(str::to_string)
}

/// "", "all" and a missing parameter all mean no filter.
fn parse_filter(raw: Option<&str>) -> Result<Option<Category>, String> {
    match raw.map(str::trim) {
        None => Ok(None),
        Some(raw) if raw.is_empty() || raw.eq_ignore_ascii_case("all") => Ok(None),
        Some(raw) => raw.parse().map(Some),
    }
}

async fn list_projects(
    State(ctx): State<AppContext>,
    Extension(TraceId(trace_id)): Extension<TraceId>,
    Query(params): Query<ProjectsQuery>,
) -> Response {
    let timer = Timer::start();
    let path = "/api/projects";
    ctx.logger.request(&trace_id, "GET", path, &format!("{:?}", params));

    let category = match parse_filter(params.category.as_deref()) {
        Ok(category) => category,
        Err(e) => {
            ctx.logger.response(&trace_id, "GET", path, 400, &timer);
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": e,
                    "categories": Category::ALL,
                })),
            )
                .into_response();
        }
    };

    let filter = ShowcaseFilter {
        category,
        technology: parse_value(params.technology.as_deref()),
        language: parse_value(params.language.as_deref()),
    };
    let view = ctx.showcase_service.showcase(&trace_id, &filter).await;

    ctx.logger.response(&trace_id, "GET", path, 200, &timer);
    (StatusCode::OK, Json(view)).into_response()
}

async fn featured_projects(
    State(ctx): State<AppContext>,
    Extension(TraceId(trace_id)): Extension<TraceId>,
) -> impl IntoResponse {
    let timer = Timer::start();
    ctx.logger.request(&trace_id, "GET", "/api/projects/featured", "");

    let featured = ctx.showcase_service.featured_projects();

    ctx.logger.response(&trace_id, "GET", "/api/projects/featured", 200, &timer);
    (StatusCode::OK, Json(serde_json::json!({ "projects": featured })))
}

async fn list_repositories(
    State(ctx): State<AppContext>,
    Extension(TraceId(trace_id)): Extension<TraceId>,
    Query(params): Query<RepositoriesQuery>,
) -> impl IntoResponse {
    let timer = Timer::start();
    ctx.logger.request(
        &trace_id,
        "GET",
        "/api/projects/repositories",
        &format!("language={:?}", params.language),
    );

    let language = parse_value(params.language.as_deref());
    let snapshot = ctx.showcase_service.repositories(language.as_deref()).await;

    ctx.logger.response(&trace_id, "GET", "/api/projects/repositories", 200, &timer);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "username": ctx.showcase_service.username(),
            "repositories": snapshot.repos,
            "notice": snapshot.notice,
            "notice_message": snapshot.notice.map(|n| n.message()),
            "fetched_at": snapshot.fetched_at,
        })),
    )
}

async fn list_technologies(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(serde_json::json!({ "technologies": ctx.showcase_service.technologies() }))
}

async fn list_languages(State(ctx): State<AppContext>) -> impl IntoResponse {
    Json(serde_json::json!({ "languages": ctx.showcase_service.languages().await }))
}

pub async fn list_categories() -> impl IntoResponse {
    let categories: Vec<CategoryEntry> = Category::ALL
        .iter()
        .map(|c| CategoryEntry {
            label: c.label(),
            slug: c.slug(),
        })
        .collect();

    Json(serde_json::json!({ "categories": categories }))
}
