mod contact;
mod projects;
mod settings;
mod site;
mod ws;
pub mod middleware;

pub use projects::projects_routes;
pub use ws::ws_handler;
pub use middleware::TraceIdLayer;

use std::path::Path;

use axum::{routing::{get, post}, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppContext;

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(site::health))
        .route("/site", get(site::get_site))
        .route("/experience", get(site::get_experience))
        .route("/skills", get(site::get_skills))
        .route("/recommendations", get(site::get_recommendations))
        .route("/categories", get(projects::list_categories))
        .nest("/projects", projects_routes())
        .route("/contact", post(contact::submit_contact))
        .route("/settings/theme", get(settings::get_theme).post(settings::set_theme))
}

/// Full application router: API, carousel socket, static front end.
pub fn build_router(ctx: AppContext, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .nest("/api", api_routes())
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceIdLayer)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::content::ContentLoader;
    use crate::github::GitHubClient;
    use crate::infrastructure::logging::trace_context::TRACE_HEADER;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context(github_base: &str) -> AppContext {
        let config = AppConfig {
            github_username: Some("someone".to_string()),
            contact_delay: Duration::ZERO,
            ..AppConfig::default()
        };
        AppContext::with_client(
            &config,
            ContentLoader::bundled().unwrap(),
            GitHubClient::with_base_url(github_base, None),
        )
    }

    fn router(ctx: AppContext) -> Router {
        build_router(ctx, "does-not-exist")
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_echoes_trace_id() {
        let app = router(context("http://127.0.0.1:9"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header(TRACE_HEADER, "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(TRACE_HEADER).unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn test_categories_in_display_order() {
        let (status, body) = get_json(router(context("http://127.0.0.1:9")), "/api/categories").await;

        assert_eq!(status, StatusCode::OK);
        let labels: Vec<&str> = body["categories"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["label"].as_str().unwrap())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Web Development",
                "App Development",
                "Data Science",
                "Game Development",
                "AI/Machine Learning"
            ]
        );
    }

    #[tokio::test]
    async fn test_projects_with_repositories() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/someone/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": 7,
                "name": "notebooks",
                "html_url": "https://github.com/someone/notebooks",
                "topics": ["pandas"],
                "stargazers_count": 2,
                "fork": false,
                "language": "Python",
                "updated_at": "2024-02-01T00:00:00Z"
            }])))
            .mount(&mock_server)
            .await;

        let ctx = context(&mock_server.uri());
        ctx.showcase_service.refresh("test").await;

        let (status, body) = get_json(router(ctx), "/api/projects?category=data-science").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["featured"].as_array().unwrap().is_empty());
        let grid = body["grid"].as_array().unwrap();
        assert_eq!(grid[0]["kind"], "project");
        assert_eq!(grid[0]["title"], "Data Science Portfolio");
        assert_eq!(grid[0]["highlighted"], true);
        assert_eq!(grid.last().unwrap()["kind"], "repository");
        assert_eq!(grid.last().unwrap()["name"], "notebooks");
        assert!(body["notice"].is_null());
    }

    #[tokio::test]
    async fn test_rate_limited_projects_carry_notice() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let ctx = context(&mock_server.uri());
        ctx.showcase_service.refresh("test").await;

        let (status, body) = get_json(router(ctx), "/api/projects").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["notice"], "rate_limited");
        assert!(!body["featured"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_filter_result_has_empty_state() {
        let (status, body) = get_json(
            router(context("http://127.0.0.1:9")),
            "/api/projects?category=Game%20Development",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["grid"].as_array().unwrap().is_empty());
        assert_eq!(body["empty_state"]["clear_filter"], "/api/projects");
    }

    #[tokio::test]
    async fn test_technology_and_language_filters() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/someone/repos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 2,
                    "name": "notebooks",
                    "html_url": "https://github.com/someone/notebooks",
                    "fork": false,
                    "language": "Python",
                    "updated_at": "2024-02-01T00:00:00Z"
                },
                {
                    "id": 1,
                    "name": "site",
                    "html_url": "https://github.com/someone/site",
                    "fork": false,
                    "language": "TypeScript",
                    "updated_at": "2024-01-01T00:00:00Z"
                }
            ])))
            .mount(&mock_server)
            .await;

        let ctx = context(&mock_server.uri());
        ctx.showcase_service.refresh("test").await;
        let app = router(ctx);

        let (status, body) =
            get_json(app.clone(), "/api/projects?technology=Flutter&language=Python").await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = body["grid"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["title"].as_str().or(item["name"].as_str()).unwrap())
            .collect();
        assert_eq!(titles, vec!["Habit Tracker", "notebooks"]);

        let (_, body) = get_json(app.clone(), "/api/projects/repositories?language=typescript").await;
        assert_eq!(body["repositories"].as_array().unwrap().len(), 1);
        assert_eq!(body["repositories"][0]["name"], "site");

        let (_, body) = get_json(app.clone(), "/api/projects/languages").await;
        assert_eq!(body["languages"], serde_json::json!(["Python", "TypeScript"]));

        let (_, body) = get_json(app, "/api/projects/technologies").await;
        assert_eq!(body["technologies"][0], "Node.js");
    }

    #[tokio::test]
    async fn test_unknown_category_rejected() {
        let (status, _) =
            get_json(router(context("http://127.0.0.1:9")), "/api/projects?category=Knitting").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recommendations_have_display_date() {
        let (status, body) =
            get_json(router(context("http://127.0.0.1:9")), "/api/recommendations").await;

        assert_eq!(status, StatusCode::OK);
        let first = &body["recommendations"][0];
        assert!(first["display_date"].as_str().unwrap().contains(' '));
        assert!(first["name"].is_string());
    }

    #[tokio::test]
    async fn test_contact_validation() {
        let app = router(context("http://127.0.0.1:9"));

        let (status, body) = post_json(
            app.clone(),
            "/api/contact",
            serde_json::json!({ "name": "Sam", "email": "sam@example.com", "subject": "Hi" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["field"], "message");

        let (status, body) = post_json(
            app,
            "/api/contact",
            serde_json::json!({
                "name": "Sam",
                "email": "sam@example.com",
                "subject": "Hi",
                "message": "Hello there"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_theme_update_broadcasts() {
        let ctx = context("http://127.0.0.1:9");
        let mut events = ctx.subscribe_events();
        let app = router(ctx);

        let (status, body) = get_json(app.clone(), "/api/settings/theme").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["theme"], "dark");

        let (status, body) =
            post_json(app.clone(), "/api/settings/theme", serde_json::json!({ "theme": "light" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["theme"], "light");
        assert!(events.try_recv().is_ok());

        let (status, _) =
            post_json(app, "/api/settings/theme", serde_json::json!({ "theme": "sepia" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
