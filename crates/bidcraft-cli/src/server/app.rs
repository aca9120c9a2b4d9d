//! Axum application setup.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Learning
        .route("/corrections", post(handlers::record_correction))
        .route("/deletions", post(handlers::record_deletion))
        .route("/recompute", post(handlers::recompute))
        .route("/suggestions", get(handlers::get_suggestions))
        .route("/flagged", get(handlers::get_flagged))
        .route("/status", get(handlers::get_status))
        // Contractor profiles
        .route(
            "/profiles",
            get(handlers::list_profiles).post(handlers::save_profile),
        );

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the web server and run until Ctrl+C.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!(%addr, "server listening");
    println!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use bidcraft::{CostLearningStore, DocumentKind, MemoryStore, ProfileRegistry};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_state(backend: MemoryStore) -> AppState {
        let store = CostLearningStore::open(backend).unwrap();
        let profiles = ProfileRegistry::open(MemoryStore::new()).unwrap();
        AppState::new(store, profiles)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_correction_then_recompute() {
        let app = create_router(test_state(MemoryStore::new()));

        let (status, body) = send(
            &app,
            "POST",
            "/api/corrections",
            Some(json!({"item": "Drywall Install", "original_cost": 500.0, "corrected_cost": 600.0})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["corrections"], 1);
        assert_eq!(body["record"]["adjustment"], 100.0);

        let (status, body) = send(&app, "POST", "/api/recompute", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["updated"], 1);

        let (_, body) = send(&app, "GET", "/api/suggestions", None).await;
        assert_eq!(body, json!([{"item": "Drywall Install", "suggested_cost": 600.0}]));
    }

    #[tokio::test]
    async fn test_blank_item_is_bad_request() {
        let app = create_router(test_state(MemoryStore::new()));

        let (status, body) = send(
            &app,
            "POST",
            "/api/corrections",
            Some(json!({"item": "", "original_cost": 1.0, "corrected_cost": 2.0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation");

        let (status, _) = send(&app, "POST", "/api/deletions", Some(json!({"item": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_deletions_flag_and_hide_item() {
        let backend = MemoryStore::new()
            .with_document(DocumentKind::CostMemory, json!({"Framing": 5000.0, "Paint": 300.0}));
        let app = create_router(test_state(backend));

        let mut last = Value::Null;
        for _ in 0..3 {
            let (status, body) =
                send(&app, "POST", "/api/deletions", Some(json!({"item": "Framing"}))).await;
            assert_eq!(status, StatusCode::CREATED);
            last = body;
        }
        assert_eq!(last["deletions"], 3);
        assert_eq!(last["flagged"], true);

        let (_, body) = send(&app, "GET", "/api/flagged", None).await;
        assert_eq!(body["threshold"], 3);
        assert_eq!(body["items"], json!([{"item": "Framing", "deletions": 3}]));

        let (_, body) = send(&app, "GET", "/api/flagged?threshold=4", None).await;
        assert_eq!(body["items"], json!([]));

        let (status, _) = send(&app, "GET", "/api/flagged?threshold=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, "GET", "/api/suggestions", None).await;
        assert_eq!(body, json!([{"item": "Paint", "suggested_cost": 300.0}]));

        let (_, body) = send(&app, "GET", "/api/status", None).await;
        assert_eq!(body["learned_items"], 2);
        assert_eq!(body["flagged_items"], 1);
        assert_eq!(body["suggestions"], 1);
    }

    #[tokio::test]
    async fn test_profiles_round_trip() {
        let app = create_router(test_state(MemoryStore::new()));

        let (status, body) = send(
            &app,
            "POST",
            "/api/profiles",
            Some(json!({"name": "Acme Builders", "specialty": "Framing", "region": "Bay Area"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["specialty"], "Framing");

        let (_, body) = send(&app, "GET", "/api/profiles", None).await;
        assert_eq!(
            body,
            json!([{"name": "Acme Builders", "specialty": "Framing", "license": "", "region": "Bay Area"}])
        );

        let (status, _) =
            send(&app, "POST", "/api/profiles", Some(json!({"name": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_failed_write_is_server_error() {
        let backend = std::sync::Arc::new(MemoryStore::new());
        let store = CostLearningStore::open(std::sync::Arc::clone(&backend)).unwrap();
        let profiles = ProfileRegistry::open(MemoryStore::new()).unwrap();
        let app = create_router(AppState::new(store, profiles));

        backend.set_fail_writes(true);
        let (status, body) =
            send(&app, "POST", "/api/deletions", Some(json!({"item": "Framing"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "persistence");

        let (_, body) = send(&app, "GET", "/api/status", None).await;
        assert_eq!(body["deleted_items"], 0);
    }
}
