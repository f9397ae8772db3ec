mod auction;
mod constants;
mod errors;
mod middlewares;
mod models;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod tests;

use std::{env, sync::Arc};

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use state::AppState;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;

async fn root() -> Json<Value> {
    Json(json!({ "msg": "auction marketplace API" }))
}

async fn health_check() -> (StatusCode, String) {
    let health = true;
    match health {
        true => (StatusCode::OK, "Healthy!".to_string()),
        false => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Not healthy!".to_string(),
        ),
    }
}

pub fn create_service(state: Arc<AppState>) -> Router {
    let (api_router, api) = OpenApiRouter::new()
        .merge(routes::auth::router(state.clone()))
        .merge(routes::user::router(state.clone()))
        .merge(routes::listing::router(state.clone()))
        .split_for_parts();

    let spec = serde_json::to_value(&api).unwrap_or_default();

    let trace_layer =
        TraceLayer::new_for_http().on_request(|req: &Request<Body>, _: &tracing::Span| {
            let path = req.uri().path();
            tracing::info!("Got request with path: {}", path);
        });

    Router::new()
        .route("/v1/", get(root))
        .route("/v1/health", get(health_check))
        .route(
            "/v1/openapi.json",
            get(move || std::future::ready(Json(spec.clone()))),
        )
        .merge(api_router)
        .layer(trace_layer)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let state = Arc::new(AppState::new()?);
    let app = create_service(state);

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
