use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::BackendConfig;
use crate::module::handler::{CardFormat, CardService};

/// Query string of a card request
#[derive(Debug, Default, Deserialize)]
pub struct CardQuery {
    #[serde(alias = "username")]
    pub user: Option<String>,
    pub format: Option<String>,
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn card(State(service): State<Arc<CardService>>, Query(query): Query<CardQuery>) -> Response {
    let format = match query.format.as_deref() {
        None => CardFormat::default(),
        Some(raw) => match raw.parse::<CardFormat>() {
            Ok(format) => format,
            Err(msg) => return (StatusCode::BAD_REQUEST, msg).into_response(),
        },
    };

    match service.handle(query.user.as_deref(), format, Utc::now()).await {
        Ok(card) => (
            [
                (header::CONTENT_TYPE, card.content_type.to_string()),
                (header::CACHE_CONTROL, card.cache_control),
            ],
            card.body,
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Routes for the card service
pub fn build_router(service: Arc<CardService>, enable_cors: bool) -> Router {
    let router = Router::new()
        .route("/", get(card))
        .route("/card", get(card))
        .route("/health", get(health_check))
        .with_state(service);

    let router = if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

/// Bind the configured address and serve until the process exits
pub async fn serve(config: &BackendConfig, service: Arc<CardService>) -> anyhow::Result<()> {
    let app = build_router(service, config.enable_cors);

    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Card server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
