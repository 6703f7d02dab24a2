use crate::aggregator::Aggregator;
use crate::error::FinderError;
use crate::types::CanonicalItem;
use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
    routing::{get, put},
    Router,
};
use hyper::Server;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// State handed to every handler. There is no other shared state.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    /// When false the home page redirects to the problem page instead of fetching
    pub has_location_keys: bool,
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    #[serde(rename = "latLong")]
    pub lat_long: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct FavouriteRequest {
    pub id: Option<String>,
}

/// Props for the home page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeProps {
    pub coffee_stores: Vec<CanonicalItem>,
    pub artists: Option<Vec<CanonicalItem>>,
}

impl IntoResponse for FinderError {
    fn into_response(self) -> Response {
        let status = match self {
            FinderError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!(kind = self.kind(), "Request failed: {}", self);
        let body = json!({
            "message": "Something went wrong",
            "kind": self.kind(),
            "error": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "street_finder",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn home(State(state): State<AppState>) -> Result<Response, FinderError> {
    if !state.has_location_keys {
        return Ok(Redirect::temporary("/problem").into_response());
    }

    let (stores, artists) = tokio::join!(
        state.aggregator.aggregate(None, None),
        state.aggregator.aggregate_artists(None)
    );
    let artists = match artists {
        Ok(artists) => Some(artists),
        Err(e) => {
            warn!(kind = e.kind(), "Artist list unavailable: {}", e);
            None
        }
    };

    Ok(Json(HomeProps {
        coffee_stores: stores?,
        artists,
    })
    .into_response())
}

async fn problem() -> impl IntoResponse {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        "Location and image services are not configured.",
    )
}

async fn coffee_stores_by_location(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Vec<CanonicalItem>>, FinderError> {
    let stores = state
        .aggregator
        .aggregate(query.lat_long.as_deref(), query.limit)
        .await?;
    Ok(Json(stores))
}

async fn artists(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<CanonicalItem>>, FinderError> {
    Ok(Json(state.aggregator.aggregate_artists(query.page).await?))
}

async fn artist_by_id(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, FinderError> {
    match state.aggregator.aggregate_artist(&id).await? {
        Some(artist) => Ok(Json(artist).into_response()),
        None => Ok((StatusCode::NOT_FOUND, Json(json!({ "message": "Artist not found", "id": id }))).into_response()),
    }
}

/// Upvote stub. Votes are not persisted anywhere, so a well-formed request is
/// answered with 501.
async fn favourite_by_id(Json(request): Json<FavouriteRequest>) -> impl IntoResponse {
    match request.id.filter(|id| !id.trim().is_empty()) {
        None => (StatusCode::BAD_REQUEST, Json(json!({ "message": "id is missing" }))),
        Some(id) => (
            StatusCode::NOT_IMPLEMENTED,
            Json(json!({ "message": "Voting is not available", "id": id })),
        ),
    }
}

/// Create the HTTP router with all routes
pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::PUT])
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/problem", get(problem))
        .route("/api/getCoffeeStoreByLocation", get(coffee_stores_by_location))
        .route("/api/favouriteCoffeeStoreById", put(favourite_by_id))
        .route("/api/artists", get(artists))
        .route("/api/artists/:id", get(artist_by_id))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

/// Start the HTTP server on the specified port
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_server(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("HTTP server running on http://localhost:{port}");
    Server::bind(&addr).serve(app.into_make_service()).await?;
    Ok(())
}
