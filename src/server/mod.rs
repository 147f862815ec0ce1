//! HTTP boundary.
//!
//! | Method | Path       | Description                          |
//! |--------|------------|--------------------------------------|
//! | GET    | `/health`  | Liveness plus loaded model count     |
//! | GET    | `/models`  | Model and category names             |
//! | POST   | `/predict` | Run the full pipeline on a JSON body |

mod error;
mod routes;
mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

/// Build the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/models", get(routes::models))
        .route("/predict", post(routes::predict))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
