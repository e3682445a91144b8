use std::path::Path;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::handlers::{
    create_city_handler, delete_city_handler, get_city_handler, health_handler,
    list_cities_handler, search_cities_handler, update_city_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .nest(
                "/api/cities",
                Router::new()
                    .route("/", get(list_cities_handler).post(create_city_handler))
                    .route("/search", get(search_cities_handler))
                    .route(
                        "/{id}",
                        get(get_city_handler)
                            .put(update_city_handler)
                            .delete(delete_city_handler),
                    ),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Serves files from `dir` for every path the API does not handle.
    pub fn with_static_dir(router: Router, dir: impl AsRef<Path>) -> Router {
        router.fallback_service(ServeDir::new(dir.as_ref()))
    }

    /// Allows credentialed requests from the given origins.
    /// Origins that are not valid header values are skipped.
    pub fn cors(origins: &[String]) -> CorsLayer {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
    }
}
