use tower_http::cors::{Any, CorsLayer};

// The portal frontend is served from a different origin in every deployment
// we run, so CORS stays wide open.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any)
}
