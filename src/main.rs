use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use karir_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::auth::require_admin_auth,
    middleware::cors::permissive_cors,
    middleware::rate_limit::{rps_middleware, RateLimiter},
    routes,
    services::notification_service::NotificationService,
    AppState,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

// Stale staged uploads are reclaimed once they are an hour old; a live
// submission holds its staged files for seconds at most.
const STAGING_MAX_AGE: Duration = Duration::from_secs(60 * 60);
const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    app_state.admin_service.ensure_seed_admin().await?;

    {
        let state = app_state.clone();
        tokio::spawn(async move {
            let notifier = NotificationService::new(state.pool.clone());
            loop {
                match notifier.run_once().await {
                    Ok(true) => {}
                    Ok(false) => {
                        tokio::time::sleep(Duration::from_millis(750)).await;
                    }
                    Err(e) => {
                        tracing::error!(error = ?e, "Outbox worker error");
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                }
            }
        });
    }

    {
        let state = app_state.clone();
        tokio::spawn(async move {
            loop {
                if let Err(e) = state.upload_service.sweep_stale(STAGING_MAX_AGE).await {
                    tracing::error!(error = ?e, "Staging sweeper error");
                }
                tokio::time::sleep(SWEEP_INTERVAL).await;
            }
        });
    }

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let public_api = Router::new()
        .route(
            "/api/applications",
            post(routes::application_routes::submit_application),
        )
        .route(
            "/api/positions/open",
            get(routes::position_routes::open_positions),
        )
        .route("/api/auth/login", post(routes::auth_routes::login))
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(config.public_rps),
            rps_middleware,
        ));

    let admin_api = Router::new()
        .route(
            "/api/admin/account",
            axum::routing::patch(routes::auth_routes::change_password),
        )
        .route(
            "/api/admin/applications",
            get(routes::application_routes::list_applications),
        )
        .route(
            "/api/admin/applications/status",
            post(routes::application_routes::update_application_status),
        )
        .route(
            "/api/admin/applications/:id/whatsapp-message",
            get(routes::application_routes::whatsapp_message),
        )
        .route(
            "/api/admin/interviews",
            post(routes::interview_routes::schedule_interview),
        )
        .route(
            "/api/admin/positions",
            get(routes::position_routes::list_positions)
                .post(routes::position_routes::create_position),
        )
        .route(
            "/api/admin/positions/:id",
            get(routes::position_routes::get_position)
                .put(routes::position_routes::update_position)
                .delete(routes::position_routes::delete_position),
        )
        .layer(axum::middleware::from_fn(require_admin_auth))
        .layer(axum::middleware::from_fn_with_state(
            RateLimiter::new(config.admin_rps),
            rps_middleware,
        ));

    info!("Serving uploads from: {}", config.uploads_dir);

    let app = base_routes
        .merge(public_api)
        .merge(admin_api)
        .nest_service(
            "/uploads",
            tower_http::services::ServeDir::new(&config.uploads_dir),
        )
        .with_state(app_state)
        .layer(permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(12 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
