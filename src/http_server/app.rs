use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    routing::{MethodRouter, get},
};
use color_eyre::eyre::{Context, eyre};
use tower::ServiceBuilder;
#[cfg(not(debug_assertions))]
use tower_http::cors::AllowMethods;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    database::Database,
    http_server::{
        error::Report,
        http_routes::{actors, cinema_halls, genres, movies},
        state::AppState,
    },
};

pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    pub database: Database,
}

/// Readiness check: answers only once the store can be queried.
async fn root(State(app_state): State<Arc<AppState>>) -> Result<&'static str, Report> {
    app_state
        .store
        .list_genres()
        .await
        .wrap_err("Cinema store is not reachable")?;
    Ok("Cinema API is running")
}

/// Register `path` both with and without a trailing slash.
fn route_both(
    router: Router<Arc<AppState>>,
    path: &str,
    methods: MethodRouter<Arc<AppState>>,
) -> Router<Arc<AppState>> {
    router
        .route(path, methods.clone())
        .route(&format!("{path}/"), methods)
}

fn api_routes() -> Router<Arc<AppState>> {
    let mut router = Router::new();

    router = route_both(
        router,
        "/actors",
        get(actors::list_actors).post(actors::create_actor),
    );
    router = route_both(
        router,
        "/actors/{id}",
        get(actors::retrieve_actor)
            .put(actors::update_actor)
            .patch(actors::partial_update_actor)
            .delete(actors::destroy_actor),
    );

    router = route_both(
        router,
        "/genres",
        get(genres::list_genres).post(genres::create_genre),
    );
    router = route_both(
        router,
        "/genres/{id}",
        get(genres::retrieve_genre)
            .put(genres::update_genre)
            .patch(genres::partial_update_genre)
            .delete(genres::destroy_genre),
    );

    router = route_both(
        router,
        "/cinema_halls",
        get(cinema_halls::list_cinema_halls).post(cinema_halls::create_cinema_hall),
    );
    router = route_both(
        router,
        "/cinema_halls/{id}",
        get(cinema_halls::retrieve_cinema_hall)
            .put(cinema_halls::update_cinema_hall)
            .patch(cinema_halls::partial_update_cinema_hall)
            .delete(cinema_halls::destroy_cinema_hall),
    );

    router = route_both(
        router,
        "/movies",
        get(movies::list_movies).post(movies::create_movie),
    );
    route_both(
        router,
        "/movies/{id}",
        get(movies::retrieve_movie)
            .put(movies::update_movie)
            .patch(movies::partial_update_movie)
            .delete(movies::destroy_movie),
    )
}

pub fn router(app_state: Arc<AppState>) -> Router {
    #[cfg(debug_assertions)]
    let cors_layer = CorsLayer::permissive();

    #[cfg(not(debug_assertions))]
    let cors_layer = CorsLayer::new().allow_methods(AllowMethods::any());

    Router::new()
        .route("/", get(root))
        .nest("/api/cinema", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(app_state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}

pub async fn start(config: HttpServerConfig) -> color_eyre::Result<()> {
    let app_state = Arc::new(AppState::new(Arc::new(config.database)));
    let app = router(app_state);

    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .wrap_err_with(|| eyre!("Failed to bind to {}", address))?;
    log::info!("Listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Failed to start HTTP server")?;

    Ok(())
}
