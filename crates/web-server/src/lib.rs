use analyzer::Analyzer;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use configuration::Config;
use database::{ClientRepository, DbRepository, InMemoryClientRepository};
use risk::PlanGoalResolver;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub plans: PlanGoalResolver,
}

impl AppState {
    pub fn new(config: &Config, clients: Arc<dyn ClientRepository>) -> anyhow::Result<Self> {
        Ok(Self {
            analyzer: Analyzer::new(config, clients)?,
            plans: PlanGoalResolver::new(&config.plans, &config.risk_policy)?,
        })
    }
}

/// Picks the client directory: PostgreSQL when `DATABASE_URL` is set, otherwise
/// the `[[clients]]` seeded in configuration.
pub async fn client_repository(config: &Config) -> anyhow::Result<Arc<dyn ClientRepository>> {
    match database::database_url_from_env() {
        Some(url) => {
            let pool = database::connect(&url).await?;
            database::run_migrations(&pool).await?;
            tracing::info!("Resolving clients from PostgreSQL.");
            Ok(Arc::new(DbRepository::new(pool)))
        }
        None => {
            let repo = InMemoryClientRepository::new(config.clients.clone());
            tracing::info!(clients = repo.len(), "DATABASE_URL not set, resolving clients from configuration.");
            Ok(Arc::new(repo))
        }
    }
}

/// Builds the application routes on top of `state`.
pub fn app_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/plans", get(handlers::get_plans))
        .route("/api/analysis", post(handlers::analyze_operations))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// The main function to configure and run the web server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let clients = client_repository(&config).await?;
    let state = Arc::new(AppState::new(&config, clients)?);
    let app = app_router(state, config.server.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
