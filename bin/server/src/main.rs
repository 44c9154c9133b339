#[tokio::main]
async fn main() {
    use portal_gate_server::{
        auth::{self, AppState},
        config::ServerConfig,
        navigator::BannerNotifier,
        provider::PortalConfigProvider,
    };
    use portal_gate_sso::{IdpClient, SessionRegistry};
    use std::sync::Arc;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = ServerConfig::from_env().expect("failed to load configuration");
    tracing::info!("Loaded configuration");

    let app_config = PortalConfigProvider::load(config.portal.config_file.clone())
        .expect("failed to load application configuration");
    tracing::info!(
        auth_mode = ?portal_gate_admission::ConfigProvider::current(&app_config).auth_mode(),
        "Loaded application configuration"
    );

    let default_email_domain = config.idp.default_email_domain().map(str::to_string);
    let idp_client = IdpClient::new(config.idp).expect("failed to build identity provider client");
    tracing::info!(endpoint = %idp_client.config().base_url(), "Identity provider configured");

    let registry = Arc::new(SessionRegistry::new(chrono::Duration::minutes(
        config.session.duration_minutes,
    )));

    // Spawn periodic session cleanup task
    let cleanup_registry = registry.clone();
    let cleanup_interval_secs = config.session.cleanup_interval_seconds;
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(cleanup_interval_secs));
        loop {
            interval.tick().await;
            let count = cleanup_registry.delete_expired();
            if count > 0 {
                tracing::debug!(deleted_sessions = count, "Periodic session cleanup");
            }
        }
    });

    let state = Arc::new(AppState {
        registry,
        validator: Arc::new(idp_client),
        config: Arc::new(app_config),
        notifier: Arc::new(BannerNotifier::default()),
        session_config: config.session,
        default_route: config.portal.default_route,
        default_email_domain,
    });

    let app = auth::router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.listen_addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
