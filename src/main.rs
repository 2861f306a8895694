use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{response::Redirect, routing::get, Router};
use http::HeaderValue;
use tokio::signal;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};

use iabot_api as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Init DB
    let db_pool = api::db::establish_connection_from_app_config(&cfg).await?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db_pool).await?;
    }
    // Clones share the underlying pool; this handle closes it on shutdown.
    let shutdown_pool = db_pool.clone();
    let db_arc = Arc::new(db_pool);

    // Payment gateway
    let gateway: Arc<dyn api::payments::CheckoutGateway> = match cfg.stripe_secret_key.clone() {
        Some(secret_key) => Arc::new(api::payments::StripeGateway::new(
            api::payments::StripeConfig { secret_key },
        )),
        None => {
            warn!("stripe_secret_key not configured; checkout session creation will fail");
            Arc::new(api::payments::UnconfiguredGateway)
        }
    };

    // Optional contact-form notification target
    let notifier: Option<Arc<dyn api::notifications::Notifier>> =
        cfg.notify_url.clone().map(|url| {
            info!("contact notifications enabled");
            Arc::new(api::notifications::ContactNotifier::new(url))
                as Arc<dyn api::notifications::Notifier>
        });

    // Aggregate app services used by HTTP handlers
    let services = api::handlers::AppServices::new(db_arc.clone(), &cfg, gateway, notifier);

    // Seed the catalog only when the tables are empty
    if cfg.seed_catalog {
        services.catalog.seed_catalog().await?;
    }

    let app_state = api::AppState {
        db: db_arc.clone(),
        config: cfg.clone(),
        services,
    };

    // Build CORS layer from config
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    let cors_layer = if let Some(origins) = configured_origins {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        info!("No explicit CORS origins configured; using permissive CORS");
        CorsLayer::permissive()
    };

    // Pre-built front-end, with index.html as the SPA fallback
    let static_service = ServeDir::new(&cfg.static_dir)
        .fallback(ServeFile::new(format!("{}/index.html", cfg.static_dir)));

    let app = Router::new()
        .route("/health", get(api::handlers::health::health))
        // Stripe redirect landing pages; the front-end reads the query flag
        .route(
            "/success",
            get(|| async { Redirect::to("/?checkout=success") }),
        )
        .route(
            "/cancel",
            get(|| async { Redirect::to("/?checkout=cancel") }),
        )
        .nest("/api", api::api_routes())
        .fallback_service(static_service)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        .with_state(app_state);

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .context("invalid listen address")?;
    info!("iabot-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    api::db::close_pool(shutdown_pool).await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
