use crate::cli::ServeArgs;
use crate::infra::{AppState, Chat, Documents, Services};
use crate::routes::build_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use finance_ai::config::{AppConfig, StorageConfig};
use finance_ai::error::AppError;
use finance_ai::telemetry;
use finance_ai::workflows::assistant::{ChatStore, InMemoryChatStore, JsonFileChatStore};
use finance_ai::workflows::documents::{InMemoryDocumentRepository, SimulatedOcr};
use finance_ai::workflows::portfolio::{stats_patch, LiveFeed, DASHBOARD_STATS};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let shutdown = CancellationToken::new();
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let live_feed = LiveFeed::new(config.live_feed);
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        live_feed: live_feed.clone(),
    };

    let documents = Documents::new(
        Arc::new(InMemoryDocumentRepository::seeded()),
        Arc::new(SimulatedOcr),
        config.simulation,
    )
    .with_cancellation(shutdown.child_token());
    let services = Services {
        documents: Arc::new(documents),
        chat: Arc::new(Chat::new(chat_store(&config.storage)?)),
    };

    let feed_task = live_feed.spawn(|| stats_patch(&DASHBOARD_STATS), shutdown.child_token());

    let app = build_router(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "finance ai loan desk ready");

    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("shutdown signal received"),
                Err(err) => {
                    warn!(error = %err, "unable to listen for shutdown signal");
                    std::future::pending::<()>().await;
                }
            }
            signal.cancel();
        })
        .await?;

    readiness_flag.store(false, Ordering::Release);
    shutdown.cancel();
    if let Err(err) = feed_task.await {
        warn!(error = %err, "live feed task ended abnormally");
    }
    info!("finance ai loan desk stopped");
    Ok(())
}

fn chat_store(storage: &StorageConfig) -> Result<Arc<dyn ChatStore>, AppError> {
    match &storage.chat_store_path {
        Some(path) => Ok(Arc::new(JsonFileChatStore::open(path)?)),
        None => {
            info!("CHAT_STORE_PATH unset, keeping chats in memory");
            Ok(Arc::new(InMemoryChatStore::default()))
        }
    }
}
