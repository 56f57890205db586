use finance_ai::workflows::assistant::{AssistantChatService, ChatStore};
use finance_ai::workflows::documents::{DocumentService, InMemoryDocumentRepository, SimulatedOcr};
use finance_ai::workflows::portfolio::LiveFeed;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type Documents = DocumentService<InMemoryDocumentRepository, SimulatedOcr>;
pub(crate) type Chat = AssistantChatService<dyn ChatStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) live_feed: LiveFeed,
}

/// Workflow services shared by the HTTP routes.
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) documents: Arc<Documents>,
    pub(crate) chat: Arc<Chat>,
}
