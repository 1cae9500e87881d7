//! Webhook receiver: verify, parse, dispatch, acknowledge.
//!
//! LINE enforces a short delivery timeout, so the callback handler never
//! waits on reply generation. Each text-message event is handed to a spawned
//! reply worker and the 200 goes back as soon as dispatch is done.

pub mod pipeline;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::get,
    Router,
};
use std::sync::Arc;
use sugarlady_channels::line::events::{self, Event, MessageContent, WebhookEnvelope};
use sugarlady_channels::line::signature::verify_signature;
use sugarlady_core::config::ServerConfig;
use sugarlady_core::prompt::Persona;
use sugarlady_core::traits::{Channel, Provider};
use sugarlady_memory::ConversationStore;
use tracing::{error, info, warn};

/// Shared state for webhook handlers. Cheap to clone; one copy per worker.
#[derive(Clone)]
pub struct AppState {
    provider: Arc<dyn Provider>,
    channel: Arc<dyn Channel>,
    store: ConversationStore,
    persona: Arc<Persona>,
    channel_secret: String,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn Provider>,
        channel: Arc<dyn Channel>,
        store: ConversationStore,
        persona: Persona,
        channel_secret: String,
    ) -> Self {
        Self {
            provider,
            channel,
            store,
            persona: Arc::new(persona),
            channel_secret,
        }
    }
}

/// `GET /` and `GET /callback` — liveness probe, touches nothing.
async fn health() -> &'static str {
    "OK"
}

/// `POST /callback` — the LINE webhook endpoint.
///
/// Rejects before mutating anything: a bad signature or an undecodable body
/// means no event in the batch is dispatched.
async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let signature = headers
        .get("x-line-signature")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !verify_signature(&state.channel_secret, &body, signature) {
        warn!("rejected webhook delivery: invalid signature");
        return (StatusCode::BAD_REQUEST, "Invalid signature");
    }

    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("rejected webhook delivery: undecodable body: {e}");
            return (StatusCode::BAD_REQUEST, "Invalid body");
        }
    };

    for event in envelope.events {
        if let Event::Message {
            reply_token,
            source,
            message: MessageContent::Text { text },
        } = event
        {
            let user_id = events::sender_id(source.as_ref());
            let state = state.clone();
            tokio::spawn(async move {
                pipeline::reply_to_message(state, user_id, text, reply_token).await;
            });
        }
    }

    (StatusCode::OK, "OK")
}

/// Build the axum router with shared state.
fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/callback", get(health).post(callback))
        .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024)) // 1 MB max request body
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    let addr = format!("{}:{}", config.host, config.port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("webhook server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("received shutdown signal"),
                Err(e) => error!("failed to listen for shutdown signal: {e}"),
            }
        })
        .await?;

    Ok(())
}
