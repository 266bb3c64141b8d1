//! HTTP interactions endpoint
//!
//! Discord POSTs every slash-command invocation to `/interactions`. Each
//! request is signature-checked, PINGs are answered with PONG, and `/ask`
//! is acknowledged with a deferred response while the chat turn runs on a
//! spawned task that later edits the original response.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use famcal_core::chat::resolve_display_name;
use famcal_core::{ChatRequest, ChatService};
use famcal_domain::constants::GUILD_RESTRICTED_MESSAGE;
use tracing::{debug, error, info, warn};

use super::api::DiscordApi;
use super::signature::{SignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use super::types::{
    Interaction, InteractionResponse, INTERACTION_APPLICATION_COMMAND, INTERACTION_PING,
};

const ASK_COMMAND: &str = "ask";
const MESSAGE_OPTION: &str = "message";
const UNKNOWN_COMMAND_MESSAGE: &str = "不明なコマンドです。";
const MISSING_MESSAGE: &str = "質問内容 (message) を入力してください。";

/// Shared state behind the interactions endpoint.
pub struct InteractionHandler {
    verifier: SignatureVerifier,
    guild_id: String,
    family: HashMap<String, String>,
    chat: Arc<ChatService>,
    discord: DiscordApi,
}

impl InteractionHandler {
    pub fn new(
        verifier: SignatureVerifier,
        guild_id: impl Into<String>,
        family: HashMap<String, String>,
        chat: Arc<ChatService>,
        discord: DiscordApi,
    ) -> Self {
        Self { verifier, guild_id: guild_id.into(), family, chat, discord }
    }

    /// Route one verified interaction.
    ///
    /// `/ask` returns a deferred response immediately; the reply is
    /// delivered by a background task.
    pub fn dispatch(self: &Arc<Self>, interaction: Interaction) -> InteractionResponse {
        match interaction.kind {
            INTERACTION_PING => InteractionResponse::pong(),
            INTERACTION_APPLICATION_COMMAND => self.dispatch_command(interaction),
            other => {
                warn!(interaction_type = other, "Unsupported interaction type");
                InteractionResponse::ephemeral(UNKNOWN_COMMAND_MESSAGE)
            }
        }
    }

    fn dispatch_command(self: &Arc<Self>, interaction: Interaction) -> InteractionResponse {
        let command = interaction.data.as_ref().map(|data| data.name.as_str());
        if command != Some(ASK_COMMAND) {
            warn!(?command, "Unknown slash command");
            return InteractionResponse::ephemeral(UNKNOWN_COMMAND_MESSAGE);
        }

        if interaction.guild_id.as_deref() != Some(self.guild_id.as_str()) {
            info!(guild_id = ?interaction.guild_id, "Rejected /ask outside the configured guild");
            return InteractionResponse::ephemeral(GUILD_RESTRICTED_MESSAGE);
        }

        let Some(request) = self.chat_request(&interaction) else {
            return InteractionResponse::ephemeral(MISSING_MESSAGE);
        };

        let handler = Arc::clone(self);
        let token = interaction.token;
        tokio::spawn(async move {
            let reply = handler.chat.handle(&request).await;
            if let Err(err) = handler.discord.edit_original_response(&token, &reply).await {
                error!(user_id = %request.user_id, error = %err, "Failed to deliver /ask reply");
            }
        });

        InteractionResponse::deferred()
    }

    fn chat_request(&self, interaction: &Interaction) -> Option<ChatRequest> {
        let user = interaction.invoker()?;
        let message = interaction.string_option(MESSAGE_OPTION)?;
        let display_name =
            resolve_display_name(&self.family, &user.id, user.global_name.as_deref(), &user.username);
        debug!(user_id = %user.id, %display_name, "Accepted /ask");
        Some(ChatRequest::new(&user.id, display_name, message))
    }
}

/// Router with `POST /interactions` and `GET /healthz`.
pub fn interactions_router(handler: Arc<InteractionHandler>) -> Router {
    Router::new()
        .route("/interactions", post(handle_interaction))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(handler)
}

async fn handle_interaction(
    State(handler): State<Arc<InteractionHandler>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|value| value.to_str().ok());
    let timestamp = headers.get(TIMESTAMP_HEADER).and_then(|value| value.to_str().ok());
    let verified = match (signature, timestamp) {
        (Some(signature), Some(timestamp)) => handler.verifier.verify(timestamp, &body, signature),
        _ => false,
    };
    if !verified {
        debug!("Rejected interaction with a missing or invalid signature");
        return (StatusCode::UNAUTHORIZED, "invalid request signature").into_response();
    }

    let interaction: Interaction = match serde_json::from_slice(&body) {
        Ok(interaction) => interaction,
        Err(err) => {
            warn!(error = %err, "Malformed interaction payload");
            return (StatusCode::BAD_REQUEST, "malformed interaction").into_response();
        }
    };

    Json(handler.dispatch(interaction)).into_response()
}
