//! Discord REST calls made by the bot

use famcal_domain::{FamcalError, Result};
use reqwest::{Method, Response};
use tracing::{info, instrument, warn};

use super::types::{ask_command, MessageEdit};
use crate::http::HttpClient;

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// Bot-token REST client bound to one application.
#[derive(Clone)]
pub struct DiscordApi {
    http_client: HttpClient,
    bot_token: String,
    application_id: String,
    api_base: String,
}

impl DiscordApi {
    pub fn new(
        http_client: HttpClient,
        bot_token: impl Into<String>,
        application_id: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            bot_token: bot_token.into(),
            application_id: application_id.into(),
            api_base: DISCORD_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overwrite the guild's commands with `/ask`.
    #[instrument(skip(self))]
    pub async fn register_guild_commands(&self, guild_id: &str) -> Result<()> {
        let url = format!(
            "{}/applications/{}/guilds/{}/commands",
            self.api_base, self.application_id, guild_id
        );
        let request = self
            .http_client
            .request(Method::PUT, url)
            .header("Authorization", format!("Bot {}", self.bot_token))
            .json(&[ask_command()]);

        let response = self.http_client.send(request).await?;
        check_status("register commands", response).await?;
        info!(%guild_id, "Registered guild slash commands");
        Ok(())
    }

    /// Replace the deferred placeholder with the final reply.
    ///
    /// Webhook endpoints authenticate with the interaction token alone.
    #[instrument(skip_all)]
    pub async fn edit_original_response(&self, interaction_token: &str, content: &str) -> Result<()> {
        let url = format!(
            "{}/webhooks/{}/{}/messages/@original",
            self.api_base, self.application_id, interaction_token
        );
        let request =
            self.http_client.request(Method::PATCH, url).json(&MessageEdit { content });

        let response = self.http_client.send(request).await?;
        check_status("edit original response", response).await?;
        Ok(())
    }
}

async fn check_status(operation: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
    warn!(operation, %status, "Discord API request failed");
    match status.as_u16() {
        401 | 403 => Err(FamcalError::Auth(format!("Discord {operation} rejected ({status}): {body}"))),
        _ => Err(FamcalError::Network(format!("Discord {operation} failed ({status}): {body}"))),
    }
}
