//! End-to-end tests for the signed interactions endpoint

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use ed25519_dalek::{Signer, SigningKey};
use famcal_core::{ChatService, TextGenerator};
use famcal_domain::{ConversationTurn, Result};
use famcal_infra::discord::{interactions_router, DiscordApi, InteractionHandler, SignatureVerifier};
use famcal_infra::storage::JsonHistoryStore;
use famcal_infra::HttpClient;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const GUILD_ID: &str = "4242";
const TIMESTAMP: &str = "1760000000";

struct RecordingGenerator {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str, _history: &[ConversationTurn]) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

struct Harness {
    router: Router,
    key: SigningKey,
    discord: MockServer,
    generator: Arc<RecordingGenerator>,
    _dir: TempDir,
}

async fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    let discord = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "m1"})))
        .mount(&discord)
        .await;

    let generator = Arc::new(RecordingGenerator {
        reply: "今日は晴れだよ".to_string(),
        prompts: Mutex::new(Vec::new()),
    });
    let history = Arc::new(JsonHistoryStore::new(dir.path().join("history.json")));
    let chat = Arc::new(ChatService::new(generator.clone(), history));

    let http_client = HttpClient::builder().max_attempts(1).build().unwrap();
    let api = DiscordApi::new(http_client, "bot-token", "app-1").with_api_base(discord.uri());

    let key = SigningKey::from_bytes(&[7u8; 32]);
    let mut family = HashMap::new();
    family.insert("111".to_string(), "お母さん".to_string());

    let handler = InteractionHandler::new(
        SignatureVerifier::from_key(key.verifying_key()),
        GUILD_ID,
        family,
        chat,
        api,
    );

    Harness { router: interactions_router(Arc::new(handler)), key, discord, generator, _dir: dir }
}

fn signed_request(key: &SigningKey, body: &Value) -> Request<Body> {
    let body = serde_json::to_vec(body).unwrap();
    let mut message = TIMESTAMP.as_bytes().to_vec();
    message.extend_from_slice(&body);
    let signature = hex::encode(key.sign(&message).to_bytes());

    Request::builder()
        .method("POST")
        .uri("/interactions")
        .header("content-type", "application/json")
        .header("x-signature-ed25519", signature)
        .header("x-signature-timestamp", TIMESTAMP)
        .body(Body::from(body))
        .unwrap()
}

fn ask(guild_id: &str, message: &str) -> Value {
    json!({
        "type": 2,
        "id": "i1",
        "application_id": "app-1",
        "token": "interaction-token",
        "guild_id": guild_id,
        "data": {"id": "c1", "name": "ask", "options": [{"name": "message", "type": 3, "value": message}]},
        "member": {"user": {"id": "111", "username": "mom_99", "global_name": "Mom"}}
    })
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn ping_is_answered_with_pong() {
    let h = harness().await;
    let ping = json!({"type": 1, "id": "p", "application_id": "app-1", "token": "t"});

    let response = h.router.oneshot(signed_request(&h.key, &ping)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"type": 1}));
}

#[tokio::test]
async fn bad_or_missing_signature_is_unauthorized() {
    let h = harness().await;
    let other_key = SigningKey::from_bytes(&[9u8; 32]);
    let ping = json!({"type": 1, "id": "p", "application_id": "app-1", "token": "t"});

    let forged = h.router.clone().oneshot(signed_request(&other_key, &ping)).await.unwrap();
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);

    let unsigned = Request::builder()
        .method("POST")
        .uri("/interactions")
        .body(Body::from(ping.to_string()))
        .unwrap();
    let response = h.router.oneshot(unsigned).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn other_guild_gets_ephemeral_refusal() {
    let h = harness().await;

    let response = h.router.oneshot(signed_request(&h.key, &ask("9999", "こんにちは"))).await.unwrap();

    let body = json_body(response).await;
    assert_eq!(body["type"], 4);
    assert_eq!(body["data"]["flags"], 64);
    assert_eq!(body["data"]["content"], "このBotはこのサーバーでは使用できません。");
    assert!(h.generator.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn ask_is_deferred_then_original_response_is_edited() {
    let h = harness().await;

    let response =
        h.router.oneshot(signed_request(&h.key, &ask(GUILD_ID, "天気は？"))).await.unwrap();
    assert_eq!(json_body(response).await, json!({"type": 5}));

    let mut edits = Vec::new();
    for _ in 0..50 {
        edits = h.discord.received_requests().await.unwrap_or_default();
        if !edits.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(edits.len(), 1);
    assert_eq!(edits[0].url.path(), "/webhooks/app-1/interaction-token/messages/@original");
    let edit: Value = serde_json::from_slice(&edits[0].body).unwrap();
    assert_eq!(edit["content"], "> 天気は？\n今日は晴れだよ");

    let prompts = h.generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0], "送信者: お母さん\n内容: 天気は？");
}

#[tokio::test]
async fn healthz_responds_without_signature() {
    let h = harness().await;
    let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();

    let response = h.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
