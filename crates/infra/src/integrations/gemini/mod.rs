//! Gemini integration for chat answers
//!
//! Wraps the `generateContent` endpoint of the Generative Language API and
//! implements the core `TextGenerator` port.
//!
//! # Usage
//!
//! ```no_run
//! use famcal_core::TextGenerator;
//! use famcal_infra::http::HttpClient;
//! use famcal_infra::integrations::gemini::GeminiClient;
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let http_client = HttpClient::new()?;
//! let api_key = std::env::var("GEMINI_API_KEY")?;
//! let client = GeminiClient::new(api_key, "あなたは家族のアシスタントです。", http_client);
//!
//! let answer = client.generate("送信者: Alice\n内容: こんにちは", &[]).await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - **Network errors** and **5xx**: surfaced after one attempt (`POST` is never retried)
//! - **Any status >= 400**: error carrying the status and the response body
//! - **No candidates / no text**: treated as a failed generation

pub mod client;
pub mod types;

pub use client::GeminiClient;
pub use types::GeminiError;
