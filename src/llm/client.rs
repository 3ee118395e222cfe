use super::binding::{ApiSurface, GenerateMethod};
use super::types::*;
use crate::{Error, Result, config::GeminiConfig};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// The one interface the endpoint layer sees: a configured model that turns
/// a message into reply text. Created once at startup, read-only afterwards.
#[async_trait]
pub trait ModelHandle: Send + Sync {
    async fn generate(&self, message: &str) -> Result<String>;
}

#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    surface: ApiSurface,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig, surface: ApiSurface) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            surface,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/{}/models/{}:{}",
            self.base_url,
            self.surface.version,
            self.model,
            self.surface.method.rpc_name()
        )
    }

    async fn post_json(&self, url: &str, body: &impl serde::Serialize) -> Result<String> {
        let mut request = self.http.post(url).json(body);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::provider(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::provider(format!("Gemini response unreadable: {}", e)))?;

        if !status.is_success() {
            return Err(Error::provider(format!(
                "Gemini API error {}: {}",
                status, text
            )));
        }

        Ok(text)
    }

    async fn generate_content(&self, message: &str) -> Result<String> {
        let request = GenerateContentRequest::from_message(message);
        let body = self.post_json(&self.generate_url(), &request).await?;

        let response: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| Error::provider(format!("Gemini response unparseable: {}", e)))?;

        // Prefer extracted text; fall back to the raw body when the response
        // carried none, so the caller always gets something to show.
        Ok(response.text().unwrap_or(body))
    }

    async fn generate_text(&self, message: &str) -> Result<String> {
        let request = GenerateTextRequest {
            prompt: TextPrompt {
                text: message.to_string(),
            },
        };
        let body = self.post_json(&self.generate_url(), &request).await?;

        let response: GenerateTextResponse = serde_json::from_str(&body)
            .map_err(|e| Error::provider(format!("Gemini response unparseable: {}", e)))?;

        let output = response.candidates.into_iter().find_map(|c| c.output);
        Ok(output.unwrap_or(body))
    }
}

#[async_trait]
impl ModelHandle for GeminiClient {
    async fn generate(&self, message: &str) -> Result<String> {
        debug!(
            model = %self.model,
            surface = %self.surface.version,
            message_len = message.len(),
            "Sending generation request"
        );

        match self.surface.method {
            GenerateMethod::GenerateContent => self.generate_content(message).await,
            GenerateMethod::GenerateText => self.generate_text(message).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CANDIDATE_SURFACES;
    use pretty_assertions::assert_eq;

    fn test_config() -> GeminiConfig {
        GeminiConfig {
            api_key: Some("test-api-key".to_string()),
            model: "gemini-2.5-flash-preview-05-20".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            probe_on_startup: true,
        }
    }

    #[test]
    fn generate_url_for_current_surface() {
        let client = GeminiClient::new(&test_config(), CANDIDATE_SURFACES[0]).unwrap();

        assert_eq!(
            client.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-05-20:generateContent"
        );
    }

    #[test]
    fn generate_url_for_legacy_surface() {
        let client = GeminiClient::new(&test_config(), CANDIDATE_SURFACES[2]).unwrap();

        assert_eq!(
            client.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta2/models/gemini-2.5-flash-preview-05-20:generateText"
        );
    }

    #[test]
    fn trailing_slash_in_base_url_is_trimmed() {
        let mut config = test_config();
        config.base_url = "http://localhost:9999/".to_string();

        let client = GeminiClient::new(&config, CANDIDATE_SURFACES[0]).unwrap();
        assert!(client.generate_url().starts_with("http://localhost:9999/v1beta/"));
    }
}
