use std::collections::BTreeMap;

use reqwest::{header, Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

use crate::config::{Config, Endpoints};
use crate::error::{ClientError, Result};

/// Thin JSON client over the configured Ollama endpoint table.
///
/// Every call is a single non-streaming request; the decoded body is handed
/// back untouched so callers can shape it (see [`crate::responses`]).
#[derive(Clone)]
pub struct OllamaClient {
    http: Client,
    host: String,
    endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, images: Vec<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            images,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    images: &'a [String],
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Serialize)]
struct ShowRequest<'a> {
    name: &'a str,
}

impl OllamaClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.ollama.timeout_duration())
            .user_agent(config.ollama.user_agent.clone())
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            host: config.ollama.host.trim_end_matches('/').to_string(),
            endpoints: config.api.endpoints.clone(),
        })
    }

    /// Underlying HTTP client, shared with image downloads.
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// `GET` a named endpoint from the `get` table.
    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        let url = self.url("GET", &self.endpoints.get, endpoint)?;
        log::debug!("GET {url}");
        self.send(url.clone(), self.http.get(&url)).await
    }

    /// `POST` a JSON body to a named endpoint from the `post` table.
    pub async fn post<B: Serialize + ?Sized>(&self, endpoint: &str, body: &B) -> Result<Value> {
        let url = self.url("POST", &self.endpoints.post, endpoint)?;
        log::debug!("POST {url}");
        self.send(url.clone(), self.http.post(&url).json(body)).await
    }

    pub async fn version(&self) -> Result<Value> {
        self.get("version").await
    }

    pub async fn tags(&self) -> Result<Value> {
        self.get("tags").await
    }

    pub async fn running(&self) -> Result<Value> {
        self.get("ps").await
    }

    pub async fn show(&self, model: &str) -> Result<Value> {
        self.post("show", &ShowRequest { name: model }).await
    }

    pub async fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<Value> {
        let request = ChatRequest {
            model,
            messages,
            stream: false,
        };
        self.post("chat", &request).await
    }

    pub async fn generate(&self, model: &str, prompt: &str, images: &[String]) -> Result<Value> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            images,
        };
        self.post("generate", &request).await
    }

    pub async fn embed(&self, model: &str, input: &[String]) -> Result<Value> {
        self.post("embed", &EmbedRequest { model, input }).await
    }

    fn url(
        &self,
        method: &'static str,
        table: &BTreeMap<String, String>,
        endpoint: &str,
    ) -> Result<String> {
        let path = table
            .get(endpoint)
            .ok_or_else(|| ClientError::UnknownEndpoint {
                method,
                name: endpoint.to_string(),
            })?;
        Ok(format!("{}{}", self.host, path))
    }

    async fn send(&self, url: String, request: RequestBuilder) -> Result<Value> {
        let response = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read response>".to_string());
            log::warn!("Ollama returned {status} for {url}");
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|source| ClientError::InvalidBody { url, source })
    }
}
