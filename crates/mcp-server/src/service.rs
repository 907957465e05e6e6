use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use ask_ollama_client::responses::{self, ModelListing};
use ask_ollama_client::{image, ChatMessage, ClientError, Config, ErrorEnvelope, OllamaClient};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    AnnotateAble, CallToolResult, Content, Implementation, ListResourcesResult,
    PaginatedRequestParam, RawResource, ReadResourceRequestParam, ReadResourceResult,
    ResourceContents, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api_doc;
use crate::guide;

pub const API_DOC_URI: &str = "file://api-md";

/// ask-ollama MCP service
#[derive(Clone)]
pub struct AskOllamaService {
    config: Arc<Config>,
    client: OllamaClient,
    tool_router: ToolRouter<Self>,
}

impl AskOllamaService {
    pub fn new(config: Config) -> Result<Self> {
        let client = OllamaClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            client,
            tool_router: Self::tool_router(),
        })
    }

    fn connection_failed(&self, err: &ClientError, with_suggestions: bool) -> CallToolResult {
        log::warn!("Ollama request failed: {err}");
        error_result(responses::connection_failed(
            &self.config.ollama,
            err,
            with_suggestions,
        ))
    }

    /// Convert every image source to the bare base64 payload Ollama expects.
    async fn encode_images(&self, sources: &[String]) -> Result<Vec<String>, ErrorEnvelope> {
        let mut encoded = Vec::with_capacity(sources.len());
        for source in sources {
            let uri = image::to_data_uri(self.client.http(), source, self.config.images.max_size_mb)
                .await
                .map_err(|err| {
                    log::warn!("Rejected image input: {err}");
                    responses::invalid_image(source, &err)
                })?;
            encoded.push(image::base64_payload(&uri).to_string());
        }
        Ok(encoded)
    }

    fn model_listing(
        &self,
        reply: ask_ollama_client::Result<Value>,
        listing: ModelListing,
    ) -> CallToolResult {
        match reply {
            Ok(raw) => shaped(responses::model_list(raw, listing)),
            Err(err) => self.connection_failed(&err, false),
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn json_result(value: &Value) -> CallToolResult {
    CallToolResult::success(vec![Content::text(pretty(value))])
}

fn error_result(envelope: ErrorEnvelope) -> CallToolResult {
    let value = envelope.to_value();
    let mut result = CallToolResult::error(vec![Content::text(pretty(&value))]);
    result.structured_content = Some(value);
    result
}

fn shaped(outcome: std::result::Result<Value, ErrorEnvelope>) -> CallToolResult {
    match outcome {
        Ok(value) => json_result(&value),
        Err(envelope) => error_result(envelope),
    }
}

// ============================================================================
// Tool Input Schemas
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ShowModelRequest {
    #[schemars(description = "Model name, e.g. \"llama3\" or \"mistral\"")]
    pub model: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EmbeddingsRequest {
    #[schemars(description = "Embedding model, e.g. \"nomic-embed-text\"")]
    pub model: String,

    #[schemars(description = "Texts to embed, one vector per entry")]
    pub text: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PromptRequest {
    #[schemars(description = "Model name, e.g. \"llama3\"")]
    pub model: String,

    #[schemars(description = "User input text")]
    pub prompt: String,

    /// Data URIs, http(s) URLs or local file paths
    #[schemars(
        description = "Optional images for multimodal models: data:image/...;base64 URIs, http(s) URLs or local paths (jpg, jpeg, png, gif, bmp, webp)"
    )]
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ApiDocSectionRequest {
    #[schemars(
        description = "Heading path to the section, one title per level, e.g. [\"API\", \"Generate a completion\", \"Parameters\"]"
    )]
    pub titles: Vec<String>,

    #[schemars(description = "Maximum content length in characters (defaults to api_doc.max_length)")]
    pub max_length: Option<usize>,
}

// ============================================================================
// Tools
// ============================================================================

#[tool_router]
impl AskOllamaService {
    #[tool(
        description = "Getting started guide for ask-ollama: project overview, available tools, recommended workflow, configuration and best practices. Run this first."
    )]
    pub async fn get_started_guide(&self) -> Result<CallToolResult, McpError> {
        Ok(json_result(&guide::started_guide()))
    }

    #[tool(description = "Get the version of the Ollama server. Useful to check that the service is reachable.")]
    pub async fn get_ollama_version(&self) -> Result<CallToolResult, McpError> {
        Ok(match self.client.version().await {
            Ok(raw) => json_result(&raw),
            Err(err) => self.connection_failed(&err, false),
        })
    }

    #[tool(description = "List all models available on the Ollama server (/api/tags).")]
    pub async fn get_ollama_list(&self) -> Result<CallToolResult, McpError> {
        let reply = self.client.tags().await;
        Ok(self.model_listing(reply, ModelListing::Available))
    }

    #[tool(description = "List the models currently loaded in memory (/api/ps), like 'ollama ps'.")]
    pub async fn get_running_models(&self) -> Result<CallToolResult, McpError> {
        let reply = self.client.running().await;
        Ok(self.model_listing(reply, ModelListing::Running))
    }

    #[tool(description = "Show detailed information about a model: family, parameters, template, license and modelfile.")]
    pub async fn post_show_model(
        &self,
        Parameters(request): Parameters<ShowModelRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(match self.client.show(&request.model).await {
            Ok(raw) => json_result(&raw),
            Err(err) => self.connection_failed(&err, false),
        })
    }

    #[tool(description = "Generate embeddings for a list of texts (/api/embed). Returns the vectors with count and dimension metadata.")]
    pub async fn post_generate_embeddings(
        &self,
        Parameters(request): Parameters<EmbeddingsRequest>,
    ) -> Result<CallToolResult, McpError> {
        Ok(match self.client.embed(&request.model, &request.text).await {
            Ok(raw) => shaped(responses::embeddings(raw)),
            Err(err) => self.connection_failed(&err, true),
        })
    }

    #[tool(
        description = "Single-turn, non-streaming chat with a model. No history, system prompt or options. Returns the reply with performance metrics."
    )]
    pub async fn simple_chat(
        &self,
        Parameters(request): Parameters<PromptRequest>,
    ) -> Result<CallToolResult, McpError> {
        let images = match self.encode_images(request.images.as_deref().unwrap_or_default()).await {
            Ok(images) => images,
            Err(envelope) => return Ok(error_result(envelope)),
        };
        let messages = [ChatMessage::user(request.prompt.as_str(), images)];
        Ok(match self.client.chat(&request.model, &messages).await {
            Ok(raw) => shaped(responses::chat(&request.model, &request.prompt, raw)),
            Err(err) => self.connection_failed(&err, true),
        })
    }

    #[tool(
        description = "Single non-streaming text generation (/api/generate). Returns the generated text with performance metrics."
    )]
    pub async fn simple_generate(
        &self,
        Parameters(request): Parameters<PromptRequest>,
    ) -> Result<CallToolResult, McpError> {
        let images = match self.encode_images(request.images.as_deref().unwrap_or_default()).await {
            Ok(images) => images,
            Err(envelope) => return Ok(error_result(envelope)),
        };
        Ok(
            match self
                .client
                .generate(&request.model, &request.prompt, &images)
                .await
            {
                Ok(raw) => shaped(responses::generate(&request.model, &request.prompt, raw)),
                Err(err) => self.connection_failed(&err, true),
            },
        )
    }

    #[tool(
        description = "Navigate the Ollama API documentation by heading path. Each title is matched at the next heading level; the reply reports per-title status, available titles at the current and next level, and truncation info."
    )]
    pub async fn get_api_doc_section(
        &self,
        Parameters(request): Parameters<ApiDocSectionRequest>,
    ) -> Result<CallToolResult, McpError> {
        let max_length = request
            .max_length
            .unwrap_or(self.config.api_doc.max_length);
        let section =
            api_doc::load_section(&self.config.api_doc.file_path, &request.titles, max_length).await;
        let value = serde_json::to_value(&section)
            .map_err(|err| McpError::internal_error(format!("serialize section: {err}"), None))?;
        Ok(json_result(&value))
    }
}

#[tool_handler]
impl ServerHandler for AskOllamaService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("ask-ollama exposes a local Ollama server. Start with 'get_started_guide', check the service with 'get_ollama_version', and use 'get_api_doc_section' to read the API documentation by heading path.".into()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let mut resource = RawResource::new(API_DOC_URI, "api-md");
        resource.description = Some("Ollama API documentation (Markdown)".to_string());
        resource.mime_type = Some("text/markdown".to_string());
        std::future::ready(Ok(ListResourcesResult::with_all_items(vec![
            resource.no_annotation()
        ])))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            if request.uri != API_DOC_URI {
                return Err(McpError::resource_not_found(
                    format!("Unknown resource: {}", request.uri),
                    None,
                ));
            }
            let path = &self.config.api_doc.file_path;
            let text = tokio::fs::read_to_string(path).await.map_err(|err| {
                log::warn!("Failed to read API doc {}: {err}", path.display());
                McpError::resource_not_found(
                    format!("Failed to read API documentation: {err}"),
                    Some(json!({ "path": path.display().to_string() })),
                )
            })?;
            Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(text, request.uri)],
            })
        }
    }
}
