use serde_json::{json, Value};

/// Static onboarding document returned by `get_started_guide`.
pub fn started_guide() -> Value {
    json!({
        "project": {
            "name": "ask-ollama",
            "type": "MCP (Model Context Protocol) Service",
            "description": "MCP-based Ollama API interaction service providing standardized interfaces and structured responses",
            "version": env!("CARGO_PKG_VERSION"),
            "status": "Development"
        },
        "features": {
            "core_features": [
                "Standardized JSON response format",
                "Comprehensive error handling and status feedback",
                "Detailed performance metrics",
                "Simple configuration management",
                "Built-in API documentation navigation",
                "Image input for multimodal models"
            ],
            "current_limitations": [
                "No streaming response support (one-time response only)",
                "No multi-turn conversation history",
                "No system prompt support",
                "No context management",
                "No parameter tuning",
                "Some admin-level endpoints not implemented"
            ]
        },
        "available_tools": {
            "server_info": {
                "get_ollama_version": {
                    "description": "Get Ollama server version",
                    "use_case": "Check service availability and version compatibility"
                }
            },
            "model_management": {
                "get_ollama_list": {
                    "description": "List all available models",
                    "use_case": "View installed models"
                },
                "get_running_models": {
                    "description": "Show currently running models",
                    "use_case": "Monitor active model instances"
                },
                "post_show_model": {
                    "description": "Get detailed model information",
                    "use_case": "View model specifications and configuration"
                }
            },
            "model_interaction": {
                "simple_chat": {
                    "description": "Basic chat functionality with optional images",
                    "use_case": "Single-turn conversation without context"
                },
                "simple_generate": {
                    "description": "Basic text generation with optional images",
                    "use_case": "Single generation without streaming"
                },
                "post_generate_embeddings": {
                    "description": "Generate text vector representations",
                    "use_case": "Using /api/embed endpoint for text embeddings"
                }
            },
            "documentation": {
                "get_api_doc_section": {
                    "description": "API documentation navigator",
                    "use_case": "Navigate and retrieve API documentation content using title paths",
                    "features": [
                        "Multi-level title navigation",
                        "Available title suggestions",
                        "Complete context information",
                        "Automatic content length management"
                    ],
                    "example": {
                        "titles": ["API", "Generate a completion", "Parameters"],
                        "explanation": "Retrieve parameter documentation for the completion generation API"
                    }
                }
            }
        },
        "recommended_workflow": {
            "important_notes": {
                "for_users": [
                    "If you're new to Ollama, keep the Ollama server logs visible",
                    "They show how each API request is processed in real time",
                    "Memory usage, model loading and errors appear there first",
                    "Check config.json for the service configuration"
                ],
                "for_llm_assistants": [
                    "Check config.json for service configuration before calling models",
                    "Ask for the user's permission to proceed",
                    "Explain what operations will be performed",
                    "Use get_api_doc_section to understand API details",
                    "Wait for the user's confirmation before executing commands"
                ]
            },
            "configuration": {
                "important_settings": [
                    {
                        "file": "config.json",
                        "key_settings": [
                            {
                                "path": "ollama.host",
                                "default": "http://localhost:11434",
                                "description": "Ollama service address; OLLAMA_HOST overrides it"
                            },
                            {
                                "path": "ollama.timeout",
                                "default": 30,
                                "description": "API request timeout in seconds"
                            },
                            {
                                "path": "api_doc.file_path",
                                "default": "ollama-api.md",
                                "description": "Markdown API documentation, relative to config.json"
                            },
                            {
                                "path": "api_doc.max_length",
                                "default": 8000,
                                "description": "Maximum length for documentation content"
                            },
                            {
                                "path": "images.max_size_mb",
                                "default": 10.0,
                                "description": "Largest accepted image input"
                            }
                        ],
                        "note": "Set ASK_OLLAMA_CONFIG or pass the file path as the first argument to use another file"
                    }
                ]
            },
            "initial_setup": [
                {
                    "step": 1,
                    "action": "Check service status",
                    "tool": "get_ollama_version",
                    "purpose": "Verify connection and compatibility"
                },
                {
                    "step": 2,
                    "action": "View available models",
                    "tool": "get_ollama_list",
                    "purpose": "Confirm available models"
                }
            ],
            "basic_usage": [
                {
                    "step": 1,
                    "action": "View model information",
                    "tool": "post_show_model",
                    "purpose": "Understand model capabilities"
                },
                {
                    "step": 2,
                    "action": "Browse API documentation",
                    "tool": "get_api_doc_section",
                    "purpose": "Learn API details before use"
                },
                {
                    "step": 3,
                    "action": "Use chat or generation",
                    "tool": "simple_chat or simple_generate",
                    "purpose": "Interact with model"
                }
            ],
            "advanced_usage": [
                {
                    "step": 1,
                    "action": "Monitor model status",
                    "tool": "get_running_models",
                    "purpose": "Track resource usage"
                },
                {
                    "step": 2,
                    "action": "Generate text embeddings",
                    "tool": "post_generate_embeddings",
                    "purpose": "Generate vector representations using /api/embed"
                },
                {
                    "step": 3,
                    "action": "Explore API details",
                    "tool": "get_api_doc_section",
                    "purpose": "Get detailed API parameters and usage information",
                    "example": {
                        "use_case": "View completion API parameter documentation",
                        "arguments": { "titles": ["API", "Generate a completion", "Parameters"] }
                    }
                }
            ]
        },
        "best_practices": [
            "Check server status before operations",
            "Use post_show_model to understand model capabilities",
            "Monitor performance metrics",
            "Review API documentation for parameter details",
            "Use the documentation navigator for accurate information",
            "Be aware of endpoint limitations"
        ],
        "development_status": {
            "implemented": [
                "Basic information queries",
                "Model management (read-only operations)",
                "Basic text generation",
                "Single-turn chat",
                "Image inputs",
                "Text embeddings",
                "API documentation navigation"
            ],
            "not_implemented": [
                "Streaming responses",
                "Multi-turn conversations",
                "System prompts",
                "Parameter tuning",
                "Model management (write operations)"
            ]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guide_lists_every_tool() {
        let guide = started_guide();
        let tools = &guide["available_tools"];
        for (group, tool) in [
            ("server_info", "get_ollama_version"),
            ("model_management", "get_ollama_list"),
            ("model_management", "get_running_models"),
            ("model_management", "post_show_model"),
            ("model_interaction", "simple_chat"),
            ("model_interaction", "simple_generate"),
            ("model_interaction", "post_generate_embeddings"),
            ("documentation", "get_api_doc_section"),
        ] {
            assert!(tools[group][tool].is_object(), "{group}.{tool} missing");
        }
        assert_eq!(guide["project"]["name"], "ask-ollama");
    }
}
