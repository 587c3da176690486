//! Remote lookup providers for AI-assisted place search.
//!
//! Defines the transport side of the [`RemoteLookup`] seam:
//! - **[`DisabledLookup`]**: resolves every query as a failed lookup; used when the gateway is not configured.
//! - **[`LovableGateway`]**: calls the Lovable AI gateway's chat-completions endpoint and parses structured place info out of the reply.
//!
//! Use [`create_lookup`] to instantiate the appropriate provider based on
//! the configuration.
//!
//! # Response Handling
//!
//! The model is forced to answer through a `return_place_info` tool call.
//! Replies are parsed from `tool_calls[0].function.arguments` first, then
//! from the plain message content as a fallback. Rate limiting (HTTP 429)
//! and quota exhaustion (HTTP 402) map to fixed user-facing messages inside
//! the [`LookupResponse`] envelope rather than transport errors; only
//! network failures and unexpected statuses surface as `Err`.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use culturevault_core::models::PlaceInfo;
use culturevault_core::store::{LookupResponse, RemoteLookup};

use crate::config::GatewayConfig;

/// Instructions sent with every lookup. The JSON skeleton pins the exact
/// field names the catalog uses, camelCase included.
const SYSTEM_PROMPT: &str = r#"You are a cultural knowledge database. When given a place name (city/town/village), return a JSON object with this exact structure. Return ONLY valid JSON, no markdown.
{
  "id": "lowercase-hyphenated-name",
  "name": "Place Name",
  "country": "Country",
  "region": "Region (South Asia/East Asia/Europe/Africa/Middle East/North America/South America/Southeast Asia/Oceania/Central Asia/Caribbean/Central America)",
  "continent": "Continent",
  "lat": 0.0,
  "lng": 0.0,
  "population": "estimate",
  "languages": ["lang1"],
  "cultures": [
    {"title": "Culture Title", "category": "Festivals", "description": "2-3 sentence description", "religion": "optional", "celebrationDate": "optional"}
  ],
  "touristPlaces": ["place1", "place2"],
  "famousFood": ["food1", "food2"],
  "famousRestaurants": ["restaurant1"],
  "beaches": [],
  "rivers": [],
  "parks": ["park1"],
  "malls": [],
  "history": "2-3 paragraph history of the place",
  "dressingStyle": "Traditional clothing description",
  "traditions": "Key traditions description",
  "festivals": [{"name": "Festival Name", "date": "When", "description": "Brief description"}],
  "practices": "Cultural practices description"
}
Include at minimum 3 cultures covering different categories like Festivals, Cuisine, Architecture, Dance Forms, Craft Techniques, etc.
Always include real, accurate data. If the place is very small, include whatever is known."#;

// ============ Disabled Lookup ============

/// A no-op lookup used when `gateway.provider = "disabled"`.
///
/// Every query resolves as a failed lookup, so search runs entirely against
/// the local catalog without touching the network.
pub struct DisabledLookup;

#[async_trait]
impl RemoteLookup for DisabledLookup {
    async fn invoke(&self, _query: &str) -> Result<LookupResponse> {
        Ok(LookupResponse::failure("Remote lookup is disabled"))
    }
}

// ============ Lovable AI Gateway ============

/// Lookup provider backed by the Lovable AI gateway.
///
/// Sends a chat-completions request with a forced `return_place_info` tool
/// call and deserializes the tool arguments into a [`PlaceInfo`]. Requires
/// the API key to be present in the environment variable named by
/// `gateway.api_key_env`.
pub struct LovableGateway {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl LovableGateway {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            anyhow::anyhow!("{} environment variable not set", config.api_key_env)
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl RemoteLookup for LovableGateway {
    async fn invoke(&self, query: &str) -> Result<LookupResponse> {
        let body = build_request_body(&self.model, query);

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // 429/402 are expected operational states, not errors; surface
            // them in the envelope with stable messages.
            if status.as_u16() == 429 {
                return Ok(LookupResponse::failure(
                    "Rate limit exceeded, please try again.",
                ));
            }
            if status.as_u16() == 402 {
                return Ok(LookupResponse::failure("Usage limit reached."));
            }
            let body_text = response.text().await.unwrap_or_default();
            bail!("AI gateway error {}: {}", status, body_text);
        }

        let json: serde_json::Value = response.json().await?;
        Ok(parse_gateway_response(&json))
    }
}

/// Build the chat-completions request for a place query.
///
/// `tool_choice` pins the reply to `return_place_info` so the model cannot
/// answer in prose.
fn build_request_body(model: &str, query: &str) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": format!("Provide complete cultural information for: {}", query) },
        ],
        "tools": [place_info_tool()],
        "tool_choice": { "type": "function", "function": { "name": "return_place_info" } },
    })
}

/// Schema for the `return_place_info` tool, mirroring [`PlaceInfo`].
///
/// `population` is a string on the wire (values like `"32 million"`), and
/// only the identity and culture fields are required.
fn place_info_tool() -> serde_json::Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": "return_place_info",
            "description": "Return structured place information",
            "parameters": {
                "type": "object",
                "properties": {
                    "id": { "type": "string" },
                    "name": { "type": "string" },
                    "country": { "type": "string" },
                    "region": { "type": "string" },
                    "continent": { "type": "string" },
                    "lat": { "type": "number" },
                    "lng": { "type": "number" },
                    "population": { "type": "string" },
                    "languages": { "type": "array", "items": { "type": "string" } },
                    "cultures": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "title": { "type": "string" },
                                "category": { "type": "string" },
                                "description": { "type": "string" },
                                "religion": { "type": "string" },
                                "celebrationDate": { "type": "string" },
                            },
                            "required": ["title", "category", "description"],
                        },
                    },
                    "touristPlaces": { "type": "array", "items": { "type": "string" } },
                    "famousFood": { "type": "array", "items": { "type": "string" } },
                    "famousRestaurants": { "type": "array", "items": { "type": "string" } },
                    "beaches": { "type": "array", "items": { "type": "string" } },
                    "rivers": { "type": "array", "items": { "type": "string" } },
                    "parks": { "type": "array", "items": { "type": "string" } },
                    "malls": { "type": "array", "items": { "type": "string" } },
                    "history": { "type": "string" },
                    "dressingStyle": { "type": "string" },
                    "traditions": { "type": "string" },
                    "festivals": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "name": { "type": "string" },
                                "date": { "type": "string" },
                                "description": { "type": "string" },
                            },
                        },
                    },
                    "practices": { "type": "string" },
                },
                "required": ["id", "name", "country", "region", "continent", "lat", "lng", "population", "languages", "cultures"],
            },
        },
    })
}

/// Extract a [`LookupResponse`] from the gateway reply.
///
/// Prefers the forced tool call's arguments; some models skip the tool and
/// answer inline, so the raw message content is tried as JSON next. Anything
/// else becomes a failed lookup, never an error.
fn parse_gateway_response(json: &serde_json::Value) -> LookupResponse {
    let message = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"));

    if let Some(arguments) = message
        .and_then(|m| m.get("tool_calls"))
        .and_then(|t| t.get(0))
        .and_then(|t| t.get("function"))
        .and_then(|f| f.get("arguments"))
        .and_then(|a| a.as_str())
    {
        if let Ok(info) = serde_json::from_str::<PlaceInfo>(arguments) {
            return LookupResponse::ok(info);
        }
    }

    // Fallback: try the message content as raw JSON
    let content = message
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .unwrap_or("");

    match serde_json::from_str::<PlaceInfo>(content) {
        Ok(info) => LookupResponse::ok(info),
        Err(_) => LookupResponse::failure("Could not parse response"),
    }
}

/// Create the appropriate [`RemoteLookup`] based on configuration.
///
/// # Errors
///
/// Returns an error for unknown provider names or if the gateway cannot be
/// initialized (missing API key).
pub fn create_lookup(config: &GatewayConfig) -> Result<Arc<dyn RemoteLookup>> {
    match config.provider.as_str() {
        "disabled" => Ok(Arc::new(DisabledLookup)),
        "lovable" => Ok(Arc::new(LovableGateway::new(config)?)),
        other => bail!("Unknown gateway provider: {}", other),
    }
}
