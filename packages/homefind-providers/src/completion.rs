use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

/// One text-generation call. Temperature 0.0 requests are treated as deterministic by callers
/// that cache the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
	pub prompt: String,
	pub max_tokens: u32,
	pub temperature: f32,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub stop: Vec<String>,
}
impl CompletionRequest {
	pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
		Self { prompt: prompt.into(), max_tokens, temperature: 0.0, stop: Vec::new() }
	}

	pub fn with_stop(mut self, stop: &str) -> Self {
		self.stop.push(stop.to_string());

		self
	}
}

pub async fn complete(
	cfg: &homefind_config::LlmProviderConfig,
	request: &CompletionRequest,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = request_body(cfg, request);
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion_response(json)
}

fn request_body(cfg: &homefind_config::LlmProviderConfig, request: &CompletionRequest) -> Value {
	let mut body = serde_json::json!({
		"model": cfg.model,
		"messages": [
			{ "role": "system", "content": cfg.system_prompt },
			{ "role": "user", "content": straighten_quotes(&request.prompt) },
		],
		"max_tokens": request.max_tokens,
		"temperature": request.temperature,
	});

	if !request.stop.is_empty()
		&& let Some(map) = body.as_object_mut()
	{
		map.insert("stop".to_string(), serde_json::json!(request.stop));
	}

	body
}

fn parse_completion_response(json: Value) -> Result<String> {
	let choice = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.ok_or_else(|| Error::invalid_response("Completion response is missing choices."))?;
	let content = choice
		.get("message")
		.and_then(|msg| msg.get("content"))
		.or_else(|| choice.get("text"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::invalid_response("Completion choice is missing text content."))?;

	Ok(content.trim().to_string())
}

fn straighten_quotes(text: &str) -> String {
	text.replace(['\u{201C}', '\u{201D}'], "\"").replace(['\u{2018}', '\u{2019}'], "'")
}
