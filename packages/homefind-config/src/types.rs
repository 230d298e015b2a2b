use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub dataset: Dataset,
	pub providers: Providers,
	#[serde(default)]
	pub cache: Cache,
	#[serde(default)]
	pub pipeline: Pipeline,
	#[serde(default)]
	pub export: Export,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	#[serde(default = "default_true")]
	pub cors_allow_any_origin: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
	pub listings_path: PathBuf,
	/// Optional. Broker lookups return nothing when unset.
	pub brokers_path: Option<PathBuf>,
	/// Table name the synthesized filter statements must reference.
	#[serde(default = "default_table")]
	pub table: String,
	/// Ingestion-only columns dropped at load and stripped from every response.
	#[serde(default = "default_internal_fields")]
	pub internal_fields: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub llm: LlmProviderConfig,
	/// Optional. Carousel dispatch is refused when unset.
	#[serde(default)]
	pub messaging: Option<MessagingProviderConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	/// Falls back to `OPENAI_API_KEY` when left empty.
	#[serde(default)]
	pub api_key: String,
	pub path: String,
	pub model: String,
	#[serde(default = "default_system_prompt")]
	pub system_prompt: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// An RCS carousel endpoint that takes `{ from, to, cards }` and authenticates with an API key
/// header.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	/// Falls back to `PINNACLE_API_KEY` when left empty.
	#[serde(default)]
	pub api_key: String,
	#[serde(default = "default_api_key_header")]
	pub api_key_header: String,
	pub path: String,
	/// Sender id placed in the `from` field.
	#[serde(default = "default_sender")]
	pub sender: String,
	pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Cache {
	pub ttl_seconds: u64,
	/// Entry count above which a write first drops expired entries.
	pub sweep_threshold: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Pipeline {
	pub max_key_phrases: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Export {
	pub path: PathBuf,
}

impl Default for Cache {
	fn default() -> Self {
		Self { ttl_seconds: 300, sweep_threshold: 10_000 }
	}
}

impl Default for Pipeline {
	fn default() -> Self {
		Self { max_key_phrases: 10 }
	}
}

impl Default for Export {
	fn default() -> Self {
		Self { path: PathBuf::from("query_output.txt") }
	}
}

fn default_true() -> bool {
	true
}

fn default_table() -> String {
	"zillow_data".to_string()
}

fn default_internal_fields() -> Vec<String> {
	vec!["crawl_url_result".to_string()]
}

fn default_api_key_header() -> String {
	"PINNACLE-API-Key".to_string()
}

fn default_sender() -> String {
	"test".to_string()
}

fn default_system_prompt() -> String {
	"You are a helpful assistant specialized in real estate search.".to_string()
}
