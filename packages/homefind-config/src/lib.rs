mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Cache, Config, Dataset, Export, LlmProviderConfig, MessagingProviderConfig, Pipeline, Providers,
	Service,
};

use std::{env, fs, net::SocketAddr, path::Path};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MESSAGING_API_KEY_ENV: &str = "PINNACLE_API_KEY";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg, env::var(API_KEY_ENV).ok(), env::var(MESSAGING_API_KEY_ENV).ok());

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	cfg.service.http_bind.parse::<SocketAddr>().map_err(|err| Error::InvalidBind {
		field: "service.http_bind",
		value: cfg.service.http_bind.clone(),
		source: err,
	})?;

	if cfg.dataset.listings_path.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "dataset.listings_path must be non-empty.".to_string(),
		});
	}
	if !is_plain_identifier(&cfg.dataset.table) {
		return Err(Error::Validation {
			message: "dataset.table must be a plain identifier (letters, digits, underscores)."
				.to_string(),
		});
	}

	let llm = &cfg.providers.llm;

	for (label, value) in [
		("providers.llm.provider_id", &llm.provider_id),
		("providers.llm.api_base", &llm.api_base),
		("providers.llm.model", &llm.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if llm.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: format!("providers.llm.api_key must be non-empty (or set {API_KEY_ENV})."),
		});
	}
	if llm.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.llm.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &llm.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("providers.llm.default_headers.{key} must be a string."),
			});
		}
	}

	if let Some(messaging) = &cfg.providers.messaging {
		for (label, value) in [
			("providers.messaging.provider_id", &messaging.provider_id),
			("providers.messaging.api_base", &messaging.api_base),
			("providers.messaging.api_key_header", &messaging.api_key_header),
			("providers.messaging.sender", &messaging.sender),
		] {
			if value.trim().is_empty() {
				return Err(Error::Validation { message: format!("{label} must be non-empty.") });
			}
		}

		if messaging.api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!(
					"providers.messaging.api_key must be non-empty (or set {MESSAGING_API_KEY_ENV})."
				),
			});
		}
		if messaging.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "providers.messaging.timeout_ms must be greater than zero.".to_string(),
			});
		}
	}

	if cfg.cache.ttl_seconds == 0 {
		return Err(Error::Validation {
			message: "cache.ttl_seconds must be greater than zero.".to_string(),
		});
	}
	if cfg.cache.sweep_threshold == 0 {
		return Err(Error::Validation {
			message: "cache.sweep_threshold must be greater than zero.".to_string(),
		});
	}
	if !(1..=50).contains(&cfg.pipeline.max_key_phrases) {
		return Err(Error::Validation {
			message: "pipeline.max_key_phrases must be in the range 1-50.".to_string(),
		});
	}
	if cfg.export.path.as_os_str().is_empty() {
		return Err(Error::Validation { message: "export.path must be non-empty.".to_string() });
	}

	Ok(())
}

fn normalize(
	cfg: &mut Config,
	fallback_api_key: Option<String>,
	fallback_messaging_key: Option<String>,
) {
	if cfg.providers.llm.api_key.trim().is_empty()
		&& let Some(key) = fallback_api_key.filter(|key| !key.trim().is_empty())
	{
		cfg.providers.llm.api_key = key;
	}
	if let Some(messaging) = cfg.providers.messaging.as_mut()
		&& messaging.api_key.trim().is_empty()
		&& let Some(key) = fallback_messaging_key.filter(|key| !key.trim().is_empty())
	{
		messaging.api_key = key;
	}
	if cfg.dataset.brokers_path.as_deref().map(|path| path.as_os_str().is_empty()).unwrap_or(false)
	{
		cfg.dataset.brokers_path = None;
	}

	cfg.dataset.table = cfg.dataset.table.trim().to_string();
	cfg.dataset.internal_fields = cfg
		.dataset
		.internal_fields
		.iter()
		.map(|field| field.trim().to_lowercase())
		.filter(|field| !field.is_empty())
		.collect();
}

fn is_plain_identifier(value: &str) -> bool {
	let mut chars = value.chars();

	match chars.next() {
		Some(first) if first.is_ascii_alphabetic() || first == '_' => {},
		_ => return false,
	}

	chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
